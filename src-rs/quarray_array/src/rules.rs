//! The unit rule of every element-wise operation.

use quarray_unit::{Exponent, Unit, divide_unit, exponent_from_f64, multiply_unit};

use crate::{
    UnitArrayError, UnitArrayResult,
    hooks::{OperandInfo, WrapContext},
    ufunc::{BinaryUfunc, UnaryUfunc, Ufunc},
};

/// Computes the unit of the result of an operation from its operands.
///
/// # Errors
///
/// Returns an error if the operand units are not valid for the operation.
pub fn result_unit(context: &WrapContext<'_>) -> UnitArrayResult<Unit> {
    match context.ufunc {
        Ufunc::Unary(ufunc) => unary_unit(ufunc, context.operand(0)),
        Ufunc::Binary(ufunc) => binary_unit(ufunc, context.operand(0), context.operand(1)),
    }
}

fn unary_unit(ufunc: UnaryUfunc, operand: OperandInfo<'_>) -> UnitArrayResult<Unit> {
    let unit = operand.unit_or_dimensionless();

    match ufunc {
        UnaryUfunc::Negative
        | UnaryUfunc::Absolute
        | UnaryUfunc::Conjugate
        | UnaryUfunc::Rint
        | UnaryUfunc::Floor
        | UnaryUfunc::Ceil
        | UnaryUfunc::Trunc
        | UnaryUfunc::OnesLike => Ok(unit),

        UnaryUfunc::Square => unit.powi(2).map_err(UnitArrayError::from),
        UnaryUfunc::Sqrt => unit.pow(Exponent::new(1, 2)).map_err(UnitArrayError::from),
        UnaryUfunc::Cbrt => unit.pow(Exponent::new(1, 3)).map_err(UnitArrayError::from),
        UnaryUfunc::Reciprocal => unit.reciprocal().map_err(UnitArrayError::from),

        UnaryUfunc::Radians
        | UnaryUfunc::Degrees
        | UnaryUfunc::Sin
        | UnaryUfunc::Cos
        | UnaryUfunc::Tan
        | UnaryUfunc::Sinh
        | UnaryUfunc::Cosh
        | UnaryUfunc::Tanh
        | UnaryUfunc::Arcsin
        | UnaryUfunc::Arccos
        | UnaryUfunc::Arctan
        | UnaryUfunc::Arcsinh
        | UnaryUfunc::Arccosh
        | UnaryUfunc::Arctanh
        | UnaryUfunc::Log
        | UnaryUfunc::Log2
        | UnaryUfunc::Log10
        | UnaryUfunc::Log1p
        | UnaryUfunc::Exp
        | UnaryUfunc::Exp2
        | UnaryUfunc::Expm1 => require_dimensionless(ufunc.into(), unit),
    }
}

fn binary_unit(
    ufunc: BinaryUfunc,
    lhs: OperandInfo<'_>,
    rhs: OperandInfo<'_>,
) -> UnitArrayResult<Unit> {
    match ufunc {
        BinaryUfunc::Multiply => {
            multiply_unit(&lhs.unit_or_dimensionless(), &rhs.unit_or_dimensionless())
                .map_err(UnitArrayError::from)
        }
        BinaryUfunc::Divide => {
            divide_unit(&lhs.unit_or_dimensionless(), &rhs.unit_or_dimensionless())
                .map_err(UnitArrayError::from)
        }

        BinaryUfunc::Add
        | BinaryUfunc::Subtract
        | BinaryUfunc::Remainder
        | BinaryUfunc::Fmod
        | BinaryUfunc::Hypot
        | BinaryUfunc::Maximum
        | BinaryUfunc::Minimum => uniform_unit(lhs, rhs),

        // the ratio of two equal units is dimensionless
        BinaryUfunc::FloorDivide | BinaryUfunc::Arctan2 => {
            uniform_unit(lhs, rhs).map(|_| Unit::dimensionless())
        }

        BinaryUfunc::Power => power_unit(lhs, rhs),
    }
}

/// Checks that two operands may be compared element by element and returns
/// their common unit.
///
/// # Errors
///
/// Returns an error if the operands do not share a unit.
pub fn comparison_unit(lhs: OperandInfo<'_>, rhs: OperandInfo<'_>) -> UnitArrayResult<Unit> {
    uniform_unit(lhs, rhs)
}

/// Requires both operands to have the same unit.
///
/// A plain operand is accepted next to a unit operand if the unit is
/// dimensionless, or if every element of the plain operand is zero.
fn uniform_unit(lhs: OperandInfo<'_>, rhs: OperandInfo<'_>) -> UnitArrayResult<Unit> {
    match (lhs.unit, rhs.unit) {
        (Some(lhs_unit), Some(rhs_unit)) => {
            lhs_unit.check_same(rhs_unit)?;
            Ok(lhs_unit.clone())
        }
        (Some(unit), None) if unit.is_dimensionless() || rhs.all_zero => Ok(unit.clone()),
        (None, Some(unit)) if unit.is_dimensionless() || lhs.all_zero => Ok(unit.clone()),
        (Some(_), None) | (None, Some(_)) => Err(UnitArrayError::incompatible(
            &lhs.unit_or_dimensionless(),
            &rhs.unit_or_dimensionless(),
        )),
        (None, None) => Ok(Unit::dimensionless()),
    }
}

fn power_unit(base: OperandInfo<'_>, exponent: OperandInfo<'_>) -> UnitArrayResult<Unit> {
    if let Some(unit) = exponent.unit
        && !unit.is_dimensionless()
    {
        return Err(UnitArrayError::DimensionedExponent { unit: unit.clone() });
    }

    let Some(value) = exponent.uniform_value else {
        return Err(UnitArrayError::NonUniformExponent);
    };

    let unit = base.unit_or_dimensionless();
    if unit.is_dimensionless() {
        return Ok(unit);
    }

    raise_unit(&unit, value)
}

/// Raises a unit to a floating point exponent.
///
/// The exponent must be close to a fraction whose denominator is at most
/// [`MAX_DENOMINATOR`](quarray_unit::MAX_DENOMINATOR).
pub(crate) fn raise_unit(unit: &Unit, exponent: f64) -> UnitArrayResult<Unit> {
    let invalid = || UnitArrayError::InvalidExponent { exponent };

    let rational = exponent_from_f64(exponent).ok_or_else(invalid)?;
    unit.pow(rational).map_err(|_| invalid())
}

fn require_dimensionless(ufunc: Ufunc, unit: Unit) -> UnitArrayResult<Unit> {
    if unit.is_dimensionless() {
        Ok(unit)
    } else {
        Err(UnitArrayError::NotDimensionless { ufunc, unit })
    }
}

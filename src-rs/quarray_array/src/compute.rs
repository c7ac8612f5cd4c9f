//! The driver of element-wise operations.
//!
//! An operation first evaluates its numeric kernel on the broadcast
//! operands. The operand whose array type has the highest priority then
//! supplies the hooks: `propagate` gives the provisional unit of the result
//! and `wrap` decides its final unit, or rejects the operation.

use std::{ops, sync::Arc};

use ndarray::{ArrayD, ArrayViewD, Zip};
use quarray_unit::Unit;

use crate::{
    ArrayType, ArrayValue, Element, UnitArray, UnitArrayError, UnitArrayResult,
    hooks::{HasUnit, WrapContext, Wrapped},
    operand::Operand,
    rules,
    ufunc::{BinaryUfunc, UnaryUfunc, Ufunc},
};

/// Applies an operation with one operand.
///
/// A plain operand gives a plain result without consulting any hooks.
///
/// # Errors
///
/// Returns an error if the wrap hook rejects the unit of the operand.
pub fn apply_unary<'a, A: Element>(
    ufunc: UnaryUfunc,
    operand: impl Into<Operand<'a, A>>,
) -> UnitArrayResult<ArrayValue<A>> {
    let operand = operand.into();
    let data = operand.values().mapv(|x| ufunc.eval(x));

    evaluate(ufunc.into(), &[&operand], data)
}

/// Applies an operation with two operands.
///
/// The operands are broadcast against each other. If neither operand
/// carries a unit, the result is plain and no hooks are consulted.
///
/// # Errors
///
/// Returns an error if the shapes cannot be broadcast together, or if the
/// wrap hook rejects the units of the operands.
pub fn apply_binary<'l, 'r, A: Element>(
    ufunc: BinaryUfunc,
    lhs: impl Into<Operand<'l, A>>,
    rhs: impl Into<Operand<'r, A>>,
) -> UnitArrayResult<ArrayValue<A>> {
    let lhs = lhs.into();
    let rhs = rhs.into();
    let data = zip_with(&lhs.values().view(), &rhs.values().view(), |x, y| {
        ufunc.eval(x, y)
    })?;

    // views are invariant in their lifetime, so both operands are reborrowed
    // for the duration of the call
    evaluate(ufunc.into(), &[&lhs.reborrow(), &rhs.reborrow()], data)
}

fn evaluate<A: Element>(
    ufunc: Ufunc,
    operands: &[&Operand<'_, A>],
    data: ArrayD<A>,
) -> UnitArrayResult<ArrayValue<A>> {
    let Some((parent, array_type)) = select_parent(operands) else {
        log::trace!("{ufunc} of plain operands, returning a plain array");
        return Ok(ArrayValue::Plain(data));
    };

    let unit = array_type.propagate(Some(parent as &dyn HasUnit));
    let context = WrapContext::new(ufunc, operands.iter().map(|operand| operand.info()).collect());

    match array_type.wrap(unit, &context)? {
        Wrapped::Tagged(unit) => Ok(ArrayValue::Tagged(UnitArray::from_parts(
            data, unit, array_type,
        ))),
        Wrapped::Plain => Ok(ArrayValue::Plain(data)),
    }
}

/// Picks the operand whose array type has the highest priority. Ties go to
/// the leftmost operand.
fn select_parent<'o, 'a, A>(
    operands: &[&'o Operand<'a, A>],
) -> Option<(&'o Operand<'a, A>, Arc<ArrayType>)> {
    let mut selected: Option<(&'o Operand<'a, A>, Arc<ArrayType>)> = None;

    for &operand in operands {
        let Some(array_type) = operand.array_type() else {
            continue;
        };

        let replace = selected
            .as_ref()
            .is_none_or(|(_, current)| array_type.priority() > current.priority());

        if replace {
            selected = Some((operand, array_type));
        }
    }

    selected
}

/// Computes the shape two shapes broadcast to, aligning them at their last
/// axis.
fn broadcast_shape(lhs: &[usize], rhs: &[usize]) -> Option<Vec<usize>> {
    let ndim = lhs.len().max(rhs.len());
    let mut shape = vec![1; ndim];

    for (axis_from_end, size) in shape.iter_mut().rev().enumerate() {
        let lhs_size = lhs
            .len()
            .checked_sub(axis_from_end + 1)
            .map_or(1, |axis| lhs[axis]);
        let rhs_size = rhs
            .len()
            .checked_sub(axis_from_end + 1)
            .map_or(1, |axis| rhs[axis]);

        *size = match (lhs_size, rhs_size) {
            (lhs_size, rhs_size) if lhs_size == rhs_size => lhs_size,
            (1, other) | (other, 1) => other,
            _ => return None,
        };
    }

    Some(shape)
}

/// Broadcasts two arrays together and combines them element by element.
pub(crate) fn zip_with<A: Copy, B>(
    lhs: &ArrayViewD<'_, A>,
    rhs: &ArrayViewD<'_, A>,
    mut f: impl FnMut(A, A) -> B,
) -> UnitArrayResult<ArrayD<B>> {
    let mismatch = || UnitArrayError::ShapeMismatch {
        lhs: lhs.shape().to_vec(),
        rhs: rhs.shape().to_vec(),
    };

    let shape = broadcast_shape(lhs.shape(), rhs.shape()).ok_or_else(mismatch)?;

    let (Some(lhs), Some(rhs)) = (lhs.broadcast(shape.clone()), rhs.broadcast(shape)) else {
        return Err(mismatch());
    };

    Ok(Zip::from(&lhs).and(&rhs).map_collect(|&x, &y| f(x, y)))
}

impl<A: Element> UnitArray<A> {
    /// Applies an operation with one operand to the array.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is not valid for the unit of the
    /// array.
    pub fn checked_unary(&self, ufunc: UnaryUfunc) -> UnitArrayResult<ArrayValue<A>> {
        apply_unary(ufunc, self)
    }

    /// Applies an operation with two operands, with `self` on the left.
    ///
    /// # Errors
    ///
    /// Returns an error if the shapes cannot be broadcast together, or if
    /// the operation is not valid for the operand units.
    pub fn checked_binary<'r>(
        &self,
        ufunc: BinaryUfunc,
        rhs: impl Into<Operand<'r, A>>,
    ) -> UnitArrayResult<ArrayValue<A>> {
        apply_binary(ufunc, self, rhs)
    }

    /// Adds `rhs` element by element. Both operands must have the same unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the units differ or the shapes are not
    /// compatible.
    pub fn checked_add<'r>(&self, rhs: impl Into<Operand<'r, A>>) -> UnitArrayResult<ArrayValue<A>> {
        self.checked_binary(BinaryUfunc::Add, rhs)
    }

    /// Subtracts `rhs` element by element. Both operands must have the same
    /// unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the units differ or the shapes are not
    /// compatible.
    pub fn checked_sub<'r>(&self, rhs: impl Into<Operand<'r, A>>) -> UnitArrayResult<ArrayValue<A>> {
        self.checked_binary(BinaryUfunc::Subtract, rhs)
    }

    /// Multiplies by `rhs` element by element, multiplying the units.
    ///
    /// # Errors
    ///
    /// Returns an error if the shapes are not compatible.
    pub fn checked_mul<'r>(&self, rhs: impl Into<Operand<'r, A>>) -> UnitArrayResult<ArrayValue<A>> {
        self.checked_binary(BinaryUfunc::Multiply, rhs)
    }

    /// Divides by `rhs` element by element, dividing the units.
    ///
    /// # Errors
    ///
    /// Returns an error if the shapes are not compatible.
    pub fn checked_div<'r>(&self, rhs: impl Into<Operand<'r, A>>) -> UnitArrayResult<ArrayValue<A>> {
        self.checked_binary(BinaryUfunc::Divide, rhs)
    }

    /// Computes the remainder of the division by `rhs`. Both operands must
    /// have the same unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the units differ or the shapes are not
    /// compatible.
    pub fn checked_rem<'r>(&self, rhs: impl Into<Operand<'r, A>>) -> UnitArrayResult<ArrayValue<A>> {
        self.checked_binary(BinaryUfunc::Remainder, rhs)
    }

    /// Raises every element to the power `exponent`.
    ///
    /// The exponent must be dimensionless and the same for every element,
    /// even when the array itself is dimensionless. If the array has a unit,
    /// the exponent must also be close to a fraction whose denominator is at most
    /// [`MAX_DENOMINATOR`](quarray_unit::MAX_DENOMINATOR).
    ///
    /// # Errors
    ///
    /// Returns an error if the exponent carries a unit, differs between
    /// elements, has no such fraction or overflows an exponent of the unit.
    pub fn checked_pow<'r>(&self, exponent: impl Into<Operand<'r, A>>) -> UnitArrayResult<ArrayValue<A>> {
        self.checked_binary(BinaryUfunc::Power, exponent)
    }

    /// Negates every element.
    ///
    /// # Errors
    ///
    /// Returns an error only if a custom wrap hook rejects the operation.
    pub fn negative(&self) -> UnitArrayResult<ArrayValue<A>> {
        self.checked_unary(UnaryUfunc::Negative)
    }

    /// Takes the absolute value of every element.
    ///
    /// # Errors
    ///
    /// Returns an error only if a custom wrap hook rejects the operation.
    pub fn absolute(&self) -> UnitArrayResult<ArrayValue<A>> {
        self.checked_unary(UnaryUfunc::Absolute)
    }

    /// Squares every element, squaring the unit.
    ///
    /// # Errors
    ///
    /// Returns an error only if a custom wrap hook rejects the operation.
    pub fn square(&self) -> UnitArrayResult<ArrayValue<A>> {
        self.checked_unary(UnaryUfunc::Square)
    }

    /// Takes the square root of every element, halving the exponents of the
    /// unit.
    ///
    /// # Errors
    ///
    /// Returns an error only if a custom wrap hook rejects the operation.
    pub fn sqrt(&self) -> UnitArrayResult<ArrayValue<A>> {
        self.checked_unary(UnaryUfunc::Sqrt)
    }

    /// Takes the reciprocal of every element, inverting the unit.
    ///
    /// # Errors
    ///
    /// Returns an error only if a custom wrap hook rejects the operation.
    pub fn reciprocal(&self) -> UnitArrayResult<ArrayValue<A>> {
        self.checked_unary(UnaryUfunc::Reciprocal)
    }

    /// Adds `rhs` in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the units differ, or if the result would not
    /// have the shape of `self`. `self` is unchanged on error.
    pub fn checked_add_assign<'r>(&mut self, rhs: impl Into<Operand<'r, A>>) -> UnitArrayResult<()> {
        self.assign_binary(BinaryUfunc::Add, rhs.into())
    }

    /// Subtracts `rhs` in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the units differ, or if the result would not
    /// have the shape of `self`. `self` is unchanged on error.
    pub fn checked_sub_assign<'r>(&mut self, rhs: impl Into<Operand<'r, A>>) -> UnitArrayResult<()> {
        self.assign_binary(BinaryUfunc::Subtract, rhs.into())
    }

    /// Multiplies by `rhs` in place, updating the unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the result would not have the shape of `self`.
    /// `self` is unchanged on error.
    pub fn checked_mul_assign<'r>(&mut self, rhs: impl Into<Operand<'r, A>>) -> UnitArrayResult<()> {
        self.assign_binary(BinaryUfunc::Multiply, rhs.into())
    }

    /// Divides by `rhs` in place, updating the unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the result would not have the shape of `self`.
    /// `self` is unchanged on error.
    pub fn checked_div_assign<'r>(&mut self, rhs: impl Into<Operand<'r, A>>) -> UnitArrayResult<()> {
        self.assign_binary(BinaryUfunc::Divide, rhs.into())
    }

    /// Raises every element to the power `exponent` in place, updating the
    /// unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the exponent is not valid, or if the result
    /// would not have the shape of `self`. `self` is unchanged on error.
    pub fn checked_pow_assign<'r>(&mut self, exponent: impl Into<Operand<'r, A>>) -> UnitArrayResult<()> {
        self.assign_binary(BinaryUfunc::Power, exponent.into())
    }

    fn assign_binary(&mut self, ufunc: BinaryUfunc, rhs: Operand<'_, A>) -> UnitArrayResult<()> {
        let result = apply_binary(ufunc, &*self, rhs)?;

        if result.shape() != self.shape() {
            return Err(UnitArrayError::ShapeMismatch {
                lhs: self.shape().to_vec(),
                rhs: result.shape().to_vec(),
            });
        }

        match result {
            ArrayValue::Tagged(array) => {
                let (data, unit) = array.into_parts();
                self.replace_data(data, unit);
            }
            ArrayValue::Plain(data) => self.replace_data(data, Unit::dimensionless()),
        }

        Ok(())
    }

    /// Compares `self < rhs` element by element.
    ///
    /// # Errors
    ///
    /// Returns an error if the units differ or the shapes are not
    /// compatible.
    pub fn less<'r>(&self, rhs: impl Into<Operand<'r, A>>) -> UnitArrayResult<ArrayD<bool>> {
        self.compare(rhs.into(), |x, y| x < y)
    }

    /// Compares `self <= rhs` element by element.
    ///
    /// # Errors
    ///
    /// Returns an error if the units differ or the shapes are not
    /// compatible.
    pub fn less_equal<'r>(&self, rhs: impl Into<Operand<'r, A>>) -> UnitArrayResult<ArrayD<bool>> {
        self.compare(rhs.into(), |x, y| x <= y)
    }

    /// Compares `self > rhs` element by element.
    ///
    /// # Errors
    ///
    /// Returns an error if the units differ or the shapes are not
    /// compatible.
    pub fn greater<'r>(&self, rhs: impl Into<Operand<'r, A>>) -> UnitArrayResult<ArrayD<bool>> {
        self.compare(rhs.into(), |x, y| x > y)
    }

    /// Compares `self >= rhs` element by element.
    ///
    /// # Errors
    ///
    /// Returns an error if the units differ or the shapes are not
    /// compatible.
    pub fn greater_equal<'r>(&self, rhs: impl Into<Operand<'r, A>>) -> UnitArrayResult<ArrayD<bool>> {
        self.compare(rhs.into(), |x, y| x >= y)
    }

    /// Compares `self == rhs` element by element.
    ///
    /// Quantities of different units are never equal, so a unit mismatch
    /// gives an array of `false` rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the shapes are not compatible.
    pub fn equal<'r>(&self, rhs: impl Into<Operand<'r, A>>) -> UnitArrayResult<ArrayD<bool>> {
        let lhs = Operand::Tagged(self);
        let rhs = rhs.into();
        let comparable = rules::comparison_unit(lhs.info(), rhs.info()).is_ok();

        zip_with(&lhs.values().view(), &rhs.values().view(), |x, y| {
            comparable && x == y
        })
    }

    /// Compares `self != rhs` element by element.
    ///
    /// A unit mismatch gives an array of `true` rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the shapes are not compatible.
    pub fn not_equal<'r>(&self, rhs: impl Into<Operand<'r, A>>) -> UnitArrayResult<ArrayD<bool>> {
        let lhs = Operand::Tagged(self);
        let rhs = rhs.into();
        let comparable = rules::comparison_unit(lhs.info(), rhs.info()).is_ok();

        zip_with(&lhs.values().view(), &rhs.values().view(), |x, y| {
            !comparable || x != y
        })
    }

    fn compare(&self, rhs: Operand<'_, A>, compare: impl Fn(A, A) -> bool) -> UnitArrayResult<ArrayD<bool>> {
        let lhs = Operand::Tagged(self);
        rules::comparison_unit(lhs.info(), rhs.info())?;

        zip_with(&lhs.values().view(), &rhs.values().view(), compare)
    }

    /// Marks the elements that are NaN.
    #[must_use]
    pub fn is_nan(&self) -> ArrayD<bool> {
        self.data().mapv(A::is_nan)
    }

    /// Marks the elements that are neither infinite nor NaN.
    #[must_use]
    pub fn is_finite(&self) -> ArrayD<bool> {
        self.data().mapv(A::is_finite)
    }

    /// Marks the elements that are infinite.
    #[must_use]
    pub fn is_infinite(&self) -> ArrayD<bool> {
        self.data().mapv(A::is_infinite)
    }

    /// Marks the elements whose sign bit is set, including `-0.0`.
    #[must_use]
    pub fn signbit(&self) -> ArrayD<bool> {
        self.data().mapv(A::is_sign_negative)
    }
}

impl<A: Element> ops::Add<&UnitArray<A>> for &UnitArray<A> {
    type Output = UnitArrayResult<ArrayValue<A>>;

    fn add(self, rhs: &UnitArray<A>) -> Self::Output {
        self.checked_add(rhs)
    }
}

impl<A: Element> ops::Sub<&UnitArray<A>> for &UnitArray<A> {
    type Output = UnitArrayResult<ArrayValue<A>>;

    fn sub(self, rhs: &UnitArray<A>) -> Self::Output {
        self.checked_sub(rhs)
    }
}

impl<A: Element> ops::Mul<&UnitArray<A>> for &UnitArray<A> {
    type Output = UnitArrayResult<ArrayValue<A>>;

    fn mul(self, rhs: &UnitArray<A>) -> Self::Output {
        self.checked_mul(rhs)
    }
}

impl<A: Element> ops::Div<&UnitArray<A>> for &UnitArray<A> {
    type Output = UnitArrayResult<ArrayValue<A>>;

    fn div(self, rhs: &UnitArray<A>) -> Self::Output {
        self.checked_div(rhs)
    }
}

impl<A: Element> ops::Neg for &UnitArray<A> {
    type Output = UnitArrayResult<ArrayValue<A>>;

    fn neg(self) -> Self::Output {
        self.negative()
    }
}

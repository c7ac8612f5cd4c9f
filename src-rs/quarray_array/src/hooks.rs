//! The extension points through which unit arrays keep their units
//! consistent.
//!
//! Two hooks are called by the array machinery:
//!
//! - [`ArrayHooks::propagate`] runs every time a new array is derived from
//!   an existing one (slice, reshape, element-wise map, ufunc output). It
//!   receives the originating array, if any, and returns the unit of the new
//!   array. It cannot fail.
//! - [`ArrayHooks::wrap`] runs after an element-wise computation. It
//!   receives the propagated unit and a description of the operation and
//!   decides the final unit of the result, or rejects the operation.

use std::fmt;

use ndarray::{ArrayBase, Data, Dimension};
use num_traits::{ToPrimitive, Zero};
use quarray_unit::Unit;

use crate::{UnitArrayResult, rules, ufunc::Ufunc};

/// A value that may carry a unit.
///
/// Plain arrays carry none; unit arrays and quantities do.
pub trait HasUnit {
    /// Returns the attached unit, if any.
    fn unit_attr(&self) -> Option<&Unit>;
}

impl<S: Data, D: Dimension> HasUnit for ArrayBase<S, D> {
    fn unit_attr(&self) -> Option<&Unit> {
        None
    }
}

impl HasUnit for Unit {
    fn unit_attr(&self) -> Option<&Unit> {
        Some(self)
    }
}

/// The outcome of the wrap hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wrapped {
    /// The result is a unit array with the given unit
    Tagged(Unit),
    /// The result is returned as a plain array
    Plain,
}

/// What the wrap hook knows about one operand of an operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperandInfo<'a> {
    /// The unit of the operand, `None` for plain arrays and scalars
    pub unit: Option<&'a Unit>,
    /// Whether every element of the operand is zero
    pub all_zero: bool,
    /// The common value of all elements, if they are all equal
    pub uniform_value: Option<f64>,
}

impl<'a> OperandInfo<'a> {
    /// Describes an operand from its unit and elements.
    pub fn from_elements<'e, A>(unit: Option<&'a Unit>, elements: impl IntoIterator<Item = &'e A>) -> Self
    where
        A: Zero + ToPrimitive + PartialEq + 'e,
    {
        let mut elements = elements.into_iter();

        let Some(first) = elements.next() else {
            return Self {
                unit,
                all_zero: true,
                uniform_value: None,
            };
        };

        let mut all_zero = first.is_zero();
        let mut uniform = true;

        for element in elements {
            all_zero &= element.is_zero();
            uniform &= element == first;

            if !all_zero && !uniform {
                break;
            }
        }

        Self {
            unit,
            all_zero,
            uniform_value: if uniform { first.to_f64() } else { None },
        }
    }

    /// Returns the unit of the operand, treating plain operands as
    /// dimensionless.
    #[must_use]
    pub fn unit_or_dimensionless(&self) -> Unit {
        self.unit.cloned().unwrap_or_default()
    }
}

/// A description of the operation passed to the wrap hook.
#[derive(Debug, Clone, PartialEq)]
pub struct WrapContext<'a> {
    /// The operation that produced the result
    pub ufunc: Ufunc,
    /// The operands, in order
    pub operands: Vec<OperandInfo<'a>>,
    /// The index of the output being wrapped
    pub output_index: usize,
}

impl<'a> WrapContext<'a> {
    /// Creates a context for the first output of an operation.
    #[must_use]
    pub const fn new(ufunc: Ufunc, operands: Vec<OperandInfo<'a>>) -> Self {
        Self {
            ufunc,
            operands,
            output_index: 0,
        }
    }

    /// Returns the operand at `index`.
    ///
    /// Missing operands are treated as plain, non-zero and non-uniform.
    #[must_use]
    pub fn operand(&self, index: usize) -> OperandInfo<'a> {
        self.operands.get(index).copied().unwrap_or(OperandInfo {
            unit: None,
            all_zero: false,
            uniform_value: None,
        })
    }
}

impl fmt::Display for WrapContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.ufunc)?;

        for (index, operand) in self.operands.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }

            match operand.unit {
                Some(unit) => write!(f, "[{unit}]")?,
                None => write!(f, "plain")?,
            }
        }

        write!(f, ") -> output {}", self.output_index)
    }
}

/// The hooks an array type provides to the array machinery.
pub trait ArrayHooks: fmt::Debug + Send + Sync {
    /// Returns the unit of an array derived from `parent`.
    ///
    /// This must never fail. When the parent is absent or carries no unit,
    /// the derived array is dimensionless.
    fn propagate(&self, parent: Option<&dyn HasUnit>) -> Unit {
        propagate_unit(parent)
    }

    /// Post-processes the result of an element-wise operation.
    ///
    /// `result` is the unit propagated from the operand that supplied the
    /// array type of the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is not valid for the operand units.
    fn wrap(&self, result: Unit, context: &WrapContext<'_>) -> UnitArrayResult<Wrapped>;
}

/// Copies the unit of `parent`, or returns the dimensionless unit if there
/// is no parent or it carries no unit.
#[must_use]
pub fn propagate_unit(parent: Option<&dyn HasUnit>) -> Unit {
    match parent.and_then(HasUnit::unit_attr) {
        Some(unit) => unit.clone(),
        None => {
            log::trace!("parent carries no unit, propagating the dimensionless unit");
            Unit::dimensionless()
        }
    }
}

/// Hooks that apply the unit rules of every operation.
///
/// Products and quotients combine units, sums require equal units, powers
/// scale exponents and transcendental functions require dimensionless
/// input. Dimensionless results are returned as plain arrays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitHooks;

impl ArrayHooks for UnitHooks {
    fn wrap(&self, result: Unit, context: &WrapContext<'_>) -> UnitArrayResult<Wrapped> {
        log::debug!("wrap {context} (propagated [{result}])");

        let unit = rules::result_unit(context)?;

        if unit.is_dimensionless() {
            Ok(Wrapped::Plain)
        } else {
            Ok(Wrapped::Tagged(unit))
        }
    }
}

/// Hooks that only copy units.
///
/// The result of every operation keeps the unit propagated from its parent
/// operand, without any unit algebra or validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassthroughHooks;

impl ArrayHooks for PassthroughHooks {
    fn wrap(&self, result: Unit, context: &WrapContext<'_>) -> UnitArrayResult<Wrapped> {
        log::debug!("wrap {context} (passing through [{result}])");

        Ok(Wrapped::Tagged(result))
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::ufunc::{BinaryUfunc, UnaryUfunc};

    fn meter() -> Unit {
        Unit::single("m")
    }

    #[test]
    fn propagate_copies_parent_unit() {
        let unit = meter();
        assert_eq!(UnitHooks.propagate(Some(&unit)), meter());
    }

    #[test]
    fn propagate_from_plain_array_is_dimensionless() {
        let plain = array![1.0, 2.0];
        assert_eq!(UnitHooks.propagate(Some(&plain)), Unit::dimensionless());
    }

    #[test]
    fn propagate_without_parent_is_dimensionless() {
        assert_eq!(UnitHooks.propagate(None), Unit::dimensionless());
    }

    #[test]
    fn operand_info_detects_uniform_and_zero() {
        let info = OperandInfo::from_elements(None, &[2.0, 2.0, 2.0]);
        assert_eq!(info.uniform_value, Some(2.0));
        assert!(!info.all_zero);

        let info = OperandInfo::from_elements(None, &[0.0, 0.0]);
        assert_eq!(info.uniform_value, Some(0.0));
        assert!(info.all_zero);

        let info = OperandInfo::from_elements(None, &[1.0, 2.0]);
        assert_eq!(info.uniform_value, None);
        assert!(!info.all_zero);
    }

    #[test]
    fn operand_info_of_empty_elements() {
        let info = OperandInfo::from_elements::<f64>(None, &[]);
        assert_eq!(info.uniform_value, None);
        assert!(info.all_zero);
    }

    #[test]
    fn unit_hooks_combine_product() {
        let meter = meter();
        let second = Unit::single("s");
        let context = WrapContext::new(
            BinaryUfunc::Multiply.into(),
            vec![
                OperandInfo::from_elements(Some(&meter), &[1.0]),
                OperandInfo::from_elements(Some(&second), &[1.0]),
            ],
        );

        let wrapped = UnitHooks.wrap(meter.clone(), &context);
        assert_eq!(
            wrapped,
            Ok(Wrapped::Tagged(Unit::from_pairs([("m", 1), ("s", 1)])))
        );
    }

    #[test]
    fn unit_hooks_return_dimensionless_results_plain() {
        let meter = meter();
        let context = WrapContext::new(
            BinaryUfunc::Divide.into(),
            vec![
                OperandInfo::from_elements(Some(&meter), &[1.0]),
                OperandInfo::from_elements(Some(&meter), &[1.0]),
            ],
        );

        assert_eq!(UnitHooks.wrap(meter.clone(), &context), Ok(Wrapped::Plain));
    }

    #[test]
    fn passthrough_hooks_keep_propagated_unit() {
        let meter = meter();
        let context = WrapContext::new(
            UnaryUfunc::Sqrt.into(),
            vec![OperandInfo::from_elements(Some(&meter), &[4.0])],
        );

        assert_eq!(
            PassthroughHooks.wrap(meter.clone(), &context),
            Ok(Wrapped::Tagged(meter))
        );
    }

    #[test]
    fn context_display() {
        let meter = meter();
        let context = WrapContext::new(
            BinaryUfunc::Add.into(),
            vec![
                OperandInfo::from_elements(Some(&meter), &[1.0]),
                OperandInfo::from_elements(None, &[1.0]),
            ],
        );

        assert_eq!(context.to_string(), "add([m], plain) -> output 0");
    }
}

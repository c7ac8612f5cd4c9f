//! Numeric arrays with physical units.
//!
//! This crate bundles the unit algebra of [`quarray_unit`] with the unit
//! arrays of [`quarray_array`].
//!
//! ```
//! use quarray::{Unit, UnitArray, array, units};
//!
//! let voltages = UnitArray::new(array![1.5, 3.0], Unit::single("V"));
//! let currents = UnitArray::new(array![0.5, 0.5], Unit::single("A"));
//!
//! let power = voltages.checked_mul(&currents).expect("products are always valid");
//! assert_eq!(power.unit(), Some(&Unit::from_pairs([("A", 1), ("V", 1)])));
//!
//! let limit = units::volt() * 2.0;
//! assert_eq!(voltages.less(&limit).expect("same unit"), array![true, false].into_dyn());
//! ```

pub use ndarray::{self, array, s};
pub use quarray_array::{
    ArrayHooks, ArrayType, ArrayValue, BinaryUfunc, DEFAULT_PRIORITY, Element, HasUnit, Operand,
    PassthroughHooks, Quantity, UnaryUfunc, Ufunc, UnitArray, UnitArrayError, UnitArrayResult,
    UnitHooks, WrapContext, Wrapped, apply_binary, apply_unary, hooks, rules, ufunc, units,
};
pub use quarray_unit::{
    Exponent, MAX_DENOMINATOR, Sign, Symbol, Unit, UnitError, combine, divide_unit, exponent_from_f64,
    format_exponent, format_unit, multiply_unit, power_unit,
};

//! Unit algebra for unit-tagged arrays
//!
//! A [`Unit`] is a mapping from a unit [`Symbol`] to an exact rational
//! [`Exponent`]. For example, an acceleration has the unit `{m: 1, s: -2}`.
//! An empty mapping is *dimensionless*.
//!
//! This crate is a leaf: it knows nothing about arrays. It provides the rules
//! used to combine the units of two operands and to render a unit for
//! display.
//!
//! ```
//! use quarray_unit::{Unit, divide_unit, format_unit, multiply_unit};
//!
//! let meter = Unit::single("m");
//! let second = Unit::single("s");
//!
//! let velocity = divide_unit(&meter, &second)?;
//! assert_eq!(format_unit(&velocity), "m/s");
//!
//! let distance = multiply_unit(&velocity, &second)?;
//! assert_eq!(distance, meter);
//! # Ok::<(), quarray_unit::UnitError>(())
//! ```
//!
//! Exponents are exact rationals. An operation whose exponents no longer fit
//! into a ratio of 64-bit integers fails with [`UnitError::ExponentOverflow`].

mod error;
mod exponent;
mod format;
mod symbol;
mod unit;

pub use crate::error::UnitError;
pub use crate::exponent::{Exponent, MAX_DENOMINATOR, exponent_from_f64, format_exponent};
pub use crate::format::format_unit;
pub use crate::symbol::Symbol;
pub use crate::unit::{Sign, Unit};

/// Combines two units.
///
/// With [`Sign::Positive`] the exponents of `rhs` are added to those of
/// `lhs` (multiplication). With [`Sign::Negative`] they are subtracted
/// (division). Symbols whose exponent becomes zero are removed.
///
/// # Errors
///
/// Returns `UnitError::ExponentOverflow` if an exponent overflows.
pub fn combine(lhs: &Unit, rhs: &Unit, sign: Sign) -> Result<Unit, UnitError> {
    lhs.combine(rhs, sign)
}

/// Computes the unit of a product.
///
/// For example, `(m/s) * (s) = (m)`.
///
/// # Errors
///
/// Returns `UnitError::ExponentOverflow` if an exponent overflows.
pub fn multiply_unit(lhs: &Unit, rhs: &Unit) -> Result<Unit, UnitError> {
    combine(lhs, rhs, Sign::Positive)
}

/// Computes the unit of a quotient.
///
/// For example, `(m) / (s) = (m/s)`.
///
/// # Errors
///
/// Returns `UnitError::ExponentOverflow` if an exponent overflows.
pub fn divide_unit(lhs: &Unit, rhs: &Unit) -> Result<Unit, UnitError> {
    combine(lhs, rhs, Sign::Negative)
}

/// Raises a unit to the given exponent.
///
/// Raising to the power of zero yields the dimensionless unit.
///
/// # Errors
///
/// Returns `UnitError::ExponentOverflow` if an exponent overflows.
pub fn power_unit(unit: &Unit, exponent: Exponent) -> Result<Unit, UnitError> {
    unit.pow(exponent)
}

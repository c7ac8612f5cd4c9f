//! Predefined quantities for common units.
//!
//! Each function returns one unit of its kind as a quantity over the base
//! symbols `s`, `m`, `V` and `A`. Scaled units carry the scale in their
//! value, so `millisecond()` is `0.001 [s]`.
//!
//! ```
//! use quarray_array::units::{megahertz, microsecond};
//!
//! let cycles = (megahertz() * microsecond()).expect("small exponents").value;
//! assert!((cycles - 1.0).abs() < 1e-12);
//! ```

use quarray_unit::Unit;

use crate::Quantity;

const MILLI: f64 = 1e-3;
const KILO: f64 = 1e3;

fn base(symbol: &str) -> Quantity<f64> {
    Quantity::new(1.0, Unit::single(symbol))
}

/// One second.
#[must_use]
pub fn second() -> Quantity<f64> {
    base("s")
}

/// One millisecond.
#[must_use]
pub fn millisecond() -> Quantity<f64> {
    second() * MILLI
}

/// One microsecond.
#[must_use]
pub fn microsecond() -> Quantity<f64> {
    millisecond() * MILLI
}

/// One nanosecond.
#[must_use]
pub fn nanosecond() -> Quantity<f64> {
    microsecond() * MILLI
}

/// One meter.
#[must_use]
pub fn meter() -> Quantity<f64> {
    base("m")
}

/// One millimeter.
#[must_use]
pub fn millimeter() -> Quantity<f64> {
    meter() * MILLI
}

/// One micrometer.
#[must_use]
pub fn micrometer() -> Quantity<f64> {
    millimeter() * MILLI
}

/// One nanometer.
#[must_use]
pub fn nanometer() -> Quantity<f64> {
    micrometer() * MILLI
}

/// One kilometer.
#[must_use]
pub fn kilometer() -> Quantity<f64> {
    meter() * KILO
}

/// One hertz, the reciprocal of a second.
#[must_use]
pub fn hertz() -> Quantity<f64> {
    Quantity::new(1.0, Unit::from_pairs([("s", -1)]))
}

/// One kilohertz.
#[must_use]
pub fn kilohertz() -> Quantity<f64> {
    hertz() * KILO
}

/// One megahertz.
#[must_use]
pub fn megahertz() -> Quantity<f64> {
    kilohertz() * KILO
}

/// One gigahertz.
#[must_use]
pub fn gigahertz() -> Quantity<f64> {
    megahertz() * KILO
}

/// One volt.
#[must_use]
pub fn volt() -> Quantity<f64> {
    base("V")
}

/// One millivolt.
#[must_use]
pub fn millivolt() -> Quantity<f64> {
    volt() * MILLI
}

/// One microvolt.
#[must_use]
pub fn microvolt() -> Quantity<f64> {
    millivolt() * MILLI
}

/// One kilovolt.
#[must_use]
pub fn kilovolt() -> Quantity<f64> {
    volt() * KILO
}

/// One megavolt.
#[must_use]
pub fn megavolt() -> Quantity<f64> {
    kilovolt() * KILO
}

/// One ampere.
#[must_use]
pub fn ampere() -> Quantity<f64> {
    base("A")
}

/// One milliampere.
#[must_use]
pub fn milliampere() -> Quantity<f64> {
    ampere() * MILLI
}

/// One microampere.
#[must_use]
pub fn microampere() -> Quantity<f64> {
    milliampere() * MILLI
}

/// One kiloampere.
#[must_use]
pub fn kiloampere() -> Quantity<f64> {
    ampere() * KILO
}

/// One megaampere.
#[must_use]
pub fn megaampere() -> Quantity<f64> {
    kiloampere() * KILO
}

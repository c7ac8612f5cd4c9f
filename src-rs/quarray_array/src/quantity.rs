use std::{cmp::Ordering, fmt, ops};

use quarray_unit::{Exponent, Unit};

use crate::{Element, UnitArrayError, UnitArrayResult, hooks::HasUnit, rules};

/// A single number with a unit.
///
/// Quantities are the scalar counterpart of [`UnitArray`](crate::UnitArray):
/// indexing a unit array and reducing it yield quantities.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quantity<A> {
    /// The magnitude
    pub value: A,
    /// The unit of the magnitude
    pub unit: Unit,
}

impl<A> Quantity<A> {
    /// Creates a new quantity.
    #[must_use]
    pub const fn new(value: A, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Creates a dimensionless quantity.
    #[must_use]
    pub fn dimensionless(value: A) -> Self {
        Self::new(value, Unit::dimensionless())
    }

    /// Returns the textual form of the unit.
    #[must_use]
    pub fn symbol(&self) -> String {
        self.unit.to_string()
    }
}

impl<A: Element> Quantity<A> {
    /// Compares two quantities for ordering.
    ///
    /// # Errors
    ///
    /// Returns an error if the units don't match.
    pub fn checked_partial_cmp(&self, rhs: &Self) -> UnitArrayResult<Option<Ordering>> {
        self.unit.check_same(&rhs.unit)?;

        Ok(self.value.partial_cmp(&rhs.value))
    }

    /// Adds two quantities.
    ///
    /// # Errors
    ///
    /// Returns an error if the units don't match.
    pub fn checked_add(self, rhs: &Self) -> UnitArrayResult<Self> {
        self.unit.check_same(&rhs.unit)?;

        Ok(Self {
            value: self.value + rhs.value,
            unit: self.unit,
        })
    }

    /// Subtracts two quantities.
    ///
    /// # Errors
    ///
    /// Returns an error if the units don't match.
    pub fn checked_sub(self, rhs: &Self) -> UnitArrayResult<Self> {
        self.unit.check_same(&rhs.unit)?;

        Ok(Self {
            value: self.value - rhs.value,
            unit: self.unit,
        })
    }

    /// Raises a quantity to a power.
    ///
    /// # Errors
    ///
    /// Returns an error if the exponent carries a unit, or if it cannot be
    /// applied to the unit of the base.
    pub fn checked_pow(self, exponent: &Self) -> UnitArrayResult<Self> {
        if !exponent.unit.is_dimensionless() {
            return Err(UnitArrayError::DimensionedExponent {
                unit: exponent.unit.clone(),
            });
        }

        let value = self.value.powf(exponent.value);

        if self.unit.is_dimensionless() {
            return Ok(Self::dimensionless(value));
        }

        let raw = exponent.value.to_f64().unwrap_or(f64::NAN);

        Ok(Self {
            value,
            unit: rules::raise_unit(&self.unit, raw)?,
        })
    }

    /// Raises a quantity to an integer power.
    ///
    /// # Errors
    ///
    /// Returns an error if an exponent of the unit overflows.
    pub fn powi(self, exponent: i32) -> UnitArrayResult<Self> {
        Ok(Self {
            value: self.value.powi(exponent),
            unit: self.unit.powi(i64::from(exponent))?,
        })
    }

    /// Takes the square root of a quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if an exponent of the unit overflows.
    pub fn sqrt(self) -> UnitArrayResult<Self> {
        Ok(Self {
            value: self.value.sqrt(),
            unit: self.unit.pow(Exponent::new(1, 2))?,
        })
    }

    /// Returns the value expressed as a multiple of `reference`.
    ///
    /// # Errors
    ///
    /// Returns an error if the units don't match.
    pub fn as_number(&self, reference: &Self) -> UnitArrayResult<A> {
        self.unit.check_same(&reference.unit)?;

        Ok(self.value / reference.value)
    }
}

impl<A: Element> ops::Mul for Quantity<A> {
    type Output = UnitArrayResult<Self>;

    fn mul(self, rhs: Self) -> Self::Output {
        Ok(Self {
            value: self.value * rhs.value,
            unit: (self.unit * rhs.unit)?,
        })
    }
}

impl<A: Element> ops::Div for Quantity<A> {
    type Output = UnitArrayResult<Self>;

    fn div(self, rhs: Self) -> Self::Output {
        Ok(Self {
            value: self.value / rhs.value,
            unit: (self.unit / rhs.unit)?,
        })
    }
}

impl<A: Element> ops::Mul<A> for Quantity<A> {
    type Output = Self;

    fn mul(self, rhs: A) -> Self::Output {
        Self {
            value: self.value * rhs,
            unit: self.unit,
        }
    }
}

impl<A: Element> ops::Neg for Quantity<A> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            value: -self.value,
            unit: self.unit,
        }
    }
}

impl<A> HasUnit for Quantity<A> {
    fn unit_attr(&self) -> Option<&Unit> {
        Some(&self.unit)
    }
}

impl<A: fmt::Display> fmt::Display for Quantity<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.value, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meters(value: f64) -> Quantity<f64> {
        Quantity::new(value, Unit::single("m"))
    }

    #[test]
    fn add_same_unit() {
        let sum = meters(1.0).checked_add(&meters(2.0)).expect("units agree");
        assert_eq!(sum, meters(3.0));
    }

    #[test]
    fn add_different_unit_fails() {
        let seconds = Quantity::new(2.0, Unit::single("s"));
        let result = meters(1.0).checked_sub(&seconds);
        assert!(result.is_err_and(|error| error.is_incompatible_units()));
    }

    #[test]
    fn multiply_and_divide_combine_units() {
        let seconds = Quantity::new(2.0, Unit::single("s"));

        let product = (meters(3.0) * seconds.clone()).expect("small exponents");
        assert_eq!(product.to_string(), "6 [m s]");

        let quotient = (meters(3.0) / seconds).expect("small exponents");
        assert_eq!(quotient.to_string(), "1.5 [m/s]");
    }

    #[test]
    fn pow_scales_unit() {
        let area = meters(3.0).checked_pow(&Quantity::dimensionless(2.0)).expect("valid exponent");
        assert_eq!(area, Quantity::new(9.0, Unit::from_pairs([("m", 2)])));

        let side = area.sqrt().expect("small exponents");
        assert_eq!(side, meters(3.0));
    }

    #[test]
    fn single_precision_pow_keeps_simple_exponent() {
        let length = Quantity::new(16.0_f32, Unit::single("m"));
        let root = length.checked_pow(&Quantity::dimensionless(0.25_f32)).expect("valid exponent");
        assert_eq!(root.symbol(), "m**(1/4)");

        let tenth = Quantity::new(2.0_f32, Unit::single("m"))
            .checked_pow(&Quantity::dimensionless(0.1_f32))
            .expect("valid exponent");
        assert_eq!(tenth.symbol(), "m**(1/10)");
    }

    #[test]
    fn pow_overflow_is_invalid_exponent() {
        let huge = meters(2.0).checked_pow(&Quantity::dimensionless(1e18)).expect("fits");
        let result = huge.checked_pow(&Quantity::dimensionless(100.0));
        assert_eq!(result, Err(UnitArrayError::InvalidExponent { exponent: 100.0 }));
    }

    #[test]
    fn pow_with_dimensioned_exponent_fails() {
        let result = Quantity::dimensionless(2.0).checked_pow(&meters(2.0));
        assert_eq!(
            result,
            Err(UnitArrayError::DimensionedExponent {
                unit: Unit::single("m")
            })
        );
    }

    #[test]
    fn compare() {
        let ordering = meters(1.0).checked_partial_cmp(&meters(2.0)).expect("units agree");
        assert_eq!(ordering, Some(Ordering::Less));

        assert!(meters(1.0).checked_partial_cmp(&Quantity::dimensionless(1.0)).is_err());
    }

    #[test]
    fn as_number() {
        let kilometer = Quantity::new(1000.0, Unit::single("m"));
        assert_eq!(meters(2500.0).as_number(&kilometer), Ok(2.5));
    }
}

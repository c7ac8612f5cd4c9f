use std::{fmt, ops};

use indexmap::IndexMap;
use num_traits::{CheckedAdd, CheckedMul, CheckedSub, Zero};

use crate::{Exponent, Symbol, UnitError, format::format_unit};

/// Whether a combination adds (multiplication) or subtracts (division) the
/// exponents of the right-hand unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    /// Exponents are added
    Positive,
    /// Exponents are subtracted
    Negative,
}

/// A physical unit, represented as a map of symbols and their exponents.
///
/// For example, "m/s" is represented as `{m: 1, s: -1}`.
///
/// A unit never stores a zero exponent, and its entries are kept in
/// lexicographic order of their symbols. Equality does not depend on the
/// order in which the symbols were inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unit(IndexMap<Symbol, Exponent>);

impl Unit {
    /// Creates the dimensionless unit, which has no symbols.
    #[must_use]
    pub fn dimensionless() -> Self {
        Self(IndexMap::new())
    }

    /// Creates a unit consisting of a single symbol with exponent `1`.
    #[must_use]
    pub fn single(symbol: impl Into<Symbol>) -> Self {
        Self::from_iter([(symbol.into(), Exponent::from_integer(1))])
    }

    /// Creates a unit from symbols and integer exponents.
    ///
    /// Exponents of repeated symbols are added, and symbols whose exponent
    /// is zero are dropped.
    ///
    /// # Panics
    ///
    /// Panics if the sum of the exponents of a repeated symbol overflows.
    #[must_use]
    pub fn from_pairs<S: Into<Symbol>>(pairs: impl IntoIterator<Item = (S, i64)>) -> Self {
        pairs
            .into_iter()
            .map(|(symbol, exponent)| (symbol.into(), Exponent::from_integer(exponent)))
            .collect()
    }

    /// Creates a unit from symbols and rational exponents.
    ///
    /// Exponents of repeated symbols are added, and symbols whose exponent
    /// is zero are dropped.
    #[must_use]
    pub fn from_rational_pairs<S: Into<Symbol>>(
        pairs: impl IntoIterator<Item = (S, Exponent)>,
    ) -> Self {
        pairs
            .into_iter()
            .map(|(symbol, exponent)| (symbol.into(), exponent))
            .collect()
    }

    /// Checks if the unit is dimensionless (has no symbols).
    #[must_use]
    pub fn is_dimensionless(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of symbols in the unit.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks if the unit has no symbols. Same as [`Unit::is_dimensionless`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the exponent of the given symbol, if present.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<Exponent> {
        self.0.get(symbol).copied()
    }

    /// Iterates over the symbols and exponents in lexicographic order of
    /// the symbols.
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Exponent)> {
        self.0.iter()
    }

    /// Combines this unit with another one.
    ///
    /// Every exponent of `rhs` is added to (or, for [`Sign::Negative`],
    /// subtracted from) the exponent of the same symbol in `self`. Symbols
    /// only present in `rhs` are inserted with their signed exponent.
    /// Symbols whose exponent becomes zero are removed.
    ///
    /// # Errors
    ///
    /// Returns `UnitError::ExponentOverflow` if an exponent no longer fits
    /// into a ratio of 64-bit integers.
    pub fn combine(&self, rhs: &Self, sign: Sign) -> Result<Self, UnitError> {
        let mut result = self.0.clone();

        for (symbol, exponent) in &rhs.0 {
            let existing = result.get(symbol).copied().unwrap_or_else(Exponent::zero);
            let combined = match sign {
                Sign::Positive => existing.checked_add(exponent),
                Sign::Negative => existing.checked_sub(exponent),
            }
            .ok_or_else(|| UnitError::ExponentOverflow {
                symbol: symbol.clone(),
            })?;

            result.insert(symbol.clone(), combined);
        }

        Ok(Self::normalized(result))
    }

    /// Raises the unit to the power of the given exponent.
    ///
    /// Raising to the power of zero yields the dimensionless unit.
    ///
    /// # Errors
    ///
    /// Returns `UnitError::ExponentOverflow` if an exponent no longer fits
    /// into a ratio of 64-bit integers.
    pub fn pow(&self, exponent: Exponent) -> Result<Self, UnitError> {
        if exponent.is_zero() {
            return Ok(Self::dimensionless());
        }

        self.0
            .iter()
            .map(|(symbol, value)| {
                value
                    .checked_mul(&exponent)
                    .map(|scaled| (symbol.clone(), scaled))
                    .ok_or_else(|| UnitError::ExponentOverflow {
                        symbol: symbol.clone(),
                    })
            })
            .collect()
    }

    /// Raises the unit to an integer power.
    ///
    /// # Errors
    ///
    /// Returns `UnitError::ExponentOverflow` if an exponent overflows.
    pub fn powi(&self, exponent: i64) -> Result<Self, UnitError> {
        self.pow(Exponent::from_integer(exponent))
    }

    /// Returns the reciprocal of the unit, `1/self`.
    ///
    /// # Errors
    ///
    /// Returns `UnitError::ExponentOverflow` if an exponent cannot be negated.
    pub fn reciprocal(&self) -> Result<Self, UnitError> {
        Self::dimensionless().combine(self, Sign::Negative)
    }

    /// Ensures that two units are equal.
    ///
    /// # Errors
    ///
    /// Returns `UnitError::IncompatibleUnits` if the units differ.
    pub fn check_same(&self, other: &Self) -> Result<(), UnitError> {
        if self == other {
            Ok(())
        } else {
            Err(UnitError::IncompatibleUnits {
                left: self.clone(),
                right: other.clone(),
            })
        }
    }

    fn normalized(mut map: IndexMap<Symbol, Exponent>) -> Self {
        map.retain(|_, exponent| !exponent.is_zero());
        map.sort_unstable_keys();
        Self(map)
    }
}

impl FromIterator<(Symbol, Exponent)> for Unit {
    fn from_iter<T: IntoIterator<Item = (Symbol, Exponent)>>(iter: T) -> Self {
        let mut map = IndexMap::new();

        for (symbol, exponent) in iter {
            *map.entry(symbol).or_insert_with(Exponent::zero) += exponent;
        }

        Self::normalized(map)
    }
}

impl<'a> IntoIterator for &'a Unit {
    type Item = (&'a Symbol, &'a Exponent);
    type IntoIter = indexmap::map::Iter<'a, Symbol, Exponent>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl ops::Mul for Unit {
    type Output = Result<Self, UnitError>;

    /// Multiplies two units together
    ///
    /// For example, `(m/s) * (kg) = (kg m/s)`
    fn mul(self, rhs: Self) -> Self::Output {
        self.combine(&rhs, Sign::Positive)
    }
}

impl ops::Mul for &Unit {
    type Output = Result<Unit, UnitError>;

    fn mul(self, rhs: Self) -> Self::Output {
        self.combine(rhs, Sign::Positive)
    }
}

impl ops::Div for Unit {
    type Output = Result<Self, UnitError>;

    /// Divides two units
    ///
    /// For example, `(kg m/s) / (kg) = (m/s)`
    fn div(self, rhs: Self) -> Self::Output {
        self.combine(&rhs, Sign::Negative)
    }
}

impl ops::Div for &Unit {
    type Output = Result<Unit, UnitError>;

    fn div(self, rhs: Self) -> Self::Output {
        self.combine(rhs, Sign::Negative)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_unit(self))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Unit {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Unit {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IndexMap::<Symbol, Exponent>::deserialize(deserializer).map(Self::normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(pairs: &[(&str, i64)]) -> Unit {
        Unit::from_pairs(pairs.iter().copied())
    }

    mod construction_tests {
        use super::*;

        #[test]
        fn dimensionless_is_empty() {
            let unit = Unit::dimensionless();
            assert!(unit.is_dimensionless());
            assert_eq!(unit.len(), 0);
            assert_eq!(unit, Unit::default());
        }

        #[test]
        fn zero_exponents_are_dropped() {
            let unit = unit(&[("m", 1), ("s", 0)]);
            assert_eq!(unit.len(), 1);
            assert_eq!(unit.get("s"), None);
        }

        #[test]
        fn repeated_symbols_are_summed() {
            let unit = unit(&[("m", 1), ("s", -1), ("m", 2)]);
            assert_eq!(unit.get("m"), Some(Exponent::from_integer(3)));
            assert_eq!(unit.get("s"), Some(Exponent::from_integer(-1)));
        }

        #[test]
        fn repeated_symbols_can_cancel() {
            let unit = unit(&[("m", 1), ("m", -1)]);
            assert!(unit.is_dimensionless());
        }

        #[test]
        fn iteration_is_sorted() {
            let unit = unit(&[("s", -2), ("m", 1), ("A", 1)]);
            let symbols = unit.iter().map(|(symbol, _)| symbol.as_str()).collect::<Vec<_>>();
            assert_eq!(symbols, ["A", "m", "s"]);
        }
    }

    mod algebra_tests {
        use super::*;

        #[test]
        fn multiply_adds_exponents() {
            let result = (unit(&[("m", 1), ("s", -1)]) * unit(&[("s", -1)])).expect("small exponents");
            assert_eq!(result, unit(&[("m", 1), ("s", -2)]));
        }

        #[test]
        fn multiply_inserts_new_symbols() {
            let result = (unit(&[("m", 1)]) * unit(&[("kg", 1)])).expect("small exponents");
            assert_eq!(result, unit(&[("kg", 1), ("m", 1)]));
        }

        #[test]
        fn multiply_drops_cancelled_symbols() {
            let result = (unit(&[("m", 1)]) * unit(&[("m", -1)])).expect("small exponents");
            assert!(result.is_dimensionless());
        }

        #[test]
        fn multiply_same_symbol() {
            let result = (unit(&[("s", 1)]) * unit(&[("s", 1)])).expect("small exponents");
            assert_eq!(result, unit(&[("s", 2)]));
        }

        #[test]
        fn divide_subtracts_exponents() {
            let result = (unit(&[("s", 1)]) / unit(&[("m", 1)])).expect("small exponents");
            assert_eq!(result, unit(&[("m", -1), ("s", 1)]));
        }

        #[test]
        fn divide_by_self_is_dimensionless() {
            let velocity = unit(&[("m", 1), ("s", -1)]);
            let ratio = (&velocity / &velocity).expect("small exponents");
            assert!(ratio.is_dimensionless());
        }

        #[test]
        fn divide_into_dimensionless_negates() {
            let result = (Unit::dimensionless() / unit(&[("s", 1), ("m", -2)])).expect("small exponents");
            assert_eq!(result, unit(&[("s", -1), ("m", 2)]));
        }

        #[test]
        fn combine_does_not_modify_operands() {
            let lhs = unit(&[("m", 1)]);
            let rhs = unit(&[("m", 1)]);
            let _ = lhs.combine(&rhs, Sign::Negative);
            assert_eq!(lhs, unit(&[("m", 1)]));
            assert_eq!(rhs, unit(&[("m", 1)]));
        }

        #[test]
        fn pow_scales_exponents() {
            let result = unit(&[("m", 1), ("s", -1)]).powi(3).expect("small exponents");
            assert_eq!(result, unit(&[("m", 3), ("s", -3)]));
        }

        #[test]
        fn pow_zero_is_dimensionless() {
            let result = unit(&[("m", 1), ("s", -1)]).powi(0).expect("small exponents");
            assert!(result.is_dimensionless());
        }

        #[test]
        fn pow_fractional() {
            let area = unit(&[("m", 2)]);
            assert_eq!(area.pow(Exponent::new(1, 2)), Ok(unit(&[("m", 1)])));
        }

        #[test]
        fn pow_overflow_is_an_error() {
            let huge = unit(&[("m", 1_000_000_000_000_000_000)]);
            let result = huge.powi(100);
            assert_eq!(
                result,
                Err(UnitError::ExponentOverflow {
                    symbol: Symbol::from("m"),
                })
            );
        }

        #[test]
        fn combine_overflow_is_an_error() {
            let huge = unit(&[("m", i64::MAX)]);
            let result = huge.combine(&unit(&[("m", 1)]), Sign::Positive);
            let Err(error) = result else {
                panic!("expected an overflow");
            };
            assert_eq!(error.to_string(), "the exponent of m overflows");
        }

        #[test]
        fn reciprocal() {
            let frequency = unit(&[("s", 1)]).reciprocal();
            assert_eq!(frequency, Ok(unit(&[("s", -1)])));
        }
    }

    mod equality_tests {
        use super::*;

        #[test]
        fn equality_ignores_insertion_order() {
            assert_eq!(unit(&[("m", 1), ("s", -1)]), unit(&[("s", -1), ("m", 1)]));
        }

        #[test]
        fn different_exponents_are_not_equal() {
            assert_ne!(unit(&[("m", 1)]), unit(&[("m", 2)]));
        }

        #[test]
        fn different_symbols_are_not_equal() {
            assert_ne!(unit(&[("m", 1)]), unit(&[("m", 1), ("s", 1)]));
        }

        #[test]
        fn check_same_accepts_equal_units() {
            let result = unit(&[("m", 1)]).check_same(&unit(&[("m", 1)]));
            assert_eq!(result, Ok(()));
        }

        #[test]
        fn check_same_rejects_different_units() {
            let result = unit(&[("m", 1)]).check_same(&unit(&[("s", 1)]));
            let Err(error) = result else {
                panic!("expected an error");
            };
            assert_eq!(
                error.to_string(),
                "the two units [m] and [s] are not the same"
            );
        }
    }
}

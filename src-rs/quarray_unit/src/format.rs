use num_traits::{One, Signed};

use crate::{Exponent, Symbol, Unit, exponent::format_exponent};

/// Renders a unit as text.
///
/// Symbols with a positive exponent form the numerator and all others the
/// denominator. Within each part symbols appear in lexicographic order,
/// separated by a single space. A symbol is written bare when its exponent is
/// `1` (numerator) or `-1` (denominator), and as `symbol**|exponent|`
/// otherwise.
///
/// An empty numerator is written as `1`. The denominator, if any, follows a
/// `/`.
///
/// ```
/// use quarray_unit::{Unit, format_unit};
///
/// assert_eq!(format_unit(&Unit::dimensionless()), "1");
/// assert_eq!(format_unit(&Unit::from_pairs([("m", 2)])), "m**2");
/// assert_eq!(format_unit(&Unit::from_pairs([("m", 1), ("s", -2)])), "m/s**2");
/// assert_eq!(format_unit(&Unit::from_pairs([("s", -1)])), "1/s");
/// ```
#[must_use]
pub fn format_unit(unit: &Unit) -> String {
    let mut numerator = Vec::new();
    let mut denominator = Vec::new();

    for (symbol, exponent) in unit.iter() {
        if exponent.is_positive() {
            numerator.push(format_term(symbol, *exponent, Exponent::one()));
        } else {
            denominator.push(format_term(symbol, *exponent, -Exponent::one()));
        }
    }

    let numerator = if numerator.is_empty() {
        "1".to_string()
    } else {
        numerator.join(" ")
    };

    if denominator.is_empty() {
        numerator
    } else {
        format!("{numerator}/{}", denominator.join(" "))
    }
}

fn format_term(symbol: &Symbol, exponent: Exponent, bare_exponent: Exponent) -> String {
    if exponent == bare_exponent {
        symbol.to_string()
    } else {
        format!("{symbol}**{}", format_exponent(exponent.abs()))
    }
}

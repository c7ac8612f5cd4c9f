use num_rational::Rational64;
use num_traits::{ToPrimitive, Zero};

/// The exponent of a symbol within a unit.
///
/// Exponents are exact rationals so that fractional powers such as the
/// result of a square root (`m**(1/2)`) cancel exactly.
pub type Exponent = Rational64;

/// The largest denominator of an exponent obtained from a float.
pub const MAX_DENOMINATOR: i64 = 1000;

/// Relative distance allowed between a float and the exponent it becomes.
///
/// Wide enough for values that went through single precision, so that
/// `0.1_f32` becomes `1/10`.
const TOLERANCE: f64 = 1e-7;

/// Converts a floating point exponent into an exact rational exponent.
///
/// The result is the closest continued-fraction convergent of `value` whose
/// denominator does not exceed [`MAX_DENOMINATOR`].
///
/// Returns `None` if the value is not finite, if it does not fit into a
/// 64-bit numerator, if no such fraction lies within a relative distance of
/// `1e-7` of it, or if a nonzero value would become `0`.
#[must_use]
pub fn exponent_from_f64(value: f64) -> Option<Exponent> {
    if !value.is_finite() {
        return None;
    }

    let exponent = limit_denominator(value)?;
    let approximation = exponent.numer().to_f64()? / exponent.denom().to_f64()?;

    if (approximation - value).abs() > TOLERANCE * value.abs().max(1.0) {
        return None;
    }

    if exponent.is_zero() && value.abs() > 0.0 {
        return None;
    }

    Some(exponent)
}

fn limit_denominator(value: f64) -> Option<Exponent> {
    let whole = value.floor();
    let (mut numer, mut prev_numer) = (whole.to_i64()?, 1_i64);
    let (mut denom, mut prev_denom) = (1_i64, 0_i64);
    let mut rest = value - whole;

    while rest > 0.0 {
        rest = rest.recip();
        let whole = rest.floor();
        rest -= whole;

        let Some(term) = whole.to_i64() else {
            break;
        };
        let Some(next_denom) = term
            .checked_mul(denom)
            .and_then(|product| product.checked_add(prev_denom))
            .filter(|next| *next <= MAX_DENOMINATOR)
        else {
            break;
        };
        let next_numer = term.checked_mul(numer)?.checked_add(prev_numer)?;

        (numer, prev_numer) = (next_numer, numer);
        (denom, prev_denom) = (next_denom, denom);
    }

    Some(Exponent::new(numer, denom))
}

/// Formats an exponent for display.
///
/// Integer exponents are rendered as plain integers (`2`, `-3`). Fractional
/// exponents are parenthesized (`(1/2)`) so that the slash cannot be confused
/// with the numerator/denominator separator of a formatted unit.
#[must_use]
pub fn format_exponent(exponent: Exponent) -> String {
    if exponent.is_integer() {
        exponent.numer().to_string()
    } else {
        format!("({}/{})", exponent.numer(), exponent.denom())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_from_f64() {
        assert_eq!(exponent_from_f64(2.0), Some(Exponent::from_integer(2)));
        assert_eq!(exponent_from_f64(-3.0), Some(Exponent::from_integer(-3)));
    }

    #[test]
    fn fraction_from_f64() {
        assert_eq!(exponent_from_f64(0.5), Some(Exponent::new(1, 2)));
        assert_eq!(exponent_from_f64(-0.25), Some(Exponent::new(-1, 4)));
    }

    #[test]
    fn single_precision_from_f64() {
        assert_eq!(exponent_from_f64(f64::from(0.1_f32)), Some(Exponent::new(1, 10)));
        assert_eq!(exponent_from_f64(f64::from(-1.0_f32 / 3.0)), Some(Exponent::new(-1, 3)));
    }

    #[test]
    fn large_denominators_are_rejected() {
        assert_eq!(exponent_from_f64(0.1234), None);
        assert_eq!(exponent_from_f64(1e-30), None);
    }

    #[test]
    fn zero_from_f64() {
        assert_eq!(exponent_from_f64(0.0), Some(Exponent::zero()));
        assert_eq!(exponent_from_f64(-0.0), Some(Exponent::zero()));
    }

    #[test]
    fn huge_from_f64() {
        assert_eq!(exponent_from_f64(1e18), Some(Exponent::from_integer(1_000_000_000_000_000_000)));
        assert_eq!(exponent_from_f64(1e30), None);
    }

    #[test]
    fn non_finite_from_f64() {
        assert_eq!(exponent_from_f64(f64::NAN), None);
        assert_eq!(exponent_from_f64(f64::INFINITY), None);
    }

    #[test]
    fn format_integer() {
        assert_eq!(format_exponent(Exponent::from_integer(2)), "2");
        assert_eq!(format_exponent(Exponent::from_integer(-1)), "-1");
    }

    #[test]
    fn format_fraction() {
        assert_eq!(format_exponent(Exponent::new(1, 2)), "(1/2)");
        assert_eq!(format_exponent(Exponent::new(-2, 3)), "(-2/3)");
    }
}

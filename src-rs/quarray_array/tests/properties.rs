//! Property tests for unit propagation through array operations.

use ndarray::{Array1, s};
use proptest::prelude::*;
use quarray_array::{ArrayValue, UnitArray};
use quarray_unit::Unit;

fn unit() -> impl Strategy<Value = Unit> {
    let symbol = prop::sample::select(vec!["m", "s", "kg", "A"]);
    prop::collection::vec((symbol, -3_i64..=3), 0..4).prop_map(Unit::from_pairs)
}

fn values() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.5_f64..100.0, 1..12)
}

fn unit_array(values: Vec<f64>, unit: Unit) -> UnitArray<f64> {
    UnitArray::new(Array1::from(values), unit)
}

fn result_unit(value: &ArrayValue<f64>) -> Unit {
    value.unit().cloned().unwrap_or_default()
}

proptest! {
    #[test]
    fn product_unit_is_product_of_units(values in values(), u in unit(), v in unit()) {
        let lhs = unit_array(values.clone(), u.clone());
        let rhs = unit_array(values, v.clone());

        let product = lhs.checked_mul(&rhs).expect("multiplication is always valid");
        prop_assert_eq!(result_unit(&product), (&u * &v).expect("small exponents"));
    }

    #[test]
    fn quotient_unit_is_quotient_of_units(values in values(), u in unit(), v in unit()) {
        let lhs = unit_array(values.clone(), u.clone());
        let rhs = unit_array(values, v.clone());

        let quotient = lhs.checked_div(&rhs).expect("division is always valid");
        prop_assert_eq!(result_unit(&quotient), (&u / &v).expect("small exponents"));
    }

    #[test]
    fn ratio_to_self_is_plain(values in values(), u in unit()) {
        let array = unit_array(values, u);

        let ratio = array.checked_div(&array).expect("division is always valid");
        prop_assert!(!ratio.is_tagged());
    }

    #[test]
    fn sum_of_equal_units_keeps_unit(values in values(), u in unit()) {
        let array = unit_array(values, u.clone());

        let sum = array.checked_add(&array).expect("units agree");
        prop_assert_eq!(result_unit(&sum), u);
    }

    #[test]
    fn sum_of_different_units_fails(values in values(), u in unit(), v in unit()) {
        prop_assume!(u != v);

        let lhs = unit_array(values.clone(), u);
        let rhs = unit_array(values, v);
        prop_assert!(lhs.checked_add(&rhs).is_err());
    }

    #[test]
    fn square_of_sqrt_restores_unit(values in values(), u in unit()) {
        let array = unit_array(values, u.clone());

        let root = array.sqrt().expect("sqrt is always valid");
        let squared = match root {
            ArrayValue::Tagged(root) => root.square().expect("square is always valid"),
            ArrayValue::Plain(data) => ArrayValue::Plain(data.mapv(|x| x * x)),
        };
        prop_assert_eq!(result_unit(&squared), u);
    }

    #[test]
    fn derived_arrays_keep_unit(values in values(), u in unit()) {
        let len = values.len();
        let array = unit_array(values, u.clone());

        let sliced = array.slice(s![..len / 2 + 1]);
        let reshaped = array.reshape(&[len, 1]).expect("same length");
        let doubled = array.map(|x| x * 2.0);

        prop_assert_eq!(sliced.unit(), &u);
        prop_assert_eq!(reshaped.unit(), &u);
        prop_assert_eq!(doubled.unit(), &u);
        prop_assert_eq!(array.sum().unit, u);
    }

    #[test]
    fn equality_across_units_is_all_false(values in values(), u in unit(), v in unit()) {
        prop_assume!(u != v);

        let lhs = unit_array(values.clone(), u);
        let rhs = unit_array(values, v);
        let equal = lhs.equal(&rhs).expect("same shape");
        prop_assert!(equal.iter().all(|&flag| !flag));
    }
}

#![cfg(feature = "serde")]
//! Serialization of unit arrays and quantities.

use ndarray::array;
use quarray_array::{Quantity, UnitArray};
use quarray_unit::Unit;

#[test]
fn unit_array_round_trips() {
    let array = UnitArray::new(
        array![[1.0, 2.0], [3.0, 4.0]],
        Unit::from_pairs([("m", 1), ("s", -1)]),
    );

    let json = serde_json::to_string(&array).expect("array should serialize");
    let restored: UnitArray<f64> = serde_json::from_str(&json).expect("array should deserialize");

    assert_eq!(restored, array);
    assert_eq!(restored.array_type().name(), "UnitArray");
}

#[test]
fn quantity_serializes_value_and_unit() {
    let quantity = Quantity::new(2.5, Unit::single("V"));
    let json = serde_json::to_value(&quantity).expect("quantity should serialize");

    assert_eq!(json, serde_json::json!({ "value": 2.5, "unit": { "V": [1, 1] } }));
}

#![cfg(feature = "serde")]
//! Serialization of units.

use quarray_unit::{Exponent, Unit};

#[test]
fn unit_serializes_as_symbol_map() {
    let unit = Unit::from_pairs([("s", -2), ("m", 1)]);
    let json = serde_json::to_value(&unit).expect("unit should serialize");

    assert_eq!(json, serde_json::json!({ "m": [1, 1], "s": [-2, 1] }));
}

#[test]
fn deserialized_unit_drops_zero_exponents() {
    let json = serde_json::json!({ "s": [0, 1], "m": [1, 2] });
    let unit: Unit = serde_json::from_value(json).expect("unit should deserialize");

    assert_eq!(unit, Unit::from_rational_pairs([("m", Exponent::new(1, 2))]));
}

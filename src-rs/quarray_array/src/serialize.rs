//! Serialization of unit arrays.
//!
//! A unit array is stored as its elements and its unit. The array type is
//! not stored; deserialized arrays are of the standard type.

use ndarray::ArrayD;
use quarray_unit::Unit;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::UnitArray;

#[derive(Serialize)]
struct UnitArrayRef<'a, A> {
    data: &'a ArrayD<A>,
    unit: &'a Unit,
}

#[derive(Deserialize)]
struct UnitArrayOwned<A> {
    data: ArrayD<A>,
    unit: Unit,
}

impl<A: Serialize> Serialize for UnitArray<A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        UnitArrayRef {
            data: self.data(),
            unit: self.unit(),
        }
        .serialize(serializer)
    }
}

impl<'de, A: Deserialize<'de>> Deserialize<'de> for UnitArray<A> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let UnitArrayOwned { data, unit } = UnitArrayOwned::deserialize(deserializer)?;

        Ok(Self::new(data, unit))
    }
}

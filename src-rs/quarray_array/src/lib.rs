//! N-dimensional arrays tagged with physical units
//!
//! A [`UnitArray`] is an `ndarray` array together with a [`Unit`]. The unit
//! follows the array through every operation:
//!
//! - arrays *derived* from a unit array (slices, reshapes, maps, reductions)
//!   receive their unit from the `propagate` hook of the array's
//!   [`ArrayType`],
//! - the results of *element-wise operations* receive their unit from the
//!   `wrap` hook, which applies the unit rule of the operation.
//!
//! ```
//! use quarray_array::{ArrayValue, UnitArray};
//! use quarray_unit::Unit;
//!
//! let distance = UnitArray::new(ndarray::array![1.0, 2.0, 4.0], Unit::single("m"));
//! let time = UnitArray::new(ndarray::array![1.0, 1.0, 2.0], Unit::single("s"));
//!
//! let velocity = distance.checked_div(&time).expect("division is always valid");
//! assert_eq!(velocity.unit().map(ToString::to_string).as_deref(), Some("m/s"));
//!
//! // adding a distance to a time is rejected
//! assert!(distance.checked_add(&time).is_err());
//! ```
//!
//! [`Unit`]: quarray_unit::Unit

mod access;
mod array;
mod array_type;
mod compute;
mod error;
pub mod hooks;
mod operand;
mod quantity;
mod reduce;
pub mod rules;
#[cfg(feature = "serde")]
mod serialize;
pub mod ufunc;
pub mod units;
mod value;

use std::fmt;

use ndarray::ScalarOperand;
use num_traits::{Float, FromPrimitive};

pub use crate::array::UnitArray;
pub use crate::array_type::{ArrayType, DEFAULT_PRIORITY};
pub use crate::compute::{apply_binary, apply_unary};
pub use crate::error::{UnitArrayError, UnitArrayResult};
pub use crate::hooks::{ArrayHooks, HasUnit, PassthroughHooks, UnitHooks, WrapContext, Wrapped};
pub use crate::operand::Operand;
pub use crate::quantity::Quantity;
pub use crate::ufunc::{BinaryUfunc, UnaryUfunc, Ufunc};
pub use crate::value::ArrayValue;

/// The element types that support element-wise operations and reductions.
pub trait Element:
    Float + FromPrimitive + ScalarOperand + fmt::Debug + fmt::Display + Send + Sync + 'static
{
}

impl<T> Element for T where
    T: Float + FromPrimitive + ScalarOperand + fmt::Debug + fmt::Display + Send + Sync + 'static
{
}

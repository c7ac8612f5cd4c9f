use ndarray::{Array, ArrayD, ArrayView, ArrayViewD, Dimension};
use quarray_unit::Unit;

use crate::{UnitArray, hooks::HasUnit};

/// An array that may or may not carry a unit.
///
/// Constructors and operations return a plain array whenever the result
/// has no dimension, and a [`UnitArray`] otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayValue<A> {
    /// An array without a unit
    Plain(ArrayD<A>),
    /// An array with a unit
    Tagged(UnitArray<A>),
}

impl<A> ArrayValue<A> {
    /// Creates a zero-dimensional plain array holding `value`.
    #[must_use]
    pub fn scalar(value: A) -> Self {
        Self::Plain(ndarray::arr0(value).into_dyn())
    }

    /// Returns the unit of the array, if it carries one.
    #[must_use]
    pub fn unit(&self) -> Option<&Unit> {
        match self {
            Self::Plain(_) => None,
            Self::Tagged(array) => Some(array.unit()),
        }
    }

    /// Checks if the array carries a unit.
    #[must_use]
    pub const fn is_tagged(&self) -> bool {
        matches!(self, Self::Tagged(_))
    }

    /// Returns the shape of the array.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Plain(data) => data.shape(),
            Self::Tagged(array) => array.shape(),
        }
    }

    /// Returns a view of the elements without the unit.
    #[must_use]
    pub fn value(&self) -> ArrayViewD<'_, A> {
        match self {
            Self::Plain(data) => data.view(),
            Self::Tagged(array) => array.value(),
        }
    }

    /// Returns the elements without the unit.
    #[must_use]
    pub fn into_array(self) -> ArrayD<A> {
        match self {
            Self::Plain(data) => data,
            Self::Tagged(array) => array.into_value(),
        }
    }

    /// Returns the unit array, or `None` if the array is plain.
    #[must_use]
    pub fn into_tagged(self) -> Option<UnitArray<A>> {
        match self {
            Self::Plain(_) => None,
            Self::Tagged(array) => Some(array),
        }
    }

    /// Returns the unit array, or `None` if the array is plain.
    #[must_use]
    pub const fn as_tagged(&self) -> Option<&UnitArray<A>> {
        match self {
            Self::Plain(_) => None,
            Self::Tagged(array) => Some(array),
        }
    }

    /// Returns the plain array, or `None` if the array carries a unit.
    #[must_use]
    pub const fn as_plain(&self) -> Option<&ArrayD<A>> {
        match self {
            Self::Plain(data) => Some(data),
            Self::Tagged(_) => None,
        }
    }
}

impl<A> HasUnit for ArrayValue<A> {
    fn unit_attr(&self) -> Option<&Unit> {
        self.unit()
    }
}

impl<A, D: Dimension> From<Array<A, D>> for ArrayValue<A> {
    fn from(data: Array<A, D>) -> Self {
        Self::Plain(data.into_dyn())
    }
}

impl<A: Clone, D: Dimension> From<ArrayView<'_, A, D>> for ArrayValue<A> {
    fn from(data: ArrayView<'_, A, D>) -> Self {
        Self::Plain(data.to_owned().into_dyn())
    }
}

impl<A> From<Vec<A>> for ArrayValue<A> {
    fn from(values: Vec<A>) -> Self {
        Self::Plain(Array::from_vec(values).into_dyn())
    }
}

impl<A> From<UnitArray<A>> for ArrayValue<A> {
    fn from(array: UnitArray<A>) -> Self {
        Self::Tagged(array)
    }
}

impl<A: Clone> From<&UnitArray<A>> for ArrayValue<A> {
    fn from(array: &UnitArray<A>) -> Self {
        Self::Tagged(array.clone())
    }
}

impl<A> From<ArrayValue<A>> for ArrayD<A> {
    fn from(value: ArrayValue<A>) -> Self {
        value.into_array()
    }
}

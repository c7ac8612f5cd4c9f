use std::sync::Arc;

use ndarray::{Array, ArrayView, ArrayViewD, CowArray, Dimension, IxDyn};
use quarray_unit::Unit;

use crate::{
    ArrayType, ArrayValue, Element, Quantity, UnitArray,
    hooks::{HasUnit, OperandInfo},
};

/// An input of an element-wise operation.
///
/// Operands borrow their data; the result of an operation is always a new
/// array.
#[derive(Debug, Clone)]
pub enum Operand<'a, A> {
    /// A unit array
    Tagged(&'a UnitArray<A>),
    /// A plain array
    Plain(ArrayViewD<'a, A>),
    /// A single number with a unit
    Quantity(&'a Quantity<A>),
    /// A plain number
    Scalar(A),
}

impl<A> Operand<'_, A> {
    /// Returns the unit of the operand, if it carries one.
    #[must_use]
    pub fn unit(&self) -> Option<&Unit> {
        match self {
            Self::Tagged(array) => Some(array.unit()),
            Self::Quantity(quantity) => Some(&quantity.unit),
            Self::Plain(_) | Self::Scalar(_) => None,
        }
    }

    /// Returns the array type the operand contributes to an operation.
    ///
    /// Quantities count as arrays of the standard type, plain operands
    /// contribute none.
    pub(crate) fn array_type(&self) -> Option<Arc<ArrayType>> {
        match self {
            Self::Tagged(array) => Some(Arc::clone(array.array_type())),
            Self::Quantity(_) => Some(ArrayType::standard()),
            Self::Plain(_) | Self::Scalar(_) => None,
        }
    }
}

impl<A: Element> Operand<'_, A> {
    /// Borrows the operand for a shorter lifetime.
    pub(crate) fn reborrow(&self) -> Operand<'_, A> {
        match self {
            Self::Tagged(array) => Operand::Tagged(*array),
            Self::Plain(view) => Operand::Plain(view.view()),
            Self::Quantity(quantity) => Operand::Quantity(*quantity),
            Self::Scalar(value) => Operand::Scalar(*value),
        }
    }

    /// Returns the elements of the operand as an array.
    pub(crate) fn values(&self) -> CowArray<'_, A, IxDyn> {
        match self {
            Self::Tagged(array) => CowArray::from(array.value()),
            Self::Plain(view) => CowArray::from(view.view()),
            Self::Quantity(quantity) => CowArray::from(ndarray::arr0(quantity.value).into_dyn()),
            Self::Scalar(value) => CowArray::from(ndarray::arr0(*value).into_dyn()),
        }
    }

    /// Describes the operand for the wrap hook.
    pub(crate) fn info(&self) -> OperandInfo<'_> {
        match self {
            Self::Tagged(array) => OperandInfo::from_elements(Some(array.unit()), array.value()),
            Self::Plain(view) => OperandInfo::from_elements(None, view),
            Self::Quantity(quantity) => {
                OperandInfo::from_elements(Some(&quantity.unit), [&quantity.value])
            }
            Self::Scalar(value) => OperandInfo::from_elements(None, [value]),
        }
    }
}

impl<A> HasUnit for Operand<'_, A> {
    fn unit_attr(&self) -> Option<&Unit> {
        self.unit()
    }
}

impl<'a, A> From<&'a UnitArray<A>> for Operand<'a, A> {
    fn from(array: &'a UnitArray<A>) -> Self {
        Self::Tagged(array)
    }
}

impl<'a, A> From<&'a ArrayValue<A>> for Operand<'a, A> {
    fn from(value: &'a ArrayValue<A>) -> Self {
        match value {
            ArrayValue::Plain(data) => Self::Plain(data.view()),
            ArrayValue::Tagged(array) => Self::Tagged(array),
        }
    }
}

impl<'a, A, D: Dimension> From<&'a Array<A, D>> for Operand<'a, A> {
    fn from(data: &'a Array<A, D>) -> Self {
        Self::Plain(data.view().into_dyn())
    }
}

impl<'a, A, D: Dimension> From<ArrayView<'a, A, D>> for Operand<'a, A> {
    fn from(data: ArrayView<'a, A, D>) -> Self {
        Self::Plain(data.into_dyn())
    }
}

impl<'a, A> From<&'a Quantity<A>> for Operand<'a, A> {
    fn from(quantity: &'a Quantity<A>) -> Self {
        Self::Quantity(quantity)
    }
}

impl From<f64> for Operand<'_, f64> {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<f32> for Operand<'_, f32> {
    fn from(value: f32) -> Self {
        Self::Scalar(value)
    }
}

use quarray_unit::{Unit, UnitError};

use crate::ufunc::Ufunc;

/// Result alias for unit array operations that may produce a [`UnitArrayError`].
pub type UnitArrayResult<T> = Result<T, UnitArrayError>;

/// An error produced while constructing or computing with unit arrays.
///
/// Unit mismatches are always reported to the caller. Units are never
/// coerced or converted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnitArrayError {
    /// The input data could not be converted to the requested element type
    /// or shape.
    #[error("could not allocate array: {reason}")]
    Allocation {
        /// Why the conversion failed
        reason: String,
    },

    /// Two units were required to be equal but are not.
    #[error(transparent)]
    Unit(#[from] UnitError),

    /// An operation that only accepts dimensionless input received a unit.
    #[error("{ufunc} requires a dimensionless operand, got [{unit}]")]
    NotDimensionless {
        /// The operation that was attempted
        ufunc: Ufunc,
        /// The unit of the offending operand
        unit: Unit,
    },

    /// An operation on the whole array requires it to be dimensionless.
    #[error("{operation} requires a dimensionless array, got [{unit}]")]
    NotDimensionlessArray {
        /// The operation that was attempted
        operation: &'static str,
        /// The unit of the array
        unit: Unit,
    },

    /// The exponent of a power carries a unit.
    #[error("exponent must be dimensionless, got [{unit}]")]
    DimensionedExponent {
        /// The unit of the exponent
        unit: Unit,
    },

    /// The exponent of a power differs between elements.
    #[error("quantities must be raised to a uniform power")]
    NonUniformExponent,

    /// The exponent of a power cannot be represented exactly.
    #[error("exponent {exponent} cannot be applied to a unit")]
    InvalidExponent {
        /// The offending exponent
        exponent: f64,
    },

    /// Two shapes could not be broadcast together.
    #[error("shapes {lhs:?} and {rhs:?} are not compatible")]
    ShapeMismatch {
        /// The shape of the left operand
        lhs: Vec<usize>,
        /// The shape of the right operand (or the requested shape)
        rhs: Vec<usize>,
    },

    /// An index lies outside of the array.
    #[error("index {index:?} is out of bounds for an array of shape {shape:?}")]
    IndexOutOfBounds {
        /// The offending index
        index: Vec<usize>,
        /// The shape of the array
        shape: Vec<usize>,
    },

    /// A slice does not fit the array.
    #[error("slice does not fit axis {axis} of an array of shape {shape:?}")]
    InvalidSlice {
        /// The first axis that the slice does not fit
        axis: usize,
        /// The shape of the array
        shape: Vec<usize>,
    },

    /// An axis does not exist in the array.
    #[error("axis {axis} is out of bounds for an array with {ndim} dimensions")]
    AxisOutOfBounds {
        /// The offending axis
        axis: usize,
        /// The number of dimensions of the array
        ndim: usize,
    },

    /// A reduction without identity was applied to an empty array.
    #[error("cannot compute the {operation} of an empty array")]
    EmptyArray {
        /// The reduction that was attempted
        operation: &'static str,
    },

    /// The delta degrees of freedom of a variance are not smaller than the
    /// number of elements.
    #[error("ddof {ddof} must be smaller than the number of elements ({len})")]
    InvalidDdof {
        /// The requested delta degrees of freedom
        ddof: usize,
        /// The number of elements
        len: usize,
    },

    /// `clip` was called without any bound.
    #[error("at least one of min or max must be set")]
    MissingClipBound,
}

impl UnitArrayError {
    pub(crate) fn allocation(reason: impl Into<String>) -> Self {
        Self::Allocation {
            reason: reason.into(),
        }
    }

    pub(crate) fn incompatible(left: &Unit, right: &Unit) -> Self {
        Self::Unit(UnitError::IncompatibleUnits {
            left: left.clone(),
            right: right.clone(),
        })
    }

    /// Checks if the error reports two incompatible units.
    #[must_use]
    pub const fn is_incompatible_units(&self) -> bool {
        matches!(self, Self::Unit(UnitError::IncompatibleUnits { .. }))
    }
}

use crate::{Symbol, Unit};

/// An error produced by the unit algebra.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitError {
    /// Two units were required to be equal but are not.
    #[error("the two units [{left}] and [{right}] are not the same")]
    IncompatibleUnits {
        /// The unit of the left operand
        left: Unit,
        /// The unit of the right operand
        right: Unit,
    },

    /// An exponent no longer fits into a ratio of 64-bit integers.
    #[error("the exponent of {symbol} overflows")]
    ExponentOverflow {
        /// The symbol whose exponent overflowed
        symbol: Symbol,
    },
}

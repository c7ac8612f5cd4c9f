//! Element-wise operations ("ufuncs") and their numeric kernels.
//!
//! The numeric side of an operation is evaluated element by element. The
//! unit of the result is decided separately by the wrap hook of the
//! result's array type, see [`crate::rules`].

use std::fmt;

use num_traits::Float;

/// An element-wise operation with one operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryUfunc {
    /// `-x`
    Negative,
    /// `|x|`
    Absolute,
    /// Complex conjugate, the identity for real numbers
    Conjugate,
    /// Round to the nearest integer, ties to even
    Rint,
    /// Round towards negative infinity
    Floor,
    /// Round towards positive infinity
    Ceil,
    /// Round towards zero
    Trunc,
    /// An array of ones with the same unit
    OnesLike,
    /// `x * x`
    Square,
    /// Square root
    Sqrt,
    /// Cube root
    Cbrt,
    /// `1 / x`
    Reciprocal,
    /// Degrees to radians
    Radians,
    /// Radians to degrees
    Degrees,
    /// Sine
    Sin,
    /// Cosine
    Cos,
    /// Tangent
    Tan,
    /// Hyperbolic sine
    Sinh,
    /// Hyperbolic cosine
    Cosh,
    /// Hyperbolic tangent
    Tanh,
    /// Inverse sine
    Arcsin,
    /// Inverse cosine
    Arccos,
    /// Inverse tangent
    Arctan,
    /// Inverse hyperbolic sine
    Arcsinh,
    /// Inverse hyperbolic cosine
    Arccosh,
    /// Inverse hyperbolic tangent
    Arctanh,
    /// Natural logarithm
    Log,
    /// Base 2 logarithm
    Log2,
    /// Base 10 logarithm
    Log10,
    /// `ln(1 + x)`
    Log1p,
    /// `e^x`
    Exp,
    /// `2^x`
    Exp2,
    /// `e^x - 1`
    Expm1,
}

impl UnaryUfunc {
    /// Returns the name of the operation.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Negative => "negative",
            Self::Absolute => "absolute",
            Self::Conjugate => "conjugate",
            Self::Rint => "rint",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Trunc => "trunc",
            Self::OnesLike => "ones_like",
            Self::Square => "square",
            Self::Sqrt => "sqrt",
            Self::Cbrt => "cbrt",
            Self::Reciprocal => "reciprocal",
            Self::Radians => "radians",
            Self::Degrees => "degrees",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Arcsin => "arcsin",
            Self::Arccos => "arccos",
            Self::Arctan => "arctan",
            Self::Arcsinh => "arcsinh",
            Self::Arccosh => "arccosh",
            Self::Arctanh => "arctanh",
            Self::Log => "log",
            Self::Log2 => "log2",
            Self::Log10 => "log10",
            Self::Log1p => "log1p",
            Self::Exp => "exp",
            Self::Exp2 => "exp2",
            Self::Expm1 => "expm1",
        }
    }

    /// Evaluates the operation on a single element.
    #[must_use]
    pub fn eval<A: Float>(self, x: A) -> A {
        match self {
            Self::Negative => -x,
            Self::Absolute => x.abs(),
            Self::Conjugate => x,
            Self::Rint => rint(x),
            Self::Floor => x.floor(),
            Self::Ceil => x.ceil(),
            Self::Trunc => x.trunc(),
            Self::OnesLike => A::one(),
            Self::Square => x * x,
            Self::Sqrt => x.sqrt(),
            Self::Cbrt => x.cbrt(),
            Self::Reciprocal => x.recip(),
            Self::Radians => x.to_radians(),
            Self::Degrees => x.to_degrees(),
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tan => x.tan(),
            Self::Sinh => x.sinh(),
            Self::Cosh => x.cosh(),
            Self::Tanh => x.tanh(),
            Self::Arcsin => x.asin(),
            Self::Arccos => x.acos(),
            Self::Arctan => x.atan(),
            Self::Arcsinh => x.asinh(),
            Self::Arccosh => x.acosh(),
            Self::Arctanh => x.atanh(),
            Self::Log => x.ln(),
            Self::Log2 => x.log2(),
            Self::Log10 => x.log10(),
            Self::Log1p => x.ln_1p(),
            Self::Exp => x.exp(),
            Self::Exp2 => x.exp2(),
            Self::Expm1 => x.exp_m1(),
        }
    }
}

/// An element-wise operation with two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryUfunc {
    /// `x + y`
    Add,
    /// `x - y`
    Subtract,
    /// `x * y`
    Multiply,
    /// `x / y`
    Divide,
    /// `floor(x / y)`
    FloorDivide,
    /// Remainder with the sign of the divisor
    Remainder,
    /// Remainder with the sign of the dividend
    Fmod,
    /// `x ** y`
    Power,
    /// Four-quadrant inverse tangent of `x / y`
    Arctan2,
    /// `sqrt(x*x + y*y)`
    Hypot,
    /// Element-wise maximum
    Maximum,
    /// Element-wise minimum
    Minimum,
}

impl BinaryUfunc {
    /// Returns the name of the operation.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::FloorDivide => "floor_divide",
            Self::Remainder => "remainder",
            Self::Fmod => "fmod",
            Self::Power => "power",
            Self::Arctan2 => "arctan2",
            Self::Hypot => "hypot",
            Self::Maximum => "maximum",
            Self::Minimum => "minimum",
        }
    }

    /// Evaluates the operation on a pair of elements.
    #[must_use]
    pub fn eval<A: Float>(self, x: A, y: A) -> A {
        match self {
            Self::Add => x + y,
            Self::Subtract => x - y,
            Self::Multiply => x * y,
            Self::Divide => x / y,
            Self::FloorDivide => (x / y).floor(),
            Self::Remainder => x - (x / y).floor() * y,
            Self::Fmod => x % y,
            Self::Power => x.powf(y),
            Self::Arctan2 => x.atan2(y),
            Self::Hypot => x.hypot(y),
            Self::Maximum => propagate_nan(x, y, Float::max),
            Self::Minimum => propagate_nan(x, y, Float::min),
        }
    }
}

/// Any element-wise operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ufunc {
    /// An operation with one operand
    Unary(UnaryUfunc),
    /// An operation with two operands
    Binary(BinaryUfunc),
}

impl Ufunc {
    /// Returns the name of the operation.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unary(ufunc) => ufunc.name(),
            Self::Binary(ufunc) => ufunc.name(),
        }
    }

    /// Returns the number of operands the operation takes.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Unary(_) => 1,
            Self::Binary(_) => 2,
        }
    }
}

impl From<UnaryUfunc> for Ufunc {
    fn from(ufunc: UnaryUfunc) -> Self {
        Self::Unary(ufunc)
    }
}

impl From<BinaryUfunc> for Ufunc {
    fn from(ufunc: BinaryUfunc) -> Self {
        Self::Binary(ufunc)
    }
}

impl fmt::Display for Ufunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn rint<A: Float>(x: A) -> A {
    let rounded = x.round();
    let two = A::one() + A::one();
    let is_tie = (rounded - x).abs() == A::one() / two;

    if is_tie && rounded % two != A::zero() {
        rounded - x.signum()
    } else {
        rounded
    }
}

fn propagate_nan<A: Float>(x: A, y: A, select: fn(A, A) -> A) -> A {
    if x.is_nan() || y.is_nan() {
        A::nan()
    } else {
        select(x, y)
    }
}

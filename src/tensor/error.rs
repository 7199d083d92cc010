//! Error taxonomy for tensor construction and operations

use std::fmt;

use thiserror::Error;

use super::scalar::ScalarKind;

/// Convenience alias used by every fallible tensor operation.
pub type Result<T> = std::result::Result<T, TensorError>;

/// What the homology walk found at the offending position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observed {
    /// A scalar leaf where a sequence was expected.
    Leaf,
    /// A sequence of the given length.
    Sequence(usize),
}

impl fmt::Display for Observed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observed::Leaf => write!(f, "a scalar leaf"),
            Observed::Sequence(len) => write!(f, "a sequence of length {}", len),
        }
    }
}

/// An error type for tensor operations.
///
/// Every variant aborts the operation that produced it; no partially built
/// tensor is ever returned alongside an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TensorError {
    /// A dimension of the requested shape is zero.
    #[error("Invalid shape {shape:?}: dimension {axis} cannot be 0")]
    InvalidShape { shape: Vec<usize>, axis: usize },

    /// The element count of a shape overflows `usize` or cannot be allocated.
    #[error("Shape {shape:?} holds more elements than can be allocated")]
    ShapeTooLarge { shape: Vec<usize> },

    /// A flat buffer does not hold exactly `product(shape)` elements.
    #[error("Invalid shape {shape:?} for data of length {len}")]
    LengthMismatch { shape: Vec<usize>, len: usize },

    /// A nested sequence in the input is empty.
    #[error("Found an empty sequence at depth {depth}")]
    EmptyContainer { depth: usize },

    /// A leaf of the input is not of the tensor's element kind.
    #[error("Data type mismatch: expected a scalar of type {expected}, found {found}")]
    TypeMismatch {
        expected: ScalarKind,
        found: &'static str,
    },

    /// Siblings at some depth disagree in length or in container-vs-leaf kind.
    #[error(
        "Tensor is not homologous: detected shape {shape:?}, but found {observed} at depth {depth}"
    )]
    NonHomologousShape {
        shape: Vec<usize>,
        depth: usize,
        observed: Observed,
    },

    /// Number of indices differs from the tensor's rank.
    #[error("Invalid number of indices {found} for tensor of rank {expected}")]
    IndexArityMismatch { expected: usize, found: usize },

    /// An index exceeds its dimension's extent.
    #[error("Index {index} is out of range for axis {axis} of size {extent}")]
    IndexOutOfRange {
        axis: usize,
        index: usize,
        extent: usize,
    },

    #[error("Incompatible reshaping: {from:?} -> {to:?}")]
    IncompatibleReshape { from: Vec<usize>, to: Vec<usize> },

    #[error("Shapes of the tensors do not match: {left:?} vs {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },

    /// Matrix multiplication was given an operand that is not rank 2.
    #[error("Expected a 2D matrix, found shape {shape:?}")]
    NotAMatrix { shape: Vec<usize> },

    #[error(
        "Cannot multiply {left:?} by {right:?}: columns of the first must equal rows of the second"
    )]
    ConflictingDimensions { left: Vec<usize>, right: Vec<usize> },

    #[error("Tensors with shapes {shapes:?} could not be broadcast together")]
    CannotBroadcast { shapes: Vec<Vec<usize>> },

    /// Integer division with a zero divisor at the given flat position.
    #[error("Division by zero at flat position {position}")]
    DivisionByZero { position: usize },

    /// Uniform sampling was asked for an empty interval.
    #[error("Empty sampling range: low must be strictly less than high")]
    EmptyRange,
}

//! N-dimensional tensors for a neural network built from scratch
//!
//! This library provides a generic `Tensor` over a closed set of numeric
//! element types, with construction from nested values, indexing, reshape,
//! transpose, elementwise arithmetic, matrix multiplication and NumPy-style
//! broadcasting, plus a dense layer built on top of them.

pub mod nn;
pub mod tensor;

// Re-export commonly used types for convenience
pub use nn::*;
pub use tensor::{
    broadcast, can_broadcast, BroadcastView, Element, Scalar, ScalarKind, Tensor, TensorError,
    Value,
};

//! Tensor module containing the tensor type and its operations
//!
//! This module provides the core `Tensor` type, construction from nested
//! input, indexing, reshape and transpose, elementwise arithmetic, matrix
//! multiplication and broadcasting.

mod core;
mod display;
pub mod broadcast;
pub mod error;
pub mod kernels;
pub mod ops;
pub mod scalar;
pub mod shape;
pub mod value;

// Re-export the main types for convenience
pub use broadcast::{broadcast, can_broadcast, BroadcastView};
pub use self::core::Tensor;
pub use error::{Observed, Result, TensorError};
pub use scalar::{Scalar, ScalarKind};
pub use shape::Indices;
pub use value::{Element, Value};

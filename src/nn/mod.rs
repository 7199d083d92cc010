//! Neural network layers built on top of [`Tensor`]

use crate::tensor::{Result, Scalar, Tensor};

/// Generic layer interface
pub trait Layer<T: Scalar> {
    fn forward(&self, input: &Tensor<T>) -> Result<Tensor<T>>;
    fn parameters(&mut self) -> Vec<&mut Tensor<T>>;
}

pub mod dense;

pub use dense::*;

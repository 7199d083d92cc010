//! Arithmetic on tensors
//!
//! Elementwise operations require operands of exactly the same shape and
//! never broadcast implicitly; use [`broadcast`](super::broadcast) to
//! materialize equal-shaped operands first. Matrix multiplication is
//! restricted to rank-2 operands.

use tracing::instrument;

use super::error::{Result, TensorError};
use super::kernels;
use super::{Scalar, Tensor};

impl<T: Scalar> Tensor<T> {
    /// Applies `op` per flat position; equal shapes imply equal strides.
    fn zip_with<F>(&self, other: &Tensor<T>, op: F) -> Result<Tensor<T>>
    where
        F: Fn(usize, T, T) -> Result<T>,
    {
        if self.shape != other.shape {
            return Err(TensorError::ShapeMismatch {
                left: self.shape.clone(),
                right: other.shape.clone(),
            });
        }

        let data = self
            .data
            .iter()
            .zip(&other.data)
            .enumerate()
            .map(|(i, (&a, &b))| op(i, a, b))
            .collect::<Result<Vec<T>>>()?;

        Ok(Tensor::from_parts(data, self.shape.clone()))
    }

    /// Element-wise addition
    #[instrument(skip(self, other), fields(shape_a = ?self.shape, shape_b = ?other.shape), err)]
    pub fn add(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.zip_with(other, |_, a, b| Ok(a.scalar_add(b)))
    }

    /// Element-wise subtraction
    #[instrument(skip(self, other), fields(shape_a = ?self.shape, shape_b = ?other.shape), err)]
    pub fn sub(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.zip_with(other, |_, a, b| Ok(a.scalar_sub(b)))
    }

    /// Element-wise multiplication
    #[instrument(skip(self, other), fields(shape_a = ?self.shape, shape_b = ?other.shape), err)]
    pub fn mul(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.zip_with(other, |_, a, b| Ok(a.scalar_mul(b)))
    }

    /// Element-wise division
    ///
    /// Integer tensors fail on the first zero divisor. Float tensors follow
    /// IEEE-754 and produce infinities or NaN instead.
    #[instrument(skip(self, other), fields(shape_a = ?self.shape, shape_b = ?other.shape), err)]
    pub fn div(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.zip_with(other, |position, a, b| {
            a.scalar_div(b)
                .ok_or(TensorError::DivisionByZero { position })
        })
    }

    /// Matrix multiplication
    ///
    /// `[m, k] @ [k, n] -> [m, n]`, each entry summed over ascending `k`.
    #[instrument(skip(self, other), fields(shape_a = ?self.shape, shape_b = ?other.shape), err)]
    pub fn matmul(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        let a_shape = as_matrix(&self.shape)?;
        let b_shape = as_matrix(&other.shape)?;
        if a_shape[1] != b_shape[0] {
            return Err(TensorError::ConflictingDimensions {
                left: self.shape.clone(),
                right: other.shape.clone(),
            });
        }

        let data = kernels::matmul(&self.data, a_shape, &other.data, b_shape);
        Ok(Tensor::from_parts(data, vec![a_shape[0], b_shape[1]]))
    }
}

fn as_matrix(shape: &[usize]) -> Result<[usize; 2]> {
    match *shape {
        [rows, cols] => Ok([rows, cols]),
        _ => Err(TensorError::NotAMatrix {
            shape: shape.to_vec(),
        }),
    }
}

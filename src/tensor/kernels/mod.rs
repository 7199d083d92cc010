//! Kernel implementations for tensor operations
//!
//! This module contains the kernels backing the heavier tensor operations,
//! currently the matrix multiplication used by [`Tensor::matmul`].
//!
//! [`Tensor::matmul`]: crate::tensor::Tensor::matmul

pub mod gemm;

pub use gemm::matmul;

use std::cmp::Ordering;

use rand::distributions::Uniform;
use rand::prelude::Distribution;
use rand::Rng;
use tracing::instrument;

use super::error::{Result, TensorError};
use super::scalar::{Scalar, ScalarKind};
use super::shape::{self, Indices};
use super::value::Value;

/// Main tensor struct: a flat row-major buffer plus its shape and strides
///
/// Invariants: `data.len() == product(shape)`, every dimension is positive,
/// and `strides` is always recomputed from `shape`. An empty shape is a 0-d
/// tensor holding exactly one element.
///
/// `Clone` is the copy operation: it deep-copies the buffer, so a clone never
/// observes writes made to the original.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T> {
    pub(crate) data: Vec<T>,
    pub(crate) shape: Vec<usize>,
    pub(crate) strides: Vec<usize>,
}

impl<T: Scalar> Tensor<T> {
    /// Assembles a tensor from parts already known to be consistent.
    pub(crate) fn from_parts(data: Vec<T>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(data.len(), shape::numel(&shape));
        let strides = shape::contiguous_strides(&shape);
        Tensor {
            data,
            shape,
            strides,
        }
    }

    /// Create a new tensor from a row-major buffer and a shape
    #[instrument(skip(data, shape), fields(shape = ?shape, len = data.len()), err)]
    pub fn new(data: Vec<T>, shape: Vec<usize>) -> Result<Self> {
        shape::validate_dims(&shape)?;
        if shape::numel(&shape) != data.len() {
            return Err(TensorError::LengthMismatch {
                shape,
                len: data.len(),
            });
        }

        Ok(Tensor::from_parts(data, shape))
    }

    /// Create a tensor from arbitrarily nested input, detecting its shape.
    ///
    /// The input must be homogeneous (every leaf of type `T`, no empty
    /// sequence) and homologous (siblings at each depth share one length).
    ///
    /// ```
    /// use nnfs::Tensor;
    ///
    /// let t = Tensor::<i32>::with_value(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
    /// assert_eq!(t.shape(), &[2, 3]);
    /// assert_eq!(t.get(&[1, 0]).unwrap(), 4);
    /// ```
    #[instrument(skip(input), err)]
    pub fn with_value<V: Into<Value>>(input: V) -> Result<Self> {
        let value = input.into();

        shape::ensure_homogeneous::<T>(&value)?;
        let shape = shape::detect_shape(&value)?;
        let data = shape::ensure_homologous::<T>(&value, &shape)?;

        tracing::debug!(shape = ?shape, numel = data.len(), "tensor built from nested value");
        Ok(Tensor::from_parts(data, shape))
    }

    /// Create a tensor of the given shape filled with `fill`, or zeros
    #[instrument(skip(shape, fill), fields(shape = ?shape), err)]
    pub fn with_shape(shape: &[usize], fill: Option<T>) -> Result<Self> {
        shape::validate_dims(shape)?;
        let value = fill.unwrap_or_else(T::zero);
        let mut data = reserve_buffer(shape)?;
        data.resize(shape::numel(shape), value);

        Ok(Tensor::from_parts(data, shape.to_vec()))
    }

    /// Create a tensor filled with zeros
    pub fn zeros(shape: &[usize]) -> Result<Self> {
        Self::with_shape(shape, None)
    }

    /// Create a tensor filled with `value`
    pub fn full(shape: &[usize], value: T) -> Result<Self> {
        Self::with_shape(shape, Some(value))
    }

    /// Create a tensor with values sampled uniformly from `[low, high)`
    pub fn with_random(shape: &[usize], low: T, high: T) -> Result<Self> {
        Self::with_random_from(shape, low, high, &mut rand::thread_rng())
    }

    /// Like [`Tensor::with_random`], drawing from a caller-supplied generator.
    #[instrument(skip(shape, low, high, rng), fields(shape = ?shape), err)]
    pub fn with_random_from<R: Rng + ?Sized>(
        shape: &[usize],
        low: T,
        high: T,
        rng: &mut R,
    ) -> Result<Self> {
        shape::validate_dims(shape)?;
        // Uniform::new panics on empty or non-finite ranges
        let ordered = matches!(low.partial_cmp(&high), Some(Ordering::Less));
        let finite = low.is_finite() && high.is_finite() && high.scalar_sub(low).is_finite();
        if !ordered || !finite {
            return Err(TensorError::EmptyRange);
        }

        let uniform = Uniform::new(low, high);
        let mut data = reserve_buffer(shape)?;
        data.extend((0..shape::numel(shape)).map(|_| uniform.sample(&mut *rng)));

        Ok(Tensor::from_parts(data, shape.to_vec()))
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Number of dimensions
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    pub fn kind(&self) -> ScalarKind {
        T::KIND
    }

    /// The flat row-major buffer
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Multi-indices of this tensor in canonical (row-major) order
    pub fn indices(&self) -> Indices {
        Indices::new(&self.shape)
    }

    /// Read the element at `index`, one coordinate per dimension
    pub fn get(&self, index: &[usize]) -> Result<T> {
        let offset = shape::flat_offset(&self.shape, &self.strides, index)?;
        Ok(self.data[offset])
    }

    /// Overwrite the element at `index` in place
    pub fn set(&mut self, index: &[usize], value: T) -> Result<()> {
        let offset = shape::flat_offset(&self.shape, &self.strides, index)?;
        self.data[offset] = value;
        Ok(())
    }

    /// Reshape tensor to new shape
    ///
    /// Always copies the buffer; the result is independent of `self`.
    #[instrument(skip(self, new_shape), fields(old_shape = ?self.shape, new_shape = ?new_shape), err)]
    pub fn reshape(&self, new_shape: &[usize]) -> Result<Self> {
        if shape::checked_numel(new_shape) != Some(self.numel()) {
            return Err(TensorError::IncompatibleReshape {
                from: self.shape.clone(),
                to: new_shape.to_vec(),
            });
        }

        Ok(Tensor::from_parts(self.data.clone(), new_shape.to_vec()))
    }

    /// Transpose by reversing every axis
    ///
    /// The value at `(i_{n-1}, ..., i_0)` of the result is the value at
    /// `(i_0, ..., i_{n-1})` of `self`. Rank 0 and 1 tensors are copied as is.
    #[instrument(skip(self), fields(shape = ?self.shape))]
    pub fn transpose(&self) -> Self {
        if self.ndim() < 2 {
            return self.clone();
        }

        let reversed_shape: Vec<usize> = self.shape.iter().rev().copied().collect();
        let reversed_strides = shape::contiguous_strides(&reversed_shape);
        let mut data = vec![T::zero(); self.numel()];

        // enumeration position equals the source offset in canonical order
        for (src, index) in self.indices().enumerate() {
            let dst: usize = index
                .iter()
                .rev()
                .zip(&reversed_strides)
                .map(|(i, stride)| i * stride)
                .sum();
            data[dst] = self.data[src];
        }

        Tensor::from_parts(data, reversed_shape)
    }

    /// Convert back into nested input form
    pub fn to_value(&self) -> Value {
        fn build<T: Scalar>(data: &[T], shape: &[usize]) -> Value {
            match shape.split_first() {
                None => Value::Scalar(data[0].into_element()),
                Some((_, rest)) => {
                    let block = shape::numel(rest);
                    Value::Sequence(data.chunks(block).map(|c| build(c, rest)).collect())
                }
            }
        }

        build(&self.data, &self.shape)
    }
}

/// Allocates room for a validated shape, reporting allocation failure
/// instead of aborting.
fn reserve_buffer<T>(shape: &[usize]) -> Result<Vec<T>> {
    let mut data = Vec::new();
    data.try_reserve_exact(shape::numel(shape))
        .map_err(|_| TensorError::ShapeTooLarge {
            shape: shape.to_vec(),
        })?;
    Ok(data)
}

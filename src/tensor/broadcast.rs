//! NumPy-style broadcasting
//!
//! [`broadcast`] resolves a common shape for several tensors and returns one
//! read-only [`BroadcastView`] per input. Views borrow their source, so the
//! source cannot be mutated while any view of it is alive; a view taken
//! before a mutation has to be recreated afterwards.

use std::sync::Arc;

use tracing::instrument;

use super::error::{Result, TensorError};
use super::shape::{self, Indices};
use super::{Scalar, Tensor};

/// Left-pads `shape` with 1s up to `ndim` dimensions.
fn padded(shape: &[usize], ndim: usize) -> Vec<usize> {
    let mut out = vec![1; ndim - shape.len()];
    out.extend_from_slice(shape);
    out
}

/// Check whether all shapes can be broadcast together.
///
/// Shapes are left-padded with 1s to the largest rank; every pair must then
/// agree per dimension, either by being equal or by one of them being 1.
pub fn can_broadcast(shapes: &[&[usize]]) -> bool {
    let ndim = shapes.iter().map(|s| s.len()).max().unwrap_or(0);
    let aligned: Vec<Vec<usize>> = shapes.iter().map(|s| padded(s, ndim)).collect();

    (0..ndim).all(|axis| {
        aligned.iter().enumerate().all(|(i, a)| {
            aligned[i + 1..]
                .iter()
                .all(|b| a[axis] == b[axis] || a[axis] == 1 || b[axis] == 1)
        })
    })
}

/// Broadcast tensors to a common resolved shape.
///
/// The resolved shape is the per-dimension maximum over the padded input
/// shapes. An empty input yields no views.
///
/// ```
/// use nnfs::{broadcast, Tensor};
///
/// let row = Tensor::<i32>::with_value(vec![1, 2, 3]).unwrap();
/// let col = Tensor::<i32>::with_value(vec![vec![1], vec![2], vec![3]]).unwrap();
/// let views = broadcast(&[&row, &col]).unwrap();
/// assert_eq!(views[0].shape(), &[3, 3]);
/// assert_eq!(views[1].get(&[2, 0]).unwrap(), 3);
/// ```
#[instrument(skip(tensors), fields(count = tensors.len()), err)]
pub fn broadcast<'a, T: Scalar>(tensors: &[&'a Tensor<T>]) -> Result<Vec<BroadcastView<'a, T>>> {
    let shapes: Vec<&[usize]> = tensors.iter().map(|t| t.shape()).collect();
    if !can_broadcast(&shapes) {
        return Err(TensorError::CannotBroadcast {
            shapes: shapes.iter().map(|s| s.to_vec()).collect(),
        });
    }

    let ndim = shapes.iter().map(|s| s.len()).max().unwrap_or(0);
    let mut resolved = vec![1; ndim];
    for s in &shapes {
        for (dim, &size) in resolved[ndim - s.len()..].iter_mut().zip(s.iter()) {
            *dim = (*dim).max(size);
        }
    }

    shape::validate_dims(&resolved)?;

    tracing::debug!(resolved = ?resolved, "broadcast shape resolved");
    let resolved: Arc<[usize]> = resolved.into();
    Ok(tensors
        .iter()
        .map(|&source| BroadcastView {
            shape: Arc::clone(&resolved),
            source,
        })
        .collect())
}

/// Read-only projection of a tensor onto a broadcast shape
///
/// Only produced by [`broadcast`]. All views from one call share their
/// resolved shape.
#[derive(Debug, Clone)]
pub struct BroadcastView<'a, T> {
    shape: Arc<[usize]>,
    source: &'a Tensor<T>,
}

impl<'a, T: Scalar> BroadcastView<'a, T> {
    /// The resolved shape
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn source(&self) -> &'a Tensor<T> {
        self.source
    }

    pub fn numel(&self) -> usize {
        shape::numel(&self.shape)
    }

    /// Read at a multi-index of the resolved shape.
    ///
    /// Leading components beyond the source's rank are dropped, and any
    /// coordinate past a source extent is clamped to that extent's last
    /// index, which repeats size-1 axes.
    pub fn get(&self, index: &[usize]) -> Result<T> {
        shape::check_index(&self.shape, index)?;

        let skip = index.len() - self.source.ndim();
        let offset: usize = index[skip..]
            .iter()
            .zip(self.source.shape())
            .zip(self.source.strides())
            .map(|((&i, &extent), &stride)| i.min(extent - 1) * stride)
            .sum();

        Ok(self.source.data[offset])
    }

    /// Read at a flat offset into the resolved shape, in canonical order
    pub fn get_flat(&self, offset: usize) -> Result<T> {
        let numel = self.numel();
        if offset >= numel {
            return Err(TensorError::IndexOutOfRange {
                axis: 0,
                index: offset,
                extent: numel,
            });
        }
        self.get(&shape::unravel(&self.shape, offset))
    }

    /// Materialize into an owned tensor of the resolved shape
    #[instrument(skip(self), fields(source = ?self.source.shape(), shape = ?self.shape), err)]
    pub fn to_tensor(&self) -> Result<Tensor<T>> {
        let data = Indices::new(&self.shape)
            .map(|index| self.get(&index))
            .collect::<Result<Vec<T>>>()?;

        Ok(Tensor::from_parts(data, self.shape.to_vec()))
    }
}

//! Shape and stride utilities
//!
//! Layout helpers shared by every tensor operation, plus shape inference and
//! validation of nested [`Value`] input.

use super::error::{Observed, Result, TensorError};
use super::scalar::Scalar;
use super::value::Value;

/// Total number of elements of a shape; 1 for the 0-d shape.
///
/// Only for shapes already accepted by [`validate_dims`].
pub fn numel(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Total number of elements, or `None` if the product overflows `usize`.
pub fn checked_numel(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
}

/// Row-major strides: `stride[i] = product(shape[i+1..])`, last stride 1.
pub fn contiguous_strides(shape: &[usize]) -> Vec<usize> {
    let ndim = shape.len();
    if ndim == 0 {
        return Vec::new();
    }

    let mut strides = vec![1usize; ndim];
    for i in (0..ndim - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Rejects shapes with a zero-sized dimension or an element count that
/// overflows `usize`.
pub fn validate_dims(shape: &[usize]) -> Result<()> {
    if let Some(axis) = shape.iter().position(|&dim| dim == 0) {
        return Err(TensorError::InvalidShape {
            shape: shape.to_vec(),
            axis,
        });
    }
    if checked_numel(shape).is_none() {
        return Err(TensorError::ShapeTooLarge {
            shape: shape.to_vec(),
        });
    }
    Ok(())
}

/// Checks that `index` has one in-range coordinate per dimension.
pub fn check_index(shape: &[usize], index: &[usize]) -> Result<()> {
    if index.len() != shape.len() {
        return Err(TensorError::IndexArityMismatch {
            expected: shape.len(),
            found: index.len(),
        });
    }

    for (axis, (&i, &extent)) in index.iter().zip(shape).enumerate() {
        if i >= extent {
            return Err(TensorError::IndexOutOfRange {
                axis,
                index: i,
                extent,
            });
        }
    }
    Ok(())
}

/// Converts a multi-index into a flat buffer offset, checking arity and range.
pub fn flat_offset(shape: &[usize], strides: &[usize], index: &[usize]) -> Result<usize> {
    check_index(shape, index)?;
    Ok(index.iter().zip(strides).map(|(i, stride)| i * stride).sum())
}

/// Inverse of [`flat_offset`] for contiguous layouts.
pub fn unravel(shape: &[usize], mut offset: usize) -> Vec<usize> {
    let mut index = vec![0; shape.len()];
    for dim in (0..shape.len()).rev() {
        index[dim] = offset % shape[dim];
        offset /= shape[dim];
    }
    index
}

/// All multi-indices of a shape in canonical order.
///
/// Row-major, last dimension fastest: the rightmost index increments first
/// and carries left on overflow. A 0-d shape yields a single empty index.
#[derive(Debug, Clone)]
pub struct Indices {
    shape: Vec<usize>,
    next: Option<Vec<usize>>,
    remaining: usize,
}

impl Indices {
    pub fn new(shape: &[usize]) -> Self {
        let remaining = numel(shape);
        Indices {
            shape: shape.to_vec(),
            next: (remaining > 0).then(|| vec![0; shape.len()]),
            remaining,
        }
    }
}

impl Iterator for Indices {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.next.take()?;
        self.remaining -= 1;

        let mut following = current.clone();
        let mut exhausted = true;
        for dim in (0..self.shape.len()).rev() {
            following[dim] += 1;
            if following[dim] < self.shape[dim] {
                exhausted = false;
                break;
            }
            following[dim] = 0;
        }

        if !exhausted {
            self.next = Some(following);
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Indices {}

// ============================================================================
// Nested input validation
// ============================================================================

/// Checks that every leaf has `T`'s representation and no sequence is empty.
///
/// Walks depth-first and stops at the first violation.
pub(crate) fn ensure_homogeneous<T: Scalar>(value: &Value) -> Result<()> {
    fn walk<T: Scalar>(value: &Value, depth: usize) -> Result<()> {
        match value {
            Value::Scalar(element) => {
                if element.kind() == Some(T::KIND) {
                    Ok(())
                } else {
                    Err(TensorError::TypeMismatch {
                        expected: T::KIND,
                        found: element.type_name(),
                    })
                }
            }
            Value::Sequence(items) => {
                if items.is_empty() {
                    return Err(TensorError::EmptyContainer { depth });
                }
                items.iter().try_for_each(|item| walk::<T>(item, depth + 1))
            }
        }
    }

    walk::<T>(value, 0)
}

/// Detects a candidate shape by following the first element at every depth.
pub(crate) fn detect_shape(value: &Value) -> Result<Vec<usize>> {
    let mut shape = Vec::new();
    let mut current = value;

    while let Value::Sequence(items) = current {
        match items.first() {
            Some(first) => {
                shape.push(items.len());
                current = first;
            }
            None => {
                return Err(TensorError::EmptyContainer { depth: shape.len() });
            }
        }
    }

    Ok(shape)
}

/// Verifies that the whole input matches `shape` and collects its leaves in
/// canonical order.
///
/// The first branch alone cannot prove that all siblings agree, so every
/// node is revisited here.
pub(crate) fn ensure_homologous<T: Scalar>(value: &Value, shape: &[usize]) -> Result<Vec<T>> {
    fn walk<T: Scalar>(value: &Value, shape: &[usize], depth: usize, out: &mut Vec<T>) -> Result<()> {
        let mismatch = |observed| TensorError::NonHomologousShape {
            shape: shape.to_vec(),
            depth,
            observed,
        };

        match value {
            Value::Scalar(element) => {
                if depth < shape.len() {
                    return Err(mismatch(Observed::Leaf));
                }
                let scalar = T::from_element(element).ok_or(TensorError::TypeMismatch {
                    expected: T::KIND,
                    found: element.type_name(),
                })?;
                out.push(scalar);
                Ok(())
            }
            Value::Sequence(items) => {
                if depth >= shape.len() || items.len() != shape[depth] {
                    return Err(mismatch(Observed::Sequence(items.len())));
                }
                items
                    .iter()
                    .try_for_each(|item| walk(item, shape, depth + 1, out))
            }
        }
    }

    // the detected shape can overstate the number of leaves
    let mut out = Vec::new();
    walk(value, shape, 0, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Layout
    // ========================================================================

    #[test]
    fn test_contiguous_strides() {
        assert_eq!(contiguous_strides(&[2, 3, 4]), vec![12, 4, 1]);
        assert_eq!(contiguous_strides(&[3, 4]), vec![4, 1]);
        assert_eq!(contiguous_strides(&[5]), vec![1]);
        assert!(contiguous_strides(&[]).is_empty());
    }

    #[test]
    fn test_numel_of_scalar_shape() {
        assert_eq!(numel(&[]), 1);
        assert_eq!(numel(&[2, 3, 4]), 24);
    }

    #[test]
    fn test_validate_dims_names_zero_axis() {
        assert!(validate_dims(&[2, 3]).is_ok());
        assert_eq!(
            validate_dims(&[2, 0, 3]),
            Err(TensorError::InvalidShape {
                shape: vec![2, 0, 3],
                axis: 1
            })
        );
    }

    #[test]
    fn test_checked_numel_overflow() {
        assert_eq!(checked_numel(&[2, 3, 4]), Some(24));
        assert_eq!(checked_numel(&[]), Some(1));
        assert_eq!(checked_numel(&[(1 << 63) + 1, 2]), None);
        assert_eq!(checked_numel(&[usize::MAX, 2]), None);
    }

    #[test]
    fn test_validate_dims_rejects_overflowing_product() {
        assert_eq!(
            validate_dims(&[usize::MAX, 2]),
            Err(TensorError::ShapeTooLarge {
                shape: vec![usize::MAX, 2]
            })
        );
        assert!(validate_dims(&[usize::MAX]).is_ok());
    }

    #[test]
    fn test_check_index() {
        assert_eq!(check_index(&[2, 3], &[1, 2]), Ok(()));
        assert_eq!(
            check_index(&[2, 3], &[1]),
            Err(TensorError::IndexArityMismatch {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            check_index(&[2, 3], &[0, 3]),
            Err(TensorError::IndexOutOfRange {
                axis: 1,
                index: 3,
                extent: 3
            })
        );
    }

    #[test]
    fn test_flat_offset() {
        let shape = [2, 3, 4];
        let strides = contiguous_strides(&shape);
        assert_eq!(flat_offset(&shape, &strides, &[0, 0, 0]), Ok(0));
        assert_eq!(flat_offset(&shape, &strides, &[1, 2, 3]), Ok(12 + 8 + 3));
        assert_eq!(
            flat_offset(&shape, &strides, &[1, 2]),
            Err(TensorError::IndexArityMismatch {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            flat_offset(&shape, &strides, &[1, 3, 0]),
            Err(TensorError::IndexOutOfRange {
                axis: 1,
                index: 3,
                extent: 3
            })
        );
    }

    #[test]
    fn test_unravel() {
        assert_eq!(unravel(&[2, 3], 4), vec![1, 1]);
        assert_eq!(unravel(&[2, 3, 4], 23), vec![1, 2, 3]);
        assert!(unravel(&[], 0).is_empty());
    }

    // ========================================================================
    // Canonical traversal
    // ========================================================================

    #[test]
    fn test_indices_row_major() {
        let all: Vec<_> = Indices::new(&[2, 3]).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2]
            ]
        );
    }

    #[test]
    fn test_indices_scalar_shape() {
        let all: Vec<_> = Indices::new(&[]).collect();
        assert_eq!(all, vec![Vec::<usize>::new()]);
    }

    #[test]
    fn test_indices_len_matches_offsets() {
        let shape = [3, 1, 2];
        let strides = contiguous_strides(&shape);
        let indices = Indices::new(&shape);
        assert_eq!(indices.len(), 6);
        for (expected, index) in indices.enumerate() {
            assert_eq!(flat_offset(&shape, &strides, &index), Ok(expected));
        }
    }

    // ========================================================================
    // Nested input
    // ========================================================================

    #[test]
    fn test_detect_shape_follows_first_branch() {
        let v = Value::from(vec![vec![1i32, 2, 3], vec![4]]);
        assert_eq!(detect_shape(&v), Ok(vec![2, 3]));
        assert_eq!(detect_shape(&Value::from(7i32)), Ok(vec![]));
    }

    #[test]
    fn test_detect_shape_empty_first_branch() {
        let v = Value::Sequence(vec![Value::Sequence(vec![])]);
        assert_eq!(detect_shape(&v), Err(TensorError::EmptyContainer { depth: 1 }));
    }

    #[test]
    fn test_homogeneous_rejects_other_kinds() {
        let v = Value::from(vec![1i32, 2]);
        assert!(ensure_homogeneous::<i32>(&v).is_ok());
        assert_eq!(
            ensure_homogeneous::<i64>(&v),
            Err(TensorError::TypeMismatch {
                expected: crate::tensor::ScalarKind::I64,
                found: "i32"
            })
        );
    }

    #[test]
    fn test_homogeneous_rejects_nested_empty() {
        let v = Value::Sequence(vec![Value::from(vec![1.0f64]), Value::Sequence(vec![])]);
        assert_eq!(
            ensure_homogeneous::<f64>(&v),
            Err(TensorError::EmptyContainer { depth: 1 })
        );
    }

    #[test]
    fn test_homologous_collects_in_canonical_order() {
        let v = Value::from(vec![vec![1i32, 2], vec![3, 4], vec![5, 6]]);
        let data = ensure_homologous::<i32>(&v, &[3, 2]).unwrap();
        assert_eq!(data, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_homologous_rejects_short_sibling() {
        let v = Value::from(vec![vec![1i32, 2], vec![3]]);
        assert_eq!(
            ensure_homologous::<i32>(&v, &[2, 2]),
            Err(TensorError::NonHomologousShape {
                shape: vec![2, 2],
                depth: 1,
                observed: Observed::Sequence(1)
            })
        );
    }

    #[test]
    fn test_homologous_rejects_leaf_where_sequence_expected() {
        let v = Value::Sequence(vec![Value::from(vec![1i32, 2]), Value::from(3i32)]);
        assert_eq!(
            ensure_homologous::<i32>(&v, &[2, 2]),
            Err(TensorError::NonHomologousShape {
                shape: vec![2, 2],
                depth: 1,
                observed: Observed::Leaf
            })
        );
    }

    #[test]
    fn test_homologous_rejects_sequence_below_leaf_depth() {
        let v = Value::Sequence(vec![Value::from(1i32), Value::from(vec![2i32])]);
        assert_eq!(
            ensure_homologous::<i32>(&v, &[2]),
            Err(TensorError::NonHomologousShape {
                shape: vec![2],
                depth: 1,
                observed: Observed::Sequence(1)
            })
        );
    }
}

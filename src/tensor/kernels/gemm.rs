//! General Matrix Multiply (GEMM) for any admissible element type

use crate::tensor::Scalar;

/// Internal core GEMM operation using explicit strides
/// Computes: C = A @ B
///
/// Each output entry starts from `T::zero()` and accumulates products over
/// ascending `p` with the element type's native arithmetic, so results are
/// reproducible bit for bit across runs.
///
/// # Arguments
/// * `a_data` - Flattened data of matrix A
/// * `m` - Number of rows in the result (and rows in A)
/// * `k` - Inner dimension (cols in A, rows in B)
/// * `a_row_stride` - Stride between consecutive rows of A
/// * `a_col_stride` - Stride between consecutive cols of A
/// * `b_data` - Flattened data of matrix B
/// * `n` - Number of cols in the result (and cols in B)
/// * `b_row_stride` - Stride between consecutive rows of B
/// * `b_col_stride` - Stride between consecutive cols of B
/// * `c_data` - Output buffer, overwritten (shape: [m, n])
pub(crate) struct GemmParams<'a, T> {
    pub a_data: &'a [T],
    pub m: usize,
    pub k: usize,
    pub a_row_stride: usize,
    pub a_col_stride: usize,
    pub b_data: &'a [T],
    pub n: usize,
    pub b_row_stride: usize,
    pub b_col_stride: usize,
    pub c_data: &'a mut [T],
}

pub(crate) fn gemm_core<T: Scalar>(params: GemmParams<'_, T>) {
    let GemmParams {
        a_data,
        m,
        k,
        a_row_stride,
        a_col_stride,
        b_data,
        n,
        b_row_stride,
        b_col_stride,
        c_data,
    } = params;

    debug_assert_eq!(c_data.len(), m * n, "Output buffer size mismatch");

    // Naive triple loop; the k order is part of the contract
    for i in 0..m {
        for j in 0..n {
            let mut sum = T::zero();
            for p in 0..k {
                let a_idx = i * a_row_stride + p * a_col_stride;
                let b_idx = p * b_row_stride + j * b_col_stride;
                sum = sum.scalar_add(a_data[a_idx].scalar_mul(b_data[b_idx]));
            }
            c_data[i * n + j] = sum;
        }
    }
}

/// Performs matrix multiplication: C = A @ B
///
/// # Arguments
/// * `a_data` - Flattened data of matrix A (row-major)
/// * `a_shape` - Shape of matrix A as [rows, cols]
/// * `b_data` - Flattened data of matrix B (row-major)
/// * `b_shape` - Shape of matrix B as [rows, cols]
///
/// # Returns
/// * Flattened result matrix C with shape [a_shape[0], b_shape[1]]
///
/// Callers validate that both shapes are rank 2 and that
/// `a_shape[1] == b_shape[0]`.
pub fn matmul<T: Scalar>(
    a_data: &[T],
    a_shape: [usize; 2],
    b_data: &[T],
    b_shape: [usize; 2],
) -> Vec<T> {
    let [m, k] = a_shape;
    let n = b_shape[1];
    let mut result = vec![T::zero(); m * n];

    // Row-major strides: row_stride = num_cols, col_stride = 1
    gemm_core(GemmParams {
        a_data,
        m,
        k,
        a_row_stride: a_shape[1],
        a_col_stride: 1,
        b_data,
        n,
        b_row_stride: b_shape[1],
        b_col_stride: 1,
        c_data: &mut result,
    });

    result
}

//! Column-wise helpers for product manifolds stored as `k × n` matrices.
//!
//! Every column is an independent factor, so per-column results can be
//! computed in any order. With the `parallel` feature the work is spread over
//! rayon's pool once [`ParallelDecision::columns`] says the problem is large
//! enough; results are always collected in column order, so the parallel and
//! sequential paths agree bit for bit.

use nalgebra::DVector;
use riemannball_core::types::{DMatrix, Scalar};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "parallel")]
use riemannball_core::utils::parallel_thresholds::ParallelDecision;

/// Evaluates `f` on every column index and collects the results in order.
#[inline]
pub fn collect_columns<T, F>(nrows: usize, ncols: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        if ParallelDecision::columns(nrows, ncols) {
            return (0..ncols)
                .into_par_iter()
                .with_min_len(ParallelDecision::chunk_size(ncols))
                .map(f)
                .collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = nrows;

    (0..ncols).map(f).collect()
}

/// Builds a `nrows × ncols` matrix whose j-th column is `f(j)`.
///
/// Each `f(j)` must have length `nrows`.
pub fn map_columns<T, F>(nrows: usize, ncols: usize, f: F) -> DMatrix<T>
where
    T: Scalar,
    F: Fn(usize) -> DVector<T> + Send + Sync,
{
    let columns = collect_columns(nrows, ncols, f);
    let mut result = DMatrix::zeros(nrows, ncols);
    for (j, column) in columns.iter().enumerate() {
        result.set_column(j, column);
    }
    result
}

/// Squared Euclidean norm of every column.
#[inline]
pub fn column_norms_squared<T: Scalar>(a: &DMatrix<T>) -> Vec<T> {
    collect_columns(a.nrows(), a.ncols(), |j| a.column(j).norm_squared())
}

/// Sum of a per-column quantity, accumulated in column order.
#[inline]
pub fn sum_columns<T, F>(nrows: usize, ncols: usize, f: F) -> T
where
    T: Scalar,
    F: Fn(usize) -> T + Send + Sync,
{
    collect_columns(nrows, ncols, f)
        .into_iter()
        .fold(T::zero(), |acc, x| acc + x)
}

//! Dense-matrix API on top of Faer.
//!
//! This module provides the `DenseMatrix` trait and its implementation for the `faer::Mat<T>` type,
//! enabling construction from raw column-major storage or from nested rows.

use crate::core::traits::MatVec;
use crate::error::SolveError;
use faer::Mat;

/// Constructors for dense matrices, implemented for `faer::Mat<T>`.
pub trait DenseMatrix<T>: MatVec<Vec<T>> + Sized {
    /// Construct from raw column-major storage.
    fn from_raw(nrows: usize, ncols: usize, data: Vec<T>) -> Result<Self, SolveError>;
    /// Construct from row vectors; every row must have the same length.
    fn from_rows(rows: &[Vec<T>]) -> Result<Self, SolveError>;
    /// The n×n identity.
    fn identity(n: usize) -> Self;
}

impl<T: Copy + num_traits::Float> DenseMatrix<T> for Mat<T> {
    fn from_raw(nrows: usize, ncols: usize, data: Vec<T>) -> Result<Self, SolveError> {
        if data.len() != nrows * ncols {
            return Err(SolveError::mismatch("from_raw", nrows * ncols, data.len()));
        }
        Ok(Mat::from_fn(nrows, ncols, |i, j| data[j * nrows + i]))
    }

    fn from_rows(rows: &[Vec<T>]) -> Result<Self, SolveError> {
        let ncols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|r| r.len() != ncols) {
            return Err(SolveError::mismatch("from_rows", ncols, bad.len()));
        }
        Ok(Mat::from_fn(rows.len(), ncols, |i, j| rows[i][j]))
    }

    fn identity(n: usize) -> Self {
        Mat::from_fn(n, n, |i, j| if i == j { T::one() } else { T::zero() })
    }
}

//! Wrappers for faer dense matrix types and vector operations.
//!
//! This module implements the core linear algebra traits for `faer::Mat` and `Vec<T>`,
//! so the iterative solvers can be written generically over the matrix type. Every
//! operation checks shapes and reports `SolveError::DimensionMismatch` instead of
//! panicking, since a bad input must only abort the solver run that hit it.
//!
//! # Features
//! - Matrix-vector multiplication for `faer` dense matrices.
//! - Inner product and norm for vectors, with optional Rayon parallelism.
//! - Entry access and shape queries used by the splitting methods.
//! - A symmetry check for validating inputs before a comparison.
//!
//! # References
//! - [faer crate documentation](https://docs.rs/faer)
//! - [num-traits crate documentation](https://docs.rs/num-traits)

use crate::core::traits::{InnerProduct, MatShape, MatVec, MatrixGet};
use crate::error::SolveError;
use faer::Mat;
use num_traits::Float;

/// Implements matrix-vector multiplication for `faer::Mat`.
///
/// Computes `y = A * x` where `A` is a dense matrix, `x` and `y` are vectors.
impl<T: Float> MatVec<Vec<T>> for Mat<T> {
    fn matvec(&self, x: &Vec<T>, y: &mut Vec<T>) -> Result<(), SolveError> {
        if self.ncols() != x.len() {
            return Err(SolveError::mismatch("matvec input", self.ncols(), x.len()));
        }
        if self.nrows() != y.len() {
            return Err(SolveError::mismatch("matvec output", self.nrows(), y.len()));
        }
        for i in 0..self.nrows() {
            let mut acc = T::zero();
            for j in 0..self.ncols() {
                acc = acc + self[(i, j)] * x[j];
            }
            y[i] = acc;
        }
        Ok(())
    }
}

/// Vectors shorter than this are reduced sequentially.
#[cfg(feature = "rayon")]
const PAR_CHUNK: usize = 4096;

/// Sum of `f(x_i, y_i)`.
///
/// The parallel path sums fixed-size chunks and then adds the partial sums in
/// order, so the result does not depend on how rayon schedules the work.
fn reduce_pairs<T, F>(x: &[T], y: &[T], f: F) -> T
where
    T: Float + Send + Sync,
    F: Fn(T, T) -> T + Send + Sync,
{
    let serial = |x: &[T], y: &[T]| {
        x.iter()
            .zip(y.iter())
            .map(|(xi, yi)| f(*xi, *yi))
            .fold(T::zero(), |acc, v| acc + v)
    };
    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        if x.len() > PAR_CHUNK {
            let partials: Vec<T> = x
                .par_chunks(PAR_CHUNK)
                .zip(y.par_chunks(PAR_CHUNK))
                .map(|(xc, yc)| serial(xc, yc))
                .collect();
            return partials.into_iter().fold(T::zero(), |acc, v| acc + v);
        }
    }
    serial(x, y)
}

/// Implements inner product and norm for vectors, with optional Rayon parallelism.
///
/// If the `rayon` feature is enabled, long vectors are reduced in parallel.
impl<T: Float + Send + Sync> InnerProduct<Vec<T>> for () {
    type Scalar = T;
    /// Computes the dot product of two vectors: `x^T y`.
    fn dot(&self, x: &Vec<T>, y: &Vec<T>) -> Result<T, SolveError> {
        if x.len() != y.len() {
            return Err(SolveError::mismatch("dot", x.len(), y.len()));
        }
        Ok(reduce_pairs(x.as_slice(), y.as_slice(), |a, b| a * b))
    }
    /// Computes the Euclidean norm of a vector: `||x||_2`.
    fn norm(&self, x: &Vec<T>) -> T {
        reduce_pairs(x.as_slice(), x.as_slice(), |a, _| a * a).sqrt()
    }
}

impl<T: Float> MatrixGet<T> for Mat<T> {
    fn get(&self, i: usize, j: usize) -> T {
        self[(i, j)]
    }
}

impl<T> MatShape for Mat<T> {
    fn nrows(&self) -> usize {
        self.nrows()
    }
    fn ncols(&self) -> usize {
        self.ncols()
    }
}

/// Returns whether `a` is symmetric up to an absolute entrywise tolerance `eps`.
///
/// Only the strict upper triangle is compared against the lower one.
pub fn is_symmetric<M, T>(a: &M, eps: T) -> Result<bool, SolveError>
where
    M: MatrixGet<T> + MatShape,
    T: Float,
{
    let n = a.nrows();
    if a.ncols() != n {
        return Err(SolveError::mismatch("is_symmetric", n, a.ncols()));
    }
    for i in 0..n {
        for j in (i + 1)..n {
            if (a.get(i, j) - a.get(j, i)).abs() > eps {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Computes `r = b - A x` into a freshly allocated vector.
pub fn residual<M, T>(a: &M, b: &Vec<T>, x: &Vec<T>) -> Result<Vec<T>, SolveError>
where
    M: MatVec<Vec<T>>,
    T: Float,
{
    let mut ax = vec![T::zero(); b.len()];
    a.matvec(x, &mut ax)?;
    Ok(b.iter().zip(&ax).map(|(&bi, &axi)| bi - axi).collect())
}

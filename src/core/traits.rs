//! Core linear-algebra traits for matiter.

use crate::error::SolveError;

/// Matrix–vector product: y ← A x.
pub trait MatVec<V> {
    /// Compute y = A · x. Fails if `x` or `y` does not match the matrix shape.
    fn matvec(&self, x: &V, y: &mut V) -> Result<(), SolveError>;
}

/// Inner products & norms.
pub trait InnerProduct<V> {
    /// Associated scalar type.
    type Scalar: Copy + PartialOrd;
    /// Compute dot(x, y).
    fn dot(&self, x: &V, y: &V) -> Result<Self::Scalar, SolveError>;
    /// Compute ‖x‖₂.
    fn norm(&self, x: &V) -> Self::Scalar;
}

/// Entry access, used by the splitting methods that need individual coefficients.
pub trait MatrixGet<T> {
    fn get(&self, i: usize, j: usize) -> T;
}

pub trait MatShape {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
}

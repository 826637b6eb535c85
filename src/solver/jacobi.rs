//! Jacobi iteration.
//!
//! x_{k+1}[i] = (b[i] − Σ_{j≠i} A[i,j] x_k[j]) / A[i,i], evaluated entirely from the
//! previous iterate. Convergence is only guaranteed for diagonally dominant or
//! suitably conditioned SPD matrices; divergent inputs are bounded by the iteration cap.

use crate::core::traits::{MatShape, MatVec, MatrixGet};
use crate::error::SolveError;
use crate::solver::LinearSolver;
use crate::solver::driver::{self, IterationRule};
use crate::utils::convergence::{Convergence, ConvergenceResult, SolverState};
use num_traits::Float;

pub struct JacobiSolver<T> {
    pub conv: Convergence<T>,
}

impl<T: Float> JacobiSolver<T> {
    pub fn new(tol: T, max_iters: usize) -> Self {
        Self { conv: Convergence { tol, max_iters } }
    }
}

impl<M, T> IterationRule<M, T> for JacobiSolver<T>
where
    M: MatVec<Vec<T>> + MatrixGet<T> + MatShape,
    T: Float,
{
    /// Inverse diagonal.
    type Work = Vec<T>;
    const NAME: &'static str = "Jacobi";

    fn init(&self, a: &M, _b: &Vec<T>, _state: &SolverState<T>) -> Result<Vec<T>, SolveError> {
        Ok(driver::nonzero_diagonal(a)?
            .into_iter()
            .map(|d| T::one() / d)
            .collect())
    }

    fn step(
        &self,
        a: &M,
        b: &Vec<T>,
        state: &mut SolverState<T>,
        inv_diag: &mut Vec<T>,
    ) -> Result<(), SolveError> {
        // (b_i − Σ_{j≠i} a_ij x_j) / a_ii == x_i + r_i / a_ii with r = b − A x_k
        for ((xi, ri), di) in state.x.iter_mut().zip(&state.r).zip(inv_diag.iter()) {
            *xi = *xi + *ri * *di;
        }
        state.refresh_residual(a, b)
    }
}

impl<M, T> LinearSolver<M, Vec<T>> for JacobiSolver<T>
where
    M: MatVec<Vec<T>> + MatrixGet<T> + MatShape,
    T: Float + Send + Sync,
{
    type Error = SolveError;
    type Scalar = T;

    fn solve(&mut self, a: &M, b: &Vec<T>, x0: &Vec<T>) -> Result<ConvergenceResult<T>, SolveError> {
        driver::iterate(&*self, a, b, x0, &self.conv)
    }
}

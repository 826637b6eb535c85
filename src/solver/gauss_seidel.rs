//! Gauss-Seidel iteration.
//!
//! Same splitting as Jacobi, but each sweep updates `x` in place, so row `i`
//! already sees the new values of rows `0..i`.

use crate::core::traits::{MatShape, MatVec, MatrixGet};
use crate::error::SolveError;
use crate::solver::LinearSolver;
use crate::solver::driver::{self, IterationRule};
use crate::utils::convergence::{Convergence, ConvergenceResult, SolverState};
use num_traits::Float;

pub struct GaussSeidelSolver<T> {
    pub conv: Convergence<T>,
}

impl<T: Float> GaussSeidelSolver<T> {
    pub fn new(tol: T, max_iters: usize) -> Self {
        Self { conv: Convergence { tol, max_iters } }
    }
}

impl<M, T> IterationRule<M, T> for GaussSeidelSolver<T>
where
    M: MatVec<Vec<T>> + MatrixGet<T> + MatShape,
    T: Float,
{
    type Work = Vec<T>;
    const NAME: &'static str = "Gauss-Seidel";

    fn init(&self, a: &M, _b: &Vec<T>, _state: &SolverState<T>) -> Result<Vec<T>, SolveError> {
        driver::nonzero_diagonal(a)
    }

    fn step(
        &self,
        a: &M,
        b: &Vec<T>,
        state: &mut SolverState<T>,
        work: &mut Vec<T>,
    ) -> Result<(), SolveError> {
        let n = state.x.len();
        for i in 0..n {
            let mut sigma = T::zero();
            for j in 0..i {
                sigma = sigma + a.get(i, j) * state.x[j];
            }
            for j in (i + 1)..n {
                sigma = sigma + a.get(i, j) * state.x[j];
            }
            state.x[i] = (b[i] - sigma) / work[i];
        }
        state.refresh_residual(a, b)
    }
}

impl<M, T> LinearSolver<M, Vec<T>> for GaussSeidelSolver<T>
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

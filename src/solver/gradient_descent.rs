//! Steepest descent with exact line search.
//!
//! x_{k+1} = x_k + α_k r_k with α_k = (r_k·r_k) / (r_k·A r_k). The residual is
//! recomputed from the new iterate after every step.

use crate::core::traits::{InnerProduct, MatShape, MatVec};
use crate::error::SolveError;
use crate::solver::LinearSolver;
use crate::solver::driver::{self, IterationRule};
use crate::utils::convergence::{Convergence, ConvergenceResult, SolverState};
use num_traits::Float;

pub struct GradientDescentSolver<T> {
    pub conv: Convergence<T>,
}

impl<T: Float> GradientDescentSolver<T> {
    pub fn new(tol: T, max_iters: usize) -> Self {
        Self { conv: Convergence { tol, max_iters } }
    }
}

impl<M, T> IterationRule<M, T> for GradientDescentSolver<T>
where
    M: MatVec<Vec<T>> + MatShape,
    T: Float + Send + Sync,
{
    /// Scratch for A r.
    type Work = Vec<T>;
    const NAME: &'static str = "Gradient Descent";

    fn init(&self, _a: &M, b: &Vec<T>, _state: &SolverState<T>) -> Result<Vec<T>, SolveError> {
        Ok(vec![T::zero(); b.len()])
    }

    fn step(
        &self,
        a: &M,
        b: &Vec<T>,
        state: &mut SolverState<T>,
        ar: &mut Vec<T>,
    ) -> Result<(), SolveError> {
        let ip = ();
        a.matvec(&state.r, ar)?;
        let rr = ip.dot(&state.r, &state.r)?;
        let alpha = driver::step_length(rr, ip.dot(&state.r, &*ar)?)?;
        for (xj, rj) in state.x.iter_mut().zip(&state.r) {
            *xj = *xj + alpha * *rj;
        }
        state.refresh_residual(a, b)
    }
}

impl<M, T> LinearSolver<M, Vec<T>> for GradientDescentSolver<T>
where
    M: MatVec<Vec<T>> + MatShape,
    T: Float + Send + Sync,
{
    type Error = SolveError;
    type Scalar = T;

    fn solve(&mut self, a: &M, b: &Vec<T>, x0: &Vec<T>) -> Result<ConvergenceResult<T>, SolveError> {
        driver::iterate(&*self, a, b, x0, &self.conv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::Mat;

    #[test]
    fn gd_solves_simple_spd() {
        let a = Mat::from_fn(2, 2, |i, j| [[4.0, 1.0], [1.0, 3.0]][i][j]);
        let mut solver = GradientDescentSolver::new(1e-10, 500);
        let result = solver.solve(&a, &vec![1.0, 2.0], &vec![0.0, 0.0]).unwrap();
        assert!(result.converged, "GD did not converge");
        let expected = [1.0 / 11.0, 7.0 / 11.0];
        for (xi, ei) in result.final_iterate.iter().zip(expected.iter()) {
            assert!((xi - ei).abs() < 1e-8, "xi = {}, expected = {}", xi, ei);
        }
    }

    #[test]
    fn starting_at_the_solution_takes_no_steps() {
        let a = Mat::from_fn(2, 2, |i, j| [[4.0, 1.0], [1.0, 3.0]][i][j]);
        let mut solver = GradientDescentSolver::new(1e-8, 500);
        let result = solver.solve(&a, &vec![5.0, 4.0], &vec![1.0, 1.0]).unwrap();
        assert!(result.converged);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.residual_history, vec![0.0]);
    }

    #[test]
    fn direction_in_null_space_is_degenerate() {
        // A r = 0 for r = b = [1, -1].
        let a = Mat::from_fn(2, 2, |_, _| 1.0);
        let err = GradientDescentSolver::new(1e-8, 10)
            .solve(&a, &vec![1.0, -1.0], &vec![0.0, 0.0])
            .unwrap_err();
        assert_eq!(err, SolveError::ZeroDescentDenominator);
    }
}

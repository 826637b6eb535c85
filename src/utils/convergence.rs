//! Convergence tracking & tolerance checks for iterative solvers.
//!
//! All solvers stop on the relative residual `‖b − A x_k‖₂ / max(‖b‖₂, ε) ≤ tol`,
//! so their iteration counts are directly comparable.

use crate::core::traits::MatVec;
use crate::core::wrappers::residual;
use crate::error::SolveError;
use num_traits::Float;

/// Iteration cap used when none is given.
pub const DEFAULT_MAX_ITERS: usize = 20_000;

/// Relative stopping test. `b_norm` is floored at machine epsilon so a zero
/// right-hand side does not divide by zero.
pub fn has_converged<T: Float>(res_norm: T, b_norm: T, tol: T) -> bool {
    res_norm / b_norm.max(T::epsilon()) <= tol
}

/// Stopping criteria.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Convergence<T> {
    pub tol: T,
    pub max_iters: usize,
}

impl<T: Float> Convergence<T> {
    pub fn new(tol: T, max_iters: usize) -> Self {
        Self { tol, max_iters }
    }

    /// Whether `res_norm` satisfies the tolerance relative to `b_norm`.
    pub fn check(&self, res_norm: T, b_norm: T) -> bool {
        has_converged(res_norm, b_norm, self.tol)
    }

    /// Whether iteration `k` has used up the budget.
    pub fn exhausted(&self, k: usize) -> bool {
        k >= self.max_iters
    }
}

/// Mutable state of one solver run: iterate, residual and iteration count.
///
/// Owned by exactly one run; `r` always tracks `b − A x` (recomputed or
/// updated recursively depending on the method).
#[derive(Clone, Debug)]
pub struct SolverState<T> {
    pub x: Vec<T>,
    pub r: Vec<T>,
    pub k: usize,
}

impl<T: Float> SolverState<T> {
    /// Start from `x0`, computing `r_0 = b − A x_0`.
    pub fn new<M: MatVec<Vec<T>>>(a: &M, b: &Vec<T>, x0: Vec<T>) -> Result<Self, SolveError> {
        let r = residual(a, b, &x0)?;
        Ok(Self { x: x0, r, k: 0 })
    }

    /// Recompute the residual from the current iterate.
    pub fn refresh_residual<M: MatVec<Vec<T>>>(&mut self, a: &M, b: &Vec<T>) -> Result<(), SolveError> {
        self.r = residual(a, b, &self.x)?;
        Ok(())
    }

    /// Consume the state into the final result of the run.
    pub fn finish(self, converged: bool, b_norm: T, residual_history: Vec<T>) -> ConvergenceResult<T> {
        let final_residual_norm = residual_history.last().copied().unwrap_or_else(T::zero);
        ConvergenceResult {
            converged,
            iterations: self.k,
            final_residual_norm,
            b_norm,
            final_iterate: self.x,
            residual_history,
        }
    }
}

/// Outcome of one solver run.
///
/// `residual_history[0]` is `‖r_0‖`, entry `k` is `‖r_k‖`, so the history always
/// holds `iterations + 1` values.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvergenceResult<T> {
    pub converged: bool,
    pub iterations: usize,
    /// Absolute residual norm `‖b − A x‖₂` of the final iterate.
    pub final_residual_norm: T,
    /// `‖b‖₂`, kept so relative quantities can be reported.
    pub b_norm: T,
    pub final_iterate: Vec<T>,
    pub residual_history: Vec<T>,
}

impl<T: Float> ConvergenceResult<T> {
    /// Final residual relative to `‖b‖₂` (the quantity compared against `tol`).
    pub fn relative_residual(&self) -> T {
        self.final_residual_norm / self.b_norm.max(T::epsilon())
    }

    /// Relative error `‖x − x_exact‖₂ / ‖x_exact‖₂` against a known solution.
    pub fn relative_error(&self, exact: &[T]) -> Result<T, SolveError> {
        if exact.len() != self.final_iterate.len() {
            return Err(SolveError::mismatch("relative_error", self.final_iterate.len(), exact.len()));
        }
        let diff = self
            .final_iterate
            .iter()
            .zip(exact)
            .map(|(&xi, &ei)| (xi - ei) * (xi - ei))
            .fold(T::zero(), |acc, v| acc + v);
        let denom = exact.iter().map(|&ei| ei * ei).fold(T::zero(), |acc, v| acc + v);
        Ok((diff / denom.max(T::epsilon())).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_criterion_is_scale_invariant() {
        assert!(has_converged(1e-9, 1.0, 1e-8));
        assert!(has_converged(1e-3, 1e6, 1e-8));
        assert!(!has_converged(1e-3, 1.0, 1e-8));
    }

    #[test]
    fn zero_rhs_does_not_divide_by_zero() {
        assert!(has_converged(0.0, 0.0, 1e-8));
        assert!(!has_converged(1.0, 0.0, 1e-8));
    }

    #[test]
    fn cap_is_inclusive() {
        let conv = Convergence::new(1e-8, 3);
        assert!(!conv.exhausted(2));
        assert!(conv.exhausted(3));
    }

    #[test]
    fn relative_error_against_exact() {
        let result = ConvergenceResult {
            converged: true,
            iterations: 1,
            final_residual_norm: 0.0,
            b_norm: 1.0,
            final_iterate: vec![1.0, 1.0],
            residual_history: vec![1.0, 0.0],
        };
        assert_eq!(result.relative_error(&[1.0, 1.0]).unwrap(), 0.0);
        assert!(result.relative_error(&[1.0]).is_err());
    }
}

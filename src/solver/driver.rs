//! Shared iteration loop.

use crate::core::traits::{InnerProduct, MatShape, MatVec, MatrixGet};
use crate::error::SolveError;
use crate::utils::convergence::{Convergence, ConvergenceResult, SolverState};
use num_traits::Float;

/// One iterative method: per-run scratch plus a single update `x_k -> x_{k+1}`.
///
/// `step` must leave `state.r` equal to `b − A x_{k+1}` (up to rounding); the
/// driver increments `state.k` and evaluates the stopping test.
pub trait IterationRule<M, T> {
    /// Scratch data living for one run only.
    type Work;
    const NAME: &'static str;

    /// Validate the system and build the scratch data. Runs before any update.
    fn init(&self, a: &M, b: &Vec<T>, state: &SolverState<T>) -> Result<Self::Work, SolveError>;

    fn step(
        &self,
        a: &M,
        b: &Vec<T>,
        state: &mut SolverState<T>,
        work: &mut Self::Work,
    ) -> Result<(), SolveError>;
}

/// Run `rule` from `x0` until the relative residual drops below `conv.tol` or
/// `conv.max_iters` updates have been made.
///
/// Reaching the cap is not an error: the result comes back with `converged = false`.
/// A non-finite residual ends the run the same way.
pub fn iterate<M, T, R>(
    rule: &R,
    a: &M,
    b: &Vec<T>,
    x0: &Vec<T>,
    conv: &Convergence<T>,
) -> Result<ConvergenceResult<T>, SolveError>
where
    M: MatVec<Vec<T>> + MatShape,
    T: Float + Send + Sync,
    R: IterationRule<M, T>,
{
    let n = a.nrows();
    if a.ncols() != n {
        return Err(SolveError::mismatch("square matrix", n, a.ncols()));
    }
    if b.len() != n {
        return Err(SolveError::mismatch("right-hand side", n, b.len()));
    }
    if x0.len() != n {
        return Err(SolveError::mismatch("initial guess", n, x0.len()));
    }

    let ip = ();
    let b_norm = ip.norm(b);
    let mut state = SolverState::new(a, b, x0.clone())?;
    let mut work = rule.init(a, b, &state)?;
    let mut res = ip.norm(&state.r);
    let mut history = vec![res];
    log::debug!("{}: n = {}, initial residual {:.3e}", R::NAME, n, as_f64(res));

    if conv.check(res, b_norm) {
        return Ok(state.finish(true, b_norm, history));
    }

    while !conv.exhausted(state.k) {
        rule.step(a, b, &mut state, &mut work)?;
        state.k += 1;
        res = ip.norm(&state.r);
        history.push(res);
        log::trace!("{}: iter {} residual {:.3e}", R::NAME, state.k, as_f64(res));

        if conv.check(res, b_norm) {
            log::debug!("{}: converged in {} iterations", R::NAME, state.k);
            return Ok(state.finish(true, b_norm, history));
        }
        if !res.is_finite() {
            log::warn!("{}: residual became non-finite at iteration {}", R::NAME, state.k);
            return Ok(state.finish(false, b_norm, history));
        }
    }

    log::warn!(
        "{}: did not converge after {} iterations (residual: {:.2e})",
        R::NAME,
        state.k,
        as_f64(res)
    );
    Ok(state.finish(false, b_norm, history))
}

/// Step length `num / denom` for the descent methods.
///
/// A vanishing denominator means the search direction is degenerate; a negative
/// one means A is not positive definite along it.
pub(crate) fn step_length<T: Float>(num: T, denom: T) -> Result<T, SolveError> {
    if denom.abs() <= T::min_positive_value() {
        return Err(SolveError::ZeroDescentDenominator);
    }
    if denom < T::zero() {
        return Err(SolveError::IndefiniteMatrix);
    }
    Ok(num / denom)
}

/// Diagonal of `a`, failing on the first zero entry.
pub(crate) fn nonzero_diagonal<M, T>(a: &M) -> Result<Vec<T>, SolveError>
where
    M: MatrixGet<T> + MatShape,
    T: Float,
{
    (0..a.nrows())
        .map(|i| {
            let aii = a.get(i, i);
            if aii == T::zero() {
                Err(SolveError::SingularDiagonal(i))
            } else {
                Ok(aii)
            }
        })
        .collect()
}

fn as_f64<T: Float>(v: T) -> f64 {
    v.to_f64().unwrap_or(f64::NAN)
}

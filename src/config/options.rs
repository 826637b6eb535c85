//! Command-line or API options for a solver comparison.
//!
//! This module provides the `SolveOptions` struct shared by every solver in a
//! comparison run, and `parse_tolerance`, which turns a user-supplied tolerance
//! string into a value the solvers accept. The tolerance has a default of `1e-8`
//! and a floor of `1e-14`; anything tighter is below what double precision can
//! resolve for a relative residual and is raised to the floor.

use crate::error::MatIterError;
use crate::utils::convergence::DEFAULT_MAX_ITERS;
use num_traits::Float;

/// Tolerance used when none is given.
pub const DEFAULT_TOL: f64 = 1e-8;

/// Smallest accepted tolerance.
pub const MIN_TOL: f64 = 1e-14;

/// Stopping parameters & run mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveOptions<T> {
    /// Relative residual tolerance
    pub tol: T,

    /// Iteration cap per solver
    pub max_iters: usize,

    /// Run the solvers of a comparison concurrently (needs the `rayon` feature)
    pub parallel: bool,
}

impl<T: Float> SolveOptions<T> {
    pub fn new(tol: T) -> Self {
        Self { tol, max_iters: DEFAULT_MAX_ITERS, parallel: false }
    }

    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Default for SolveOptions<f64> {
    fn default() -> Self {
        Self::new(DEFAULT_TOL)
    }
}

/// Parse a tolerance, falling back to [`DEFAULT_TOL`] when absent and raising
/// values below [`MIN_TOL`] to the floor.
pub fn parse_tolerance(raw: Option<&str>) -> Result<f64, MatIterError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_TOL);
    };
    let tol: f64 = raw
        .trim()
        .parse()
        .map_err(|_| MatIterError::InvalidTolerance(format!("`{raw}` is not a number")))?;
    if !tol.is_finite() || tol <= 0.0 {
        return Err(MatIterError::InvalidTolerance(format!("`{raw}` must be positive and finite")));
    }
    if tol < MIN_TOL {
        log::warn!("tolerance {tol:e} is below the floor, using {MIN_TOL:e}");
        return Ok(MIN_TOL);
    }
    Ok(tol)
}

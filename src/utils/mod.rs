//! Shared utilities for the solvers.

pub mod convergence;

//! Context module for running and comparing solvers.
//!
//! This module provides the comparison driver: it selects solver variants by [`SolverKind`],
//! runs each one on the same system with its own copy of the initial guess, and collects
//! the outcomes into a [`ComparisonReport`] in a fixed order.
//!
//! Modules:
//! - [`compare`]: `SolverKind`, `ComparisonContext`, `ComparisonReport` and the `compare` entry point.
//!
//! # Example
//! ```rust
//! use faer::Mat;
//! use matiter::context::{compare, SolverKind};
//!
//! let a = Mat::from_fn(2, 2, |i, j| [[4.0, 1.0], [1.0, 3.0]][i][j]);
//! let report = compare(&a, &vec![1.0, 2.0], &vec![0.0, 0.0], 1e-8);
//! assert!(report.all_converged());
//! let cg = report.get(SolverKind::ConjugateGradient).unwrap();
//! assert!(cg.outcome.as_ref().unwrap().iterations <= 2);
//! ```
//!
//! # References
//! - Saad, Y. (2003). Iterative Methods for Sparse Linear Systems. SIAM.
//! - Shewchuk, J. R. (1994). An Introduction to the Conjugate Gradient Method Without the Agonizing Pain.

pub mod compare;
pub use compare::{ComparisonContext, ComparisonReport, SolverKind, SolverRun, compare};

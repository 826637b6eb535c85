//! matiter: classic iterative solvers for SPD systems over Faer
//!
//! This crate provides Jacobi, Gauss-Seidel, steepest descent and conjugate gradient solvers
//! for symmetric positive-definite systems `A x = b`, sharing one iteration driver and one
//! relative-residual stopping test, plus a driver that runs them side by side and reports
//! how each one converged. Matrices can be read from Matrix Market files.

pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod io;
pub mod matrix;
pub mod solver;
pub mod utils;

// Re-exports for convenience
pub use self::config::*;
pub use self::context::*;
pub use self::core::*;
pub use self::error::*;
pub use self::matrix::*;
pub use self::solver::*;
pub use self::utils::*;

// Re-export the result types at the crate root for convenience
pub use self::utils::convergence::{ConvergenceResult, SolverState};

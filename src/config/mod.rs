//! Solver configuration.

pub mod options;
pub use options::{DEFAULT_TOL, MIN_TOL, SolveOptions, parse_tolerance};

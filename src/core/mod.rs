//! Core traits and their implementations for dense `faer` matrices and `Vec` vectors.

pub mod traits;
pub mod wrappers;

pub use wrappers::{is_symmetric, residual};

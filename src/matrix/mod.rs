//! Matrix module: dense matrix constructors.

pub mod dense;
pub use dense::DenseMatrix;

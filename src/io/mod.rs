//! Input formats.

pub mod matrix_market;
pub use matrix_market::{MAX_DENSE_ENTRIES, load_matrix, load_vector, read_matrix, read_vector};

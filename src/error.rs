use thiserror::Error;

// Failures of a single solver run. These are isolated per solver by the
// comparison driver, so they stay cheap to clone and compare.

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("dimension mismatch in {op}: expected {expected}, found {found}")]
    DimensionMismatch {
        op: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("zero diagonal entry at row {0}")]
    SingularDiagonal(usize),
    #[error("degenerate search direction (step denominator is zero)")]
    ZeroDescentDenominator,
    #[error("indefinite matrix detected (d^T A d < 0)")]
    IndefiniteMatrix,
}

impl SolveError {
    pub(crate) fn mismatch(op: &'static str, expected: usize, found: usize) -> Self {
        SolveError::DimensionMismatch { op, expected, found }
    }
}

// Unified error type for matiter

#[derive(Error, Debug)]
pub enum MatIterError {
    #[error(transparent)]
    Solve(#[from] SolveError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("unsupported Matrix Market format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid tolerance: {0}")]
    InvalidTolerance(String),
    #[error("unknown solver `{0}` (expected jacobi, gauss-seidel, gradient-descent or cg)")]
    UnknownSolver(String),
}

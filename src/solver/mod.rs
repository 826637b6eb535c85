//! Iterative solver interfaces.
//!
//! Every solver runs through the same driver ([`driver::iterate`]): the driver owns the
//! per-run [`SolverState`](crate::utils::convergence::SolverState), applies the stopping
//! test and records the residual history, while each method only supplies its update rule.

use crate::utils::convergence::ConvergenceResult;

/// Common interface for the iterative solvers.
pub trait LinearSolver<M, V> {
    type Error;
    type Scalar: Copy + PartialOrd;
    /// Solve A·x = b starting from `x0`. `x0` is copied; the caller's vector is never touched.
    /// Returns the final iterate together with convergence info.
    fn solve(
        &mut self,
        a: &M,
        b: &V,
        x0: &V,
    ) -> Result<ConvergenceResult<<Self as LinearSolver<M, V>>::Scalar>, Self::Error>;
}

pub mod driver;
pub use driver::IterationRule;

pub mod jacobi;
pub use jacobi::JacobiSolver;

pub mod gauss_seidel;
pub use gauss_seidel::GaussSeidelSolver;

pub mod gradient_descent;
pub use gradient_descent::GradientDescentSolver;

pub mod cg;
pub use cg::CgSolver;

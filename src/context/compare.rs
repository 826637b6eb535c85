//! Side-by-side comparison of the four solvers.
//!
//! Each selected solver runs on the same `(A, b, x0, tol)` with its own clone of `x0`.
//! A failure in one run is stored in that run's entry and never stops the others.
//! With `SolveOptions::parallel` and the `rayon` feature the runs execute on a small
//! rayon pool; results are always reported in comparison order.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use num_traits::Float;

use crate::config::{MIN_TOL, SolveOptions};
use crate::core::traits::{MatShape, MatVec, MatrixGet};
use crate::error::{MatIterError, SolveError};
use crate::solver::{CgSolver, GaussSeidelSolver, GradientDescentSolver, JacobiSolver, LinearSolver};
use crate::utils::convergence::ConvergenceResult;

/// The available solver variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SolverKind {
    /// Jacobi iteration
    Jacobi,
    /// Gauss-Seidel iteration
    GaussSeidel,
    /// Steepest descent
    GradientDescent,
    /// Conjugate Gradient (CG) method (for SPD matrices)
    ConjugateGradient,
}

impl SolverKind {
    /// All variants, in comparison order.
    pub const ALL: [SolverKind; 4] = [
        SolverKind::Jacobi,
        SolverKind::GaussSeidel,
        SolverKind::GradientDescent,
        SolverKind::ConjugateGradient,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SolverKind::Jacobi => "Jacobi",
            SolverKind::GaussSeidel => "Gauss-Seidel",
            SolverKind::GradientDescent => "Gradient Descent",
            SolverKind::ConjugateGradient => "Conjugate Gradient",
        }
    }

    /// Run this solver once.
    pub fn solve<M, T>(
        self,
        a: &M,
        b: &Vec<T>,
        x0: &Vec<T>,
        options: &SolveOptions<T>,
    ) -> Result<ConvergenceResult<T>, SolveError>
    where
        M: MatVec<Vec<T>> + MatrixGet<T> + MatShape,
        T: Float + Send + Sync,
    {
        let (tol, max_iters) = (options.tol, options.max_iters);
        match self {
            SolverKind::Jacobi => JacobiSolver::new(tol, max_iters).solve(a, b, x0),
            SolverKind::GaussSeidel => GaussSeidelSolver::new(tol, max_iters).solve(a, b, x0),
            SolverKind::GradientDescent => GradientDescentSolver::new(tol, max_iters).solve(a, b, x0),
            SolverKind::ConjugateGradient => CgSolver::new(tol, max_iters).solve(a, b, x0),
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolverKind {
    type Err = MatIterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "jacobi" => Ok(SolverKind::Jacobi),
            "gauss-seidel" | "gs" => Ok(SolverKind::GaussSeidel),
            "gradient-descent" | "gd" | "steepest-descent" => Ok(SolverKind::GradientDescent),
            "conjugate-gradient" | "cg" => Ok(SolverKind::ConjugateGradient),
            _ => Err(MatIterError::UnknownSolver(s.to_string())),
        }
    }
}

/// One solver's entry in a report. Wall time is kept beside the result so that
/// results of repeated runs compare equal.
#[derive(Clone, Debug)]
pub struct SolverRun<T> {
    pub outcome: Result<ConvergenceResult<T>, SolveError>,
    pub elapsed: Duration,
}

impl<T> SolverRun<T> {
    pub fn converged(&self) -> bool {
        matches!(&self.outcome, Ok(result) if result.converged)
    }
}

/// Outcomes keyed by solver, in the order the solvers were requested.
#[derive(Clone, Debug)]
pub struct ComparisonReport<T> {
    runs: IndexMap<SolverKind, SolverRun<T>>,
}

impl<T> ComparisonReport<T> {
    pub fn get(&self, kind: SolverKind) -> Option<&SolverRun<T>> {
        self.runs.get(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SolverKind, &SolverRun<T>)> {
        self.runs.iter().map(|(kind, run)| (*kind, run))
    }

    pub fn kinds(&self) -> impl Iterator<Item = SolverKind> + '_ {
        self.runs.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// True when every run finished without error and converged.
    pub fn all_converged(&self) -> bool {
        self.runs.values().all(SolverRun::converged)
    }

    /// The solver outcomes without timings.
    pub fn outcomes(&self) -> IndexMap<SolverKind, &Result<ConvergenceResult<T>, SolveError>> {
        self.runs.iter().map(|(kind, run)| (*kind, &run.outcome)).collect()
    }
}

impl<'a, T> IntoIterator for &'a ComparisonReport<T> {
    type Item = (&'a SolverKind, &'a SolverRun<T>);
    type IntoIter = indexmap::map::Iter<'a, SolverKind, SolverRun<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.runs.iter()
    }
}

/// Configuration of a comparison: shared options plus the solvers to run.
#[derive(Clone, Debug)]
pub struct ComparisonContext<T> {
    pub options: SolveOptions<T>,
    /// Solvers to run; duplicates are run once.
    pub kinds: Vec<SolverKind>,
}

impl<T: Float + Send + Sync> ComparisonContext<T> {
    pub fn new(options: SolveOptions<T>) -> Self {
        Self { options, kinds: SolverKind::ALL.to_vec() }
    }

    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = SolverKind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }

    /// Run every selected solver on `A x = b` from `x0`.
    pub fn run<M>(&self, a: &M, b: &Vec<T>, x0: &Vec<T>) -> ComparisonReport<T>
    where
        M: MatVec<Vec<T>> + MatrixGet<T> + MatShape + Sync,
    {
        let mut kinds = Vec::with_capacity(self.kinds.len());
        for kind in &self.kinds {
            if !kinds.contains(kind) {
                kinds.push(*kind);
            }
        }

        let runs = if self.options.parallel {
            self.run_parallel(a, b, x0, &kinds)
        } else {
            kinds
                .iter()
                .map(|&kind| (kind, run_one(kind, a, b, x0.clone(), &self.options)))
                .collect()
        };

        ComparisonReport { runs: runs.into_iter().collect() }
    }

    #[cfg(feature = "rayon")]
    fn run_parallel<M>(
        &self,
        a: &M,
        b: &Vec<T>,
        x0: &Vec<T>,
        kinds: &[SolverKind],
    ) -> Vec<(SolverKind, SolverRun<T>)>
    where
        M: MatVec<Vec<T>> + MatrixGet<T> + MatShape + Sync,
    {
        use rayon::prelude::*;

        let options = &self.options;
        let work = || {
            kinds
                .par_iter()
                .map(|&kind| (kind, run_one(kind, a, b, x0.clone(), options)))
                .collect::<Vec<_>>()
        };
        let threads = num_cpus::get().clamp(1, kinds.len().max(1));
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(work),
            Err(e) => {
                log::warn!("could not build a dedicated pool ({e}), using the global one");
                work()
            }
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn run_parallel<M>(
        &self,
        a: &M,
        b: &Vec<T>,
        x0: &Vec<T>,
        kinds: &[SolverKind],
    ) -> Vec<(SolverKind, SolverRun<T>)>
    where
        M: MatVec<Vec<T>> + MatrixGet<T> + MatShape + Sync,
    {
        log::debug!("built without rayon, running solvers sequentially");
        kinds
            .iter()
            .map(|&kind| (kind, run_one(kind, a, b, x0.clone(), &self.options)))
            .collect()
    }
}

// x0 is taken by value so concurrent runs never share an iterate.
fn run_one<M, T>(
    kind: SolverKind,
    a: &M,
    b: &Vec<T>,
    x0: Vec<T>,
    options: &SolveOptions<T>,
) -> SolverRun<T>
where
    M: MatVec<Vec<T>> + MatrixGet<T> + MatShape,
    T: Float + Send + Sync,
{
    let start = Instant::now();
    let outcome = kind.solve(a, b, &x0, options);
    let elapsed = start.elapsed();
    if let Err(e) = &outcome {
        log::warn!("{kind} failed: {e}");
    }
    SolverRun { outcome, elapsed }
}

/// Run all four solvers on `A x = b` from `x0` with relative tolerance `tol`
/// and the default iteration cap.
///
/// A `tol` below [`MIN_TOL`] is raised to it, as [`parse_tolerance`](crate::config::parse_tolerance) does.
pub fn compare<M, T>(a: &M, b: &Vec<T>, x0: &Vec<T>, tol: T) -> ComparisonReport<T>
where
    M: MatVec<Vec<T>> + MatrixGet<T> + MatShape + Sync,
    T: Float + Send + Sync,
{
    let floor = T::from(MIN_TOL).unwrap_or_else(T::epsilon);
    let tol = if tol < floor {
        log::warn!("tolerance is below the floor, using {MIN_TOL:e}");
        floor
    } else {
        tol
    };
    ComparisonContext::new(SolveOptions::new(tol)).run(a, b, x0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_case_insensitively() {
        assert_eq!("CG".parse::<SolverKind>().unwrap(), SolverKind::ConjugateGradient);
        assert_eq!("Gauss_Seidel".parse::<SolverKind>().unwrap(), SolverKind::GaussSeidel);
        assert_eq!("gradient descent".parse::<SolverKind>().unwrap(), SolverKind::GradientDescent);
        assert!(matches!("sor".parse::<SolverKind>(), Err(MatIterError::UnknownSolver(_))));
    }

    #[test]
    fn display_uses_report_names() {
        let names: Vec<String> = SolverKind::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["Jacobi", "Gauss-Seidel", "Gradient Descent", "Conjugate Gradient"]);
    }
}

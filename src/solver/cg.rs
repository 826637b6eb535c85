//! Conjugate Gradient (unpreconditioned) per Saad §6.1.
//!
//! Keeps a search direction `p` alongside `x` and `r`; the residual is updated
//! recursively (r_{k+1} = r_k − α_k A p_k). In exact arithmetic an n×n SPD system
//! converges in at most n steps; the iteration cap still bounds the run since
//! conjugacy is lost in floating point.

use crate::core::traits::{InnerProduct, MatShape, MatVec};
use crate::error::SolveError;
use crate::solver::LinearSolver;
use crate::solver::driver::{self, IterationRule};
use crate::utils::convergence::{Convergence, ConvergenceResult, SolverState};
use num_traits::Float;

pub struct CgSolver<T> {
    pub conv: Convergence<T>,
}

impl<T: Float> CgSolver<T> {
    pub fn new(tol: T, max_iters: usize) -> Self {
        Self { conv: Convergence { tol, max_iters } }
    }
}

pub struct CgWork<T> {
    p: Vec<T>,
    ap: Vec<T>,
    rsq: T,
}

impl<M, T> IterationRule<M, T> for CgSolver<T>
where
    M: MatVec<Vec<T>> + MatShape,
    T: Float + Send + Sync,
{
    type Work = CgWork<T>;
    const NAME: &'static str = "Conjugate Gradient";

    fn init(&self, _a: &M, b: &Vec<T>, state: &SolverState<T>) -> Result<CgWork<T>, SolveError> {
        let ip = ();
        Ok(CgWork {
            p: state.r.clone(),
            ap: vec![T::zero(); b.len()],
            rsq: ip.dot(&state.r, &state.r)?,
        })
    }

    fn step(
        &self,
        a: &M,
        _b: &Vec<T>,
        state: &mut SolverState<T>,
        work: &mut CgWork<T>,
    ) -> Result<(), SolveError> {
        let ip = ();
        a.matvec(&work.p, &mut work.ap)?;
        let alpha = driver::step_length(work.rsq, ip.dot(&work.p, &work.ap)?)?;
        for (xj, pj) in state.x.iter_mut().zip(&work.p) {
            *xj = *xj + alpha * *pj;
        }
        for (rj, apj) in state.r.iter_mut().zip(&work.ap) {
            *rj = *rj - alpha * *apj;
        }
        let rsq_new = ip.dot(&state.r, &state.r)?;
        let beta = rsq_new / work.rsq;
        for (pj, rj) in work.p.iter_mut().zip(&state.r) {
            *pj = *rj + beta * *pj;
        }
        work.rsq = rsq_new;
        Ok(())
    }
}

impl<M, T> LinearSolver<M, Vec<T>> for CgSolver<T>
where
    M: MatVec<Vec<T>> + MatShape,
    T: Float + Send + Sync,
{
    type Error = SolveError;
    type Scalar = T;

    fn solve(&mut self, a: &M, b: &Vec<T>, x0: &Vec<T>) -> Result<ConvergenceResult<T>, SolveError> {
        driver::iterate(&*self, a, b, x0, &self.conv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::Mat;

    #[test]
    fn cg_solves_simple_spd() {
        // SPD system: [[4,1],[1,3]] x = [1,2]
        let a = Mat::from_fn(2, 2, |i, j| [[4.0, 1.0], [1.0, 3.0]][i][j]);
        let mut solver = CgSolver::new(1e-10, 20);
        let result = solver.solve(&a, &vec![1.0, 2.0], &vec![0.0, 0.0]).unwrap();
        let expected = vec![0.09090909090909091, 0.6363636363636364];
        let tol = 1e-8;
        for (xi, ei) in result.final_iterate.iter().zip(expected.iter()) {
            assert!((xi - ei).abs() < tol, "xi = {}, expected = {}", xi, ei);
        }
        assert!(result.converged, "CG did not converge");
        assert!(result.iterations <= 2);
    }

    #[test]
    fn cg_solves_spd() {
        // Symmetric positive definite system
        // A = [[4,1,0],[1,3,1],[0,1,2]]
        // x_true = [1,2,3]
        let rows = [[4.0, 1.0, 0.0], [1.0, 3.0, 1.0], [0.0, 1.0, 2.0]];
        let a = Mat::from_fn(3, 3, |i, j| rows[i][j]);
        let x_true = vec![1.0, 2.0, 3.0];
        let mut b = vec![0.0; 3];
        a.matvec(&x_true, &mut b).unwrap();
        let mut solver = CgSolver::new(1e-10, 100);
        let result = solver.solve(&a, &b, &vec![0.0; 3]).unwrap();
        assert!(result.converged, "CG did not converge");
        assert!(result.iterations <= 3);

        // the recursively updated residual must agree with b - A x
        let r_final = crate::core::residual(&a, &b, &result.final_iterate).unwrap();
        let res_norm = r_final.iter().map(|&ri| ri * ri).sum::<f64>().sqrt();
        assert!((res_norm - result.final_residual_norm).abs() < 1e-10);
    }

    #[test]
    fn negative_curvature_is_reported() {
        let a = Mat::from_fn(2, 2, |i, j| if i == j { -1.0 } else { 0.0 });
        let err = CgSolver::new(1e-8, 10)
            .solve(&a, &vec![1.0, 1.0], &vec![0.0, 0.0])
            .unwrap_err();
        assert_eq!(err, SolveError::IndefiniteMatrix);
    }

    #[test]
    fn direction_in_null_space_is_degenerate() {
        // p_0 = r_0 = b = [1, -1] and A p_0 = 0.
        let a = Mat::from_fn(2, 2, |_, _| 1.0);
        let err = CgSolver::new(1e-8, 10)
            .solve(&a, &vec![1.0, -1.0], &vec![0.0, 0.0])
            .unwrap_err();
        assert_eq!(err, SolveError::ZeroDescentDenominator);
    }
}

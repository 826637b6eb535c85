//! Tests for the four iterative solvers on small SPD systems.
//!
//! This module checks that Jacobi, Gauss-Seidel, steepest descent and CG reach a known
//! solution on random diagonally dominant SPD systems, that CG finishes within n steps,
//! that the descent methods never increase the residual on well-conditioned SPD input,
//! and the trivial identity case.

use approx::assert_abs_diff_eq;
use faer::Mat;
use matiter::core::traits::MatVec;
use matiter::matrix::DenseMatrix;
use matiter::solver::{CgSolver, GaussSeidelSolver, GradientDescentSolver, JacobiSolver, LinearSolver};
use matiter::utils::convergence::ConvergenceResult;
use matiter::SolveError;
use rand::Rng;

/// Random symmetric, strictly diagonally dominant matrix with positive diagonal (hence SPD),
/// a random exact solution and the matching right-hand side.
fn random_dd_spd(n: usize) -> (Mat<f64>, Vec<f64>, Vec<f64>) {
    let mut rng = rand::thread_rng();
    let mut a = Mat::<f64>::zeros(n, n);
    for i in 0..n {
        for j in (i + 1)..n {
            let v: f64 = rng.r#gen::<f64>() - 0.5;
            a[(i, j)] = v;
            a[(j, i)] = v;
        }
    }
    for i in 0..n {
        let off: f64 = (0..n).filter(|&j| j != i).map(|j| a[(i, j)].abs()).sum();
        a[(i, i)] = off + 1.0;
    }
    let x_true: Vec<f64> = (0..n).map(|_| rng.r#gen::<f64>() * 2.0 - 1.0).collect();
    let mut b = vec![0.0; n];
    a.matvec(&x_true, &mut b).unwrap();
    (a, b, x_true)
}

/// 1D Laplacian tridiag(-1, 2, -1).
fn laplacian(n: usize) -> Mat<f64> {
    Mat::from_fn(n, n, |i, j| {
        if i == j {
            2.0
        } else if i.abs_diff(j) == 1 {
            -1.0
        } else {
            0.0
        }
    })
}

fn dd4() -> (Mat<f64>, Vec<f64>) {
    let rows = vec![
        vec![10.0, 1.0, 0.0, 2.0],
        vec![1.0, 8.0, 1.0, 0.0],
        vec![0.0, 1.0, 6.0, 1.0],
        vec![2.0, 0.0, 1.0, 9.0],
    ];
    let a: Mat<f64> = DenseMatrix::from_rows(&rows).unwrap();
    let mut b = vec![0.0; 4];
    a.matvec(&vec![1.0, -2.0, 3.0, 0.5], &mut b).unwrap();
    (a, b)
}

fn all_solvers(a: &Mat<f64>, b: &Vec<f64>, x0: &Vec<f64>, tol: f64, max_iters: usize) -> Vec<ConvergenceResult<f64>> {
    vec![
        JacobiSolver::new(tol, max_iters).solve(a, b, x0).unwrap(),
        GaussSeidelSolver::new(tol, max_iters).solve(a, b, x0).unwrap(),
        GradientDescentSolver::new(tol, max_iters).solve(a, b, x0).unwrap(),
        CgSolver::new(tol, max_iters).solve(a, b, x0).unwrap(),
    ]
}

fn non_increasing(history: &[f64]) -> bool {
    history.windows(2).all(|w| w[1] <= w[0])
}

#[test]
fn all_solvers_recover_random_solution() {
    let n = 8;
    let (a, b, x_true) = random_dd_spd(n);
    for result in all_solvers(&a, &b, &vec![0.0; n], 1e-12, 20_000) {
        assert!(result.converged);
        assert!(result.relative_residual() <= 1e-12);
        assert_eq!(result.residual_history.len(), result.iterations + 1);
        for (xi, ti) in result.final_iterate.iter().zip(&x_true) {
            assert_abs_diff_eq!(*xi, *ti, epsilon = 1e-9);
        }
    }
}

#[test]
fn identity_system_solves_in_one_step() {
    let a = <Mat<f64> as DenseMatrix<f64>>::identity(3);
    let b = vec![3.0, -1.0, 2.0];
    for result in all_solvers(&a, &b, &vec![0.0; 3], 1e-8, 100) {
        assert!(result.converged);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.final_iterate, b);
    }
}

#[test]
fn cg_finishes_within_n_iterations() {
    for n in [2, 5, 10, 16] {
        let a = laplacian(n);
        let b: Vec<f64> = (0..n).map(|i| (i + 1) as f64).collect();
        let result = CgSolver::new(1e-10, 1000).solve(&a, &b, &vec![0.0; n]).unwrap();
        assert!(result.converged, "n = {n}");
        assert!(result.iterations <= n, "n = {n}: {} iterations", result.iterations);
    }
}

#[test]
fn cg_and_gd_residuals_do_not_increase() {
    let (a, b) = dd4();
    let x0 = vec![0.0; 4];
    let cg = CgSolver::new(1e-10, 100).solve(&a, &b, &x0).unwrap();
    let gd = GradientDescentSolver::new(1e-10, 1000).solve(&a, &b, &x0).unwrap();
    assert!(cg.converged && gd.converged);
    assert!(non_increasing(&cg.residual_history), "{:?}", cg.residual_history);
    assert!(non_increasing(&gd.residual_history), "{:?}", gd.residual_history);

    let spd2 = Mat::from_fn(2, 2, |i, j| [[4.0, 1.0], [1.0, 3.0]][i][j]);
    let b2 = vec![1.0, 2.0];
    let cg = CgSolver::new(1e-8, 100).solve(&spd2, &b2, &vec![0.0; 2]).unwrap();
    let gd = GradientDescentSolver::new(1e-8, 100).solve(&spd2, &b2, &vec![0.0; 2]).unwrap();
    assert!(non_increasing(&cg.residual_history));
    assert!(non_increasing(&gd.residual_history));
}

#[test]
fn iteration_cap_is_not_an_error() {
    let a = laplacian(30);
    let b = vec![1.0; 30];
    let result = JacobiSolver::new(1e-12, 5).solve(&a, &b, &vec![0.0; 30]).unwrap();
    assert!(!result.converged);
    assert_eq!(result.iterations, 5);
    assert_eq!(result.residual_history.len(), 6);
}

#[test]
fn caller_initial_guess_is_untouched() {
    let (a, b) = dd4();
    let x0 = vec![0.25; 4];
    let before = x0.clone();
    for result in all_solvers(&a, &b, &x0, 1e-10, 1000) {
        assert!(result.converged);
    }
    assert_eq!(x0, before);
}

#[test]
fn mismatched_rhs_is_rejected() {
    let a = laplacian(3);
    let err = CgSolver::new(1e-8, 10).solve(&a, &vec![1.0; 4], &vec![0.0; 3]).unwrap_err();
    assert!(matches!(err, SolveError::DimensionMismatch { expected: 3, found: 4, .. }));
    let err = JacobiSolver::new(1e-8, 10).solve(&a, &vec![1.0; 3], &vec![0.0; 2]).unwrap_err();
    assert!(matches!(err, SolveError::DimensionMismatch { expected: 3, found: 2, .. }));
}

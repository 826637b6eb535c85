//! matiter CLI tool.
//!
//! Loads an SPD matrix from a Matrix Market file and compares the four iterative
//! solvers on it.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use matiter::context::{ComparisonContext, ComparisonReport, SolverKind};
use matiter::core::traits::MatVec;
use matiter::io::{load_matrix, load_vector};
use matiter::utils::convergence::DEFAULT_MAX_ITERS;
use matiter::{SolveOptions, is_symmetric, parse_tolerance};

const SYMMETRY_EPS: f64 = 1e-12;

#[derive(Parser)]
#[command(name = "matiter")]
#[command(about = "Compare Jacobi, Gauss-Seidel, gradient descent and conjugate gradient on an SPD system")]
#[command(version)]
struct Cli {
    /// Matrix Market file holding the SPD matrix A
    matrix: PathBuf,

    /// Right-hand side b; defaults to A times the exact solution
    #[arg(long)]
    rhs: Option<PathBuf>,

    /// Exact solution, used to build b and to report errors; defaults to all ones
    #[arg(long)]
    solution: Option<PathBuf>,

    /// Initial guess; defaults to zeros
    #[arg(long)]
    x0: Option<PathBuf>,

    /// Relative residual tolerance (default 1e-8, floor 1e-14)
    #[arg(long)]
    tol: Option<String>,

    /// Iteration cap per solver
    #[arg(long, default_value_t = DEFAULT_MAX_ITERS)]
    max_iter: usize,

    /// Solver to run (repeatable): jacobi, gauss-seidel, gradient-descent, cg
    #[arg(long = "solver", value_name = "KIND")]
    solvers: Vec<SolverKind>,

    /// Run the solvers concurrently
    #[arg(long)]
    parallel: bool,

    /// Refuse matrices that are not symmetric
    #[arg(long)]
    check_symmetry: bool,

    /// Print the residual norm of every iteration
    #[arg(long)]
    history: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let a = load_matrix(&cli.matrix)
        .with_context(|| format!("failed to read matrix {}", cli.matrix.display()))?;
    let n = a.nrows();
    if a.ncols() != n {
        bail!("matrix must be square, got {}x{}", n, a.ncols());
    }
    if cli.check_symmetry && !is_symmetric(&a, SYMMETRY_EPS)? {
        bail!("matrix {} is not symmetric", cli.matrix.display());
    }

    let solution = cli
        .solution
        .as_ref()
        .map(|path| {
            load_vector(path).with_context(|| format!("failed to read solution {}", path.display()))
        })
        .transpose()?;
    let (b, exact) = match &cli.rhs {
        Some(path) => {
            let b = load_vector(path).with_context(|| format!("failed to read rhs {}", path.display()))?;
            (b, solution)
        }
        None => {
            let x = solution.unwrap_or_else(|| vec![1.0; n]);
            let mut b = vec![0.0; n];
            a.matvec(&x, &mut b).context("exact solution does not match the matrix")?;
            (b, Some(x))
        }
    };
    let x0 = match &cli.x0 {
        Some(path) => {
            load_vector(path).with_context(|| format!("failed to read x0 {}", path.display()))?
        }
        None => vec![0.0; n],
    };

    let tol = parse_tolerance(cli.tol.as_deref())?;
    let options = SolveOptions::new(tol)
        .with_max_iters(cli.max_iter)
        .with_parallel(cli.parallel);
    let mut kinds = if cli.solvers.is_empty() {
        SolverKind::ALL.to_vec()
    } else {
        cli.solvers.clone()
    };
    kinds.sort();
    kinds.dedup();

    println!("MatIter iterative solver engine v{}\n", env!("CARGO_PKG_VERSION"));
    println!(
        "Matrix {} ({n}x{n}), tol = {tol:e}, max iterations = {}\n",
        cli.matrix.display(),
        cli.max_iter
    );

    let report = ComparisonContext::new(options).with_kinds(kinds).run(&a, &b, &x0);
    print_report(&report, exact.as_deref(), cli.history);
    Ok(())
}

fn print_report(report: &ComparisonReport<f64>, exact: Option<&[f64]>, history: bool) {
    for (kind, run) in report.iter() {
        println!("{kind} Solver");
        match &run.outcome {
            Ok(result) => {
                println!("  Converged:\t{}", if result.converged { "yes" } else { "no" });
                println!("  Iterations:\t{}", result.iterations);
                println!("  Rel. residual:\t{:e}", result.relative_residual());
                if let Some(exact) = exact {
                    match result.relative_error(exact) {
                        Ok(err) => println!("  Rel. error:\t{err:e}"),
                        Err(e) => println!("  Rel. error:\tn/a ({e})"),
                    }
                }
                if history {
                    let norms: Vec<String> =
                        result.residual_history.iter().map(|r| format!("{r:.3e}")).collect();
                    println!("  Residuals:\t{}", norms.join(" "));
                }
            }
            Err(e) => println!("  Failed:\t{e}"),
        }
        println!("  Time elapsed:\t{}", format_duration(run.elapsed));
        println!();
    }
}

fn format_duration(d: Duration) -> String {
    format!("{:.6} s", d.as_secs_f64())
}

//! One-dimensional root finding for curve calibration.
//!
//! - [`BracketedNewtonSolver`]: Newton iteration safeguarded by bisection
//! - [`SolverConfig`]: Tolerances, iteration cap and derivative bump
//!
//! # Example
//!
//! ```
//! use pricer_core::math::solvers::{BracketedNewtonSolver, SolverConfig};
//! use pricer_core::types::SolverError;
//!
//! // Flat hazard h with exp(-5h) = 0.9
//! let solver = BracketedNewtonSolver::new(SolverConfig::default());
//! let sol = solver
//!     .find_root(|h: f64| Ok::<_, SolverError>((-5.0 * h).exp() - 0.9), 0.0, 1.0)
//!     .unwrap();
//! assert!((sol.root + 0.9_f64.ln() / 5.0).abs() < 1e-10);
//! ```

mod bracketed;
mod config;

pub use bracketed::{BracketedNewtonSolver, RootSolution};
pub use config::SolverConfig;

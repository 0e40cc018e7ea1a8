//! Numerical building blocks.
//!
//! - [`solvers`]: Bracketed one-dimensional root finding

pub mod solvers;

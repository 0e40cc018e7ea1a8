//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod bootstrap;
pub mod check;
pub mod index;

//! Check command implementation
//!
//! Validates the effective configuration and prints it.

use std::io::Write;

use tracing::info;

use crate::config::CliConfig;
use crate::Result;

/// Run the check command
pub fn run<W: Write>(config: &CliConfig, mut out: W) -> Result<()> {
    info!("Checking configuration...");
    config.validate()?;

    writeln!(out, "neutryx {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "effective configuration:")?;
    serde_json::to_writer_pretty(&mut out, config)?;
    writeln!(out)?;

    info!("Configuration OK");
    Ok(())
}

//! Neutryx CLI - Command Line Operations for Credit Calibration
//!
//! This is the operational entry point for the Neutryx credit library.
//!
//! # Commands
//!
//! - `neutryx bootstrap --market-data <file>` - Bootstrap constituent hazard rate curves
//! - `neutryx index --market-data <file> --coupons <bp,...>` - Adjust constituents to an index
//! - `neutryx check` - Validate and print the effective configuration
//!
//! # Configuration
//!
//! Settings are read from `neutryx.toml` (or `--config`), then `NEUTRYX_*`
//! environment variables, then command-line flags. `RUST_LOG` overrides the
//! configured log level.
//!
//! # Architecture
//!
//! As part of the **S**ervice layer in the A-I-P-S architecture, this crate
//! orchestrates the pricer crates to provide a command-line interface.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pricer_core::types::time::Date;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod market_data;
mod output;

pub use error::{CliError, Result};

use config::{build_config, CliOverrides};

/// Neutryx Credit Calibration CLI
#[derive(Parser)]
#[command(name = "neutryx")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Valuation date (YYYY-MM-DD)
    #[arg(short, long, global = true)]
    date: Option<String>,

    /// Flat continuously compounded discount rate
    #[arg(short, long, global = true)]
    rate: Option<f64>,

    /// Output format (table, json, csv)
    #[arg(short, long, global = true)]
    format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bootstrap hazard rate curves from constituent spreads
    Bootstrap {
        /// Path to constituent spread file (CSV)
        #[arg(short, long)]
        market_data: PathBuf,
    },

    /// Adjust constituent hazard rates to reprice index quotes
    Index {
        /// Path to constituent spread file (CSV)
        #[arg(short, long)]
        market_data: PathBuf,

        /// Index coupons in basis points, one per tenor (3Y,5Y,7Y,10Y)
        #[arg(long, value_delimiter = ',', required = true)]
        coupons: Vec<f64>,

        /// Index upfronts as a fraction of notional, one per tenor
        #[arg(long, value_delimiter = ',')]
        upfronts: Vec<f64>,
    },

    /// Check system configuration
    Check,
}

impl From<&Cli> for CliOverrides {
    fn from(cli: &Cli) -> Self {
        CliOverrides {
            config_file: cli.config.clone(),
            verbose: cli.verbose,
            valuation_date: cli.date.clone(),
            discount_rate: cli.rate,
            format: cli.format.clone(),
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&CliOverrides::from(&cli)).context("failed to load configuration")?;

    init_tracing(config.log_level.as_filter_str());
    debug!(?config, "effective configuration");

    let today = Date::from(chrono::Local::now().date_naive());
    let stdout = std::io::stdout();
    let out = stdout.lock();

    match cli.command {
        Commands::Bootstrap { market_data } => {
            commands::bootstrap::run(&config, &market_data, today, out)
                .with_context(|| format!("bootstrap failed for {}", market_data.display()))
        }
        Commands::Index {
            market_data,
            coupons,
            upfronts,
        } => commands::index::run(&config, &market_data, &coupons, &upfronts, today, out)
            .with_context(|| format!("index adjustment failed for {}", market_data.display())),
        Commands::Check => commands::check::run(&config, out).context("configuration check failed"),
    }
}

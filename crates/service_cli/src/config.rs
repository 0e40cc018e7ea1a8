//! CLI configuration management
//!
//! Handles loading configuration from TOML files, environment variables,
//! and command-line flags.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use pricer_core::types::time::Date;
use pricer_optimiser::credit::{CreditCurveConfig, IndexAdjustmentConfig};
use serde::{Deserialize, Serialize};

use crate::{CliError, Result};

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "neutryx.toml";

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(CliError::Config(format!(
                "invalid log level: {s}. Must be one of: trace, debug, info, warn, error"
            ))),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Report output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(CliError::Config(format!(
                "invalid output format: {s}. Must be one of: table, json, csv"
            ))),
        }
    }
}

/// Effective CLI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Log level used when `RUST_LOG` is not set
    pub log_level: LogLevel,
    /// Valuation date; today's CDS roll date when absent
    pub valuation_date: Option<Date>,
    /// Continuously compounded flat discount rate
    pub discount_rate: f64,
    /// Recovery rate assumed for the index protection leg
    pub index_recovery_rate: f64,
    /// Spread tolerance for the index adjustment
    pub tolerance: f64,
    /// Report format
    pub format: OutputFormat,
    /// Credit curve bootstrap settings
    pub credit: CreditCurveConfig,
    /// Index adjustment settings
    pub index: IndexAdjustmentConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            valuation_date: None,
            discount_rate: 0.02,
            index_recovery_rate: 0.4,
            tolerance: 1e-10,
            format: OutputFormat::Table,
            credit: CreditCurveConfig::default(),
            index: IndexAdjustmentConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CliError::Config(format!("failed to parse TOML: {e}")))
    }

    /// Override fields from `NEUTRYX_*` variables supplied by `var`.
    pub fn apply_env<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = var("NEUTRYX_LOG_LEVEL") {
            self.log_level = level.parse()?;
        }
        if let Some(date) = var("NEUTRYX_VALUATION_DATE") {
            self.valuation_date = Some(date.parse()?);
        }
        if let Some(rate) = var("NEUTRYX_DISCOUNT_RATE") {
            self.discount_rate = parse_number("NEUTRYX_DISCOUNT_RATE", &rate)?;
        }
        if let Some(recovery) = var("NEUTRYX_INDEX_RECOVERY") {
            self.index_recovery_rate = parse_number("NEUTRYX_INDEX_RECOVERY", &recovery)?;
        }
        if let Some(tolerance) = var("NEUTRYX_TOLERANCE") {
            self.tolerance = parse_number("NEUTRYX_TOLERANCE", &tolerance)?;
        }
        if let Some(format) = var("NEUTRYX_FORMAT") {
            self.format = format.parse()?;
        }
        Ok(())
    }

    /// Merge with command-line flags (flags take precedence)
    pub fn merge_with_cli(&mut self, cli: &CliOverrides) -> Result<()> {
        if cli.verbose {
            self.log_level = LogLevel::Debug;
        }
        if let Some(date) = &cli.valuation_date {
            self.valuation_date = Some(date.parse()?);
        }
        if let Some(rate) = cli.discount_rate {
            self.discount_rate = rate;
        }
        if let Some(format) = &cli.format {
            self.format = format.parse()?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.discount_rate.is_finite() {
            return Err(CliError::Config(format!(
                "discount rate must be finite, got {}",
                self.discount_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.index_recovery_rate) {
            return Err(CliError::Config(format!(
                "index recovery rate must lie in [0, 1], got {}",
                self.index_recovery_rate
            )));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(CliError::Config(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        self.credit.validate()?;
        self.index.validate()?;
        Ok(())
    }

    /// Valuation date, defaulting to the latest CDS roll date on or
    /// before `today`.
    pub fn valuation_date_or(&self, today: Date) -> Result<Date> {
        match self.valuation_date {
            Some(date) => Ok(date),
            None => Ok(today.previous_cds_date()?),
        }
    }
}

fn parse_number(name: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("{name} is not a number: {value}")))
}

/// Configuration overrides taken from command-line flags
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Force debug logging
    pub verbose: bool,
    /// Valuation date override (YYYY-MM-DD)
    pub valuation_date: Option<String>,
    /// Discount rate override
    pub discount_rate: Option<f64>,
    /// Output format override
    pub format: Option<String>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. Command-line flags
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliOverrides) -> Result<CliConfig> {
    build_config_with(cli, |key| std::env::var(key).ok())
}

/// Build configuration with an explicit environment lookup.
pub fn build_config_with<F>(cli: &CliOverrides, var: F) -> Result<CliConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config_file {
        Some(path) if path.exists() => CliConfig::from_file(path)?,
        Some(path) => return Err(CliError::FileNotFound(path.display().to_string())),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                CliConfig::from_file(default)?
            } else {
                CliConfig::default()
            }
        }
    };

    config.apply_env(var)?;
    config.merge_with_cli(cli)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.valuation_date, None);
        assert_eq!(config.discount_rate, 0.02);
        assert_eq!(config.index_recovery_rate, 0.4);
        assert_eq!(config.format, OutputFormat::Table);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Warn").unwrap(), LogLevel::Warn);
        assert!(LogLevel::from_str("loud").is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config = CliConfig::from_toml(
            r#"
            valuation_date = "2018-12-20"
            discount_rate = 0.03
            format = "json"

            [credit]
            hazard_floor = -0.25
            "#,
        )
        .unwrap();

        assert_eq!(config.valuation_date, Some(Date::from_ymd(2018, 12, 20).unwrap()));
        assert_eq!(config.discount_rate, 0.03);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.credit.hazard_floor, -0.25);
        // Unset fields keep their defaults
        assert_eq!(config.credit.max_hazard_rate, 16.0);
        assert_eq!(config.index_recovery_rate, 0.4);
    }

    #[test]
    fn test_bad_toml() {
        let err = CliConfig::from_toml("discount_rate = \"high\"").unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CliConfig::default();
        config
            .apply_env(env(&[
                ("NEUTRYX_DISCOUNT_RATE", "0.05"),
                ("NEUTRYX_FORMAT", "csv"),
                ("NEUTRYX_VALUATION_DATE", "2020-03-20"),
            ]))
            .unwrap();

        assert_eq!(config.discount_rate, 0.05);
        assert_eq!(config.format, OutputFormat::Csv);
        assert_eq!(config.valuation_date, Some(Date::from_ymd(2020, 3, 20).unwrap()));
    }

    #[test]
    fn test_env_rejects_garbage() {
        let mut config = CliConfig::default();
        assert!(config.apply_env(env(&[("NEUTRYX_TOLERANCE", "tiny")])).is_err());
    }

    #[test]
    fn test_precedence() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "discount_rate = 0.01\nindex_recovery_rate = 0.3\nformat = \"json\"").unwrap();

        let cli = CliOverrides {
            config_file: Some(file.path().to_path_buf()),
            discount_rate: Some(0.04),
            verbose: true,
            ..Default::default()
        };
        let config = build_config_with(
            &cli,
            env(&[("NEUTRYX_DISCOUNT_RATE", "0.03"), ("NEUTRYX_FORMAT", "csv")]),
        )
        .unwrap();

        // Flag beats env beats file
        assert_eq!(config.discount_rate, 0.04);
        assert_eq!(config.format, OutputFormat::Csv);
        assert_eq!(config.index_recovery_rate, 0.3);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_missing_explicit_file() {
        let cli = CliOverrides {
            config_file: Some(PathBuf::from("/nonexistent/neutryx.toml")),
            ..Default::default()
        };
        let err = build_config_with(&cli, env(&[])).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_validate_recovery() {
        let config = CliConfig {
            index_recovery_rate: 1.2,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_valuation_date_is_roll_date() {
        let config = CliConfig::default();
        let today = Date::from_ymd(2019, 2, 11).unwrap();
        assert_eq!(
            config.valuation_date_or(today).unwrap(),
            Date::from_ymd(2018, 12, 20).unwrap()
        );
    }
}

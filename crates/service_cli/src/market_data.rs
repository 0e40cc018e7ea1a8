//! Constituent spread file loading.
//!
//! One row per reference entity:
//!
//! ```text
//! ticker,3Y,5Y,7Y,10Y,recovery
//! AAA,45.0,60.5,72.0,85.25,0.4
//! ```
//!
//! Spreads are quoted in basis points; the recovery rate is a fraction.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use pricer_core::types::time::Date;
use pricer_models::instruments::credit::CreditDefaultSwap;
use pricer_optimiser::credit::EntityQuotes;
use serde::Deserialize;
use tracing::debug;

use crate::{CliError, Result};

/// Quote tenors in years, in column order.
pub const TENOR_YEARS: [i32; 4] = [3, 5, 7, 10];

const BASIS_POINT: f64 = 1e-4;

#[derive(Debug, Deserialize)]
struct QuoteRecord {
    ticker: String,
    #[serde(rename = "3Y")]
    y3: f64,
    #[serde(rename = "5Y")]
    y5: f64,
    #[serde(rename = "7Y")]
    y7: f64,
    #[serde(rename = "10Y")]
    y10: f64,
    recovery: f64,
}

/// Par spread quotes for one index constituent.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstituentQuote {
    /// Entity identifier
    pub ticker: String,
    /// Spreads in basis points, one per [`TENOR_YEARS`] entry
    pub spreads_bp: [f64; 4],
    /// Recovery rate
    pub recovery_rate: f64,
}

impl ConstituentQuote {
    /// Standard maturities for a contract traded on `valuation_date`.
    pub fn maturities(valuation_date: Date) -> Result<Vec<Date>> {
        TENOR_YEARS
            .iter()
            .map(|&y| Ok(valuation_date.next_cds_date(12 * y)?))
            .collect()
    }

    /// Calibration contracts stepping in on `valuation_date`.
    pub fn contracts(&self, valuation_date: Date) -> Result<Vec<CreditDefaultSwap>> {
        Self::maturities(valuation_date)?
            .into_iter()
            .zip(self.spreads_bp)
            .map(|(maturity, bp)| {
                CreditDefaultSwap::new(valuation_date, maturity, bp * BASIS_POINT, 1.0)
                    .map_err(|e| CliError::Credit(e.into()))
            })
            .collect()
    }

    /// Convert into bootstrap inputs.
    pub fn to_entity(&self, valuation_date: Date) -> Result<EntityQuotes> {
        Ok(EntityQuotes {
            name: self.ticker.clone(),
            contracts: self.contracts(valuation_date)?,
            recovery_rate: self.recovery_rate,
        })
    }
}

/// Load constituent quotes from a CSV file.
pub fn load_quotes(path: &Path) -> Result<Vec<ConstituentQuote>> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    let file = std::fs::File::open(path)?;
    let quotes = parse_quotes(file)?;
    debug!(path = %path.display(), count = quotes.len(), "loaded constituent quotes");
    Ok(quotes)
}

/// Parse constituent quotes from CSV text.
///
/// Row numbers in errors count data rows from 1.
pub fn parse_quotes<R: Read>(reader: R) -> Result<Vec<ConstituentQuote>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut seen = HashSet::new();
    let mut quotes = Vec::new();

    for (idx, result) in reader.deserialize::<QuoteRecord>().enumerate() {
        let row = idx + 1;
        let record = result.map_err(|e| CliError::market_data(row, e.to_string()))?;

        if record.ticker.is_empty() {
            return Err(CliError::market_data(row, "empty ticker"));
        }
        if !seen.insert(record.ticker.clone()) {
            return Err(CliError::market_data(
                row,
                format!("duplicate ticker {}", record.ticker),
            ));
        }

        let spreads_bp = [record.y3, record.y5, record.y7, record.y10];
        if let Some((&bp, years)) = spreads_bp
            .iter()
            .zip(TENOR_YEARS)
            .find(|(bp, _)| !(bp.is_finite() && **bp > 0.0))
        {
            return Err(CliError::market_data(
                row,
                format!("{years}Y spread must be positive, got {bp}"),
            ));
        }
        if !(0.0..1.0).contains(&record.recovery) {
            return Err(CliError::market_data(
                row,
                format!("recovery must lie in [0, 1), got {}", record.recovery),
            ));
        }

        quotes.push(ConstituentQuote {
            ticker: record.ticker,
            spreads_bp,
            recovery_rate: record.recovery,
        });
    }

    if quotes.is_empty() {
        return Err(CliError::market_data(0, "no constituent rows"));
    }
    Ok(quotes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
ticker,3Y,5Y,7Y,10Y,recovery
AAA, 45.0, 60.5, 72.0, 85.25, 0.4
BBB, 120, 150, 170, 185, 0.35
";

    #[test]
    fn test_parse_sample() {
        let quotes = parse_quotes(SAMPLE.as_bytes()).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].ticker, "AAA");
        assert_eq!(quotes[0].spreads_bp, [45.0, 60.5, 72.0, 85.25]);
        assert_eq!(quotes[1].recovery_rate, 0.35);
    }

    #[test]
    fn test_bad_number_reports_row() {
        let text = "ticker,3Y,5Y,7Y,10Y,recovery\nAAA,45,60,72,85,0.4\nBBB,120,abc,170,185,0.4\n";
        let err = parse_quotes(text.as_bytes()).unwrap_err();
        assert!(matches!(err, CliError::MarketData { row: 2, .. }), "{err}");
    }

    #[test]
    fn test_missing_column() {
        let text = "ticker,3Y,5Y,7Y,recovery\nAAA,45,60,72,0.4\n";
        let err = parse_quotes(text.as_bytes()).unwrap_err();
        assert!(matches!(err, CliError::MarketData { row: 1, .. }));
    }

    #[test]
    fn test_rejects_non_positive_spread() {
        let text = "ticker,3Y,5Y,7Y,10Y,recovery\nAAA,45,0,72,85,0.4\n";
        let err = parse_quotes(text.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("5Y"));
    }

    #[test]
    fn test_rejects_bad_recovery() {
        let text = "ticker,3Y,5Y,7Y,10Y,recovery\nAAA,45,60,72,85,1.0\n";
        assert!(parse_quotes(text.as_bytes()).is_err());
    }

    #[test]
    fn test_rejects_duplicate_ticker() {
        let text = "ticker,3Y,5Y,7Y,10Y,recovery\nAAA,45,60,72,85,0.4\nAAA,46,61,73,86,0.4\n";
        let err = parse_quotes(text.as_bytes()).unwrap_err();
        assert!(matches!(err, CliError::MarketData { row: 2, .. }));
    }

    #[test]
    fn test_rejects_empty_file() {
        let err = parse_quotes("ticker,3Y,5Y,7Y,10Y,recovery\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CliError::MarketData { row: 0, .. }));
    }

    #[test]
    fn test_contracts_use_standard_maturities() {
        let quotes = parse_quotes(SAMPLE.as_bytes()).unwrap();
        let valuation = Date::from_ymd(2018, 12, 20).unwrap();
        let contracts = quotes[0].contracts(valuation).unwrap();

        assert_eq!(contracts.len(), 4);
        assert_eq!(contracts[0].maturity(), Date::from_ymd(2022, 3, 20).unwrap());
        assert_eq!(contracts[3].maturity(), Date::from_ymd(2029, 3, 20).unwrap());
        approx::assert_relative_eq!(contracts[1].coupon(), 0.00605, epsilon = 1e-15);
    }

    #[test]
    fn test_missing_file() {
        let err = load_quotes(Path::new("/nonexistent/quotes.csv")).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }
}

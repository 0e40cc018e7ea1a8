//! Bootstrap command implementation
//!
//! Builds one hazard rate curve per constituent in a spread file.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use pricer_core::market_data::curves::FlatCurve;
use pricer_core::types::time::Date;
use pricer_optimiser::credit::{bootstrap_curves, CreditCurve};
use serde::Serialize;
use tracing::info;

use crate::config::CliConfig;
use crate::market_data::{load_quotes, ConstituentQuote, TENOR_YEARS};
use crate::output::{write_records, TableRow};
use crate::Result;

/// Bootstrapped constituent curves, in file order.
pub(crate) struct ConstituentCurves {
    pub quotes: Vec<ConstituentQuote>,
    pub curves: Vec<CreditCurve<FlatCurve<f64>>>,
}

/// Load a spread file and bootstrap every constituent.
pub(crate) fn build_curves(
    config: &CliConfig,
    market_data: &Path,
    valuation_date: Date,
) -> Result<ConstituentCurves> {
    let quotes = load_quotes(market_data)?;
    let entities = quotes
        .iter()
        .map(|q| q.to_entity(valuation_date))
        .collect::<Result<Vec<_>>>()?;

    let discount = Arc::new(FlatCurve::new(config.discount_rate));
    let curves = bootstrap_curves(valuation_date, &entities, discount, &config.credit)?;
    info!(
        constituents = curves.len(),
        valuation_date = %valuation_date,
        "bootstrapped constituent curves"
    );
    Ok(ConstituentCurves { quotes, curves })
}

/// One knot of a bootstrapped curve.
#[derive(Debug, Clone, Serialize)]
pub struct CurveRow {
    pub ticker: String,
    pub tenor: String,
    pub maturity: String,
    pub time: f64,
    pub spread_bp: f64,
    pub hazard_rate: f64,
    pub survival: f64,
}

impl TableRow for CurveRow {
    fn header() -> String {
        format!(
            "{:<10} {:>5} {:>12} {:>8} {:>10} {:>12} {:>10}",
            "ticker", "tenor", "maturity", "time", "spread_bp", "hazard", "survival"
        )
    }

    fn row(&self) -> String {
        format!(
            "{:<10} {:>5} {:>12} {:>8.4} {:>10.2} {:>12.6} {:>10.6}",
            self.ticker,
            self.tenor,
            self.maturity,
            self.time,
            self.spread_bp,
            self.hazard_rate,
            self.survival
        )
    }
}

/// Run the bootstrap command
pub fn run<W: Write>(config: &CliConfig, market_data: &Path, today: Date, out: W) -> Result<()> {
    let valuation_date = config.valuation_date_or(today)?;
    info!("Starting credit curve bootstrap...");
    info!("  Market data: {}", market_data.display());
    info!("  Valuation date: {}", valuation_date);

    let ConstituentCurves { quotes, curves } = build_curves(config, market_data, valuation_date)?;
    let maturities = ConstituentQuote::maturities(valuation_date)?;

    let mut rows = Vec::with_capacity(curves.len() * TENOR_YEARS.len());
    for (quote, curve) in quotes.iter().zip(&curves) {
        for (k, &years) in TENOR_YEARS.iter().enumerate() {
            rows.push(CurveRow {
                ticker: quote.ticker.clone(),
                tenor: format!("{years}Y"),
                maturity: maturities[k].to_string(),
                time: curve.times()[k],
                spread_bp: quote.spreads_bp[k],
                hazard_rate: curve.hazard_rates()[k],
                survival: curve.values()[k],
            });
        }
    }

    write_records(out, config.format, &rows)?;
    info!("Bootstrap complete");
    Ok(())
}

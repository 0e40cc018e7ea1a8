//! Index command implementation
//!
//! Bootstraps the constituents of a CDS index and scales their hazard
//! rates until the basket reprices the quoted index coupons.

use std::io::Write;
use std::path::Path;

use pricer_core::types::time::Date;
use pricer_optimiser::credit::CreditIndexPortfolio;
use serde::Serialize;
use tracing::{info, warn};

use super::bootstrap::{build_curves, ConstituentCurves};
use crate::config::CliConfig;
use crate::market_data::{ConstituentQuote, TENOR_YEARS};
use crate::output::{to_bp, write_records, TableRow};
use crate::{CliError, Result};

/// Index calibration result at one tenor.
#[derive(Debug, Clone, Serialize)]
pub struct TenorRow {
    pub tenor: String,
    pub maturity: String,
    pub coupon_bp: f64,
    pub upfront: f64,
    pub average_bp: f64,
    pub intrinsic_bp: f64,
    pub adjusted_bp: f64,
    pub factor: f64,
    pub iterations: usize,
}

impl TableRow for TenorRow {
    fn header() -> String {
        format!(
            "{:>5} {:>12} {:>10} {:>9} {:>11} {:>13} {:>12} {:>10} {:>6}",
            "tenor",
            "maturity",
            "coupon_bp",
            "upfront",
            "average_bp",
            "intrinsic_bp",
            "adjusted_bp",
            "factor",
            "iters"
        )
    }

    fn row(&self) -> String {
        format!(
            "{:>5} {:>12} {:>10.2} {:>9.5} {:>11.2} {:>13.2} {:>12.2} {:>10.6} {:>6}",
            self.tenor,
            self.maturity,
            self.coupon_bp,
            self.upfront,
            self.average_bp,
            self.intrinsic_bp,
            self.adjusted_bp,
            self.factor,
            self.iterations
        )
    }
}

/// Run the index command
///
/// `coupons_bp` holds one index coupon per quote tenor in basis points;
/// `upfronts` is empty or holds one upfront per tenor as a fraction of
/// notional.
pub fn run<W: Write>(
    config: &CliConfig,
    market_data: &Path,
    coupons_bp: &[f64],
    upfronts: &[f64],
    today: Date,
    out: W,
) -> Result<()> {
    if coupons_bp.len() != TENOR_YEARS.len() {
        return Err(CliError::InvalidArgument(format!(
            "expected {} index coupons ({:?} years), got {}",
            TENOR_YEARS.len(),
            TENOR_YEARS,
            coupons_bp.len()
        )));
    }
    let upfronts = if upfronts.is_empty() {
        vec![0.0; coupons_bp.len()]
    } else {
        upfronts.to_vec()
    };

    let valuation_date = config.valuation_date_or(today)?;
    info!("Starting index hazard rate adjustment...");
    info!("  Market data: {}", market_data.display());
    info!("  Valuation date: {}", valuation_date);

    let ConstituentCurves { curves, .. } = build_curves(config, market_data, valuation_date)?;
    let maturities = ConstituentQuote::maturities(valuation_date)?;
    let coupons: Vec<f64> = coupons_bp.iter().map(|bp| bp * 1e-4).collect();

    let portfolio = CreditIndexPortfolio::new(config.index);
    let result = portfolio.hazard_rate_adjust_intrinsic_with_factors(
        valuation_date,
        &curves,
        &coupons,
        &upfronts,
        &maturities,
        config.index_recovery_rate,
        config.tolerance,
    )?;

    let mut rows = Vec::with_capacity(maturities.len());
    for (k, &maturity) in maturities.iter().enumerate() {
        let average = portfolio.average_spread(valuation_date, valuation_date, maturity, &curves)?;
        let intrinsic =
            portfolio.intrinsic_spread(valuation_date, valuation_date, maturity, &curves)?;
        let adjusted =
            portfolio.intrinsic_spread(valuation_date, valuation_date, maturity, &result.curves)?;

        if (result.factors[k] - 1.0).abs() > 0.5 {
            warn!(
                tenor = TENOR_YEARS[k],
                factor = result.factors[k],
                "large index hazard rate adjustment"
            );
        }

        rows.push(TenorRow {
            tenor: format!("{}Y", TENOR_YEARS[k]),
            maturity: maturity.to_string(),
            coupon_bp: coupons_bp[k],
            upfront: upfronts[k],
            average_bp: to_bp(average),
            intrinsic_bp: to_bp(intrinsic),
            adjusted_bp: to_bp(adjusted),
            factor: result.factors[k],
            iterations: result.iterations[k],
        });
    }

    write_records(out, config.format, &rows)?;
    info!("Index adjustment complete");
    Ok(())
}

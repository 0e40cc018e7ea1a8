//! Credit derivative instruments.
//!
//! - [`CreditDefaultSwap`]: single-name CDS with standard conventions
//! - [`CdsPricer`]: protection and premium leg valuation against a
//!   discount curve and a survival curve
//!
//! # Examples
//!
//! ```
//! use pricer_models::instruments::credit::{CdsPricer, CreditDefaultSwap};
//! use pricer_core::market_data::curves::{FlatCurve, FlatHazardRateCurve};
//! use pricer_core::types::time::Date;
//!
//! let valuation = Date::from_ymd(2024, 3, 20).unwrap();
//! let cds = CreditDefaultSwap::new(valuation, Date::from_ymd(2029, 3, 20).unwrap(), 0.01, 1e7).unwrap();
//!
//! let discount = FlatCurve::new(0.03);
//! let survival = FlatHazardRateCurve::new(0.01);
//!
//! let result = CdsPricer::new(&discount, &survival, valuation).price(&cds, 0.4).unwrap();
//! assert!(result.risky_pv01 > 4.0);
//! ```

mod cds;
mod error;
mod pricing;

pub use cds::{CdsBuilder, CdsDirection, CreditDefaultSwap};
pub use error::CdsError;
pub use pricing::{
    CdsPriceResult, CdsPricer, CdsPricingConfig, CdsPricingSource, ProtectionIntegration,
};

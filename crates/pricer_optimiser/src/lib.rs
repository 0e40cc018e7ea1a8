//! # pricer_optimiser
//!
//! Calibration and bootstrapping for Neutryx.
//!
//! This crate sits between Models (L2) and the service layer in the
//! architecture, solving inverse problems to construct valid market objects.
//!
//! ## Architecture Position
//!
//! Layer 2.5 in the **P**ricer layer of the A-I-P-S architecture.
//! Depends on `pricer_core` (L1) and `pricer_models` (L2).
//!
//! ## Modules
//!
//! - `credit`: Hazard rate curve stripping from CDS quotes and
//!   CDS index hazard rate adjustment
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use pricer_core::market_data::curves::FlatCurve;
//! use pricer_core::types::time::Date;
//! use pricer_models::instruments::credit::CreditDefaultSwap;
//! use pricer_optimiser::prelude::*;
//!
//! let valuation = Date::from_ymd(2018, 12, 20).unwrap();
//! let contracts: Vec<_> = [0.006, 0.008]
//!     .iter()
//!     .zip([3, 5])
//!     .map(|(&spread, years)| {
//!         let maturity = valuation.add_months(12 * years).unwrap();
//!         CreditDefaultSwap::new(valuation, maturity, spread, 1.0).unwrap()
//!     })
//!     .collect();
//!
//! let curve = CreditCurve::bootstrap(
//!     valuation,
//!     &contracts,
//!     0.4,
//!     Arc::new(FlatCurve::new(0.02)),
//!     &CreditCurveConfig::default(),
//! )
//! .unwrap();
//! assert_eq!(curve.times().len(), 2);
//! ```

pub mod credit;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::credit::*;
}

//! Credit curve bootstrapping and CDS index calibration.
//!
//! This module builds piecewise-flat hazard rate curves from CDS quotes and
//! adjusts baskets of such curves so they reprice a quoted index.
//!
//! ## Architecture
//!
//! The credit module provides:
//! - `CreditCurve<D>`: Survival curve over a shared discount curve
//! - `CachedCreditBootstrapper<D>`: Bootstrapper memoising identical inputs
//! - `CreditIndexPortfolio`: Basket spreads and hazard rate adjustment
//! - `CreditError`: Failures with a coarse `CreditErrorKind`
//!
//! ## Parallelism
//!
//! With the `parallel` feature, independent curves are bootstrapped and
//! constituent legs are priced on the rayon pool. Sums are always taken
//! in input order, so results do not depend on the feature.

mod cache;
mod config;
mod curve;
mod error;
mod index;

pub use cache::CachedCreditBootstrapper;
pub use config::{CreditCurveConfig, CreditCurveConfigBuilder, IndexAdjustmentConfig};
pub use curve::{bootstrap_curves, CreditBootstrapResult, CreditCurve, EntityQuotes};
pub use error::{CreditError, CreditErrorKind};
pub use index::{CreditIndexPortfolio, IndexAdjustmentResult};

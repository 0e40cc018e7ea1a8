//! Market data structures: discount curves and survival curves.
//!
//! Curves are generic over `T: Float` where the functional form allows it.
//! Every pricing routine consumes them only through the [`YieldCurve`] and
//! [`SurvivalCurve`] traits.
//!
//! # Example
//!
//! ```
//! use pricer_core::market_data::curves::{FlatCurve, FlatHazardRateCurve, SurvivalCurve, YieldCurve};
//!
//! let discount = FlatCurve::new(0.05_f64);
//! let df = discount.discount_factor(1.0).unwrap();
//! assert!((df - 0.951229).abs() < 1e-5);
//!
//! let credit = FlatHazardRateCurve::new(0.02_f64);
//! assert!(credit.survival_probability(1.0).unwrap() < 1.0);
//! ```

pub mod curves;
pub mod error;

// Re-export commonly used types
pub use curves::{
    CurveFitMethod, CurveInterpolation, FittedCurve, FlatCurve, FlatHazardRateCurve,
    InterpolatedCurve, SurvivalCurve, YieldCurve,
};
pub use error::MarketDataError;

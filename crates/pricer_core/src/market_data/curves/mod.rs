//! Curve abstractions for discounting and credit risk calculations.
//!
//! This module provides:
//! - [`YieldCurve`]: Discount factor boundary trait
//! - [`FlatCurve`]: Constant rate yield curve
//! - [`InterpolatedCurve`]: Pillar-based interpolated yield curve
//! - [`CurveFitMethod`] and [`FittedCurve`]: Parametric yield curve fits
//! - [`SurvivalCurve`]: Survival probability boundary trait
//! - [`FlatHazardRateCurve`]: Constant hazard rate survival curve

mod curve_fit;
mod flat;
mod interpolated;
mod survival;
mod traits;

pub use curve_fit::{
    BSplineFit, CurveFitMethod, FittedCurve, NelsonSiegelFit, PolynomialFit, SvenssonFit,
};
pub use flat::FlatCurve;
pub use interpolated::{CurveInterpolation, InterpolatedCurve};
pub use survival::{FlatHazardRateCurve, SurvivalCurve};
pub use traits::YieldCurve;

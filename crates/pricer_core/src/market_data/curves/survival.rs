//! Survival curve abstractions for credit risk calculations.
//!
//! This module provides:
//! - [`SurvivalCurve`]: Boundary trait for survival probability and hazard rate queries
//! - [`FlatHazardRateCurve`]: Constant hazard rate implementation

use crate::market_data::error::MarketDataError;
use num_traits::Float;
use std::sync::Arc;

/// Survival term structure of a single reference entity.
///
/// # Contract
///
/// - `survival_probability(t)` returns Q(t) = P(τ > t)
/// - `hazard_rate(t)` returns the instantaneous hazard λ(t)
/// - Q(t) = 1 for every t <= 0
///
/// Hazard rates may be negative (a bootstrap may produce them on inverted
/// spread curves), so Q is not guaranteed to be monotone.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{SurvivalCurve, FlatHazardRateCurve};
///
/// let curve = FlatHazardRateCurve::new(0.01_f64);
///
/// let q = curve.survival_probability(5.0).unwrap();
/// assert!((q - (-0.05_f64).exp()).abs() < 1e-12);
/// assert_eq!(curve.survival_probability(-1.0).unwrap(), 1.0);
/// ```
pub trait SurvivalCurve<T: Float> {
    /// Return the survival probability Q(t).
    fn survival_probability(&self, t: T) -> Result<T, MarketDataError>;

    /// Return the hazard rate applying at time `t`.
    fn hazard_rate(&self, t: T) -> Result<T, MarketDataError>;

    /// Return the default probability 1 - Q(t).
    fn default_probability(&self, t: T) -> Result<T, MarketDataError> {
        Ok(T::one() - self.survival_probability(t)?)
    }

    /// Return Q(t2) / Q(t1), the probability of surviving to `t2` given
    /// survival to `t1`.
    fn forward_survival_probability(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        if t2 < t1 {
            return Err(MarketDataError::InvalidMaturity {
                t: (t2 - t1).to_f64().unwrap_or(0.0),
            });
        }
        let q1 = self.survival_probability(t1)?;
        let q2 = self.survival_probability(t2)?;
        Ok(q2 / q1)
    }

    /// Return survival probabilities for a slice of times.
    fn survival_probabilities(&self, ts: &[T]) -> Result<Vec<T>, MarketDataError> {
        ts.iter().map(|&t| self.survival_probability(t)).collect()
    }

    /// Times at which the hazard rate may jump, in increasing order.
    ///
    /// Integrators split their grids here. Curves with a continuous hazard
    /// return an empty slice.
    fn knot_times(&self) -> &[T] {
        &[]
    }
}

impl<T: Float, C: SurvivalCurve<T> + ?Sized> SurvivalCurve<T> for &C {
    #[inline]
    fn survival_probability(&self, t: T) -> Result<T, MarketDataError> {
        (**self).survival_probability(t)
    }

    #[inline]
    fn hazard_rate(&self, t: T) -> Result<T, MarketDataError> {
        (**self).hazard_rate(t)
    }

    #[inline]
    fn knot_times(&self) -> &[T] {
        (**self).knot_times()
    }
}

impl<T: Float, C: SurvivalCurve<T> + ?Sized> SurvivalCurve<T> for Arc<C> {
    #[inline]
    fn survival_probability(&self, t: T) -> Result<T, MarketDataError> {
        (**self).survival_probability(t)
    }

    #[inline]
    fn hazard_rate(&self, t: T) -> Result<T, MarketDataError> {
        (**self).hazard_rate(t)
    }

    #[inline]
    fn knot_times(&self) -> &[T] {
        (**self).knot_times()
    }
}

/// A flat (constant) hazard rate curve.
///
/// ```text
/// Q(t) = exp(-λ max(t, 0))
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlatHazardRateCurve<T: Float> {
    hazard_rate: T,
}

impl<T: Float> FlatHazardRateCurve<T> {
    /// Construct a flat hazard rate curve.
    #[inline]
    pub fn new(hazard_rate: T) -> Self {
        Self { hazard_rate }
    }

    /// Approximate flat hazard implied by a par spread and recovery,
    /// λ ≈ s / (1 - R).
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when `recovery >= 1`.
    ///
    /// ```
    /// use pricer_core::market_data::curves::FlatHazardRateCurve;
    ///
    /// let curve = FlatHazardRateCurve::from_spread(0.012_f64, 0.4).unwrap();
    /// assert!((curve.rate() - 0.02).abs() < 1e-15);
    /// ```
    pub fn from_spread(spread: T, recovery: T) -> Result<Self, MarketDataError> {
        let lgd = T::one() - recovery;
        if lgd <= T::zero() {
            return Err(MarketDataError::InvalidParameter {
                name: "recovery",
                reason: format!("must be below 1, got {}", recovery.to_f64().unwrap_or(1.0)),
            });
        }
        Ok(Self::new(spread / lgd))
    }

    /// Return the constant hazard rate.
    #[inline]
    pub fn rate(&self) -> T {
        self.hazard_rate
    }
}

impl<T: Float> SurvivalCurve<T> for FlatHazardRateCurve<T> {
    fn survival_probability(&self, t: T) -> Result<T, MarketDataError> {
        if t <= T::zero() {
            return Ok(T::one());
        }
        Ok((-self.hazard_rate * t).exp())
    }

    fn hazard_rate(&self, _t: T) -> Result<T, MarketDataError> {
        Ok(self.hazard_rate)
    }
}

//! Discount curve trait definition.

use crate::market_data::error::MarketDataError;
use num_traits::Float;
use std::sync::Arc;

/// Discount curve boundary used by every pricing routine.
///
/// Generic over `T: Float` so the same curve can be queried in `f64` or
/// `f32`. Times are year fractions from the curve's valuation date under
/// whatever time basis the caller uses consistently.
///
/// # Invariants
///
/// - D(0) = 1
/// - D(t) > 0 for all t >= 0
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{YieldCurve, FlatCurve};
///
/// let curve = FlatCurve::new(0.05_f64);
///
/// let df = curve.discount_factor(1.0).unwrap();
/// assert!((df - 0.951229).abs() < 1e-5);
///
/// let rate = curve.zero_rate(1.0).unwrap();
/// assert!((rate - 0.05).abs() < 1e-10);
///
/// let fwd = curve.forward_rate(1.0, 2.0).unwrap();
/// assert!((fwd - 0.05).abs() < 1e-10);
/// ```
pub trait YieldCurve<T: Float> {
    /// Return the discount factor for maturity `t`.
    ///
    /// # Errors
    ///
    /// `MarketDataError::InvalidMaturity` if `t < 0`.
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError>;

    /// Return the continuously compounded zero rate for maturity `t`.
    ///
    /// ```text
    /// r(t) = -ln(D(t)) / t
    /// ```
    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        if t <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        let df = self.discount_factor(t)?;
        Ok(-df.ln() / t)
    }

    /// Return the continuously compounded forward rate between `t1` and `t2`.
    ///
    /// ```text
    /// f(t1, t2) = -ln(D(t2) / D(t1)) / (t2 - t1)
    /// ```
    fn forward_rate(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        let dt = t2 - t1;
        if dt <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: dt.to_f64().unwrap_or(0.0),
            });
        }
        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;
        Ok(-(df2 / df1).ln() / dt)
    }

    /// Return discount factors for a slice of maturities.
    ///
    /// Fails on the first invalid maturity.
    fn discount_factors(&self, ts: &[T]) -> Result<Vec<T>, MarketDataError> {
        ts.iter().map(|&t| self.discount_factor(t)).collect()
    }
}

impl<T: Float, C: YieldCurve<T> + ?Sized> YieldCurve<T> for &C {
    #[inline]
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        (**self).discount_factor(t)
    }
}

impl<T: Float, C: YieldCurve<T> + ?Sized> YieldCurve<T> for Arc<C> {
    #[inline]
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        (**self).discount_factor(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Piecewise-flat forward curve exercising the default methods
    struct StepCurve;

    impl YieldCurve<f64> for StepCurve {
        fn discount_factor(&self, t: f64) -> Result<f64, MarketDataError> {
            if t < 0.0 {
                return Err(MarketDataError::InvalidMaturity { t });
            }
            let integral = if t <= 1.0 { 0.02 * t } else { 0.02 + 0.04 * (t - 1.0) };
            Ok((-integral).exp())
        }
    }

    #[test]
    fn test_default_zero_rate() {
        assert_relative_eq!(StepCurve.zero_rate(2.0).unwrap(), 0.03, epsilon = 1e-12);
        assert!(matches!(
            StepCurve.zero_rate(0.0),
            Err(MarketDataError::InvalidMaturity { .. })
        ));
    }

    #[test]
    fn test_default_forward_rate() {
        assert_relative_eq!(StepCurve.forward_rate(1.0, 3.0).unwrap(), 0.04, epsilon = 1e-12);
        assert!(StepCurve.forward_rate(2.0, 2.0).is_err());
    }

    #[test]
    fn test_discount_factors_vectorised() {
        let dfs = StepCurve.discount_factors(&[0.0, 1.0, 2.0]).unwrap();
        assert_eq!(dfs.len(), 3);
        assert_relative_eq!(dfs[0], 1.0);
        assert_relative_eq!(dfs[2], (-0.06_f64).exp(), epsilon = 1e-14);
        assert!(StepCurve.discount_factors(&[1.0, -1.0]).is_err());
    }

    #[test]
    fn test_shared_curve_delegates() {
        let shared: Arc<StepCurve> = Arc::new(StepCurve);
        let by_ref = &StepCurve;
        assert_eq!(
            shared.discount_factor(1.5).unwrap(),
            by_ref.discount_factor(1.5).unwrap()
        );
    }
}

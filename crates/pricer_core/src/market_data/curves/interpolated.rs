//! Interpolated yield curve implementation.

use super::YieldCurve;
use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Interpolation method for yield curves.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CurveInterpolation {
    /// Linear interpolation on zero rates, D(t) = exp(-r(t) t).
    Linear,

    /// Linear interpolation on ln D(t), i.e. piecewise-flat forwards.
    #[default]
    LogLinear,
}

/// Yield curve interpolated between zero-rate pillars.
///
/// Before the first pillar the first zero rate applies flat, so D(0) = 1
/// always holds. Beyond the last pillar the last zero rate applies flat
/// when extrapolation is allowed; otherwise the query is out of bounds.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{YieldCurve, InterpolatedCurve, CurveInterpolation};
///
/// let curve = InterpolatedCurve::<f64>::new(
///     &[0.5, 1.0, 2.0, 5.0],
///     &[0.02, 0.025, 0.03, 0.04],
///     CurveInterpolation::Linear,
///     true,
/// ).unwrap();
///
/// let r = curve.zero_rate(1.5).unwrap();
/// assert!((r - 0.0275).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterpolatedCurve<T: Float> {
    tenors: Vec<T>,
    rates: Vec<T>,
    method: CurveInterpolation,
    allow_extrapolation: bool,
}

impl<T: Float> InterpolatedCurve<T> {
    /// Construct an interpolated curve from zero-rate pillars.
    ///
    /// # Errors
    ///
    /// - `InsufficientData` for an empty pillar set or mismatched lengths
    /// - `InvalidMaturity` for a non-positive tenor
    /// - `NonIncreasingPillars` when tenors are not strictly increasing
    pub fn new(
        tenors: &[T],
        rates: &[T],
        method: CurveInterpolation,
        allow_extrapolation: bool,
    ) -> Result<Self, MarketDataError> {
        if tenors.is_empty() {
            return Err(MarketDataError::InsufficientData { got: 0, need: 1 });
        }
        if tenors.len() != rates.len() {
            return Err(MarketDataError::InsufficientData {
                got: rates.len(),
                need: tenors.len(),
            });
        }

        for (i, &t) in tenors.iter().enumerate() {
            if t <= T::zero() {
                return Err(MarketDataError::InvalidMaturity {
                    t: t.to_f64().unwrap_or(0.0),
                });
            }
            if i > 0 && t <= tenors[i - 1] {
                return Err(MarketDataError::NonIncreasingPillars {
                    index: i,
                    t: t.to_f64().unwrap_or(0.0),
                });
            }
        }

        Ok(Self {
            tenors: tenors.to_vec(),
            rates: rates.to_vec(),
            method,
            allow_extrapolation,
        })
    }

    /// Return the pillar domain `(t_min, t_max)`.
    #[inline]
    pub fn domain(&self) -> (T, T) {
        (self.tenors[0], self.tenors[self.tenors.len() - 1])
    }

    /// Return the pillar tenors.
    #[inline]
    pub fn tenors(&self) -> &[T] {
        &self.tenors
    }

    /// Return the pillar zero rates.
    #[inline]
    pub fn rates(&self) -> &[T] {
        &self.rates
    }

    /// Return the interpolation method.
    #[inline]
    pub fn method(&self) -> CurveInterpolation {
        self.method
    }

    /// Return whether flat extrapolation beyond the last pillar is allowed.
    #[inline]
    pub fn allow_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    /// ln D(t) for `t >= 0`.
    fn log_discount(&self, t: T) -> Result<T, MarketDataError> {
        let (t_min, t_max) = self.domain();
        let last = self.tenors.len() - 1;

        if t <= t_min {
            return Ok(-self.rates[0] * t);
        }
        if t >= t_max {
            if t > t_max && !self.allow_extrapolation {
                return Err(MarketDataError::OutOfBounds {
                    x: t.to_f64().unwrap_or(0.0),
                    min: 0.0,
                    max: t_max.to_f64().unwrap_or(0.0),
                });
            }
            return Ok(-self.rates[last] * t);
        }

        // t_min < t < t_max, so 1 <= hi <= last
        let hi = self.tenors.partition_point(|&x| x < t);
        let lo = hi - 1;
        let (t0, t1) = (self.tenors[lo], self.tenors[hi]);
        let w = (t - t0) / (t1 - t0);

        let log_df = match self.method {
            CurveInterpolation::Linear => {
                let r = self.rates[lo] + w * (self.rates[hi] - self.rates[lo]);
                -r * t
            }
            CurveInterpolation::LogLinear => {
                let l0 = -self.rates[lo] * t0;
                let l1 = -self.rates[hi] * t1;
                l0 + w * (l1 - l0)
            }
        };
        Ok(log_df)
    }
}

impl<T: Float> YieldCurve<T> for InterpolatedCurve<T> {
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        Ok(self.log_discount(t)?.exp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample(method: CurveInterpolation, extrapolate: bool) -> InterpolatedCurve<f64> {
        InterpolatedCurve::new(
            &[1.0, 2.0, 5.0],
            &[0.02, 0.03, 0.04],
            method,
            extrapolate,
        )
        .unwrap()
    }

    // ========================================
    // Construction Tests
    // ========================================

    #[test]
    fn test_new_rejects_bad_pillars() {
        let m = CurveInterpolation::Linear;
        assert!(matches!(
            InterpolatedCurve::<f64>::new(&[], &[], m, true),
            Err(MarketDataError::InsufficientData { .. })
        ));
        assert!(matches!(
            InterpolatedCurve::new(&[1.0, 2.0], &[0.01], m, true),
            Err(MarketDataError::InsufficientData { .. })
        ));
        assert!(matches!(
            InterpolatedCurve::new(&[0.0, 2.0], &[0.01, 0.02], m, true),
            Err(MarketDataError::InvalidMaturity { .. })
        ));
        assert!(matches!(
            InterpolatedCurve::new(&[2.0, 2.0], &[0.01, 0.02], m, true),
            Err(MarketDataError::NonIncreasingPillars { index: 1, .. })
        ));
    }

    // ========================================
    // Interpolation Tests
    // ========================================

    #[test]
    fn test_pillars_are_reproduced() {
        for method in [CurveInterpolation::Linear, CurveInterpolation::LogLinear] {
            let curve = sample(method, false);
            for (&t, &r) in [1.0, 2.0, 5.0].iter().zip([0.02, 0.03, 0.04].iter()) {
                assert_relative_eq!(
                    curve.discount_factor(t).unwrap(),
                    (-r * t).exp(),
                    epsilon = 1e-14
                );
            }
        }
    }

    #[test]
    fn test_linear_zero_rate_midpoint() {
        let curve = sample(CurveInterpolation::Linear, false);
        assert_relative_eq!(curve.zero_rate(1.5).unwrap(), 0.025, epsilon = 1e-12);
    }

    #[test]
    fn test_log_linear_has_flat_forward_between_pillars() {
        let curve = sample(CurveInterpolation::LogLinear, false);
        // ln D(2) - ln D(1) = -(0.06 - 0.02)
        let f_a = curve.forward_rate(1.2, 1.4).unwrap();
        let f_b = curve.forward_rate(1.6, 1.9).unwrap();
        assert_relative_eq!(f_a, 0.04, epsilon = 1e-12);
        assert_relative_eq!(f_b, 0.04, epsilon = 1e-12);
    }

    #[test]
    fn test_short_end_uses_first_rate() {
        let curve = sample(CurveInterpolation::LogLinear, false);
        assert_relative_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
        assert_relative_eq!(
            curve.discount_factor(0.5).unwrap(),
            (-0.01_f64).exp(),
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_long_end_extrapolation_flag() {
        let strict = sample(CurveInterpolation::Linear, false);
        assert!(matches!(
            strict.discount_factor(6.0),
            Err(MarketDataError::OutOfBounds { .. })
        ));

        let flat = sample(CurveInterpolation::Linear, true);
        assert_relative_eq!(flat.zero_rate(10.0).unwrap(), 0.04, epsilon = 1e-12);
    }
}

//! Parametric yield curve fits.
//!
//! [`CurveFitMethod`] is a closed set of fitted yield functions, each carrying
//! its parameters as a plain value. [`FittedCurve`] exposes a validated fit as
//! a continuously compounded [`YieldCurve`].

use super::YieldCurve;
use crate::market_data::error::MarketDataError;

/// Floor applied to `t` in the Nelson-Siegel family, where the loading
/// `(1 - e^{-t/τ}) / (t/τ)` is singular at zero.
const NS_MIN_TIME: f64 = 1e-10;

/// Polynomial yield `y(t) = Σ c_i t^i`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolynomialFit {
    /// Coefficients in ascending powers of `t`.
    pub coefficients: Vec<f64>,
}

/// Nelson-Siegel yield parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NelsonSiegelFit {
    /// Long-run level
    pub beta0: f64,
    /// Slope loading
    pub beta1: f64,
    /// Curvature loading
    pub beta2: f64,
    /// Decay time scale (years)
    pub tau: f64,
}

/// Nelson-Siegel-Svensson yield parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SvenssonFit {
    /// Long-run level
    pub beta0: f64,
    /// Slope loading
    pub beta1: f64,
    /// First curvature loading
    pub beta2: f64,
    /// Second curvature loading
    pub beta3: f64,
    /// First decay time scale (years)
    pub tau1: f64,
    /// Second decay time scale (years)
    pub tau2: f64,
}

/// B-spline yield parameters.
///
/// `knots` is the full knot vector, so
/// `knots.len() == coefficients.len() + degree + 1`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BSplineFit {
    /// Spline degree (3 for cubic)
    pub degree: usize,
    /// Non-decreasing knot vector
    pub knots: Vec<f64>,
    /// Control coefficients
    pub coefficients: Vec<f64>,
}

/// Fitted yield curve functional form.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{CurveFitMethod, NelsonSiegelFit};
///
/// let fit = CurveFitMethod::NelsonSiegel(NelsonSiegelFit {
///     beta0: 0.05,
///     beta1: -0.02,
///     beta2: 0.01,
///     tau: 2.0,
/// });
/// fit.validate().unwrap();
///
/// // Short end tends to beta0 + beta1, long end to beta0
/// assert!((fit.interpolated_yield(0.0) - 0.03).abs() < 1e-9);
/// assert!((fit.interpolated_yield(1000.0) - 0.05).abs() < 1e-4);
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CurveFitMethod {
    /// Polynomial in `t`
    Polynomial(PolynomialFit),
    /// Nelson-Siegel
    NelsonSiegel(NelsonSiegelFit),
    /// Nelson-Siegel-Svensson
    NelsonSiegelSvensson(SvenssonFit),
    /// B-spline
    BSpline(BSplineFit),
}

impl CurveFitMethod {
    /// Returns the method name.
    pub fn name(&self) -> &'static str {
        match self {
            CurveFitMethod::Polynomial(_) => "Polynomial",
            CurveFitMethod::NelsonSiegel(_) => "Nelson-Siegel",
            CurveFitMethod::NelsonSiegelSvensson(_) => "Nelson-Siegel-Svensson",
            CurveFitMethod::BSpline(_) => "B-Spline",
        }
    }

    /// Evaluates the fitted yield at time `t` (years).
    ///
    /// Parameters are assumed valid; see [`CurveFitMethod::validate`].
    pub fn interpolated_yield(&self, t: f64) -> f64 {
        match self {
            CurveFitMethod::Polynomial(p) => p
                .coefficients
                .iter()
                .rev()
                .fold(0.0, |acc, &c| acc * t + c),
            CurveFitMethod::NelsonSiegel(p) => {
                let t = t.max(NS_MIN_TIME);
                let (slope, hump) = ns_loadings(t, p.tau);
                p.beta0 + p.beta1 * slope + p.beta2 * hump
            }
            CurveFitMethod::NelsonSiegelSvensson(p) => {
                let t = t.max(NS_MIN_TIME);
                let (slope, hump1) = ns_loadings(t, p.tau1);
                let (_, hump2) = ns_loadings(t, p.tau2);
                p.beta0 + p.beta1 * slope + p.beta2 * hump1 + p.beta3 * hump2
            }
            CurveFitMethod::BSpline(p) => de_boor(p, t),
        }
    }

    /// Checks the parameters can be evaluated.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for non-finite values, non-positive decay scales,
    /// an empty polynomial, or an inconsistent spline shape.
    pub fn validate(&self) -> Result<(), MarketDataError> {
        match self {
            CurveFitMethod::Polynomial(p) => {
                if p.coefficients.is_empty() {
                    return Err(invalid("coefficients", "at least one coefficient is required"));
                }
                check_finite("coefficients", &p.coefficients)
            }
            CurveFitMethod::NelsonSiegel(p) => {
                check_finite("beta", &[p.beta0, p.beta1, p.beta2])?;
                check_tau("tau", p.tau)
            }
            CurveFitMethod::NelsonSiegelSvensson(p) => {
                check_finite("beta", &[p.beta0, p.beta1, p.beta2, p.beta3])?;
                check_tau("tau1", p.tau1)?;
                check_tau("tau2", p.tau2)
            }
            CurveFitMethod::BSpline(p) => validate_spline(p),
        }
    }
}

/// Nelson-Siegel slope and curvature loadings at `t > 0`.
#[inline]
fn ns_loadings(t: f64, tau: f64) -> (f64, f64) {
    let theta = t / tau;
    let e = (-theta).exp();
    let slope = (1.0 - e) / theta;
    (slope, slope - e)
}

/// De Boor evaluation, clamped to the base interval `[t_p, t_n]`.
fn de_boor(spline: &BSplineFit, x: f64) -> f64 {
    let p = spline.degree;
    let t = &spline.knots;
    let c = &spline.coefficients;
    let n = c.len();

    let x = x.clamp(t[p], t[n]);

    // Knot span with t[k] <= x < t[k+1], k in [p, n-1]
    let k = (t[..n].partition_point(|&knot| knot <= x)).saturating_sub(1).clamp(p, n - 1);

    let mut d: Vec<f64> = (0..=p).map(|j| c[j + k - p]).collect();
    for r in 1..=p {
        for j in (r..=p).rev() {
            let left = t[j + k - p];
            let right = t[j + 1 + k - r];
            let denom = right - left;
            let alpha = if denom.abs() > 0.0 { (x - left) / denom } else { 0.0 };
            d[j] = (1.0 - alpha) * d[j - 1] + alpha * d[j];
        }
    }
    d[p]
}

fn validate_spline(spline: &BSplineFit) -> Result<(), MarketDataError> {
    let p = spline.degree;
    let n = spline.coefficients.len();

    if n <= p {
        return Err(invalid(
            "coefficients",
            format!("need more than degree {} coefficients, got {}", p, n),
        ));
    }
    if spline.knots.len() != n + p + 1 {
        return Err(invalid(
            "knots",
            format!("expected {} knots, got {}", n + p + 1, spline.knots.len()),
        ));
    }
    check_finite("knots", &spline.knots)?;
    check_finite("coefficients", &spline.coefficients)?;
    if spline.knots.windows(2).any(|w| w[1] < w[0]) {
        return Err(invalid("knots", "must be non-decreasing"));
    }
    if spline.knots[n] <= spline.knots[p] {
        return Err(invalid("knots", "base interval is empty"));
    }
    Ok(())
}

fn check_finite(name: &'static str, values: &[f64]) -> Result<(), MarketDataError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(invalid(name, "must be finite"))
    }
}

fn check_tau(name: &'static str, tau: f64) -> Result<(), MarketDataError> {
    if tau.is_finite() && tau > 0.0 {
        Ok(())
    } else {
        Err(invalid(name, format!("must be positive, got {}", tau)))
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> MarketDataError {
    MarketDataError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}

/// Discount curve defined by a fitted continuously compounded zero yield,
/// D(t) = exp(-y(t) t).
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{
///     CurveFitMethod, FittedCurve, PolynomialFit, YieldCurve,
/// };
///
/// let curve = FittedCurve::new(CurveFitMethod::Polynomial(PolynomialFit {
///     coefficients: vec![0.03],
/// }))
/// .unwrap();
/// let df = curve.discount_factor(2.0).unwrap();
/// assert!((df - (-0.06_f64).exp()).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FittedCurve {
    method: CurveFitMethod,
}

impl FittedCurve {
    /// Wraps a validated fit.
    pub fn new(method: CurveFitMethod) -> Result<Self, MarketDataError> {
        method.validate()?;
        Ok(Self { method })
    }

    /// Returns the underlying fit.
    #[inline]
    pub fn method(&self) -> &CurveFitMethod {
        &self.method
    }
}

impl YieldCurve<f64> for FittedCurve {
    fn discount_factor(&self, t: f64) -> Result<f64, MarketDataError> {
        if t < 0.0 {
            return Err(MarketDataError::InvalidMaturity { t });
        }
        Ok((-self.method.interpolated_yield(t) * t).exp())
    }
}

//! Piecewise flat hazard rate credit curve and its bootstrap.
//!
//! Between knots the survival probability decays at the segment hazard:
//!
//! ```text
//! Q(t) = Q(t_{i-1}) · exp(-h_i (t - t_{i-1}))    t_{i-1} < t ≤ t_i
//! ```
//!
//! with `Q(0) = 1` and the last hazard extended beyond the final knot.

use std::fmt;
use std::sync::Arc;

use pricer_core::market_data::curves::{SurvivalCurve, YieldCurve};
use pricer_core::market_data::MarketDataError;
use pricer_core::math::solvers::{BracketedNewtonSolver, RootSolution};
use pricer_core::types::{Date, SolverError};
use pricer_models::instruments::credit::{
    CdsError, CdsPricer, CdsPricingConfig, CdsPricingSource, CreditDefaultSwap,
};
use tracing::{debug, trace, warn};

use super::config::CreditCurveConfig;
use super::error::CreditError;

/// Largest survival probability accepted after a negative hazard segment.
const SURVIVAL_CEILING: f64 = 1.0 + 1e-12;

/// Survival probability over knots `times` with hazards applying to the
/// segment ending at each knot.
fn survival_on_knots(times: &[f64], values: &[f64], hazards: &[f64], t: f64) -> f64 {
    if t <= 0.0 || times.is_empty() {
        return 1.0;
    }
    let n = times.len();
    let i = times.partition_point(|&k| k < t);
    if i == n {
        return values[n - 1] * (-hazards[n - 1] * (t - times[n - 1])).exp();
    }
    let (t0, q0) = if i == 0 {
        (0.0, 1.0)
    } else {
        (times[i - 1], values[i - 1])
    };
    q0 * (-hazards[i] * (t - t0)).exp()
}

fn hazard_on_knots(times: &[f64], hazards: &[f64], t: f64) -> f64 {
    if hazards.is_empty() {
        return 0.0;
    }
    let i = times.partition_point(|&k| k < t).min(hazards.len() - 1);
    hazards[i]
}

/// Buyer-side CDS value per unit notional: `PROT - c · RPV01 - upfront`.
pub(crate) fn unit_value<D, C>(
    discount: &D,
    survival: &C,
    valuation_date: Date,
    pricing: CdsPricingConfig,
    cds: &CreditDefaultSwap,
    recovery_rate: f64,
) -> Result<f64, CdsError>
where
    D: YieldCurve<f64>,
    C: SurvivalCurve<f64>,
{
    let pricer = CdsPricer::new(discount, survival, valuation_date).with_config(pricing);
    let prot = pricer.protection_leg_pv(cds, recovery_rate)?;
    let rpv01 = pricer.risky_pv01(cds)?;
    Ok(prot - cds.coupon() * rpv01 - cds.upfront())
}

/// Knots fixed so far plus one trial segment starting at the last knot.
struct TrialSurvival<'a> {
    times: &'a [f64],
    values: &'a [f64],
    hazards: &'a [f64],
    t_start: f64,
    q_start: f64,
    hazard: f64,
}

impl SurvivalCurve<f64> for TrialSurvival<'_> {
    fn survival_probability(&self, t: f64) -> Result<f64, MarketDataError> {
        if t <= self.t_start {
            Ok(survival_on_knots(self.times, self.values, self.hazards, t))
        } else {
            Ok(self.q_start * (-self.hazard * (t - self.t_start)).exp())
        }
    }

    fn hazard_rate(&self, t: f64) -> Result<f64, MarketDataError> {
        if t <= self.t_start && !self.hazards.is_empty() {
            Ok(hazard_on_knots(self.times, self.hazards, t))
        } else {
            Ok(self.hazard)
        }
    }

    fn knot_times(&self) -> &[f64] {
        self.times
    }
}

/// Survival term structure of one reference entity.
///
/// Holds the discount curve it was calibrated against so the same value
/// can price CDS contracts on its own: it implements both
/// [`SurvivalCurve`] and [`YieldCurve`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pricer_core::market_data::curves::FlatCurve;
/// use pricer_core::types::time::Date;
/// use pricer_models::instruments::credit::CreditDefaultSwap;
/// use pricer_optimiser::credit::{CreditCurve, CreditCurveConfig};
///
/// let valuation = Date::from_ymd(2018, 12, 20).unwrap();
/// let contracts: Vec<_> = [(1, 0.005), (3, 0.007), (5, 0.009)]
///     .iter()
///     .map(|&(years, spread)| {
///         let maturity = valuation.add_months(12 * years).unwrap();
///         CreditDefaultSwap::new(valuation, maturity, spread, 1.0).unwrap()
///     })
///     .collect();
///
/// let curve = CreditCurve::bootstrap(
///     valuation,
///     &contracts,
///     0.4,
///     Arc::new(FlatCurve::new(0.02)),
///     &CreditCurveConfig::default(),
/// )
/// .unwrap();
///
/// assert_eq!(curve.times().len(), 3);
/// assert_eq!(curve.survival_prob(0.0), 1.0);
/// for cds in &contracts {
///     assert!(cds.value(valuation, &curve, 0.4).unwrap().abs() < 1e-8);
/// }
/// ```
pub struct CreditCurve<D> {
    valuation_date: Date,
    recovery_rate: f64,
    discount_curve: Arc<D>,
    times: Vec<f64>,
    values: Vec<f64>,
    hazard_rates: Vec<f64>,
    pricing: CdsPricingConfig,
}

/// Bootstrapped curve with per-instrument solver diagnostics.
#[derive(Debug, Clone)]
pub struct CreditBootstrapResult<D> {
    /// The bootstrapped curve
    pub curve: CreditCurve<D>,
    /// CDS value per unit notional at the solved hazard, per instrument
    pub residuals: Vec<f64>,
    /// Solver iterations per instrument
    pub iterations: Vec<usize>,
}

impl<D: YieldCurve<f64>> CreditCurve<D> {
    /// Bootstrap a curve so that every contract prices to zero.
    ///
    /// Contracts must have strictly increasing maturities; each one adds a
    /// knot at its maturity.
    ///
    /// # Errors
    ///
    /// - `InsufficientData` if `contracts` is empty
    /// - `NonIncreasingMaturity` for duplicate or decreasing maturities
    /// - `InvalidRecoveryRate` if `recovery_rate` is outside [0, 1]
    /// - `HazardRateBelowFloor`, `SurvivalOutOfRange` for inadmissible roots
    /// - `ConvergenceFailure`, `NoBracket` when a segment cannot be solved
    pub fn bootstrap(
        valuation_date: Date,
        contracts: &[CreditDefaultSwap],
        recovery_rate: f64,
        discount_curve: Arc<D>,
        config: &CreditCurveConfig,
    ) -> Result<Self, CreditError> {
        Self::bootstrap_with_diagnostics(
            valuation_date,
            contracts,
            recovery_rate,
            discount_curve,
            config,
        )
        .map(|result| result.curve)
    }

    /// Bootstrap a curve and report residuals and iteration counts.
    pub fn bootstrap_with_diagnostics(
        valuation_date: Date,
        contracts: &[CreditDefaultSwap],
        recovery_rate: f64,
        discount_curve: Arc<D>,
        config: &CreditCurveConfig,
    ) -> Result<CreditBootstrapResult<D>, CreditError> {
        config.validate()?;
        CreditError::check_recovery(recovery_rate)?;
        if contracts.is_empty() {
            return Err(CreditError::InsufficientData {
                required: 1,
                provided: 0,
            });
        }
        for (i, pair) in contracts.windows(2).enumerate() {
            if pair[1].maturity() <= pair[0].maturity() {
                return Err(CreditError::NonIncreasingMaturity {
                    index: i + 1,
                    maturity: pair[1].maturity(),
                    previous: pair[0].maturity(),
                });
            }
        }

        let basis = config.pricing.time_basis;
        let solver = BracketedNewtonSolver::new(config.solver);

        let n = contracts.len();
        let mut times: Vec<f64> = Vec::with_capacity(n);
        let mut values: Vec<f64> = Vec::with_capacity(n);
        let mut hazards: Vec<f64> = Vec::with_capacity(n);
        let mut residuals = Vec::with_capacity(n);
        let mut iterations = Vec::with_capacity(n);

        for (i, cds) in contracts.iter().enumerate() {
            let t_i = basis.year_fraction(valuation_date, cds.maturity());
            let t_prev = times.last().copied().unwrap_or(0.0);
            let q_prev = values.last().copied().unwrap_or(1.0);
            if t_i <= t_prev {
                return Err(CreditError::invalid_input(format!(
                    "maturity {} of instrument {} gives no positive segment",
                    cds.maturity(),
                    i
                )));
            }

            let solution = {
                let objective = |h: f64| -> Result<f64, CreditError> {
                    let trial = TrialSurvival {
                        times: &times,
                        values: &values,
                        hazards: &hazards,
                        t_start: t_prev,
                        q_start: q_prev,
                        hazard: h,
                    };
                    let v = unit_value(
                        discount_curve.as_ref(),
                        &trial,
                        valuation_date,
                        config.pricing,
                        cds,
                        recovery_rate,
                    )?;
                    trace!(instrument = i, hazard = h, value = v, "credit bootstrap objective");
                    Ok(v)
                };
                solve_hazard(&solver, config, i, objective)?
            };

            let h = solution.root;
            let q_i = q_prev * (-h * (t_i - t_prev)).exp();
            if !q_i.is_finite() || q_i > SURVIVAL_CEILING {
                return Err(CreditError::SurvivalOutOfRange {
                    instrument: i,
                    survival: q_i,
                });
            }

            debug!(
                instrument = i,
                t = t_i,
                hazard = h,
                survival = q_i,
                iterations = solution.iterations,
                "bootstrapped credit curve knot"
            );

            times.push(t_i);
            values.push(q_i);
            hazards.push(h);
            residuals.push(solution.residual);
            iterations.push(solution.iterations);
        }

        Ok(CreditBootstrapResult {
            curve: Self {
                valuation_date,
                recovery_rate,
                discount_curve,
                times,
                values,
                hazard_rates: hazards,
                pricing: config.pricing,
            },
            residuals,
            iterations,
        })
    }

    /// Build a curve directly from knot times and segment hazard rates.
    ///
    /// # Errors
    ///
    /// - `InsufficientData` if no knots are given
    /// - `LengthMismatch` if `times` and `hazard_rates` differ in length
    /// - `InvalidInput` for non-positive or non-increasing times
    /// - `SurvivalOutOfRange` if a survival value exceeds one
    pub fn from_hazard_rates(
        valuation_date: Date,
        recovery_rate: f64,
        discount_curve: Arc<D>,
        times: Vec<f64>,
        hazard_rates: Vec<f64>,
        pricing: CdsPricingConfig,
    ) -> Result<Self, CreditError> {
        CreditError::check_recovery(recovery_rate)?;
        if times.is_empty() {
            return Err(CreditError::InsufficientData {
                required: 1,
                provided: 0,
            });
        }
        if hazard_rates.len() != times.len() {
            return Err(CreditError::length_mismatch(
                "hazard_rates",
                times.len(),
                hazard_rates.len(),
            ));
        }

        let mut values = Vec::with_capacity(times.len());
        let mut t_prev = 0.0;
        let mut q_prev = 1.0;
        for (i, (&t, &h)) in times.iter().zip(&hazard_rates).enumerate() {
            if !(t.is_finite() && t > t_prev) {
                return Err(CreditError::invalid_input(format!(
                    "knot {} at t = {} is not after {}",
                    i, t, t_prev
                )));
            }
            let q = q_prev * (-h * (t - t_prev)).exp();
            if !q.is_finite() || q > SURVIVAL_CEILING {
                return Err(CreditError::SurvivalOutOfRange {
                    instrument: i,
                    survival: q,
                });
            }
            values.push(q);
            t_prev = t;
            q_prev = q;
        }

        Ok(Self {
            valuation_date,
            recovery_rate,
            discount_curve,
            times,
            values,
            hazard_rates,
            pricing,
        })
    }

    /// Discount factor at `t`, passed through to the discount curve.
    pub fn df(&self, t: f64) -> Result<f64, CreditError> {
        Ok(self.discount_curve.discount_factor(t)?)
    }

    /// Discount factors at each of `ts`.
    pub fn dfs(&self, ts: &[f64]) -> Result<Vec<f64>, CreditError> {
        ts.iter().map(|&t| self.df(t)).collect()
    }

    /// Pricer valuing contracts against this curve with its own settings.
    pub fn pricer(&self) -> CdsPricer<'_, Self, Self> {
        CdsPricer::new(self, self, self.valuation_date).with_config(self.pricing)
    }
}

impl<D> CreditCurve<D> {
    /// Survival probability to `t`; one for `t ≤ 0`.
    pub fn survival_prob(&self, t: f64) -> f64 {
        survival_on_knots(&self.times, &self.values, &self.hazard_rates, t)
    }

    /// Survival probabilities at each of `ts`.
    pub fn survival_probs(&self, ts: &[f64]) -> Vec<f64> {
        ts.iter().map(|&t| self.survival_prob(t)).collect()
    }

    /// Hazard rate of the segment containing `t`.
    pub fn hazard_rate(&self, t: f64) -> f64 {
        hazard_on_knots(&self.times, &self.hazard_rates, t)
    }

    /// Knot times in years from the valuation date.
    #[inline]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Survival probabilities at the knots.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Segment hazard rates, one per knot.
    #[inline]
    pub fn hazard_rates(&self) -> &[f64] {
        &self.hazard_rates
    }

    /// Recovery rate the curve was calibrated with.
    #[inline]
    pub fn recovery_rate(&self) -> f64 {
        self.recovery_rate
    }

    /// Curve time origin.
    #[inline]
    pub fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    /// Shared discount curve.
    #[inline]
    pub fn discount_curve(&self) -> &Arc<D> {
        &self.discount_curve
    }

    /// Pricing settings used for calibration.
    #[inline]
    pub fn pricing_config(&self) -> &CdsPricingConfig {
        &self.pricing
    }
}

impl<D> Clone for CreditCurve<D> {
    fn clone(&self) -> Self {
        Self {
            valuation_date: self.valuation_date,
            recovery_rate: self.recovery_rate,
            discount_curve: Arc::clone(&self.discount_curve),
            times: self.times.clone(),
            values: self.values.clone(),
            hazard_rates: self.hazard_rates.clone(),
            pricing: self.pricing,
        }
    }
}

impl<D> fmt::Debug for CreditCurve<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreditCurve")
            .field("valuation_date", &self.valuation_date)
            .field("recovery_rate", &self.recovery_rate)
            .field("times", &self.times)
            .field("values", &self.values)
            .field("hazard_rates", &self.hazard_rates)
            .finish_non_exhaustive()
    }
}

/// Equal when built on the same discount curve instance with identical knots.
impl<D> PartialEq for CreditCurve<D> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.discount_curve, &other.discount_curve)
            && self.valuation_date == other.valuation_date
            && self.recovery_rate == other.recovery_rate
            && self.times == other.times
            && self.values == other.values
            && self.hazard_rates == other.hazard_rates
            && self.pricing == other.pricing
    }
}

impl<D> SurvivalCurve<f64> for CreditCurve<D> {
    #[inline]
    fn survival_probability(&self, t: f64) -> Result<f64, MarketDataError> {
        Ok(self.survival_prob(t))
    }

    #[inline]
    fn hazard_rate(&self, t: f64) -> Result<f64, MarketDataError> {
        Ok(CreditCurve::hazard_rate(self, t))
    }

    #[inline]
    fn knot_times(&self) -> &[f64] {
        &self.times
    }
}

impl<D> CdsPricingSource for CreditCurve<D> {
    #[inline]
    fn cds_pricing_config(&self) -> CdsPricingConfig {
        self.pricing
    }
}

impl<D: YieldCurve<f64>> YieldCurve<f64> for CreditCurve<D> {
    #[inline]
    fn discount_factor(&self, t: f64) -> Result<f64, MarketDataError> {
        self.discount_curve.discount_factor(t)
    }
}

/// Find the segment hazard, widening the bracket as needed.
fn solve_hazard<F>(
    solver: &BracketedNewtonSolver<f64>,
    config: &CreditCurveConfig,
    instrument: usize,
    mut f: F,
) -> Result<RootSolution<f64>, CreditError>
where
    F: FnMut(f64) -> Result<f64, CreditError>,
{
    let v0 = f(0.0)?;

    let (lower, upper) = if v0 > 0.0 {
        let floor = config.hazard_floor;
        warn!(instrument = instrument, value = v0, floor = floor, "quote implies a negative hazard rate");
        let v_floor = f(floor)?;
        if v_floor > 0.0 {
            return Err(CreditError::HazardRateBelowFloor { instrument, floor });
        }
        ((floor, v_floor), (0.0, v0))
    } else {
        let mut hi = 1.0;
        let mut v_hi = f(hi)?;
        while v_hi < 0.0 {
            if hi >= config.max_hazard_rate {
                return Err(CreditError::NoBracket {
                    instrument,
                    lower: 0.0,
                    upper: hi,
                    value_lower: v0,
                    value_upper: v_hi,
                });
            }
            hi = (2.0 * hi).min(config.max_hazard_rate);
            warn!(instrument = instrument, upper = hi, "extending hazard rate bracket");
            v_hi = f(hi)?;
        }
        ((0.0, v0), (hi, v_hi))
    };

    solver
        .find_root_with_values(&mut f, lower, upper)
        .map_err(|err| match err {
            CreditError::Solver(SolverError::MaxIterationsExceeded {
                iterations,
                residual,
                ..
            }) => CreditError::ConvergenceFailure {
                instrument,
                residual,
                iterations,
            },
            CreditError::Solver(SolverError::NoBracket { a, b, fa, fb }) => CreditError::NoBracket {
                instrument,
                lower: a,
                upper: b,
                value_lower: fa,
                value_upper: fb,
            },
            other => other,
        })
}

/// Calibration quotes for one reference entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityQuotes {
    /// Entity identifier.
    pub name: String,
    /// Calibration contracts with strictly increasing maturities.
    pub contracts: Vec<CreditDefaultSwap>,
    /// Recovery rate.
    pub recovery_rate: f64,
}

/// Bootstrap one curve per entity against a shared discount curve.
///
/// Entities are independent, so with the `parallel` feature they are built
/// on the rayon pool. The first failure is returned.
pub fn bootstrap_curves<D>(
    valuation_date: Date,
    entities: &[EntityQuotes],
    discount_curve: Arc<D>,
    config: &CreditCurveConfig,
) -> Result<Vec<CreditCurve<D>>, CreditError>
where
    D: YieldCurve<f64> + Send + Sync,
{
    let build = |entity: &EntityQuotes| {
        CreditCurve::bootstrap(
            valuation_date,
            &entity.contracts,
            entity.recovery_rate,
            Arc::clone(&discount_curve),
            config,
        )
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        entities.par_iter().map(build).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        entities.iter().map(build).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::market_data::curves::FlatCurve;
    use proptest::prelude::*;

    fn valuation() -> Date {
        Date::from_ymd(2018, 12, 20).unwrap()
    }

    fn contract(years: i32, spread: f64) -> CreditDefaultSwap {
        let maturity = valuation().add_months(12 * years).unwrap();
        CreditDefaultSwap::new(valuation(), maturity, spread, 1.0).unwrap()
    }

    fn flat_discount() -> Arc<FlatCurve<f64>> {
        Arc::new(FlatCurve::new(0.02))
    }

    fn manual_curve(hazards: Vec<f64>) -> CreditCurve<FlatCurve<f64>> {
        let times = (1..=hazards.len()).map(|i| i as f64).collect();
        CreditCurve::from_hazard_rates(
            valuation(),
            0.4,
            flat_discount(),
            times,
            hazards,
            CdsPricingConfig::default(),
        )
        .unwrap()
    }

    // ========================================
    // Query Tests
    // ========================================

    #[test]
    fn test_survival_at_origin_and_before() {
        let curve = manual_curve(vec![0.01, 0.02]);
        assert_eq!(curve.survival_prob(0.0), 1.0);
        assert_eq!(curve.survival_prob(-1.0), 1.0);
    }

    #[test]
    fn test_survival_interpolation() {
        let curve = manual_curve(vec![0.01, 0.02, 0.03]);
        assert_relative_eq!(curve.survival_prob(0.5), (-0.005_f64).exp(), epsilon = 1e-15);
        assert_relative_eq!(curve.survival_prob(1.5), (-0.01_f64 - 0.01).exp(), epsilon = 1e-15);
        // Flat extrapolation of the last hazard
        assert_relative_eq!(
            curve.survival_prob(5.0),
            (-0.01_f64 - 0.02 - 0.03 * 3.0).exp(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_knot_values_match() {
        let curve = manual_curve(vec![0.01, 0.05, 0.02]);
        for (&t, &q) in curve.times().iter().zip(curve.values()) {
            assert_eq!(curve.survival_prob(t), q);
            // Continuous across the knot
            assert_relative_eq!(curve.survival_prob(t + 1e-12), q, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_hazard_rate_lookup() {
        let curve = manual_curve(vec![0.01, 0.05, 0.02]);
        assert_eq!(curve.hazard_rate(0.0), 0.01);
        assert_eq!(curve.hazard_rate(1.0), 0.01);
        assert_eq!(curve.hazard_rate(1.5), 0.05);
        assert_eq!(curve.hazard_rate(10.0), 0.02);
    }

    #[test]
    fn test_df_passes_through() {
        let curve = manual_curve(vec![0.01]);
        assert_relative_eq!(curve.df(2.0).unwrap(), (-0.04_f64).exp(), epsilon = 1e-15);
        assert_eq!(curve.dfs(&[0.0, 1.0]).unwrap().len(), 2);
        assert!(curve.df(-1.0).unwrap_err().is_numeric_domain());
    }

    #[test]
    fn test_from_hazard_rates_validation() {
        let err = CreditCurve::from_hazard_rates(
            valuation(),
            0.4,
            flat_discount(),
            vec![1.0, 1.0],
            vec![0.01, 0.01],
            CdsPricingConfig::default(),
        )
        .unwrap_err();
        assert!(err.is_configuration());

        let err = CreditCurve::from_hazard_rates(
            valuation(),
            0.4,
            flat_discount(),
            vec![1.0, 2.0],
            vec![0.01],
            CdsPricingConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CreditError::LengthMismatch { .. }));

        let err = CreditCurve::from_hazard_rates(
            valuation(),
            0.4,
            flat_discount(),
            vec![1.0],
            vec![-0.1],
            CdsPricingConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CreditError::SurvivalOutOfRange { .. }));
    }

    // ========================================
    // Bootstrap Tests
    // ========================================

    #[test]
    fn test_flat_quote_recovers_credit_triangle() {
        let curve = CreditCurve::bootstrap(
            valuation(),
            &[contract(5, 0.012)],
            0.4,
            flat_discount(),
            &CreditCurveConfig::default(),
        )
        .unwrap();
        // s ≈ h (1 - R) with ACT/360 premium accrual
        assert_relative_eq!(curve.hazard_rates()[0], 0.012 / 0.6 * 365.0 / 360.0, max_relative = 0.02);
    }

    #[test]
    fn test_zero_spread_gives_zero_hazard() {
        let curve = CreditCurve::bootstrap(
            valuation(),
            &[contract(1, 0.0), contract(2, 0.0)],
            0.4,
            flat_discount(),
            &CreditCurveConfig::default(),
        )
        .unwrap();
        for &h in curve.hazard_rates() {
            assert!(h.abs() < 1e-10);
        }
    }

    #[test]
    fn test_diagnostics_report_each_instrument() {
        let contracts = [contract(1, 0.005), contract(3, 0.007), contract(5, 0.009)];
        let result = CreditCurve::bootstrap_with_diagnostics(
            valuation(),
            &contracts,
            0.4,
            flat_discount(),
            &CreditCurveConfig::default(),
        )
        .unwrap();
        assert_eq!(result.residuals.len(), 3);
        assert_eq!(result.iterations.len(), 3);
        for r in result.residuals {
            assert!(r.abs() < 1e-8);
        }
    }

    #[test]
    fn test_inverted_curve_needs_negative_hazard() {
        // A 2Y spread far below the 1Y spread forces a negative second segment
        let contracts = [contract(1, 0.05), contract(2, 0.01)];
        let curve = CreditCurve::bootstrap(
            valuation(),
            &contracts,
            0.4,
            flat_discount(),
            &CreditCurveConfig::default(),
        )
        .unwrap();
        assert!(curve.hazard_rates()[1] < 0.0);
        assert!(curve.values()[1] <= 1.0);
    }

    #[test]
    fn test_floor_rejects_impossible_inversion() {
        let contracts = [contract(1, 0.05), contract(2, 0.001)];
        let config = CreditCurveConfig::default().with_hazard_floor(-0.01);
        let err = CreditCurve::bootstrap(valuation(), &contracts, 0.4, flat_discount(), &config)
            .unwrap_err();
        assert!(matches!(err, CreditError::HazardRateBelowFloor { instrument: 1, .. }));
        assert!(err.is_numeric_domain());
    }

    // ========================================
    // Error Tests
    // ========================================

    #[test]
    fn test_empty_contracts() {
        let err = CreditCurve::bootstrap(
            valuation(),
            &[],
            0.4,
            flat_discount(),
            &CreditCurveConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CreditError::InsufficientData { .. }));
    }

    #[test]
    fn test_duplicate_maturity_rejected() {
        let err = CreditCurve::bootstrap(
            valuation(),
            &[contract(2, 0.01), contract(2, 0.012)],
            0.4,
            flat_discount(),
            &CreditCurveConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CreditError::NonIncreasingMaturity { index: 1, .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_invalid_recovery_rejected() {
        let err = CreditCurve::bootstrap(
            valuation(),
            &[contract(2, 0.01)],
            1.2,
            flat_discount(),
            &CreditCurveConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CreditError::InvalidRecoveryRate { .. }));
    }

    #[test]
    fn test_step_in_before_valuation_is_configuration() {
        let err = CreditCurve::bootstrap(
            valuation().add_days(10).unwrap(),
            &[contract(2, 0.01)],
            0.4,
            flat_discount(),
            &CreditCurveConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CreditError::Cds(CdsError::StepInBeforeValuation { .. })
        ));
        assert!(err.is_configuration());
    }

    proptest! {
        #[test]
        fn prop_survival_monotone_for_non_negative_hazards(
            hazards in prop::collection::vec(0.0f64..0.5, 1..8),
            t1 in 0.0f64..12.0,
            dt in 0.0f64..5.0,
        ) {
            let curve = manual_curve(hazards);
            let q1 = curve.survival_prob(t1);
            let q2 = curve.survival_prob(t1 + dt);
            prop_assert!(q2 <= q1);
            prop_assert!(q1 <= 1.0 && q2 > 0.0);
        }
    }
}

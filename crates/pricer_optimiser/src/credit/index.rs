//! CDS index aggregation and hazard rate adjustment.
//!
//! An index is priced as the equally weighted basket of its constituents.
//! Its intrinsic spread rarely matches the traded index spread, so the
//! adjustment scales every constituent hazard rate tenor by tenor until
//! the basket reproduces the quoted index contracts.
//!
//! # Adjustment scheme
//!
//! For tenors `T_1 < … < T_m` a multiplier `α_k` scales every hazard on
//! `(T_{k-1}, T_k]`. Tenors are solved in order with earlier multipliers
//! frozen, and the last multiplier also applies beyond `T_m`. The target at
//! tenor `k` is a zero spread gap
//!
//! ```text
//! gap_k(α) = (Σ PROT_i - c_k Σ RPV01_i - n U_k) / Σ RPV01_i
//! ```

use std::sync::Arc;

use pricer_core::market_data::curves::YieldCurve;
use pricer_core::math::solvers::BracketedNewtonSolver;
use pricer_core::types::{Date, SolverError};
use pricer_models::instruments::credit::CreditDefaultSwap;
use tracing::{debug, trace, warn};

use super::config::IndexAdjustmentConfig;
use super::curve::CreditCurve;
use super::error::CreditError;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Tenor boundaries closer than this to an existing knot reuse the knot.
const KNOT_TOLERANCE: f64 = 1e-12;

/// Adjusted curves with the calibrated multiplier term structure.
#[derive(Debug, Clone)]
pub struct IndexAdjustmentResult<D> {
    /// Adjusted constituent curves, in input order
    pub curves: Vec<CreditCurve<D>>,
    /// Hazard multiplier per index tenor
    pub factors: Vec<f64>,
    /// Solver iterations per index tenor
    pub iterations: Vec<usize>,
    /// Remaining spread gap per index tenor
    pub spread_gaps: Vec<f64>,
}

/// A constituent curve re-gridded on the union of its knots and the index
/// tenors, with each segment tagged by the tenor it belongs to.
#[derive(Debug, Clone)]
struct TenorGrid {
    times: Vec<f64>,
    hazards: Vec<f64>,
    buckets: Vec<usize>,
}

impl TenorGrid {
    /// Tenor times are measured in the curve's own time basis.
    fn new<D>(curve: &CreditCurve<D>, tenor_dates: &[Date]) -> Self {
        let basis = curve.pricing_config().time_basis;
        let tenor_times: Vec<f64> = tenor_dates
            .iter()
            .map(|&d| basis.year_fraction(curve.valuation_date(), d))
            .collect();
        Self::from_times(curve, &tenor_times)
    }

    fn from_times<D>(curve: &CreditCurve<D>, tenor_times: &[f64]) -> Self {
        let mut times = curve.times().to_vec();
        for &tenor in tenor_times {
            if !times.iter().any(|&t| (t - tenor).abs() < KNOT_TOLERANCE) {
                times.push(tenor);
            }
        }
        times.sort_by(f64::total_cmp);

        let last = tenor_times.len() - 1;
        let hazards = times.iter().map(|&t| curve.hazard_rate(t)).collect();
        let buckets = times
            .iter()
            .map(|&t| {
                tenor_times
                    .iter()
                    .position(|&tenor| t <= tenor + KNOT_TOLERANCE)
                    .unwrap_or(last)
            })
            .collect();

        Self {
            times,
            hazards,
            buckets,
        }
    }

    fn apply<D, F>(&self, curve: &CreditCurve<D>, factor: &F) -> Result<CreditCurve<D>, CreditError>
    where
        D: YieldCurve<f64>,
        F: Fn(usize) -> f64,
    {
        let hazards = self
            .hazards
            .iter()
            .zip(&self.buckets)
            .map(|(&h, &b)| h * factor(b))
            .collect();
        CreditCurve::from_hazard_rates(
            curve.valuation_date(),
            curve.recovery_rate(),
            Arc::clone(curve.discount_curve()),
            self.times.clone(),
            hazards,
            *curve.pricing_config(),
        )
    }
}

/// Aggregation and calibration service over a basket of credit curves.
///
/// Stateless apart from its configuration; every operation returns new
/// values and leaves the input curves untouched.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pricer_core::market_data::curves::FlatCurve;
/// use pricer_core::types::time::Date;
/// use pricer_models::instruments::credit::CreditDefaultSwap;
/// use pricer_optimiser::credit::{CreditCurve, CreditCurveConfig, CreditIndexPortfolio};
///
/// let valuation = Date::from_ymd(2018, 12, 20).unwrap();
/// let maturity = Date::from_ymd(2023, 12, 20).unwrap();
/// let discount = Arc::new(FlatCurve::new(0.02));
///
/// let curves: Vec<_> = [0.008, 0.012]
///     .iter()
///     .map(|&s| {
///         let cds = CreditDefaultSwap::new(valuation, maturity, s, 1.0).unwrap();
///         CreditCurve::bootstrap(valuation, &[cds], 0.4, Arc::clone(&discount), &CreditCurveConfig::default())
///             .unwrap()
///     })
///     .collect();
///
/// let portfolio = CreditIndexPortfolio::default();
/// let adjusted = portfolio
///     .hazard_rate_adjust_intrinsic(valuation, &curves, &[0.011], &[0.0], &[maturity], 0.4, 1e-10)
///     .unwrap();
///
/// let intrinsic = portfolio.intrinsic_spread(valuation, valuation, maturity, &adjusted).unwrap();
/// assert!((intrinsic - 0.011).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CreditIndexPortfolio {
    config: IndexAdjustmentConfig,
}

impl CreditIndexPortfolio {
    /// Create a portfolio service with the given configuration.
    pub fn new(config: IndexAdjustmentConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &IndexAdjustmentConfig {
        &self.config
    }

    fn index_contract(&self, step_in: Date, maturity: Date) -> Result<CreditDefaultSwap, CreditError> {
        Ok(CreditDefaultSwap::builder(step_in, maturity)
            .frequency(self.config.frequency)
            .day_count(self.config.day_count)
            .calendar(self.config.calendar)
            .business_day_convention(self.config.business_day_convention)
            .date_rule(self.config.date_rule)
            .build()?)
    }

    /// Protection leg and clean risky PV01 of `cds` on every curve, each
    /// priced with the settings its curve was calibrated under.
    ///
    /// `recovery` overrides each curve's own recovery rate.
    fn constituent_legs<D>(
        cds: &CreditDefaultSwap,
        curves: &[CreditCurve<D>],
        recovery: Option<f64>,
    ) -> Result<Vec<(f64, f64)>, CreditError>
    where
        D: YieldCurve<f64> + Send + Sync,
    {
        let legs = |curve: &CreditCurve<D>| -> Result<(f64, f64), CreditError> {
            let pricer = curve.pricer();
            let r = recovery.unwrap_or(curve.recovery_rate());
            Ok((pricer.protection_leg_pv(cds, r)?, pricer.risky_pv01(cds)?))
        };

        #[cfg(feature = "parallel")]
        {
            curves.par_iter().map(legs).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            curves.iter().map(legs).collect()
        }
    }

    fn check_curves<D>(valuation_date: Date, curves: &[CreditCurve<D>]) -> Result<(), CreditError> {
        if curves.is_empty() {
            return Err(CreditError::InsufficientData {
                required: 1,
                provided: 0,
            });
        }
        if let Some(curve) = curves.iter().find(|c| c.valuation_date() != valuation_date) {
            return Err(CreditError::invalid_input(format!(
                "curve valued on {} used at {}",
                curve.valuation_date(),
                valuation_date
            )));
        }
        Ok(())
    }

    /// Mean of the constituent par spreads of a zero-coupon index contract.
    ///
    /// Each constituent is priced at its own recovery rate and pricing
    /// settings, so the result is the mean of
    /// [`CreditDefaultSwap::par_spread_with_recovery`] at each curve's
    /// recovery. [`CreditDefaultSwap::par_spread`] quotes at the standard
    /// recovery instead and only agrees when the two coincide.
    ///
    /// # Errors
    ///
    /// - `InsufficientData` for an empty basket
    /// - `NonPositiveAnnuity` if a constituent annuity is not positive
    /// - `Cds` if the contract cannot be built or priced
    pub fn average_spread<D>(
        &self,
        valuation_date: Date,
        step_in_date: Date,
        maturity_date: Date,
        curves: &[CreditCurve<D>],
    ) -> Result<f64, CreditError>
    where
        D: YieldCurve<f64> + Send + Sync,
    {
        Self::check_curves(valuation_date, curves)?;
        let cds = self.index_contract(step_in_date, maturity_date)?;
        let legs = Self::constituent_legs(&cds, curves, None)?;

        let mut total = 0.0;
        for (prot, rpv01) in &legs {
            if *rpv01 <= 0.0 {
                return Err(CreditError::NonPositiveAnnuity { annuity: *rpv01 });
            }
            total += prot / rpv01;
        }
        Ok(total / legs.len() as f64)
    }

    /// Basket spread `Σ PROT_i / Σ RPV01_i` of a zero-coupon index contract.
    ///
    /// # Errors
    ///
    /// Same as [`average_spread`](Self::average_spread).
    pub fn intrinsic_spread<D>(
        &self,
        valuation_date: Date,
        step_in_date: Date,
        maturity_date: Date,
        curves: &[CreditCurve<D>],
    ) -> Result<f64, CreditError>
    where
        D: YieldCurve<f64> + Send + Sync,
    {
        Self::check_curves(valuation_date, curves)?;
        let cds = self.index_contract(step_in_date, maturity_date)?;
        let (prot, rpv01) = sum_legs(&Self::constituent_legs(&cds, curves, None)?);
        if rpv01 <= 0.0 {
            return Err(CreditError::NonPositiveAnnuity { annuity: rpv01 });
        }
        Ok(prot / rpv01)
    }

    /// Scale constituent hazard rates so the basket reprices the index.
    ///
    /// Returns the adjusted curves in input order.
    ///
    /// # Errors
    ///
    /// See [`hazard_rate_adjust_intrinsic_with_factors`](Self::hazard_rate_adjust_intrinsic_with_factors).
    #[allow(clippy::too_many_arguments)]
    pub fn hazard_rate_adjust_intrinsic<D>(
        &self,
        valuation_date: Date,
        curves: &[CreditCurve<D>],
        index_coupons: &[f64],
        index_upfronts: &[f64],
        index_maturity_dates: &[Date],
        index_recovery_rate: f64,
        tolerance: f64,
    ) -> Result<Vec<CreditCurve<D>>, CreditError>
    where
        D: YieldCurve<f64> + Send + Sync,
    {
        self.hazard_rate_adjust_intrinsic_with_factors(
            valuation_date,
            curves,
            index_coupons,
            index_upfronts,
            index_maturity_dates,
            index_recovery_rate,
            tolerance,
        )
        .map(|result| result.curves)
    }

    /// Scale constituent hazard rates and report the multipliers.
    ///
    /// # Errors
    ///
    /// - `InsufficientData` for no curves or no tenors
    /// - `LengthMismatch` if upfronts or maturities disagree with coupons
    /// - `NonIncreasingMaturity` if index maturities are not increasing
    /// - `InvalidRecoveryRate`, `InvalidInput` for bad recovery or tolerance
    /// - `CalibrationConvergence` if a tenor multiplier cannot be found
    #[allow(clippy::too_many_arguments)]
    pub fn hazard_rate_adjust_intrinsic_with_factors<D>(
        &self,
        valuation_date: Date,
        curves: &[CreditCurve<D>],
        index_coupons: &[f64],
        index_upfronts: &[f64],
        index_maturity_dates: &[Date],
        index_recovery_rate: f64,
        tolerance: f64,
    ) -> Result<IndexAdjustmentResult<D>, CreditError>
    where
        D: YieldCurve<f64> + Send + Sync,
    {
        self.config.validate()?;
        Self::check_curves(valuation_date, curves)?;
        let m = index_coupons.len();
        if m == 0 {
            return Err(CreditError::InsufficientData {
                required: 1,
                provided: 0,
            });
        }
        if index_upfronts.len() != m {
            return Err(CreditError::length_mismatch("index_upfronts", m, index_upfronts.len()));
        }
        if index_maturity_dates.len() != m {
            return Err(CreditError::length_mismatch(
                "index_maturity_dates",
                m,
                index_maturity_dates.len(),
            ));
        }
        for (k, pair) in index_maturity_dates.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(CreditError::NonIncreasingMaturity {
                    index: k + 1,
                    maturity: pair[1],
                    previous: pair[0],
                });
            }
        }
        CreditError::check_recovery(index_recovery_rate)?;
        if !(tolerance > 0.0 && tolerance.is_finite()) {
            return Err(CreditError::invalid_input(format!(
                "tolerance must be positive, got {tolerance}"
            )));
        }

        if index_maturity_dates[0] <= valuation_date {
            return Err(CreditError::invalid_input(format!(
                "index maturity {} is not after valuation date {}",
                index_maturity_dates[0], valuation_date
            )));
        }

        let grids: Vec<TenorGrid> = curves
            .iter()
            .map(|c| TenorGrid::new(c, index_maturity_dates))
            .collect();
        let n = curves.len() as f64;
        let solver = BracketedNewtonSolver::new(self.config.solver.with_absolute_tolerance(tolerance));

        let mut factors: Vec<f64> = Vec::with_capacity(m);
        let mut iterations = Vec::with_capacity(m);
        let mut spread_gaps = Vec::with_capacity(m);

        for k in 0..m {
            let cds = self.index_contract(valuation_date, index_maturity_dates[k])?;
            let (coupon, upfront) = (index_coupons[k], index_upfronts[k]);

            let solution = {
                let frozen = &factors;
                let gap = |alpha: f64| -> Result<f64, CreditError> {
                    let factor = |b: usize| if b < k { frozen[b] } else { alpha };
                    let trial = rebuild(curves, &grids, &factor)?;
                    let (prot, rpv01) = sum_legs(&Self::constituent_legs(
                        &cds,
                        &trial,
                        Some(index_recovery_rate),
                    )?);
                    if rpv01 <= 0.0 {
                        return Err(CreditError::NonPositiveAnnuity { annuity: rpv01 });
                    }
                    let g = (prot - coupon * rpv01 - n * upfront) / rpv01;
                    trace!(tenor = k, alpha = alpha, gap = g, "index adjustment objective");
                    Ok(g)
                };
                self.solve_factor(&solver, k, gap)?
            };

            if solution.residual.abs() > tolerance {
                return Err(CreditError::CalibrationConvergence {
                    tenor: k,
                    spread_gap: solution.residual,
                    iterations: solution.iterations,
                });
            }

            debug!(
                tenor = k,
                maturity = %index_maturity_dates[k],
                alpha = solution.root,
                gap = solution.residual,
                iterations = solution.iterations,
                "solved index hazard multiplier"
            );
            factors.push(solution.root);
            iterations.push(solution.iterations);
            spread_gaps.push(solution.residual);
        }

        let curves = rebuild(curves, &grids, &|b: usize| factors[b])?;
        Ok(IndexAdjustmentResult {
            curves,
            factors,
            iterations,
            spread_gaps,
        })
    }

    fn solve_factor<F>(
        &self,
        solver: &BracketedNewtonSolver<f64>,
        tenor: usize,
        mut gap: F,
    ) -> Result<pricer_core::math::solvers::RootSolution<f64>, CreditError>
    where
        F: FnMut(f64) -> Result<f64, CreditError>,
    {
        let g_lo = gap(0.0)?;
        if g_lo > 0.0 {
            return Err(CreditError::CalibrationConvergence {
                tenor,
                spread_gap: g_lo,
                iterations: 0,
            });
        }

        let mut hi = self.config.initial_upper;
        let mut g_hi = gap(hi)?;
        while g_hi < 0.0 {
            if hi >= self.config.max_multiplier {
                return Err(CreditError::CalibrationConvergence {
                    tenor,
                    spread_gap: g_hi,
                    iterations: 0,
                });
            }
            hi = (2.0 * hi).min(self.config.max_multiplier);
            warn!(tenor = tenor, upper = hi, "extending hazard multiplier bracket");
            g_hi = gap(hi)?;
        }

        solver
            .find_root_with_values(&mut gap, (0.0, g_lo), (hi, g_hi))
            .map_err(|err| match err {
                CreditError::Solver(SolverError::MaxIterationsExceeded {
                    iterations,
                    residual,
                    ..
                }) => CreditError::CalibrationConvergence {
                    tenor,
                    spread_gap: residual,
                    iterations,
                },
                CreditError::Solver(SolverError::NoBracket { fa, fb, .. }) => {
                    CreditError::CalibrationConvergence {
                        tenor,
                        spread_gap: if fa.abs() < fb.abs() { fa } else { fb },
                        iterations: 0,
                    }
                }
                other => other,
            })
    }
}

fn sum_legs(legs: &[(f64, f64)]) -> (f64, f64) {
    legs.iter()
        .fold((0.0, 0.0), |(p, r), &(prot, rpv01)| (p + prot, r + rpv01))
}

fn rebuild<D, F>(
    curves: &[CreditCurve<D>],
    grids: &[TenorGrid],
    factor: &F,
) -> Result<Vec<CreditCurve<D>>, CreditError>
where
    D: YieldCurve<f64> + Send + Sync,
    F: Fn(usize) -> f64 + Sync,
{
    let build = |(curve, grid): (&CreditCurve<D>, &TenorGrid)| grid.apply(curve, factor);

    #[cfg(feature = "parallel")]
    {
        curves.par_iter().zip(grids.par_iter()).map(build).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        curves.iter().zip(grids).map(build).collect()
    }
}

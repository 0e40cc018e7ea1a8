//! CDS pricing against a discount curve and a survival curve.
//!
//! # Pricing Model
//!
//! All leg values are per unit notional. With `α_i` the accrual fraction of
//! premium period `i`, `P(t)` the discount factor and `Q(t)` the survival
//! probability:
//!
//! ## Premium Leg
//!
//! ```text
//! RPV01_full  = Σ α_i P(pay_i) [Q(e_i) + ½ (Q(s_i) - Q(e_i))]
//! RPV01_clean = RPV01_full - accrued(step_in)
//! ```
//!
//! where `s_i` is the later of the period start and the step-in date. The
//! half term is the premium accrued on default and is dropped when accrual
//! on default is switched off.
//!
//! ## Protection Leg
//!
//! ```text
//! PROT = (1 - R) ∫ P(t) dQ(t)
//! ```
//!
//! integrated numerically from step-in to maturity.
//!
//! # Example
//!
//! ```
//! use pricer_models::instruments::credit::{CdsPricer, CreditDefaultSwap};
//! use pricer_core::market_data::curves::{FlatCurve, FlatHazardRateCurve};
//! use pricer_core::types::time::Date;
//!
//! let valuation = Date::from_ymd(2024, 3, 20).unwrap();
//! let cds = CreditDefaultSwap::new(valuation, valuation.add_months(60).unwrap(), 0.01, 1.0).unwrap();
//!
//! let discount = FlatCurve::new(0.03);
//! let survival = FlatHazardRateCurve::new(0.02);
//!
//! let pricer = CdsPricer::new(&discount, &survival, valuation);
//! let spread = pricer.par_spread_with_recovery(&cds, 0.4).unwrap();
//!
//! // Credit triangle: s ≈ h (1 - R)
//! assert!((spread - 0.012).abs() < 5e-4);
//! ```

use pricer_core::market_data::curves::{SurvivalCurve, YieldCurve};
use pricer_core::types::time::{Date, DayCountConvention};

use super::cds::CreditDefaultSwap;
use super::error::CdsError;

/// Grid points closer than this are merged.
const GRID_MERGE_TOLERANCE: f64 = 1e-12;

/// Quadrature used for the protection leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProtectionIntegration {
    /// Discount at the mid-point of each step times the default probability
    /// over the step.
    #[default]
    MidPoint,
    /// Exact integral assuming hazard and short rate are flat within each step.
    FlatHazardClosedForm,
}

/// Settings shared by every CDS valuation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CdsPricingConfig {
    /// Basis converting dates into curve times.
    pub time_basis: DayCountConvention,
    /// Protection leg integration steps per year.
    pub steps_per_year: u32,
    /// Protection leg quadrature.
    pub integration: ProtectionIntegration,
    /// Include premium accrued up to the default time.
    pub accrual_on_default: bool,
    /// Recovery used when quoting par spreads.
    pub standard_recovery: f64,
}

impl Default for CdsPricingConfig {
    fn default() -> Self {
        Self {
            time_basis: DayCountConvention::Act365Fixed,
            steps_per_year: 52,
            integration: ProtectionIntegration::MidPoint,
            accrual_on_default: true,
            standard_recovery: 0.4,
        }
    }
}

impl CdsPricingConfig {
    /// Set the time basis.
    pub fn with_time_basis(mut self, basis: DayCountConvention) -> Self {
        self.time_basis = basis;
        self
    }

    /// Set the protection leg grid density.
    pub fn with_steps_per_year(mut self, steps: u32) -> Self {
        self.steps_per_year = steps;
        self
    }

    /// Set the protection leg quadrature.
    pub fn with_integration(mut self, integration: ProtectionIntegration) -> Self {
        self.integration = integration;
        self
    }

    /// Switch accrual on default on or off.
    pub fn with_accrual_on_default(mut self, enabled: bool) -> Self {
        self.accrual_on_default = enabled;
        self
    }

    /// Set the quoting recovery rate.
    pub fn with_standard_recovery(mut self, recovery: f64) -> Self {
        self.standard_recovery = recovery;
        self
    }

    /// Check the settings.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if `steps_per_year` is zero
    /// - `InvalidRecoveryRate` if the standard recovery is outside [0, 1]
    pub fn validate(&self) -> Result<(), CdsError> {
        if self.steps_per_year == 0 {
            return Err(CdsError::InvalidParameter {
                name: "steps_per_year",
                reason: "must be at least 1".to_string(),
            });
        }
        CdsError::check_recovery(self.standard_recovery)
    }
}

/// Curve that knows the settings it should be priced under.
///
/// The valuation shortcuts on [`CreditDefaultSwap`] take their settings
/// from here, so a curve calibrated with non-default settings reprices its
/// own quotes.
pub trait CdsPricingSource {
    /// Pricing settings for contracts valued on this curve.
    fn cds_pricing_config(&self) -> CdsPricingConfig {
        CdsPricingConfig::default()
    }
}

impl<C: CdsPricingSource + ?Sized> CdsPricingSource for &C {
    fn cds_pricing_config(&self) -> CdsPricingConfig {
        (**self).cds_pricing_config()
    }
}

/// Full valuation breakdown of a CDS.
///
/// Leg values are in currency units; annuities are per unit notional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CdsPriceResult {
    /// Protection leg value.
    pub protection_leg_pv: f64,
    /// Clean premium leg value at the contract coupon.
    pub premium_leg_pv: f64,
    /// Value to the holder after upfront.
    pub npv: f64,
    /// Par spread at the pricing recovery.
    pub par_spread: f64,
    /// Clean risky PV01 per unit notional.
    pub risky_pv01: f64,
    /// Premium accrued at step-in.
    pub accrued_premium: f64,
}

/// CDS pricer using a discount curve and a survival curve.
///
/// # Type Parameters
///
/// * `D` - Discount curve implementing `YieldCurve<f64>`
/// * `C` - Survival curve implementing `SurvivalCurve<f64>`
pub struct CdsPricer<'a, D, C> {
    discount_curve: &'a D,
    survival_curve: &'a C,
    valuation_date: Date,
    config: CdsPricingConfig,
}

impl<'a, D, C> CdsPricer<'a, D, C>
where
    D: YieldCurve<f64>,
    C: SurvivalCurve<f64>,
{
    /// Create a pricer with default settings.
    ///
    /// Curve time zero corresponds to `valuation_date`.
    pub fn new(discount_curve: &'a D, survival_curve: &'a C, valuation_date: Date) -> Self {
        Self {
            discount_curve,
            survival_curve,
            valuation_date,
            config: CdsPricingConfig::default(),
        }
    }

    /// Replace the pricing settings.
    pub fn with_config(mut self, config: CdsPricingConfig) -> Self {
        self.config = config;
        self
    }

    /// Pricing settings.
    #[inline]
    pub fn config(&self) -> &CdsPricingConfig {
        &self.config
    }

    /// Curve valuation date.
    #[inline]
    pub fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    #[inline]
    fn time(&self, date: Date) -> f64 {
        self.config.time_basis.year_fraction(self.valuation_date, date)
    }

    fn check(&self, cds: &CreditDefaultSwap) -> Result<(), CdsError> {
        self.config.validate()?;
        if cds.step_in() < self.valuation_date {
            return Err(CdsError::StepInBeforeValuation {
                step_in: cds.step_in(),
                valuation_date: self.valuation_date,
            });
        }
        Ok(())
    }

    /// Dirty risky PV01 per unit notional.
    ///
    /// # Errors
    ///
    /// - `StepInBeforeValuation` if the contract starts before the curve
    /// - `MarketData` if a curve lookup fails
    pub fn risky_pv01_full(&self, cds: &CreditDefaultSwap) -> Result<f64, CdsError> {
        self.check(cds)?;
        let step_in = cds.step_in();

        let mut rpv01 = 0.0;
        for period in cds.schedule().periods() {
            if period.end() <= step_in {
                continue;
            }
            let accrual_start = period.start().max(step_in);

            let df = self.discount_curve.discount_factor(self.time(period.payment()))?;
            let q_end = self.survival_curve.survival_probability(self.time(period.end()))?;

            let survival = if self.config.accrual_on_default {
                let q_start = self
                    .survival_curve
                    .survival_probability(self.time(accrual_start))?;
                q_end + 0.5 * (q_start - q_end)
            } else {
                q_end
            };

            rpv01 += period.year_fraction() * df * survival;
        }
        Ok(rpv01)
    }

    /// Clean risky PV01 per unit notional (dirty less accrued at step-in).
    pub fn risky_pv01(&self, cds: &CreditDefaultSwap) -> Result<f64, CdsError> {
        Ok(self.risky_pv01_full(cds)? - cds.accrued_fraction())
    }

    /// Protection leg value per unit notional.
    ///
    /// # Errors
    ///
    /// - `InvalidRecoveryRate` if `recovery_rate` is outside [0, 1]
    /// - `StepInBeforeValuation` if the contract starts before the curve
    /// - `MarketData` if a curve lookup fails
    pub fn protection_leg_pv(
        &self,
        cds: &CreditDefaultSwap,
        recovery_rate: f64,
    ) -> Result<f64, CdsError> {
        CdsError::check_recovery(recovery_rate)?;
        self.check(cds)?;

        let t0 = self.time(cds.step_in());
        let t1 = self.time(cds.maturity());
        let span = t1 - t0;
        if span <= 0.0 {
            return Ok(0.0);
        }

        let grid = self.protection_grid(t0, t1);
        let mut t_left = grid[0];
        let mut q_left = self.survival_curve.survival_probability(t_left)?;
        let mut z_left = self.discount_curve.discount_factor(t_left)?;

        let mut prot = 0.0;
        for &t_right in &grid[1..] {
            let q_right = self.survival_curve.survival_probability(t_right)?;

            prot += match self.config.integration {
                ProtectionIntegration::MidPoint => {
                    let df = self.discount_curve.discount_factor(0.5 * (t_left + t_right))?;
                    df * (q_left - q_right)
                }
                ProtectionIntegration::FlatHazardClosedForm => {
                    let z_right = self.discount_curve.discount_factor(t_right)?;
                    let step = self.closed_form_step(
                        (t_left, q_left, z_left),
                        (t_right, q_right, z_right),
                    )?;
                    z_left = z_right;
                    step
                }
            };

            t_left = t_right;
            q_left = q_right;
        }

        Ok((1.0 - recovery_rate) * prot)
    }

    /// Integration points from `t0` to `t1` inclusive.
    ///
    /// Uniform at `steps_per_year`. The closed form also splits at every
    /// survival curve knot inside the span so each step sees one hazard.
    fn protection_grid(&self, t0: f64, t1: f64) -> Vec<f64> {
        let span = t1 - t0;
        let steps = ((span * f64::from(self.config.steps_per_year)).ceil() as usize).max(1);
        let dt = span / steps as f64;

        let mut grid: Vec<f64> = (0..steps).map(|i| t0 + dt * i as f64).collect();
        grid.push(t1);

        if self.config.integration == ProtectionIntegration::FlatHazardClosedForm {
            let knots = self.survival_curve.knot_times();
            let inside = knots.iter().copied().filter(|&k| k > t0 && k < t1);
            grid.extend(inside);
            grid.sort_by(f64::total_cmp);
            grid.dedup_by(|later, earlier| *later - *earlier < GRID_MERGE_TOLERANCE);
        }
        grid
    }

    fn closed_form_step(
        &self,
        (t1, q1, z1): (f64, f64, f64),
        (t2, q2, z2): (f64, f64, f64),
    ) -> Result<f64, CdsError> {
        let dt = t2 - t1;
        if q2 <= 0.0 || z2 <= 0.0 || dt <= 0.0 {
            let df = self.discount_curve.discount_factor(0.5 * (t1 + t2))?;
            return Ok(df * (q1 - q2));
        }

        let h = (q1 / q2).ln() / dt;
        let r = (z1 / z2).ln() / dt;
        let w = r + h;

        if w.abs() < 1e-8 {
            Ok(h * dt * q1 * z1)
        } else {
            Ok(h / w * (1.0 - (-w * dt).exp()) * q1 * z1)
        }
    }

    /// Par spread at the configured standard recovery.
    pub fn par_spread(&self, cds: &CreditDefaultSwap) -> Result<f64, CdsError> {
        self.par_spread_with_recovery(cds, self.config.standard_recovery)
    }

    /// Running spread that makes protection and clean premium legs equal.
    ///
    /// # Errors
    ///
    /// - `NonPositiveAnnuity` if the clean risky PV01 is not positive
    /// - any error from the leg calculations
    pub fn par_spread_with_recovery(
        &self,
        cds: &CreditDefaultSwap,
        recovery_rate: f64,
    ) -> Result<f64, CdsError> {
        let prot = self.protection_leg_pv(cds, recovery_rate)?;
        let rpv01 = self.risky_pv01(cds)?;
        if rpv01 <= 0.0 {
            return Err(CdsError::NonPositiveAnnuity { annuity: rpv01 });
        }
        Ok(prot / rpv01)
    }

    /// Value to the holder in currency units.
    ///
    /// ```text
    /// V = sign × N × (PROT - c × RPV01_clean - upfront)
    /// ```
    pub fn value(&self, cds: &CreditDefaultSwap, recovery_rate: f64) -> Result<f64, CdsError> {
        let prot = self.protection_leg_pv(cds, recovery_rate)?;
        let rpv01 = self.risky_pv01(cds)?;
        Ok(cds.direction().sign() * cds.notional() * (prot - cds.coupon() * rpv01 - cds.upfront()))
    }

    /// Price a CDS and return the full breakdown.
    pub fn price(
        &self,
        cds: &CreditDefaultSwap,
        recovery_rate: f64,
    ) -> Result<CdsPriceResult, CdsError> {
        let prot = self.protection_leg_pv(cds, recovery_rate)?;
        let rpv01 = self.risky_pv01(cds)?;
        if rpv01 <= 0.0 {
            return Err(CdsError::NonPositiveAnnuity { annuity: rpv01 });
        }

        let notional = cds.notional();
        Ok(CdsPriceResult {
            protection_leg_pv: notional * prot,
            premium_leg_pv: notional * cds.coupon() * rpv01,
            npv: cds.direction().sign() * notional * (prot - cds.coupon() * rpv01 - cds.upfront()),
            par_spread: prot / rpv01,
            risky_pv01: rpv01,
            accrued_premium: notional * cds.coupon() * cds.accrued_fraction(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::credit::CdsDirection;
    use approx::assert_relative_eq;
    use pricer_core::market_data::curves::{FlatCurve, FlatHazardRateCurve};
    use pricer_core::market_data::MarketDataError;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn five_year(coupon: f64) -> CreditDefaultSwap {
        CreditDefaultSwap::new(d(2024, 3, 20), d(2029, 3, 20), coupon, 10_000_000.0).unwrap()
    }

    // ========================================
    // Config Tests
    // ========================================

    #[test]
    fn test_config_defaults() {
        let config = CdsPricingConfig::default();
        assert_eq!(config.time_basis, DayCountConvention::Act365Fixed);
        assert_eq!(config.steps_per_year, 52);
        assert_eq!(config.integration, ProtectionIntegration::MidPoint);
        assert!(config.accrual_on_default);
        assert_eq!(config.standard_recovery, 0.4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_zero_steps() {
        let config = CdsPricingConfig::default().with_steps_per_year(0);
        assert!(matches!(
            config.validate(),
            Err(CdsError::InvalidParameter { name: "steps_per_year", .. })
        ));
    }

    // ========================================
    // Leg Tests
    // ========================================

    #[test]
    fn test_zero_hazard_has_no_protection() {
        let discount = FlatCurve::new(0.03);
        let survival = FlatHazardRateCurve::new(0.0);
        let pricer = CdsPricer::new(&discount, &survival, d(2024, 3, 20));

        let cds = five_year(0.01);
        assert_eq!(pricer.protection_leg_pv(&cds, 0.4).unwrap(), 0.0);

        // Risk-free annuity is bounded by the undiscounted accrual
        let rpv01 = pricer.risky_pv01(&cds).unwrap();
        assert!(rpv01 > 4.0 && rpv01 < cds.schedule().total_year_fraction());
    }

    #[test]
    fn test_full_recovery_has_no_protection() {
        let discount = FlatCurve::new(0.03);
        let survival = FlatHazardRateCurve::new(0.05);
        let pricer = CdsPricer::new(&discount, &survival, d(2024, 3, 20));
        assert_eq!(pricer.protection_leg_pv(&five_year(0.01), 1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_credit_triangle() {
        let discount = FlatCurve::new(0.02);
        let survival = FlatHazardRateCurve::new(0.015);
        let pricer = CdsPricer::new(&discount, &survival, d(2024, 3, 20));

        let spread = pricer.par_spread_with_recovery(&five_year(0.01), 0.4).unwrap();
        // ACT/360 accrual against ACT/365F curve time lifts the spread slightly
        assert_relative_eq!(spread, 0.015 * 0.6 * 360.0 / 365.0, max_relative = 0.02);
    }

    #[test]
    fn test_closed_form_matches_mid_point() {
        let discount = FlatCurve::new(0.04);
        let survival = FlatHazardRateCurve::new(0.03);
        let valuation = d(2024, 3, 20);
        let cds = five_year(0.01);

        let mid = CdsPricer::new(&discount, &survival, valuation)
            .protection_leg_pv(&cds, 0.4)
            .unwrap();
        let closed = CdsPricer::new(&discount, &survival, valuation)
            .with_config(
                CdsPricingConfig::default()
                    .with_integration(ProtectionIntegration::FlatHazardClosedForm),
            )
            .protection_leg_pv(&cds, 0.4)
            .unwrap();

        assert_relative_eq!(mid, closed, max_relative = 1e-5);

        // Exact for flat curves
        let t = 1826.0 / 365.0;
        let exact = 0.6 * 0.03 / 0.07 * (1.0 - (-0.07_f64 * t).exp());
        assert_relative_eq!(closed, exact, max_relative = 1e-10);
    }

    /// Hazard 1% to year 2, 5% after.
    struct TwoSegmentCurve {
        knots: [f64; 1],
    }

    impl SurvivalCurve<f64> for TwoSegmentCurve {
        fn survival_probability(&self, t: f64) -> Result<f64, MarketDataError> {
            let t = t.max(0.0);
            let a = self.knots[0];
            Ok(if t <= a {
                (-0.01 * t).exp()
            } else {
                (-0.01 * a - 0.05 * (t - a)).exp()
            })
        }

        fn hazard_rate(&self, t: f64) -> Result<f64, MarketDataError> {
            Ok(if t <= self.knots[0] { 0.01 } else { 0.05 })
        }

        fn knot_times(&self) -> &[f64] {
            &self.knots
        }
    }

    #[test]
    fn test_closed_form_splits_at_knots() {
        let discount = FlatCurve::new(0.03);
        let survival = TwoSegmentCurve { knots: [2.0] };
        let valuation = d(2024, 3, 20);
        let cds = five_year(0.01);

        // One step a year, so the step around year 2 straddles the knot
        let pricing = CdsPricingConfig::default()
            .with_steps_per_year(1)
            .with_integration(ProtectionIntegration::FlatHazardClosedForm);
        let closed = CdsPricer::new(&discount, &survival, valuation)
            .with_config(pricing)
            .protection_leg_pv(&cds, 0.4)
            .unwrap();

        let t = 1826.0 / 365.0;
        let (r, h1, h2, a) = (0.03_f64, 0.01_f64, 0.05_f64, 2.0_f64);
        let first = h1 / (r + h1) * (1.0 - (-(r + h1) * a).exp());
        let second = (-(r + h1) * a).exp() * h2 / (r + h2) * (1.0 - (-(r + h2) * (t - a)).exp());
        assert_relative_eq!(closed, 0.6 * (first + second), max_relative = 1e-10);
    }

    #[test]
    fn test_accrual_on_default_increases_annuity() {
        let discount = FlatCurve::new(0.02);
        let survival = FlatHazardRateCurve::new(0.05);
        let valuation = d(2024, 3, 20);
        let cds = five_year(0.01);

        let with = CdsPricer::new(&discount, &survival, valuation)
            .risky_pv01(&cds)
            .unwrap();
        let without = CdsPricer::new(&discount, &survival, valuation)
            .with_config(CdsPricingConfig::default().with_accrual_on_default(false))
            .risky_pv01(&cds)
            .unwrap();
        assert!(with > without);
    }

    #[test]
    fn test_clean_annuity_excludes_accrued() {
        let discount = FlatCurve::new(0.02);
        let survival = FlatHazardRateCurve::new(0.01);
        let valuation = d(2007, 8, 2);
        let cds = CreditDefaultSwap::new(valuation, d(2010, 9, 20), 0.01, 1.0).unwrap();

        let pricer = CdsPricer::new(&discount, &survival, valuation);
        let full = pricer.risky_pv01_full(&cds).unwrap();
        let clean = pricer.risky_pv01(&cds).unwrap();
        assert_relative_eq!(full - clean, 43.0 / 360.0, epsilon = 1e-14);
    }

    // ========================================
    // Value Tests
    // ========================================

    #[test]
    fn test_value_zero_at_par() {
        let discount = FlatCurve::new(0.03);
        let survival = FlatHazardRateCurve::new(0.02);
        let pricer = CdsPricer::new(&discount, &survival, d(2024, 3, 20));

        let par = pricer.par_spread_with_recovery(&five_year(0.0), 0.4).unwrap();
        let value = pricer.value(&five_year(par), 0.4).unwrap();
        assert!(value.abs() < 1e-6);
    }

    #[test]
    fn test_value_sign_by_direction() {
        let discount = FlatCurve::new(0.03);
        let survival = FlatHazardRateCurve::new(0.02);
        let valuation = d(2024, 3, 20);
        let pricer = CdsPricer::new(&discount, &survival, valuation);

        let buyer = five_year(0.005);
        let seller = CreditDefaultSwap::builder(valuation, d(2029, 3, 20))
            .coupon(0.005)
            .notional(10_000_000.0)
            .direction(CdsDirection::SellProtection)
            .build()
            .unwrap();

        let v_buy = pricer.value(&buyer, 0.4).unwrap();
        let v_sell = pricer.value(&seller, 0.4).unwrap();
        assert!(v_buy > 0.0);
        assert_relative_eq!(v_buy, -v_sell, epsilon = 1e-8);
    }

    #[test]
    fn test_price_breakdown_consistent() {
        let discount = FlatCurve::new(0.03);
        let survival = FlatHazardRateCurve::new(0.02);
        let pricer = CdsPricer::new(&discount, &survival, d(2024, 3, 20));
        let cds = five_year(0.01);

        let result = pricer.price(&cds, 0.4).unwrap();
        assert_relative_eq!(
            result.npv,
            result.protection_leg_pv - result.premium_leg_pv,
            epsilon = 1e-6
        );
        assert_relative_eq!(
            result.par_spread,
            pricer.par_spread_with_recovery(&cds, 0.4).unwrap(),
            epsilon = 1e-14
        );
        assert_eq!(result.accrued_premium, 0.0);
    }

    // ========================================
    // Error Tests
    // ========================================

    #[test]
    fn test_step_in_before_valuation() {
        let discount = FlatCurve::new(0.03);
        let survival = FlatHazardRateCurve::new(0.02);
        let pricer = CdsPricer::new(&discount, &survival, d(2024, 6, 1));

        let err = pricer.risky_pv01(&five_year(0.01)).unwrap_err();
        assert!(matches!(err, CdsError::StepInBeforeValuation { .. }));
    }

    #[test]
    fn test_invalid_recovery() {
        let discount = FlatCurve::new(0.03);
        let survival = FlatHazardRateCurve::new(0.02);
        let pricer = CdsPricer::new(&discount, &survival, d(2024, 3, 20));

        let err = pricer.protection_leg_pv(&five_year(0.01), 1.5).unwrap_err();
        assert!(matches!(err, CdsError::InvalidRecoveryRate { .. }));
    }
}

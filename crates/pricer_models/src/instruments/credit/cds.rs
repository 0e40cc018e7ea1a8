//! Credit Default Swap (CDS) contract definition.
//!
//! A CDS consists of:
//! - **Protection Leg**: Receives `(1 - R)` on a credit event before maturity
//! - **Premium Leg**: Pays the running coupon until default or maturity
//!
//! # Example
//!
//! ```
//! use pricer_models::instruments::credit::{CreditDefaultSwap, CdsDirection};
//! use pricer_core::types::time::Date;
//!
//! let step_in = Date::from_ymd(2018, 12, 20).unwrap();
//! let maturity = step_in.add_months(60).unwrap();
//!
//! let cds = CreditDefaultSwap::builder(step_in, maturity)
//!     .coupon(0.01)
//!     .notional(10_000_000.0)
//!     .direction(CdsDirection::SellProtection)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(cds.schedule().len(), 20);
//! assert_eq!(cds.notional(), 10_000_000.0);
//! ```

use pricer_core::market_data::curves::{SurvivalCurve, YieldCurve};
use pricer_core::types::time::{BusinessDayConvention, Date, DayCountConvention, HolidayCalendar};
use std::fmt;

use super::error::CdsError;
use super::pricing::{CdsPricer, CdsPricingSource};
use crate::schedules::{DateGenerationRule, Frequency, Schedule, ScheduleBuilder};

/// Side of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CdsDirection {
    /// Pay premium, receive protection.
    #[default]
    BuyProtection,
    /// Receive premium, pay protection.
    SellProtection,
}

impl CdsDirection {
    /// +1 for the protection buyer, -1 for the seller.
    #[inline]
    pub fn sign(&self) -> f64 {
        match self {
            CdsDirection::BuyProtection => 1.0,
            CdsDirection::SellProtection => -1.0,
        }
    }
}

impl fmt::Display for CdsDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CdsDirection::BuyProtection => write!(f, "Buy Protection"),
            CdsDirection::SellProtection => write!(f, "Sell Protection"),
        }
    }
}

/// A standardised single-name credit default swap.
///
/// Immutable once built; the premium schedule is derived at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditDefaultSwap {
    step_in: Date,
    maturity: Date,
    coupon: f64,
    notional: f64,
    direction: CdsDirection,
    upfront: f64,
    frequency: Frequency,
    day_count: DayCountConvention,
    calendar: HolidayCalendar,
    convention: BusinessDayConvention,
    rule: DateGenerationRule,
    schedule: Schedule,
}

impl CreditDefaultSwap {
    /// Builds a protection-buyer CDS with standard conventions.
    ///
    /// # Errors
    ///
    /// See [`CdsBuilder::build`].
    pub fn new(step_in: Date, maturity: Date, coupon: f64, notional: f64) -> Result<Self, CdsError> {
        Self::builder(step_in, maturity)
            .coupon(coupon)
            .notional(notional)
            .build()
    }

    /// Starts a builder with standard conventions: quarterly, ACT/360,
    /// weekend calendar, Following, CDS date generation, unit notional.
    pub fn builder(step_in: Date, maturity: Date) -> CdsBuilder {
        CdsBuilder::new(step_in, maturity)
    }

    /// Protection start date.
    #[inline]
    pub fn step_in(&self) -> Date {
        self.step_in
    }

    /// Contract maturity (unadjusted).
    #[inline]
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// Running coupon as a decimal (0.01 = 100bp).
    #[inline]
    pub fn coupon(&self) -> f64 {
        self.coupon
    }

    /// Contract notional.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Contract side.
    #[inline]
    pub fn direction(&self) -> CdsDirection {
        self.direction
    }

    /// Upfront payment as a fraction of notional, paid by the protection buyer.
    #[inline]
    pub fn upfront(&self) -> f64 {
        self.upfront
    }

    /// Coupon frequency.
    #[inline]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Premium accrual day count.
    #[inline]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Holiday calendar used for the schedule.
    #[inline]
    pub fn calendar(&self) -> HolidayCalendar {
        self.calendar
    }

    /// Business-day convention used for the schedule.
    #[inline]
    pub fn business_day_convention(&self) -> BusinessDayConvention {
        self.convention
    }

    /// Date generation rule used for the schedule.
    #[inline]
    pub fn date_rule(&self) -> DateGenerationRule {
        self.rule
    }

    /// Premium accrual schedule.
    #[inline]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Accrual fraction from the start of the period containing step-in up
    /// to step-in; zero when step-in is on a period boundary.
    pub fn accrued_fraction(&self) -> f64 {
        self.schedule
            .periods()
            .iter()
            .find(|p| p.start() < self.step_in && self.step_in < p.end())
            .map(|p| p.accrued_fraction(self.step_in))
            .unwrap_or(0.0)
    }

    /// Clean risky PV01 per unit notional under the curve's pricing settings.
    pub fn risky_pv01<C>(&self, valuation_date: Date, curve: &C) -> Result<f64, CdsError>
    where
        C: YieldCurve<f64> + SurvivalCurve<f64> + CdsPricingSource,
    {
        curve_pricer(curve, valuation_date).risky_pv01(self)
    }

    /// Dirty (full) risky PV01 per unit notional under the curve's pricing settings.
    pub fn risky_pv01_full<C>(&self, valuation_date: Date, curve: &C) -> Result<f64, CdsError>
    where
        C: YieldCurve<f64> + SurvivalCurve<f64> + CdsPricingSource,
    {
        curve_pricer(curve, valuation_date).risky_pv01_full(self)
    }

    /// Protection leg PV per unit notional under the curve's pricing settings.
    pub fn protection_leg_pv<C>(
        &self,
        valuation_date: Date,
        curve: &C,
        recovery_rate: f64,
    ) -> Result<f64, CdsError>
    where
        C: YieldCurve<f64> + SurvivalCurve<f64> + CdsPricingSource,
    {
        curve_pricer(curve, valuation_date).protection_leg_pv(self, recovery_rate)
    }

    /// Par spread at the standard recovery of the curve's pricing settings.
    pub fn par_spread<C>(&self, valuation_date: Date, curve: &C) -> Result<f64, CdsError>
    where
        C: YieldCurve<f64> + SurvivalCurve<f64> + CdsPricingSource,
    {
        curve_pricer(curve, valuation_date).par_spread(self)
    }

    /// Par spread with an explicit recovery rate.
    pub fn par_spread_with_recovery<C>(
        &self,
        valuation_date: Date,
        curve: &C,
        recovery_rate: f64,
    ) -> Result<f64, CdsError>
    where
        C: YieldCurve<f64> + SurvivalCurve<f64> + CdsPricingSource,
    {
        curve_pricer(curve, valuation_date).par_spread_with_recovery(self, recovery_rate)
    }

    /// Net present value to the holder under the curve's pricing settings.
    pub fn value<C>(&self, valuation_date: Date, curve: &C, recovery_rate: f64) -> Result<f64, CdsError>
    where
        C: YieldCurve<f64> + SurvivalCurve<f64> + CdsPricingSource,
    {
        curve_pricer(curve, valuation_date).value(self, recovery_rate)
    }
}

/// Pricer over a combined discount and survival curve with its own settings.
fn curve_pricer<C>(curve: &C, valuation_date: Date) -> CdsPricer<'_, C, C>
where
    C: YieldCurve<f64> + SurvivalCurve<f64> + CdsPricingSource,
{
    CdsPricer::new(curve, curve, valuation_date).with_config(curve.cds_pricing_config())
}

/// Builder for [`CreditDefaultSwap`].
#[derive(Debug, Clone)]
pub struct CdsBuilder {
    step_in: Date,
    maturity: Date,
    coupon: f64,
    notional: f64,
    direction: CdsDirection,
    upfront: f64,
    frequency: Frequency,
    day_count: DayCountConvention,
    calendar: HolidayCalendar,
    convention: BusinessDayConvention,
    rule: DateGenerationRule,
}

impl CdsBuilder {
    /// Builder with standard CDS conventions.
    pub fn new(step_in: Date, maturity: Date) -> Self {
        Self {
            step_in,
            maturity,
            coupon: 0.0,
            notional: 1.0,
            direction: CdsDirection::BuyProtection,
            upfront: 0.0,
            frequency: Frequency::Quarterly,
            day_count: DayCountConvention::Act360,
            calendar: HolidayCalendar::Weekend,
            convention: BusinessDayConvention::Following,
            rule: DateGenerationRule::Cds,
        }
    }

    /// Running coupon as a decimal.
    pub fn coupon(mut self, coupon: f64) -> Self {
        self.coupon = coupon;
        self
    }

    /// Contract notional.
    pub fn notional(mut self, notional: f64) -> Self {
        self.notional = notional;
        self
    }

    /// Contract side.
    pub fn direction(mut self, direction: CdsDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Upfront as a fraction of notional.
    pub fn upfront(mut self, upfront: f64) -> Self {
        self.upfront = upfront;
        self
    }

    /// Coupon frequency.
    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Premium accrual day count.
    pub fn day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Holiday calendar.
    pub fn calendar(mut self, calendar: HolidayCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Business-day convention.
    pub fn business_day_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Date generation rule.
    pub fn date_rule(mut self, rule: DateGenerationRule) -> Self {
        self.rule = rule;
        self
    }

    /// Validates the terms and generates the premium schedule.
    ///
    /// # Errors
    ///
    /// - `InvalidDates` if maturity is not after step-in
    /// - `InvalidNotional` for a non-positive or non-finite notional
    /// - `InvalidParameter` for a non-finite coupon or upfront
    /// - `Schedule` if no premium period can be generated
    pub fn build(self) -> Result<CreditDefaultSwap, CdsError> {
        if self.maturity <= self.step_in {
            return Err(CdsError::InvalidDates {
                step_in: self.step_in,
                maturity: self.maturity,
            });
        }
        if !(self.notional.is_finite() && self.notional > 0.0) {
            return Err(CdsError::InvalidNotional {
                notional: self.notional,
            });
        }
        if !self.coupon.is_finite() {
            return Err(CdsError::InvalidParameter {
                name: "coupon",
                reason: format!("must be finite, got {}", self.coupon),
            });
        }
        if !self.upfront.is_finite() {
            return Err(CdsError::InvalidParameter {
                name: "upfront",
                reason: format!("must be finite, got {}", self.upfront),
            });
        }

        let schedule = ScheduleBuilder::new()
            .start(self.step_in)
            .end(self.maturity)
            .frequency(self.frequency)
            .day_count(self.day_count)
            .calendar(self.calendar)
            .business_day_convention(self.convention)
            .date_rule(self.rule)
            .build()?;

        Ok(CreditDefaultSwap {
            step_in: self.step_in,
            maturity: self.maturity,
            coupon: self.coupon,
            notional: self.notional,
            direction: self.direction,
            upfront: self.upfront,
            frequency: self.frequency,
            day_count: self.day_count,
            calendar: self.calendar,
            convention: self.convention,
            rule: self.rule,
            schedule,
        })
    }
}

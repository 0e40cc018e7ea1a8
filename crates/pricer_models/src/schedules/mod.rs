//! Schedule generation for coupon-paying instruments.
//!
//! This module provides:
//! - [`Schedule`]: A collection of accrual periods
//! - [`Period`]: A single accrual period with start, end, and payment dates
//! - [`Frequency`]: Coupon frequency
//! - [`DateGenerationRule`]: Forward, backward or CDS-standard date rolling
//! - [`ScheduleBuilder`]: Builder for constructing schedules
//!
//! # Examples
//!
//! ```
//! use pricer_models::schedules::{DateGenerationRule, Frequency, ScheduleBuilder};
//! use pricer_core::types::time::{Date, DayCountConvention};
//!
//! let schedule = ScheduleBuilder::new()
//!     .start(Date::from_ymd(2024, 1, 15).unwrap())
//!     .end(Date::from_ymd(2026, 1, 15).unwrap())
//!     .frequency(Frequency::SemiAnnual)
//!     .day_count(DayCountConvention::Act360)
//!     .date_rule(DateGenerationRule::Backward)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(schedule.periods().len(), 4);
//! ```

mod error;
mod frequency;
mod period;
mod rule;
mod schedule;

pub use error::ScheduleError;
pub use frequency::Frequency;
pub use period::Period;
pub use rule::DateGenerationRule;
pub use schedule::{Schedule, ScheduleBuilder};

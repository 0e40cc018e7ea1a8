//! Core time and error types.
//!
//! This module provides:
//! - `time`: Dates, day count conventions, holiday calendars and business-day rules
//! - `error`: Structured error types for date and solver operations
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level:
//! - [`Date`], [`DayCountConvention`], [`BusinessDayConvention`], [`HolidayCalendar`] from `time`
//! - [`DateError`], [`SolverError`] from `error`

pub mod error;
pub mod time;

// Re-export commonly used types at module level
pub use error::{DateError, SolverError};
pub use time::{BusinessDayConvention, Date, DayCountConvention, HolidayCalendar};

//! # pricer_core: Foundation types for credit curve construction
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace, providing:
//! - Time types: `Date`, `DayCountConvention`, `HolidayCalendar`,
//!   `BusinessDayConvention` (`types::time`)
//! - Error types: `DateError`, `SolverError` (`types::error`)
//! - The discount boundary `YieldCurve` and survival boundary `SurvivalCurve`
//!   with flat, interpolated and fitted implementations (`market_data`)
//! - A bracketed Newton root finder (`math::solvers`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - chrono: Date arithmetic
//! - thiserror: Error derives
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::market_data::curves::{FlatCurve, YieldCurve};
//! use pricer_core::types::{Date, DayCountConvention};
//!
//! let valuation = Date::from_ymd(2018, 12, 20).unwrap();
//! let maturity = valuation.next_cds_date(60).unwrap();
//! assert_eq!(maturity, Date::from_ymd(2024, 3, 20).unwrap());
//!
//! let t = DayCountConvention::Act365Fixed.year_fraction(valuation, maturity);
//! let df = FlatCurve::new(0.05_f64).discount_factor(t).unwrap();
//! assert!(df < 1.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for dates, conventions, curves and solver config

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod types;

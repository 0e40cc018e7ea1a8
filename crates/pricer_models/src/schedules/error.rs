//! Schedule generation error types.

use pricer_core::types::{Date, DateError};
use thiserror::Error;

/// Errors that can occur during schedule generation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Start date must be before end date.
    #[error("Start date {start} must be before end date {end}")]
    InvalidDateRange {
        /// The start date.
        start: Date,
        /// The end date.
        end: Date,
    },

    /// Missing required field in builder.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Schedule would generate no periods.
    #[error("Schedule would generate no periods between {start} and {end}")]
    NoPeriods {
        /// The start date.
        start: Date,
        /// The end date.
        end: Date,
    },

    /// A schedule was assembled from an empty period list.
    #[error("Schedule must have at least one period")]
    Empty,

    /// Date arithmetic failed while rolling dates.
    #[error("Date arithmetic failed: {0}")]
    Date(#[from] DateError),
}

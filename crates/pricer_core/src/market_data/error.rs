//! Market data error types.
//!
//! This module provides structured error handling for discount and survival
//! curve lookups and fitted curve parameters.

use thiserror::Error;

/// Market data operation errors.
///
/// # Variants
///
/// - `InvalidMaturity`: Negative time to maturity
/// - `OutOfBounds`: Query outside valid domain
/// - `InsufficientData`: Not enough data points for construction
/// - `NonIncreasingPillars`: Pillar times not strictly increasing
/// - `InvalidParameter`: Curve parameter outside its admissible range
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::MarketDataError;
///
/// let err = MarketDataError::InvalidMaturity { t: -1.0 };
/// assert!(format!("{}", err).contains("-1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Invalid maturity (negative time).
    #[error("Invalid maturity: t = {t}")]
    InvalidMaturity {
        /// The invalid maturity value
        t: f64,
    },

    /// Query point outside valid domain.
    #[error("Out of bounds: {x} not in [{min}, {max}]")]
    OutOfBounds {
        /// The query point that was out of bounds
        x: f64,
        /// Minimum valid value
        min: f64,
        /// Maximum valid value
        max: f64,
    },

    /// Insufficient data for construction.
    #[error("Insufficient data: got {got}, need {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },

    /// Pillar times are not strictly increasing.
    #[error("Pillars must be strictly increasing: t[{index}] = {t}")]
    NonIncreasingPillars {
        /// Index of the offending pillar
        index: usize,
        /// Time of the offending pillar
        t: f64,
    },

    /// Curve parameter outside its admissible range.
    #[error("Invalid curve parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_maturity_display() {
        let err = MarketDataError::InvalidMaturity { t: -1.5 };
        assert_eq!(format!("{}", err), "Invalid maturity: t = -1.5");
    }

    #[test]
    fn test_out_of_bounds_display() {
        let err = MarketDataError::OutOfBounds {
            x: 5.0,
            min: 0.0,
            max: 3.0,
        };
        assert_eq!(format!("{}", err), "Out of bounds: 5 not in [0, 3]");
    }

    #[test]
    fn test_insufficient_data_display() {
        let err = MarketDataError::InsufficientData { got: 1, need: 2 };
        assert_eq!(format!("{}", err), "Insufficient data: got 1, need 2");
    }

    #[test]
    fn test_invalid_parameter_display() {
        let err = MarketDataError::InvalidParameter {
            name: "tau",
            reason: "must be positive".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Invalid curve parameter tau: must be positive"
        );
    }
}

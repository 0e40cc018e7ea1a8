//! CDS construction and pricing errors.

use pricer_core::market_data::MarketDataError;
use pricer_core::types::Date;
use thiserror::Error;

use crate::schedules::ScheduleError;

/// Errors raised when building or pricing a credit default swap.
///
/// # Examples
/// ```
/// use pricer_models::instruments::credit::CdsError;
///
/// let err = CdsError::InvalidRecoveryRate { recovery: 1.2 };
/// assert!(err.is_configuration());
/// assert!(format!("{}", err).contains("1.2"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CdsError {
    /// Maturity is not after the step-in date.
    #[error("Maturity {maturity} must be after step-in date {step_in}")]
    InvalidDates {
        /// Protection start
        step_in: Date,
        /// Contract maturity
        maturity: Date,
    },

    /// Step-in date precedes the valuation date.
    #[error("Step-in date {step_in} precedes valuation date {valuation_date}")]
    StepInBeforeValuation {
        /// Protection start
        step_in: Date,
        /// Curve valuation date
        valuation_date: Date,
    },

    /// Recovery rate outside [0, 1].
    #[error("Recovery rate {recovery} must lie in [0, 1]")]
    InvalidRecoveryRate {
        /// The rejected recovery rate
        recovery: f64,
    },

    /// Notional is not strictly positive.
    #[error("Notional must be positive, got {notional}")]
    InvalidNotional {
        /// The rejected notional
        notional: f64,
    },

    /// A contract or pricing parameter is unusable.
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Premium schedule could not be generated.
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Risky annuity is not positive so a spread cannot be formed.
    #[error("Risky annuity must be positive, got {annuity}")]
    NonPositiveAnnuity {
        /// The computed annuity
        annuity: f64,
    },

    /// Curve lookup failed.
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),
}

impl CdsError {
    /// True for errors caused by the contract or configuration rather than
    /// by the numbers produced while pricing.
    pub fn is_configuration(&self) -> bool {
        !matches!(
            self,
            CdsError::NonPositiveAnnuity { .. } | CdsError::MarketData(_)
        )
    }

    pub(crate) fn check_recovery(recovery: f64) -> Result<(), CdsError> {
        if (0.0..=1.0).contains(&recovery) {
            Ok(())
        } else {
            Err(CdsError::InvalidRecoveryRate { recovery })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(CdsError::InvalidNotional { notional: 0.0 }.is_configuration());
        assert!(CdsError::Schedule(ScheduleError::Empty).is_configuration());
        assert!(!CdsError::NonPositiveAnnuity { annuity: 0.0 }.is_configuration());
        assert!(!CdsError::MarketData(MarketDataError::InvalidMaturity { t: -1.0 }).is_configuration());
    }

    #[test]
    fn test_check_recovery() {
        assert!(CdsError::check_recovery(0.0).is_ok());
        assert!(CdsError::check_recovery(1.0).is_ok());
        assert!(CdsError::check_recovery(-0.01).is_err());
        assert!(CdsError::check_recovery(f64::NAN).is_err());
    }
}

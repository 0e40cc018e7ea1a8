//! Credit calibration error types.
//!
//! Every failure of the credit curve bootstrap and the index adjustment is a
//! [`CreditError`]. Callers that only need to decide how to react can use
//! [`CreditError::kind`], which sorts the variants into three groups:
//!
//! - `Configuration`: the inputs are unusable as given
//! - `Convergence`: a root search failed to meet its tolerance
//! - `NumericDomain`: the numbers left their admissible range

use pricer_core::market_data::MarketDataError;
use pricer_core::types::{Date, SolverError};
use pricer_models::instruments::credit::CdsError;
use thiserror::Error;

/// Coarse classification of a [`CreditError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreditErrorKind {
    /// Invalid or inconsistent inputs.
    Configuration,
    /// Root search did not converge.
    Convergence,
    /// Result outside its admissible domain.
    NumericDomain,
}

/// Errors raised while building or adjusting credit curves.
///
/// # Examples
///
/// ```
/// use pricer_optimiser::credit::{CreditError, CreditErrorKind};
///
/// let err = CreditError::ConvergenceFailure {
///     instrument: 3,
///     residual: 1e-6,
///     iterations: 50,
/// };
/// assert_eq!(err.kind(), CreditErrorKind::Convergence);
/// assert!(format!("{}", err).contains("instrument 3"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CreditError {
    /// Not enough inputs to build anything.
    #[error("Insufficient data: need at least {required}, got {provided}")]
    InsufficientData {
        /// Minimum count required
        required: usize,
        /// Count provided
        provided: usize,
    },

    /// Maturities must be strictly increasing.
    #[error("Maturity {maturity} at position {index} is not after {previous}")]
    NonIncreasingMaturity {
        /// Position of the offending entry
        index: usize,
        /// Its maturity
        maturity: Date,
        /// Maturity of the entry before it
        previous: Date,
    },

    /// Recovery rate outside [0, 1].
    #[error("Recovery rate {recovery} must lie in [0, 1]")]
    InvalidRecoveryRate {
        /// The rejected recovery rate
        recovery: f64,
    },

    /// Parallel input arrays disagree in length.
    #[error("Length mismatch for {name}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Name of the mismatched input
        name: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// General invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Hazard rate search failed for a calibration instrument.
    #[error("Failed to converge for instrument {instrument}: residual = {residual} after {iterations} iterations")]
    ConvergenceFailure {
        /// Index of the instrument being solved
        instrument: usize,
        /// Last objective value
        residual: f64,
        /// Iterations used
        iterations: usize,
    },

    /// No hazard rate bracket could be found for a calibration instrument.
    #[error("No hazard rate bracket for instrument {instrument} in [{lower}, {upper}]: values {value_lower} and {value_upper}")]
    NoBracket {
        /// Index of the instrument being solved
        instrument: usize,
        /// Lower end searched
        lower: f64,
        /// Upper end searched
        upper: f64,
        /// Objective at the lower end
        value_lower: f64,
        /// Objective at the upper end
        value_upper: f64,
    },

    /// Index hazard multiplier search failed at a tenor.
    #[error("Index calibration failed at tenor {tenor}: spread gap = {spread_gap} after {iterations} iterations")]
    CalibrationConvergence {
        /// Index of the tenor being solved
        tenor: usize,
        /// Best spread gap reached
        spread_gap: f64,
        /// Iterations used
        iterations: usize,
    },

    /// Root lies below the permitted hazard floor.
    #[error("Hazard rate for instrument {instrument} lies below the floor {floor}")]
    HazardRateBelowFloor {
        /// Index of the instrument being solved
        instrument: usize,
        /// Configured floor
        floor: f64,
    },

    /// Survival probability outside [0, 1].
    #[error("Survival probability {survival} out of range at instrument {instrument}")]
    SurvivalOutOfRange {
        /// Index of the instrument being solved
        instrument: usize,
        /// Offending survival probability
        survival: f64,
    },

    /// Basket risky annuity is not positive.
    #[error("Basket risky annuity must be positive, got {annuity}")]
    NonPositiveAnnuity {
        /// The computed annuity
        annuity: f64,
    },

    /// CDS construction or pricing failed.
    #[error("CDS error: {0}")]
    Cds(#[from] CdsError),

    /// Wrapped solver error.
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    /// Wrapped market data error.
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),
}

impl CreditError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a length mismatch error.
    pub fn length_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            name,
            expected,
            actual,
        }
    }

    /// Check a recovery rate.
    pub(crate) fn check_recovery(recovery: f64) -> Result<(), Self> {
        if (0.0..=1.0).contains(&recovery) {
            Ok(())
        } else {
            Err(Self::InvalidRecoveryRate { recovery })
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> CreditErrorKind {
        match self {
            Self::InsufficientData { .. }
            | Self::NonIncreasingMaturity { .. }
            | Self::InvalidRecoveryRate { .. }
            | Self::LengthMismatch { .. }
            | Self::InvalidInput(_) => CreditErrorKind::Configuration,

            Self::ConvergenceFailure { .. }
            | Self::NoBracket { .. }
            | Self::CalibrationConvergence { .. } => CreditErrorKind::Convergence,

            Self::HazardRateBelowFloor { .. }
            | Self::SurvivalOutOfRange { .. }
            | Self::NonPositiveAnnuity { .. }
            | Self::MarketData(_) => CreditErrorKind::NumericDomain,

            Self::Cds(err) => {
                if err.is_configuration() {
                    CreditErrorKind::Configuration
                } else {
                    CreditErrorKind::NumericDomain
                }
            }

            Self::Solver(err) => match err {
                SolverError::NumericalInstability(_) => CreditErrorKind::NumericDomain,
                _ => CreditErrorKind::Convergence,
            },
        }
    }

    /// Check if this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        self.kind() == CreditErrorKind::Configuration
    }

    /// Check if this is a convergence error.
    pub fn is_convergence(&self) -> bool {
        self.kind() == CreditErrorKind::Convergence
    }

    /// Check if this is a numeric-domain error.
    pub fn is_numeric_domain(&self) -> bool {
        self.kind() == CreditErrorKind::NumericDomain
    }
}

//! Credit calibration configuration types.

use pricer_core::math::solvers::SolverConfig;
use pricer_core::types::time::{BusinessDayConvention, DayCountConvention, HolidayCalendar};
use pricer_models::instruments::credit::CdsPricingConfig;
use pricer_models::schedules::{DateGenerationRule, Frequency};

use super::error::CreditError;

/// Configuration for credit curve bootstrapping.
///
/// # Examples
///
/// ```
/// use pricer_optimiser::credit::CreditCurveConfig;
///
/// let config = CreditCurveConfig::default();
/// assert_eq!(config.solver.max_iterations, 50);
/// assert_eq!(config.hazard_floor, -0.5);
///
/// let config = CreditCurveConfig::builder()
///     .tolerance(1e-12)
///     .max_hazard_rate(32.0)
///     .use_cache(false)
///     .build();
/// assert!(!config.use_cache);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CreditCurveConfig {
    /// Root finder settings for each hazard rate segment.
    ///
    /// `tolerance` is relative on the hazard rate, `absolute_tolerance`
    /// applies to the CDS value per unit notional.
    /// Default: 1e-10, 1e-12, 50 iterations
    pub solver: SolverConfig<f64>,

    /// Lowest hazard rate the search may return.
    ///
    /// Default: -0.5
    pub hazard_floor: f64,

    /// Highest hazard rate the bracket search may reach.
    ///
    /// Default: 16.0
    pub max_hazard_rate: f64,

    /// Settings used to value the calibration instruments.
    pub pricing: CdsPricingConfig,

    /// Reuse curves for identical inputs in [`CachedCreditBootstrapper`].
    ///
    /// Default: true
    ///
    /// [`CachedCreditBootstrapper`]: super::CachedCreditBootstrapper
    pub use_cache: bool,
}

impl Default for CreditCurveConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            hazard_floor: -0.5,
            max_hazard_rate: 16.0,
            pricing: CdsPricingConfig::default(),
            use_cache: true,
        }
    }
}

impl CreditCurveConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration builder for fluent construction.
    pub fn builder() -> CreditCurveConfigBuilder {
        CreditCurveConfigBuilder::new()
    }

    /// Create a high-precision configuration.
    ///
    /// Tighter tolerances (1e-14 / 1e-15) and 200 iterations.
    pub fn high_precision() -> Self {
        Self {
            solver: SolverConfig::high_precision(),
            ..Self::default()
        }
    }

    /// Create a fast configuration for interactive use.
    ///
    /// Relaxed tolerances (1e-6 / 1e-8), 30 iterations and monthly
    /// protection leg steps.
    pub fn fast() -> Self {
        Self {
            solver: SolverConfig::fast(),
            pricing: CdsPricingConfig::default().with_steps_per_year(12),
            ..Self::default()
        }
    }

    /// Set the solver settings.
    pub fn with_solver(mut self, solver: SolverConfig<f64>) -> Self {
        self.solver = solver;
        self
    }

    /// Set the hazard rate floor.
    pub fn with_hazard_floor(mut self, floor: f64) -> Self {
        self.hazard_floor = floor;
        self
    }

    /// Set the bracket ceiling.
    pub fn with_max_hazard_rate(mut self, max: f64) -> Self {
        self.max_hazard_rate = max;
        self
    }

    /// Set the pricing settings.
    pub fn with_pricing(mut self, pricing: CdsPricingConfig) -> Self {
        self.pricing = pricing;
        self
    }

    /// Turn curve caching on or off.
    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    /// Check the settings.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for unusable solver settings or an empty hazard
    /// range; `Cds` for invalid pricing settings.
    pub fn validate(&self) -> Result<(), CreditError> {
        if !self.solver.is_valid() {
            return Err(CreditError::invalid_input(format!(
                "invalid solver settings: {:?}",
                self.solver
            )));
        }
        if !(self.hazard_floor <= 0.0 && self.hazard_floor.is_finite()) {
            return Err(CreditError::invalid_input(format!(
                "hazard floor must be finite and not positive, got {}",
                self.hazard_floor
            )));
        }
        if !(self.max_hazard_rate >= 1.0 && self.max_hazard_rate.is_finite()) {
            return Err(CreditError::invalid_input(format!(
                "max hazard rate must be finite and at least 1, got {}",
                self.max_hazard_rate
            )));
        }
        self.pricing.validate()?;
        Ok(())
    }
}

/// Builder for [`CreditCurveConfig`].
#[derive(Debug, Clone, Default)]
pub struct CreditCurveConfigBuilder {
    config: CreditCurveConfig,
}

impl CreditCurveConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the relative hazard rate tolerance.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.config.solver.tolerance = tolerance;
        self
    }

    /// Set the absolute tolerance on the CDS value per unit notional.
    pub fn absolute_tolerance(mut self, tolerance: f64) -> Self {
        self.config.solver.absolute_tolerance = tolerance;
        self
    }

    /// Set the iteration cap per segment.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.solver.max_iterations = max_iterations;
        self
    }

    /// Set the hazard rate floor.
    pub fn hazard_floor(mut self, floor: f64) -> Self {
        self.config.hazard_floor = floor;
        self
    }

    /// Set the bracket ceiling.
    pub fn max_hazard_rate(mut self, max: f64) -> Self {
        self.config.max_hazard_rate = max;
        self
    }

    /// Set the pricing settings.
    pub fn pricing(mut self, pricing: CdsPricingConfig) -> Self {
        self.config.pricing = pricing;
        self
    }

    /// Turn curve caching on or off.
    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.config.use_cache = use_cache;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> CreditCurveConfig {
        self.config
    }
}

/// Configuration for CDS index hazard rate adjustment.
///
/// The contract fields describe the hypothetical index CDS priced against
/// every constituent curve.
/// Constituent legs are priced with each curve's own pricing settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IndexAdjustmentConfig {
    /// Index coupon frequency.
    pub frequency: Frequency,
    /// Index premium day count.
    pub day_count: DayCountConvention,
    /// Index schedule calendar.
    pub calendar: HolidayCalendar,
    /// Index schedule business-day convention.
    pub business_day_convention: BusinessDayConvention,
    /// Index schedule generation rule.
    pub date_rule: DateGenerationRule,
    /// Multiplier search settings; the absolute tolerance is replaced by
    /// the spread tolerance passed to the adjustment.
    pub solver: SolverConfig<f64>,
    /// Upper end of the initial multiplier bracket.
    ///
    /// Default: 2.0
    pub initial_upper: f64,
    /// Largest multiplier the bracket search may reach.
    ///
    /// Default: 64.0
    pub max_multiplier: f64,
}

impl Default for IndexAdjustmentConfig {
    fn default() -> Self {
        Self {
            frequency: Frequency::Quarterly,
            day_count: DayCountConvention::Act360,
            calendar: HolidayCalendar::Weekend,
            business_day_convention: BusinessDayConvention::Following,
            date_rule: DateGenerationRule::Cds,
            solver: SolverConfig::default().with_absolute_tolerance(1e-10),
            initial_upper: 2.0,
            max_multiplier: 64.0,
        }
    }
}

impl IndexAdjustmentConfig {
    /// Set the multiplier search settings.
    pub fn with_solver(mut self, solver: SolverConfig<f64>) -> Self {
        self.solver = solver;
        self
    }

    /// Set the multiplier ceiling.
    pub fn with_max_multiplier(mut self, max: f64) -> Self {
        self.max_multiplier = max;
        self
    }

    /// Check the settings.
    pub fn validate(&self) -> Result<(), CreditError> {
        if !self.solver.is_valid() {
            return Err(CreditError::invalid_input(format!(
                "invalid solver settings: {:?}",
                self.solver
            )));
        }
        if !(self.initial_upper > 0.0 && self.max_multiplier >= self.initial_upper) {
            return Err(CreditError::invalid_input(format!(
                "multiplier bracket [0, {}] with ceiling {} is empty",
                self.initial_upper, self.max_multiplier
            )));
        }
        Ok(())
    }
}

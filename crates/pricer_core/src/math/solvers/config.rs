//! Solver configuration types.

use num_traits::Float;

/// Configuration for root-finding algorithms.
///
/// The solver stops as soon as either criterion holds:
/// - the last step is within `tolerance * (1 + |x|)` (relative on x)
/// - `|f(x)| <= absolute_tolerance`
///
/// # Example
///
/// ```
/// use pricer_core::math::solvers::SolverConfig;
///
/// let config: SolverConfig<f64> = SolverConfig::default();
/// assert_eq!(config.max_iterations, 50);
///
/// let custom = SolverConfig::default()
///     .with_tolerance(1e-12)
///     .with_max_iterations(200);
/// assert_eq!(custom.max_iterations, 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig<T: Float> {
    /// Relative tolerance on the abscissa.
    pub tolerance: T,

    /// Absolute tolerance on the objective value.
    pub absolute_tolerance: T,

    /// Maximum number of iterations before giving up.
    pub max_iterations: usize,

    /// Relative bump for the forward-difference derivative.
    pub derivative_bump: T,
}

impl<T: Float> Default for SolverConfig<T> {
    /// Default values:
    /// - `tolerance`: 1e-10
    /// - `absolute_tolerance`: 1e-12
    /// - `max_iterations`: 50
    /// - `derivative_bump`: 1e-6
    fn default() -> Self {
        Self {
            tolerance: T::from(1e-10).unwrap_or_else(T::epsilon),
            absolute_tolerance: T::from(1e-12).unwrap_or_else(T::epsilon),
            max_iterations: 50,
            derivative_bump: T::from(1e-6).unwrap_or_else(T::epsilon),
        }
    }
}

impl<T: Float> SolverConfig<T> {
    /// Create a new configuration with the given tolerance and iteration cap.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance <= 0` or `max_iterations == 0`.
    ///
    /// ```
    /// use pricer_core::math::solvers::SolverConfig;
    ///
    /// let config = SolverConfig::new(1e-12, 200);
    /// assert_eq!(config.max_iterations, 200);
    /// ```
    pub fn new(tolerance: T, max_iterations: usize) -> Self {
        assert!(tolerance > T::zero(), "tolerance must be positive");
        assert!(max_iterations > 0, "max_iterations must be > 0");
        Self {
            tolerance,
            max_iterations,
            ..Self::default()
        }
    }

    /// Tighter tolerances (1e-14 / 1e-15) and 200 iterations.
    pub fn high_precision() -> Self {
        Self {
            tolerance: T::from(1e-14).unwrap_or_else(T::epsilon),
            absolute_tolerance: T::from(1e-15).unwrap_or_else(T::epsilon),
            max_iterations: 200,
            ..Self::default()
        }
    }

    /// Relaxed tolerances (1e-6 / 1e-8) and 30 iterations.
    pub fn fast() -> Self {
        Self {
            tolerance: T::from(1e-6).unwrap_or_else(T::epsilon),
            absolute_tolerance: T::from(1e-8).unwrap_or_else(T::epsilon),
            max_iterations: 30,
            ..Self::default()
        }
    }

    /// Set the relative abscissa tolerance.
    pub fn with_tolerance(mut self, tolerance: T) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the absolute objective tolerance.
    pub fn with_absolute_tolerance(mut self, tolerance: T) -> Self {
        self.absolute_tolerance = tolerance;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the derivative bump.
    pub fn with_derivative_bump(mut self, bump: T) -> Self {
        self.derivative_bump = bump;
        self
    }

    /// Check every field is usable.
    pub fn is_valid(&self) -> bool {
        self.tolerance > T::zero()
            && self.absolute_tolerance > T::zero()
            && self.derivative_bump > T::zero()
            && self.max_iterations > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config: SolverConfig<f64> = SolverConfig::default();
        assert!((config.tolerance - 1e-10).abs() < 1e-20);
        assert!((config.absolute_tolerance - 1e-12).abs() < 1e-22);
        assert_eq!(config.max_iterations, 50);
        assert!(config.is_valid());
    }

    #[test]
    #[should_panic(expected = "tolerance must be positive")]
    fn test_new_config_zero_tolerance_panics() {
        let _: SolverConfig<f64> = SolverConfig::new(0.0, 100);
    }

    #[test]
    #[should_panic(expected = "max_iterations must be > 0")]
    fn test_new_config_zero_iterations_panics() {
        let _: SolverConfig<f64> = SolverConfig::new(1e-10, 0);
    }

    #[test]
    fn test_presets_ordering() {
        let precise: SolverConfig<f64> = SolverConfig::high_precision();
        let fast: SolverConfig<f64> = SolverConfig::fast();
        assert!(precise.tolerance < fast.tolerance);
        assert!(precise.max_iterations > fast.max_iterations);
    }

    #[test]
    fn test_builders_and_validity() {
        let config: SolverConfig<f64> = SolverConfig::default()
            .with_absolute_tolerance(0.0)
            .with_derivative_bump(1e-7);
        assert_eq!(config.derivative_bump, 1e-7);
        assert!(!config.is_valid());
    }
}

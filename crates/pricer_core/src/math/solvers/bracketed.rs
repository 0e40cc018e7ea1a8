//! Bisection-safeguarded Newton root finder.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Result of a successful root search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootSolution<T> {
    /// Abscissa of the root
    pub root: T,
    /// Objective value at `root`
    pub residual: T,
    /// Iterations used
    pub iterations: usize,
}

/// Newton root finder kept inside a sign-changing bracket.
///
/// Each iteration takes a Newton step with a forward-difference derivative.
/// When the derivative is unusable or the step leaves the current bracket
/// the iteration bisects instead, so convergence is guaranteed for a
/// continuous objective with a valid bracket.
///
/// The objective is fallible: an `Err` from it aborts the search and is
/// returned unchanged, so callers keep their own error type.
///
/// # Example
///
/// ```
/// use pricer_core::math::solvers::{BracketedNewtonSolver, SolverConfig};
/// use pricer_core::types::SolverError;
///
/// let solver = BracketedNewtonSolver::new(SolverConfig::default());
///
/// let sol = solver
///     .find_root(|x: f64| Ok::<_, SolverError>(x * x - 2.0), 0.0, 2.0)
///     .unwrap();
/// assert!((sol.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct BracketedNewtonSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> BracketedNewtonSolver<T> {
    /// Create a solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    /// Return the configuration.
    #[inline]
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }

    /// Find a root of `f` in `[a, b]`.
    ///
    /// # Errors
    ///
    /// - `SolverError::NoBracket` when `f(a)` and `f(b)` share a sign
    /// - `SolverError::MaxIterationsExceeded` when neither tolerance is met
    /// - `SolverError::NumericalInstability` when `f` returns a non-finite value
    /// - any error returned by `f`
    pub fn find_root<F, E>(&self, mut f: F, a: T, b: T) -> Result<RootSolution<T>, E>
    where
        F: FnMut(T) -> Result<T, E>,
        E: From<SolverError>,
    {
        let fa = finite(f(a)?, a)?;
        let fb = finite(f(b)?, b)?;
        self.find_root_with_values(f, (a, fa), (b, fb))
    }

    /// Find a root of `f` when the objective is already known at both ends.
    ///
    /// Saves two evaluations when the caller searched for the bracket.
    pub fn find_root_with_values<F, E>(
        &self,
        mut f: F,
        (a, fa): (T, T),
        (b, fb): (T, T),
    ) -> Result<RootSolution<T>, E>
    where
        F: FnMut(T) -> Result<T, E>,
        E: From<SolverError>,
    {
        let zero = T::zero();
        let one = T::one();
        let half = T::from(0.5).unwrap_or_else(|| one / (one + one));
        let cfg = &self.config;

        for (x, fx) in [(a, fa), (b, fb)] {
            if fx.abs() <= cfg.absolute_tolerance {
                return Ok(RootSolution {
                    root: x,
                    residual: fx,
                    iterations: 0,
                });
            }
        }

        if fa * fb > zero {
            return Err(SolverError::NoBracket {
                a: to_f64(a),
                b: to_f64(b),
                fa: to_f64(fa),
                fb: to_f64(fb),
            }
            .into());
        }

        // `neg` carries f < 0, `pos` carries f > 0
        let (mut neg, mut pos) = if fa < zero { (a, b) } else { (b, a) };

        // Start from the secant point of the bracket
        let mut x = a - fa * (b - a) / (fb - fa);
        if !x.is_finite() || !inside(x, neg, pos) {
            x = half * (a + b);
        }
        let mut fx = finite(f(x)?, x)?;

        for iteration in 1..=cfg.max_iterations {
            if fx.abs() <= cfg.absolute_tolerance {
                return Ok(RootSolution {
                    root: x,
                    residual: fx,
                    iterations: iteration,
                });
            }

            if fx < zero {
                neg = x;
            } else {
                pos = x;
            }

            let h = cfg.derivative_bump * (one + x.abs());
            let slope = (finite(f(x + h)?, x + h)? - fx) / h;
            let newton = x - fx / slope;

            let next = if slope.is_finite() && slope != zero && inside(newton, neg, pos) {
                newton
            } else {
                half * (neg + pos)
            };

            let step = (next - x).abs();
            x = next;
            fx = finite(f(x)?, x)?;

            let scale = one + x.abs();
            if step <= cfg.tolerance * scale || (pos - neg).abs() <= cfg.tolerance * scale {
                return Ok(RootSolution {
                    root: x,
                    residual: fx,
                    iterations: iteration,
                });
            }
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: cfg.max_iterations,
            best: to_f64(x),
            residual: to_f64(fx),
        }
        .into())
    }
}

#[inline]
fn inside<T: Float>(x: T, p: T, q: T) -> bool {
    x > p.min(q) && x < p.max(q)
}

#[inline]
fn to_f64<T: Float>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}

fn finite<T: Float>(fx: T, x: T) -> Result<T, SolverError> {
    if fx.is_finite() {
        Ok(fx)
    } else {
        Err(SolverError::NumericalInstability(format!(
            "objective is {} at x = {}",
            to_f64(fx),
            to_f64(x)
        )))
    }
}

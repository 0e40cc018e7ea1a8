//! Memoised credit curve bootstrapping.
//!
//! Repeated calibrations of the same entity (a CLI run over many indices
//! sharing constituents, a risk job re-pricing one book) hit the cache
//! instead of re-solving every segment.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use pricer_core::market_data::curves::YieldCurve;
use pricer_core::types::time::{BusinessDayConvention, Date, DayCountConvention, HolidayCalendar};
use pricer_models::instruments::credit::{CdsDirection, CreditDefaultSwap};
use pricer_models::schedules::{DateGenerationRule, Frequency};
use tracing::trace;

use super::config::CreditCurveConfig;
use super::curve::CreditCurve;
use super::error::CreditError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ContractKey {
    step_in: Date,
    maturity: Date,
    coupon: u64,
    notional: u64,
    upfront: u64,
    direction: CdsDirection,
    frequency: Frequency,
    day_count: DayCountConvention,
    calendar: HolidayCalendar,
    convention: BusinessDayConvention,
    rule: DateGenerationRule,
}

impl From<&CreditDefaultSwap> for ContractKey {
    fn from(cds: &CreditDefaultSwap) -> Self {
        Self {
            step_in: cds.step_in(),
            maturity: cds.maturity(),
            coupon: cds.coupon().to_bits(),
            notional: cds.notional().to_bits(),
            upfront: cds.upfront().to_bits(),
            direction: cds.direction(),
            frequency: cds.frequency(),
            day_count: cds.day_count(),
            calendar: cds.calendar(),
            convention: cds.business_day_convention(),
            rule: cds.date_rule(),
        }
    }
}

/// Inputs identifying a bootstrap; the discount curve is keyed by identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CurveKey {
    valuation_date: Date,
    recovery_rate: u64,
    discount_curve: usize,
    contracts: Vec<ContractKey>,
}

/// Credit curve bootstrapper that remembers curves it has already built.
///
/// The cache is keyed on the valuation date, recovery rate, every contract
/// term and the identity of the shared discount curve. When the config's
/// `use_cache` is off every call re-bootstraps. Either way the returned
/// curve is the same.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pricer_core::market_data::curves::FlatCurve;
/// use pricer_core::types::time::Date;
/// use pricer_models::instruments::credit::CreditDefaultSwap;
/// use pricer_optimiser::credit::{CachedCreditBootstrapper, CreditCurveConfig};
///
/// let valuation = Date::from_ymd(2018, 12, 20).unwrap();
/// let maturity = Date::from_ymd(2023, 12, 20).unwrap();
/// let contracts = vec![CreditDefaultSwap::new(valuation, maturity, 0.01, 1.0).unwrap()];
/// let discount = Arc::new(FlatCurve::new(0.02));
///
/// let bootstrapper = CachedCreditBootstrapper::new(CreditCurveConfig::default());
/// let first = bootstrapper.bootstrap(valuation, &contracts, 0.4, Arc::clone(&discount)).unwrap();
/// let second = bootstrapper.bootstrap(valuation, &contracts, 0.4, discount).unwrap();
///
/// assert_eq!(first, second);
/// assert_eq!(bootstrapper.hits(), 1);
/// ```
pub struct CachedCreditBootstrapper<D> {
    config: CreditCurveConfig,
    cache: Mutex<HashMap<CurveKey, CreditCurve<D>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<D: YieldCurve<f64>> CachedCreditBootstrapper<D> {
    /// Create a bootstrapper with an empty cache.
    pub fn new(config: CreditCurveConfig) -> Self {
        Self {
            config,
            cache: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Create a bootstrapper with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(CreditCurveConfig::default())
    }

    /// Get the configuration.
    pub fn config(&self) -> &CreditCurveConfig {
        &self.config
    }

    /// Bootstrap a curve, reusing a cached one for identical inputs.
    ///
    /// # Errors
    ///
    /// Same as [`CreditCurve::bootstrap`]. Failures are not cached.
    pub fn bootstrap(
        &self,
        valuation_date: Date,
        contracts: &[CreditDefaultSwap],
        recovery_rate: f64,
        discount_curve: Arc<D>,
    ) -> Result<CreditCurve<D>, CreditError> {
        if !self.config.use_cache {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return CreditCurve::bootstrap(
                valuation_date,
                contracts,
                recovery_rate,
                discount_curve,
                &self.config,
            );
        }

        let key = CurveKey {
            valuation_date,
            recovery_rate: recovery_rate.to_bits(),
            discount_curve: Arc::as_ptr(&discount_curve) as *const () as usize,
            contracts: contracts.iter().map(ContractKey::from).collect(),
        };

        if let Some(curve) = self.lock().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(valuation_date = %valuation_date, "credit curve cache hit");
            return Ok(curve.clone());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let curve = CreditCurve::bootstrap(
            valuation_date,
            contracts,
            recovery_rate,
            discount_curve,
            &self.config,
        )?;
        self.lock().insert(key, curve.clone());
        Ok(curve)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CurveKey, CreditCurve<D>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of bootstraps actually run.
    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Number of cached curves.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every cached curve and reset the counters.
    pub fn clear(&self) {
        self.lock().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricer_core::market_data::curves::FlatCurve;

    fn valuation() -> Date {
        Date::from_ymd(2018, 12, 20).unwrap()
    }

    fn contracts() -> Vec<CreditDefaultSwap> {
        (1..=3)
            .map(|y| {
                let maturity = valuation().add_months(12 * y).unwrap();
                CreditDefaultSwap::new(valuation(), maturity, 0.005 + 0.001 * y as f64, 1.0)
                    .unwrap()
            })
            .collect()
    }

    // ========================================
    // Cache Behaviour Tests
    // ========================================

    #[test]
    fn test_hit_returns_identical_curve() {
        let discount = Arc::new(FlatCurve::new(0.02));
        let bootstrapper = CachedCreditBootstrapper::with_defaults();

        let a = bootstrapper
            .bootstrap(valuation(), &contracts(), 0.4, Arc::clone(&discount))
            .unwrap();
        let b = bootstrapper
            .bootstrap(valuation(), &contracts(), 0.4, Arc::clone(&discount))
            .unwrap();

        assert_eq!(a, b);
        assert_eq!(bootstrapper.hits(), 1);
        assert_eq!(bootstrapper.misses(), 1);
        assert_eq!(bootstrapper.len(), 1);
    }

    #[test]
    fn test_different_recovery_misses() {
        let discount = Arc::new(FlatCurve::new(0.02));
        let bootstrapper = CachedCreditBootstrapper::with_defaults();

        bootstrapper
            .bootstrap(valuation(), &contracts(), 0.4, Arc::clone(&discount))
            .unwrap();
        bootstrapper
            .bootstrap(valuation(), &contracts(), 0.3, Arc::clone(&discount))
            .unwrap();

        assert_eq!(bootstrapper.hits(), 0);
        assert_eq!(bootstrapper.len(), 2);
    }

    #[test]
    fn test_different_discount_instance_misses() {
        let bootstrapper = CachedCreditBootstrapper::with_defaults();
        bootstrapper
            .bootstrap(valuation(), &contracts(), 0.4, Arc::new(FlatCurve::new(0.02)))
            .unwrap();
        let keep = Arc::new(FlatCurve::new(0.02));
        bootstrapper
            .bootstrap(valuation(), &contracts(), 0.4, keep)
            .unwrap();
        assert_eq!(bootstrapper.misses(), 2);
    }

    #[test]
    fn test_cache_off_matches_cache_on() {
        let discount = Arc::new(FlatCurve::new(0.02));
        let cached = CachedCreditBootstrapper::with_defaults();
        let uncached =
            CachedCreditBootstrapper::new(CreditCurveConfig::default().with_cache(false));

        let a = cached
            .bootstrap(valuation(), &contracts(), 0.4, Arc::clone(&discount))
            .unwrap();
        let b = uncached
            .bootstrap(valuation(), &contracts(), 0.4, Arc::clone(&discount))
            .unwrap();
        let c = uncached
            .bootstrap(valuation(), &contracts(), 0.4, Arc::clone(&discount))
            .unwrap();

        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(uncached.hits(), 0);
        assert!(uncached.is_empty());
    }

    #[test]
    fn test_failures_are_not_cached() {
        let bootstrapper = CachedCreditBootstrapper::with_defaults();
        let discount = Arc::new(FlatCurve::new(0.02));
        assert!(bootstrapper
            .bootstrap(valuation(), &[], 0.4, Arc::clone(&discount))
            .is_err());
        assert!(bootstrapper.is_empty());

        bootstrapper.clear();
        assert_eq!(bootstrapper.misses(), 0);
    }

    #[test]
    fn test_clear_drops_cached_curves() {
        let discount = Arc::new(FlatCurve::new(0.02));
        let bootstrapper = CachedCreditBootstrapper::with_defaults();
        for _ in 0..2 {
            bootstrapper
                .bootstrap(valuation(), &contracts(), 0.4, Arc::clone(&discount))
                .unwrap();
        }
        assert_eq!(bootstrapper.len(), 1);
        assert_eq!(bootstrapper.hits(), 1);

        bootstrapper.clear();
        assert!(bootstrapper.is_empty());
        assert_eq!(bootstrapper.hits(), 0);

        bootstrapper
            .bootstrap(valuation(), &contracts(), 0.4, discount)
            .unwrap();
        assert_eq!(bootstrapper.misses(), 1);
        assert_eq!(bootstrapper.len(), 1);
    }
}

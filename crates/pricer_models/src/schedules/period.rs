//! Accrual period definition.

use pricer_core::types::time::{Date, DayCountConvention};
use std::fmt;

/// A single accrual period in a schedule.
///
/// # Examples
///
/// ```
/// use pricer_models::schedules::Period;
/// use pricer_core::types::time::{Date, DayCountConvention};
///
/// let period = Period::new(
///     Date::from_ymd(2024, 3, 20).unwrap(),
///     Date::from_ymd(2024, 6, 20).unwrap(),
///     Date::from_ymd(2024, 6, 20).unwrap(),
///     DayCountConvention::Act360,
/// );
///
/// // 92 days on ACT/360
/// assert!((period.year_fraction() - 92.0 / 360.0).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Period {
    start: Date,
    end: Date,
    payment: Date,
    day_count: DayCountConvention,
}

impl Period {
    /// Creates a period from accrual dates, payment date and day count.
    #[inline]
    pub fn new(start: Date, end: Date, payment: Date, day_count: DayCountConvention) -> Self {
        Self {
            start,
            end,
            payment,
            day_count,
        }
    }

    /// Creates a period paying on its accrual end date.
    #[inline]
    pub fn with_payment_on_end(start: Date, end: Date, day_count: DayCountConvention) -> Self {
        Self::new(start, end, end, day_count)
    }

    /// Returns the accrual start date.
    #[inline]
    pub fn start(&self) -> Date {
        self.start
    }

    /// Returns the accrual end date.
    #[inline]
    pub fn end(&self) -> Date {
        self.end
    }

    /// Returns the payment date.
    #[inline]
    pub fn payment(&self) -> Date {
        self.payment
    }

    /// Returns the day count convention.
    #[inline]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Accrual fraction from start to end.
    #[inline]
    pub fn year_fraction(&self) -> f64 {
        self.day_count.year_fraction(self.start, self.end)
    }

    /// Accrual fraction from start to `date`, clamped to the period.
    ///
    /// ```
    /// use pricer_models::schedules::Period;
    /// use pricer_core::types::time::{Date, DayCountConvention};
    ///
    /// let period = Period::with_payment_on_end(
    ///     Date::from_ymd(2024, 3, 20).unwrap(),
    ///     Date::from_ymd(2024, 6, 20).unwrap(),
    ///     DayCountConvention::Act360,
    /// );
    /// let accrued = period.accrued_fraction(Date::from_ymd(2024, 4, 5).unwrap());
    /// assert!((accrued - 16.0 / 360.0).abs() < 1e-15);
    /// ```
    pub fn accrued_fraction(&self, date: Date) -> f64 {
        let to = date.max(self.start).min(self.end);
        self.day_count.year_fraction(self.start, to)
    }

    /// Calendar days from start to end.
    #[inline]
    pub fn days(&self) -> i64 {
        self.end - self.start
    }

    /// Returns true if the end is after the start.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// Returns true if `start <= date < end`.
    #[inline]
    pub fn contains(&self, date: Date) -> bool {
        date >= self.start && date < self.end
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Period({} to {}, pay {}, {})",
            self.start, self.end, self.payment, self.day_count
        )
    }
}

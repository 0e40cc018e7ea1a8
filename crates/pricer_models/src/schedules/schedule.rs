//! Schedule and ScheduleBuilder implementation.

use super::error::ScheduleError;
use super::frequency::Frequency;
use super::period::Period;
use super::rule::DateGenerationRule;
use pricer_core::types::time::{BusinessDayConvention, Date, DayCountConvention, HolidayCalendar};

/// An ordered, non-empty collection of accrual periods.
///
/// # Examples
///
/// ```
/// use pricer_models::schedules::{ScheduleBuilder, Frequency};
/// use pricer_core::types::time::{Date, DayCountConvention};
///
/// let schedule = ScheduleBuilder::new()
///     .start(Date::from_ymd(2024, 1, 15).unwrap())
///     .end(Date::from_ymd(2026, 1, 15).unwrap())
///     .frequency(Frequency::SemiAnnual)
///     .day_count(DayCountConvention::Act360)
///     .build()
///     .unwrap();
///
/// assert_eq!(schedule.len(), 4);
/// assert_eq!(schedule.payment_dates().len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    periods: Vec<Period>,
    payment_dates: Vec<Date>,
}

impl Schedule {
    /// Creates a schedule from a list of periods.
    ///
    /// # Errors
    ///
    /// `ScheduleError::Empty` if `periods` is empty.
    pub fn new(periods: Vec<Period>) -> Result<Self, ScheduleError> {
        if periods.is_empty() {
            return Err(ScheduleError::Empty);
        }
        let payment_dates = periods.iter().map(|p| p.payment()).collect();
        Ok(Self {
            periods,
            payment_dates,
        })
    }

    /// Returns the periods in the schedule.
    #[inline]
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Returns the payment dates.
    #[inline]
    pub fn payment_dates(&self) -> &[Date] {
        &self.payment_dates
    }

    /// Returns the number of periods.
    #[inline]
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Always false; kept for the `len`/`is_empty` pair.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Returns the accrual start of the first period.
    #[inline]
    pub fn start_date(&self) -> Date {
        self.periods[0].start()
    }

    /// Returns the accrual end of the last period.
    #[inline]
    pub fn end_date(&self) -> Date {
        self.periods[self.periods.len() - 1].end()
    }

    /// Returns an iterator over the periods.
    pub fn iter(&self) -> impl Iterator<Item = &Period> {
        self.periods.iter()
    }

    /// Sum of accrual fractions of all periods.
    pub fn total_year_fraction(&self) -> f64 {
        self.periods.iter().map(|p| p.year_fraction()).sum()
    }

    /// Returns the period containing `date`, if any.
    pub fn period_containing(&self, date: Date) -> Option<&Period> {
        self.periods.iter().find(|p| p.contains(date))
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a Period;
    type IntoIter = std::slice::Iter<'a, Period>;

    fn into_iter(self) -> Self::IntoIter {
        self.periods.iter()
    }
}

/// Builder for constructing schedules.
///
/// Defaults: ACT/365F, no holidays, unadjusted, forward generation. Every
/// date except the final accrual end is adjusted with the calendar and
/// business-day convention; the final period pays on the adjusted end.
///
/// # Examples
///
/// ```
/// use pricer_models::schedules::ScheduleBuilder;
/// use pricer_core::types::time::Date;
///
/// // Standard CDS conventions
/// let schedule = ScheduleBuilder::cds(
///     Date::from_ymd(2007, 8, 2).unwrap(),
///     Date::from_ymd(2010, 9, 20).unwrap(),
/// )
/// .build()
/// .unwrap();
///
/// // First accrual starts on the previous roll date
/// assert_eq!(schedule.start_date(), Date::from_ymd(2007, 6, 20).unwrap());
/// assert_eq!(schedule.len(), 13);
/// ```
#[derive(Debug, Clone)]
pub struct ScheduleBuilder {
    start_date: Option<Date>,
    end_date: Option<Date>,
    frequency: Option<Frequency>,
    day_count: DayCountConvention,
    calendar: HolidayCalendar,
    convention: BusinessDayConvention,
    rule: DateGenerationRule,
}

impl Default for ScheduleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleBuilder {
    /// Creates a new schedule builder with default settings.
    pub fn new() -> Self {
        Self {
            start_date: None,
            end_date: None,
            frequency: None,
            day_count: DayCountConvention::Act365Fixed,
            calendar: HolidayCalendar::NoHolidays,
            convention: BusinessDayConvention::Unadjusted,
            rule: DateGenerationRule::Forward,
        }
    }

    /// Builder preset for a standard CDS premium leg: quarterly, ACT/360,
    /// weekend calendar, Following, CDS date generation.
    pub fn cds(step_in: Date, maturity: Date) -> Self {
        Self::new()
            .start(step_in)
            .end(maturity)
            .frequency(Frequency::Quarterly)
            .day_count(DayCountConvention::Act360)
            .calendar(HolidayCalendar::Weekend)
            .business_day_convention(BusinessDayConvention::Following)
            .date_rule(DateGenerationRule::Cds)
    }

    /// Sets the start date of the schedule.
    pub fn start(mut self, date: Date) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Sets the end date of the schedule.
    pub fn end(mut self, date: Date) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Sets the payment frequency.
    pub fn frequency(mut self, freq: Frequency) -> Self {
        self.frequency = Some(freq);
        self
    }

    /// Sets the day count convention.
    pub fn day_count(mut self, dc: DayCountConvention) -> Self {
        self.day_count = dc;
        self
    }

    /// Sets the holiday calendar.
    pub fn calendar(mut self, calendar: HolidayCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Sets the business-day convention.
    pub fn business_day_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Sets the date generation rule.
    pub fn date_rule(mut self, rule: DateGenerationRule) -> Self {
        self.rule = rule;
        self
    }

    /// Builds the schedule.
    ///
    /// # Errors
    ///
    /// - `MissingField` if start, end or frequency is unset
    /// - `InvalidDateRange` if start is not before end
    /// - `NoPeriods` if adjustment collapses every period
    /// - `Date` if date arithmetic overflows
    pub fn build(self) -> Result<Schedule, ScheduleError> {
        let start = self
            .start_date
            .ok_or(ScheduleError::MissingField { field: "start" })?;
        let end = self
            .end_date
            .ok_or(ScheduleError::MissingField { field: "end" })?;
        let frequency = self
            .frequency
            .ok_or(ScheduleError::MissingField { field: "frequency" })?;

        if start >= end {
            return Err(ScheduleError::InvalidDateRange { start, end });
        }

        let dates = self.unadjusted_dates(start, end, frequency)?;
        let periods = self.adjusted_periods(&dates)?;

        if periods.is_empty() {
            return Err(ScheduleError::NoPeriods { start, end });
        }

        Schedule::new(periods)
    }

    /// Unadjusted boundary dates, ascending, `end` last.
    ///
    /// Each date is rolled from its anchor by a whole number of periods so
    /// end-of-month clamping does not drift.
    fn unadjusted_dates(
        &self,
        start: Date,
        end: Date,
        frequency: Frequency,
    ) -> Result<Vec<Date>, ScheduleError> {
        let step = frequency.months() as i32;
        let mut dates = Vec::new();

        match self.rule {
            DateGenerationRule::Forward => {
                let mut k = 0;
                let mut d = start;
                while d < end {
                    dates.push(d);
                    k += 1;
                    d = start.add_months(k * step)?;
                }
                dates.push(end);
            }
            DateGenerationRule::Backward | DateGenerationRule::Cds => {
                let mut k = 0;
                let mut d = end;
                while d > start {
                    dates.push(d);
                    k += 1;
                    d = end.add_months(-k * step)?;
                }
                let first = match self.rule {
                    DateGenerationRule::Cds => d,
                    _ => start,
                };
                dates.push(first);
                dates.reverse();
            }
        }

        Ok(dates)
    }

    fn adjusted_periods(&self, dates: &[Date]) -> Result<Vec<Period>, ScheduleError> {
        let last = dates.len() - 1;
        let mut adjusted = Vec::with_capacity(dates.len());
        for &d in &dates[..last] {
            adjusted.push(self.convention.adjust(d, self.calendar)?);
        }
        let final_end = dates[last];
        let final_payment = self.convention.adjust(final_end, self.calendar)?;

        let mut periods = Vec::with_capacity(last);
        for i in 0..last {
            let start = adjusted[i];
            let (end, payment) = if i + 1 == last {
                (final_end, final_payment)
            } else {
                (adjusted[i + 1], adjusted[i + 1])
            };
            if end > start {
                periods.push(Period::new(start, end, payment, self.day_count));
            }
        }
        Ok(periods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    // ========================================
    // Schedule Tests
    // ========================================

    #[test]
    fn test_schedule_new_rejects_empty() {
        assert_eq!(Schedule::new(vec![]), Err(ScheduleError::Empty));
    }

    #[test]
    fn test_schedule_accessors() {
        let periods = vec![
            Period::with_payment_on_end(d(2024, 1, 1), d(2024, 7, 1), DayCountConvention::Act365Fixed),
            Period::with_payment_on_end(d(2024, 7, 1), d(2025, 1, 1), DayCountConvention::Act365Fixed),
        ];
        let schedule = Schedule::new(periods).unwrap();
        assert_eq!(schedule.start_date(), d(2024, 1, 1));
        assert_eq!(schedule.end_date(), d(2025, 1, 1));
        assert!((schedule.total_year_fraction() - 366.0 / 365.0).abs() < 1e-12);
        assert_eq!(
            schedule.period_containing(d(2024, 8, 1)).map(|p| p.start()),
            Some(d(2024, 7, 1))
        );
        assert_eq!(schedule.iter().count(), 2);
    }

    // ========================================
    // Builder Tests
    // ========================================

    #[test]
    fn test_builder_missing_fields() {
        let err = ScheduleBuilder::new().end(d(2025, 1, 1)).build().unwrap_err();
        assert_eq!(err, ScheduleError::MissingField { field: "start" });

        let err = ScheduleBuilder::new()
            .start(d(2024, 1, 1))
            .end(d(2025, 1, 1))
            .build()
            .unwrap_err();
        assert_eq!(err, ScheduleError::MissingField { field: "frequency" });
    }

    #[test]
    fn test_builder_invalid_range() {
        let err = ScheduleBuilder::new()
            .start(d(2025, 1, 1))
            .end(d(2025, 1, 1))
            .frequency(Frequency::Annual)
            .build()
            .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_forward_generation_with_end_stub() {
        let schedule = ScheduleBuilder::new()
            .start(d(2024, 1, 15))
            .end(d(2025, 2, 1))
            .frequency(Frequency::Quarterly)
            .build()
            .unwrap();
        assert_eq!(schedule.len(), 5);
        assert_eq!(schedule.periods()[4].start(), d(2025, 1, 15));
        assert_eq!(schedule.end_date(), d(2025, 2, 1));
    }

    #[test]
    fn test_backward_generation_with_front_stub() {
        let schedule = ScheduleBuilder::new()
            .start(d(2024, 2, 1))
            .end(d(2025, 1, 15))
            .frequency(Frequency::Quarterly)
            .date_rule(DateGenerationRule::Backward)
            .build()
            .unwrap();
        assert_eq!(schedule.len(), 4);
        assert_eq!(schedule.start_date(), d(2024, 2, 1));
        assert_eq!(schedule.periods()[0].end(), d(2024, 4, 15));
    }

    #[test]
    fn test_cds_generation_from_roll_date() {
        let schedule = ScheduleBuilder::cds(d(2018, 12, 20), d(2019, 12, 20))
            .build()
            .unwrap();
        assert_eq!(schedule.len(), 4);
        assert_eq!(schedule.start_date(), d(2018, 12, 20));
        assert_eq!(schedule.periods()[0].day_count(), DayCountConvention::Act360);
    }

    #[test]
    fn test_cds_final_end_unadjusted() {
        // 20 Jun 2020 is a Saturday
        let schedule = ScheduleBuilder::cds(d(2019, 7, 1), d(2020, 6, 20))
            .build()
            .unwrap();
        let last = schedule.periods()[schedule.len() - 1];
        assert_eq!(last.end(), d(2020, 6, 20));
        assert_eq!(last.payment(), d(2020, 6, 22));

        // Intermediate boundaries are business days
        let cal = HolidayCalendar::Weekend;
        for p in &schedule.periods()[..schedule.len() - 1] {
            assert!(cal.is_business_day(p.end()));
            assert!(cal.is_business_day(p.start()));
        }
        // Consecutive periods are contiguous
        for w in schedule.periods().windows(2) {
            assert_eq!(w[0].end(), w[1].start());
        }
    }

    #[test]
    fn test_modified_following_adjustment() {
        // 31 Aug 2024 is a Saturday; ModifiedFollowing stays in August
        let schedule = ScheduleBuilder::new()
            .start(d(2024, 5, 31))
            .end(d(2024, 11, 30))
            .frequency(Frequency::Quarterly)
            .calendar(HolidayCalendar::Weekend)
            .business_day_convention(BusinessDayConvention::ModifiedFollowing)
            .build()
            .unwrap();
        assert_eq!(schedule.periods()[0].end(), d(2024, 8, 30));
    }
}

//! Dates, day count conventions, holiday calendars and business-day rules.
//!
//! This module provides:
//! - `Date`: Type-safe date wrapper around chrono::NaiveDate with month
//!   arithmetic and standard CDS roll dates
//! - `DayCountConvention`: Year fraction conventions used for accruals and
//!   for the curve time axis
//! - `HolidayCalendar` and `BusinessDayConvention`: date adjustment rules
//!
//! # Examples
//!
//! ```
//! use pricer_core::types::time::{Date, DayCountConvention};
//!
//! let start = Date::from_ymd(2024, 1, 1).unwrap();
//! let end = Date::from_ymd(2024, 7, 1).unwrap();
//!
//! // 182 days / 365
//! let yf = DayCountConvention::Act365Fixed.year_fraction(start, end);
//! assert!((yf - 0.4986).abs() < 0.001);
//! ```

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Months on which standard CDS contracts roll.
const CDS_ROLL_MONTHS: [u32; 4] = [3, 6, 9, 12];

/// Day of month of a standard CDS roll date.
const CDS_ROLL_DAY: u32 = 20;

/// Type-safe date wrapper around chrono::NaiveDate.
///
/// # Examples
///
/// ```
/// use pricer_core::types::time::Date;
///
/// let date = Date::from_ymd(2024, 6, 15).unwrap();
/// assert_eq!(date.year(), 2024);
///
/// let parsed: Date = "2024-06-15".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let end = Date::from_ymd(2024, 1, 11).unwrap();
/// assert_eq!(end - start, 10);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a Date from year, month, and day components.
    ///
    /// # Returns
    /// `Ok(Date)` if the date is valid, `Err(DateError::InvalidDate)` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::types::time::Date;
    ///
    /// assert!(Date::from_ymd(2024, 2, 29).is_ok());
    /// assert!(Date::from_ymd(2023, 2, 29).is_err());
    /// ```
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Parses a date from ISO 8601 format string (YYYY-MM-DD).
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(format!("'{}': {}", s, e)))
    }

    /// Returns the underlying NaiveDate.
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the day of the week.
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Returns true on Saturdays and Sundays.
    #[inline]
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Shifts the date by a signed number of calendar days.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::types::time::Date;
    ///
    /// let d = Date::from_ymd(2024, 2, 28).unwrap();
    /// assert_eq!(d.add_days(2).unwrap(), Date::from_ymd(2024, 3, 1).unwrap());
    /// assert_eq!(d.add_days(-28).unwrap(), Date::from_ymd(2024, 1, 31).unwrap());
    /// ```
    pub fn add_days(&self, days: i64) -> Result<Self, DateError> {
        let shifted = if days >= 0 {
            self.0.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        shifted
            .map(Date)
            .ok_or_else(|| DateError::Overflow(format!("{} shifted by {} days", self, days)))
    }

    /// Shifts the date by a signed number of months.
    ///
    /// The day of month is clamped to the length of the target month.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::types::time::Date;
    ///
    /// let d = Date::from_ymd(2024, 1, 31).unwrap();
    /// assert_eq!(d.add_months(1).unwrap(), Date::from_ymd(2024, 2, 29).unwrap());
    /// assert_eq!(d.add_months(-2).unwrap(), Date::from_ymd(2023, 11, 30).unwrap());
    /// ```
    pub fn add_months(&self, months: i32) -> Result<Self, DateError> {
        let shifted = if months >= 0 {
            self.0.checked_add_months(Months::new(months.unsigned_abs()))
        } else {
            self.0.checked_sub_months(Months::new(months.unsigned_abs()))
        };
        shifted
            .map(Date)
            .ok_or_else(|| DateError::Overflow(format!("{} shifted by {} months", self, months)))
    }

    /// Returns the first standard CDS roll date (20 Mar/Jun/Sep/Dec) strictly
    /// after this date shifted by `months`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::types::time::Date;
    ///
    /// let trade = Date::from_ymd(2007, 8, 1).unwrap();
    /// assert_eq!(trade.next_cds_date(36).unwrap(), Date::from_ymd(2010, 9, 20).unwrap());
    ///
    /// let on_roll = Date::from_ymd(2018, 12, 20).unwrap();
    /// assert_eq!(on_roll.next_cds_date(0).unwrap(), Date::from_ymd(2019, 3, 20).unwrap());
    /// ```
    pub fn next_cds_date(&self, months: i32) -> Result<Self, DateError> {
        let shifted = self.add_months(months)?;
        let (year, month, day) = (shifted.year(), shifted.month(), shifted.day());

        let roll = CDS_ROLL_MONTHS
            .iter()
            .copied()
            .find(|&m| m > month || (m == month && day < CDS_ROLL_DAY));

        match roll {
            Some(m) => Date::from_ymd(year, m, CDS_ROLL_DAY),
            None => Date::from_ymd(year + 1, CDS_ROLL_MONTHS[0], CDS_ROLL_DAY),
        }
    }

    /// Returns the last standard CDS roll date on or before this date.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::types::time::Date;
    ///
    /// let d = Date::from_ymd(2024, 2, 10).unwrap();
    /// assert_eq!(d.previous_cds_date().unwrap(), Date::from_ymd(2023, 12, 20).unwrap());
    ///
    /// let roll = Date::from_ymd(2024, 6, 20).unwrap();
    /// assert_eq!(roll.previous_cds_date().unwrap(), roll);
    /// ```
    pub fn previous_cds_date(&self) -> Result<Self, DateError> {
        let (year, month, day) = (self.year(), self.month(), self.day());

        let roll = CDS_ROLL_MONTHS
            .iter()
            .rev()
            .copied()
            .find(|&m| m < month || (m == month && day >= CDS_ROLL_DAY));

        match roll {
            Some(m) => Date::from_ymd(year, m, CDS_ROLL_DAY),
            None => Date::from_ymd(year - 1, CDS_ROLL_MONTHS[3], CDS_ROLL_DAY),
        }
    }
}

impl Sub for Date {
    type Output = i64;

    /// Returns the number of days between two dates.
    fn sub(self, other: Self) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, DateError> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    /// Formats the date as ISO 8601 (YYYY-MM-DD).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Day Count Convention (year fraction convention).
///
/// # Variants
/// - `Act365Fixed`: Actual days / 365
/// - `Act360`: Actual days / 360 (standard CDS premium accrual)
/// - `Thirty360`: 30/360 US Bond Basis
///
/// ```
/// use pricer_core::types::time::{Date, DayCountConvention};
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let end = Date::from_ymd(2024, 7, 1).unwrap();
///
/// let act_360 = DayCountConvention::Act360.year_fraction(start, end);
/// assert!((act_360 - 0.5056).abs() < 0.001);
///
/// // Reversed dates return a negative value
/// let back = DayCountConvention::Act360.year_fraction(end, start);
/// assert!((back + act_360).abs() < 1e-15);
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DayCountConvention {
    /// Actual/365 Fixed: actual_days / 365.0
    #[default]
    Act365Fixed,

    /// Actual/360: actual_days / 360.0
    Act360,

    /// 30/360 US Bond Basis
    Thirty360,
}

impl DayCountConvention {
    /// Returns the standard convention name.
    ///
    /// ```
    /// use pricer_core::types::time::DayCountConvention;
    ///
    /// assert_eq!(DayCountConvention::Act365Fixed.name(), "ACT/365F");
    /// assert_eq!(DayCountConvention::Act360.name(), "ACT/360");
    /// assert_eq!(DayCountConvention::Thirty360.name(), "30/360");
    /// ```
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act365Fixed => "ACT/365F",
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Thirty360 => "30/360",
        }
    }

    /// Calculates the year fraction between two dates.
    ///
    /// Returns a negative value when `start > end`, so the same call serves
    /// both accrual fractions and the signed curve time axis.
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::Act365Fixed => (end - start) as f64 / 365.0,
            DayCountConvention::Act360 => (end - start) as f64 / 360.0,
            DayCountConvention::Thirty360 => {
                let (s, e, sign) = if start <= end {
                    (start.into_inner(), end.into_inner(), 1.0)
                } else {
                    (end.into_inner(), start.into_inner(), -1.0)
                };

                let d1 = if s.day() == 31 { 30 } else { s.day() };
                let d2 = if e.day() == 31 && d1 == 30 { 30 } else { e.day() };

                let days = 360 * (e.year() - s.year())
                    + 30 * (e.month() as i32 - s.month() as i32)
                    + (d2 as i32 - d1 as i32);
                sign * days as f64 / 360.0
            }
        }
    }
}

impl FromStr for DayCountConvention {
    type Err = String;

    /// Parses day count convention from string (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace(['/', ' ', '_'], "").as_str() {
            "ACT365F" | "ACT365" | "ACTUAL365FIXED" | "ACT365FIXED" | "A365" => {
                Ok(DayCountConvention::Act365Fixed)
            }
            "ACT360" | "ACTUAL360" | "A360" => Ok(DayCountConvention::Act360),
            "30360" | "THIRTY360" => Ok(DayCountConvention::Thirty360),
            _ => Err(format!("Unknown day count convention: {}", s)),
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Holiday calendar used to decide business days.
///
/// Only weekend rules are modelled; `NoHolidays` treats every day as a
/// business day.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HolidayCalendar {
    /// Every calendar day is a business day.
    NoHolidays,
    /// Saturdays and Sundays are holidays.
    #[default]
    Weekend,
}

impl HolidayCalendar {
    /// Returns the calendar name.
    pub fn name(&self) -> &'static str {
        match self {
            HolidayCalendar::NoHolidays => "None",
            HolidayCalendar::Weekend => "Weekend",
        }
    }

    /// Returns whether `date` is a business day under this calendar.
    #[inline]
    pub fn is_business_day(&self, date: Date) -> bool {
        match self {
            HolidayCalendar::NoHolidays => true,
            HolidayCalendar::Weekend => !date.is_weekend(),
        }
    }

    /// First business day on or after `date`.
    pub fn roll_forward(&self, date: Date) -> Result<Date, DateError> {
        let mut d = date;
        while !self.is_business_day(d) {
            d = d.add_days(1)?;
        }
        Ok(d)
    }

    /// Last business day on or before `date`.
    pub fn roll_backward(&self, date: Date) -> Result<Date, DateError> {
        let mut d = date;
        while !self.is_business_day(d) {
            d = d.add_days(-1)?;
        }
        Ok(d)
    }
}

impl FromStr for HolidayCalendar {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "none" | "noholidays" => Ok(HolidayCalendar::NoHolidays),
            "weekend" | "weekends" => Ok(HolidayCalendar::Weekend),
            _ => Err(format!("Unknown holiday calendar: {}", s)),
        }
    }
}

impl fmt::Display for HolidayCalendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Business Day Convention for date adjustments.
///
/// # Examples
///
/// ```
/// use pricer_core::types::time::{BusinessDayConvention, Date, HolidayCalendar};
///
/// // 2024-06-15 is a Saturday
/// let sat = Date::from_ymd(2024, 6, 15).unwrap();
/// let adjusted = BusinessDayConvention::Following
///     .adjust(sat, HolidayCalendar::Weekend)
///     .unwrap();
/// assert_eq!(adjusted, Date::from_ymd(2024, 6, 17).unwrap());
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BusinessDayConvention {
    /// Move to the next business day.
    #[default]
    Following,

    /// Move to the next business day, unless it crosses a month boundary.
    ModifiedFollowing,

    /// Move to the previous business day.
    Preceding,

    /// Move to the previous business day, unless it crosses a month boundary.
    ModifiedPreceding,

    /// Do not adjust the date.
    Unadjusted,
}

impl BusinessDayConvention {
    /// Returns the standard name for this convention.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            BusinessDayConvention::Following => "Following",
            BusinessDayConvention::ModifiedFollowing => "Modified Following",
            BusinessDayConvention::Preceding => "Preceding",
            BusinessDayConvention::ModifiedPreceding => "Modified Preceding",
            BusinessDayConvention::Unadjusted => "Unadjusted",
        }
    }

    /// Returns a short code for this convention.
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            BusinessDayConvention::Following => "F",
            BusinessDayConvention::ModifiedFollowing => "MF",
            BusinessDayConvention::Preceding => "P",
            BusinessDayConvention::ModifiedPreceding => "MP",
            BusinessDayConvention::Unadjusted => "U",
        }
    }

    /// Adjusts `date` to a business day of `calendar`.
    pub fn adjust(&self, date: Date, calendar: HolidayCalendar) -> Result<Date, DateError> {
        if calendar.is_business_day(date) {
            return Ok(date);
        }

        match self {
            BusinessDayConvention::Unadjusted => Ok(date),
            BusinessDayConvention::Following => calendar.roll_forward(date),
            BusinessDayConvention::Preceding => calendar.roll_backward(date),
            BusinessDayConvention::ModifiedFollowing => {
                let forward = calendar.roll_forward(date)?;
                if forward.month() != date.month() {
                    calendar.roll_backward(date)
                } else {
                    Ok(forward)
                }
            }
            BusinessDayConvention::ModifiedPreceding => {
                let backward = calendar.roll_backward(date)?;
                if backward.month() != date.month() {
                    calendar.roll_forward(date)
                } else {
                    Ok(backward)
                }
            }
        }
    }
}

impl fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for BusinessDayConvention {
    type Err = String;

    /// Parses business day convention from string (case-insensitive).
    ///
    /// Supports full names and short codes (`F`, `MF`, `P`, `MP`, `U`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "following" | "f" => Ok(BusinessDayConvention::Following),
            "modifiedfollowing" | "mf" => Ok(BusinessDayConvention::ModifiedFollowing),
            "preceding" | "p" => Ok(BusinessDayConvention::Preceding),
            "modifiedpreceding" | "mp" => Ok(BusinessDayConvention::ModifiedPreceding),
            "unadjusted" | "u" | "none" => Ok(BusinessDayConvention::Unadjusted),
            _ => Err(format!("Unknown business day convention: {}", s)),
        }
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::{BusinessDayConvention, DayCountConvention, HolidayCalendar};
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    macro_rules! string_serde {
        ($ty:ty) => {
            impl Serialize for $ty {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: Serializer,
                {
                    serializer.serialize_str(self.name())
                }
            }

            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: Deserializer<'de>,
                {
                    let s = String::deserialize(deserializer)?;
                    <$ty>::from_str(&s).map_err(de::Error::custom)
                }
            }
        };
    }

    string_serde!(DayCountConvention);
    string_serde!(HolidayCalendar);
    string_serde!(BusinessDayConvention);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    // ========================================
    // Date Tests
    // ========================================

    #[test]
    fn test_parse_roundtrip_display() {
        let date = d(2019, 3, 20);
        assert_eq!(Date::parse(&date.to_string()).unwrap(), date);
        assert!(Date::parse("20-03-2019").is_err());
    }

    #[test]
    fn test_add_months_end_of_month_clamp() {
        assert_eq!(d(2023, 1, 31).add_months(1).unwrap(), d(2023, 2, 28));
        assert_eq!(d(2024, 3, 31).add_months(-1).unwrap(), d(2024, 2, 29));
        assert_eq!(d(2018, 12, 20).add_months(120).unwrap(), d(2028, 12, 20));
    }

    #[test]
    fn test_next_cds_date_rolls() {
        assert_eq!(d(2024, 1, 5).next_cds_date(0).unwrap(), d(2024, 3, 20));
        assert_eq!(d(2024, 3, 19).next_cds_date(0).unwrap(), d(2024, 3, 20));
        assert_eq!(d(2024, 3, 20).next_cds_date(0).unwrap(), d(2024, 6, 20));
        assert_eq!(d(2024, 12, 21).next_cds_date(0).unwrap(), d(2025, 3, 20));
        assert_eq!(d(2007, 8, 1).next_cds_date(120).unwrap(), d(2017, 9, 20));
    }

    #[test]
    fn test_previous_cds_date_rolls() {
        assert_eq!(d(2024, 3, 19).previous_cds_date().unwrap(), d(2023, 12, 20));
        assert_eq!(d(2024, 3, 21).previous_cds_date().unwrap(), d(2024, 3, 20));
        assert_eq!(d(2024, 12, 31).previous_cds_date().unwrap(), d(2024, 12, 20));
    }

    // ========================================
    // Day Count Tests
    // ========================================

    #[test]
    fn test_act_conventions() {
        let start = d(2024, 1, 1);
        let end = d(2025, 1, 1);
        assert_relative_eq!(
            DayCountConvention::Act365Fixed.year_fraction(start, end),
            366.0 / 365.0
        );
        assert_relative_eq!(
            DayCountConvention::Act360.year_fraction(start, end),
            366.0 / 360.0
        );
    }

    #[test]
    fn test_thirty_360_month_end() {
        let yf = DayCountConvention::Thirty360.year_fraction(d(2024, 1, 31), d(2024, 3, 31));
        assert_relative_eq!(yf, 60.0 / 360.0);
    }

    #[test]
    fn test_day_count_from_str() {
        assert_eq!(
            "act/360".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::Act360
        );
        assert_eq!(
            "ACT/365F".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::Act365Fixed
        );
        assert!("bus/252".parse::<DayCountConvention>().is_err());
    }

    // ========================================
    // Calendar / Business Day Tests
    // ========================================

    #[test]
    fn test_weekend_calendar() {
        let sat = d(2024, 6, 15);
        assert!(!HolidayCalendar::Weekend.is_business_day(sat));
        assert!(HolidayCalendar::NoHolidays.is_business_day(sat));
    }

    #[test]
    fn test_adjust_following_and_preceding() {
        let sat = d(2024, 6, 15);
        let cal = HolidayCalendar::Weekend;
        assert_eq!(
            BusinessDayConvention::Following.adjust(sat, cal).unwrap(),
            d(2024, 6, 17)
        );
        assert_eq!(
            BusinessDayConvention::Preceding.adjust(sat, cal).unwrap(),
            d(2024, 6, 14)
        );
        assert_eq!(
            BusinessDayConvention::Unadjusted.adjust(sat, cal).unwrap(),
            sat
        );
    }

    #[test]
    fn test_adjust_modified_conventions_respect_month() {
        let cal = HolidayCalendar::Weekend;
        // Saturday 31 Aug 2024: following would land in September
        assert_eq!(
            BusinessDayConvention::ModifiedFollowing
                .adjust(d(2024, 8, 31), cal)
                .unwrap(),
            d(2024, 8, 30)
        );
        // Saturday 1 Jun 2024: preceding would land in May
        assert_eq!(
            BusinessDayConvention::ModifiedPreceding
                .adjust(d(2024, 6, 1), cal)
                .unwrap(),
            d(2024, 6, 3)
        );
    }

    #[test]
    fn test_business_day_from_str() {
        assert_eq!(
            "MF".parse::<BusinessDayConvention>().unwrap(),
            BusinessDayConvention::ModifiedFollowing
        );
        assert!("sideways".parse::<BusinessDayConvention>().is_err());
    }

    proptest! {
        #[test]
        fn prop_year_fraction_antisymmetric(a in 0i64..20_000, b in 0i64..20_000) {
            let base = d(2000, 1, 1);
            let s = base.add_days(a).unwrap();
            let e = base.add_days(b).unwrap();
            for dc in [
                DayCountConvention::Act365Fixed,
                DayCountConvention::Act360,
                DayCountConvention::Thirty360,
            ] {
                let fwd = dc.year_fraction(s, e);
                let back = dc.year_fraction(e, s);
                prop_assert!((fwd + back).abs() < 1e-12);
            }
        }

        #[test]
        fn prop_adjusted_date_is_business_day(offset in 0i64..5_000) {
            let date = d(2010, 1, 1).add_days(offset).unwrap();
            let cal = HolidayCalendar::Weekend;
            for bdc in [
                BusinessDayConvention::Following,
                BusinessDayConvention::ModifiedFollowing,
                BusinessDayConvention::Preceding,
                BusinessDayConvention::ModifiedPreceding,
            ] {
                let adjusted = bdc.adjust(date, cal).unwrap();
                prop_assert!(cal.is_business_day(adjusted));
                prop_assert!((adjusted - date).abs() <= 3);
            }
        }
    }
}

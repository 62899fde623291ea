//! Cyclical positional fields (day-of-week, month-of-year, ...).
//!
//! A [`Field`] selects one `base`-sized bucket within each `range`-sized
//! bucket. Occurrences are generated by an RFC 5545 recurrence rule, so
//! positions that do not exist in a given range (day 31 of February, week 53
//! of most years) are skipped by the rule rather than produced as invalid
//! dates.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::{Datelike, Month, NaiveDateTime, TimeZone, Weekday};
use rrule::{Frequency, NWeekday, RRule, Tz};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Result, ScateError};
use crate::unit::TimeUnit;

/// Maximum number of occurrences requested from one search window.
const OCCURRENCE_LIMIT: u16 = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Field {
    /// 1 (Monday) through 7 (Sunday).
    DayOfWeek,
    DayOfMonth,
    DayOfYear,
    /// The week starting on the n-th Monday of the month.
    WeekOfMonth,
    /// ISO 8601 week number.
    WeekOfYear,
    MonthOfYear,
    QuarterOfYear,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::DayOfWeek,
        Field::DayOfMonth,
        Field::DayOfYear,
        Field::WeekOfMonth,
        Field::WeekOfYear,
        Field::MonthOfYear,
        Field::QuarterOfYear,
    ];

    /// Canonical kebab-case name (e.g. `"day-of-week"`).
    pub fn name(self) -> &'static str {
        match self {
            Field::DayOfWeek => "day-of-week",
            Field::DayOfMonth => "day-of-month",
            Field::DayOfYear => "day-of-year",
            Field::WeekOfMonth => "week-of-month",
            Field::WeekOfYear => "week-of-year",
            Field::MonthOfYear => "month-of-year",
            Field::QuarterOfYear => "quarter-of-year",
        }
    }

    /// The size of each selected bucket.
    pub fn base(self) -> TimeUnit {
        match self {
            Field::DayOfWeek | Field::DayOfMonth | Field::DayOfYear => TimeUnit::Day,
            Field::WeekOfMonth | Field::WeekOfYear => TimeUnit::Week,
            Field::MonthOfYear => TimeUnit::Month,
            Field::QuarterOfYear => TimeUnit::QuarterYear,
        }
    }

    /// The cycle the position is counted within.
    pub fn range(self) -> TimeUnit {
        match self {
            Field::DayOfWeek => TimeUnit::Week,
            Field::DayOfMonth | Field::WeekOfMonth => TimeUnit::Month,
            Field::DayOfYear | Field::WeekOfYear | Field::MonthOfYear | Field::QuarterOfYear => {
                TimeUnit::Year
            }
        }
    }

    /// Positions this field can take in at least one range.
    pub fn positions(self) -> RangeInclusive<u32> {
        match self {
            Field::DayOfWeek => 1..=7,
            Field::DayOfMonth => 1..=31,
            Field::DayOfYear => 1..=366,
            Field::WeekOfMonth => 1..=5,
            Field::WeekOfYear => 1..=53,
            Field::MonthOfYear => 1..=12,
            Field::QuarterOfYear => 1..=4,
        }
    }

    /// Check that `value` is a position this field can take.
    ///
    /// # Errors
    ///
    /// Returns [`ScateError::InvalidField`] if `value` is outside [`Field::positions`].
    pub fn validate(self, value: u32) -> Result<u32> {
        let positions = self.positions();
        if positions.contains(&value) {
            Ok(value)
        } else {
            Err(ScateError::InvalidField(format!(
                "{self} must be in {}..={}, got {value}",
                positions.start(),
                positions.end()
            )))
        }
    }

    /// Parse a position: an integer, a weekday name for
    /// [`Field::DayOfWeek`], or a month name for [`Field::MonthOfYear`].
    pub fn parse_value(self, s: &str) -> Result<u32> {
        let key = s.trim().to_lowercase();
        let named = match self {
            Field::DayOfWeek => parse_weekday(&key).map(|weekday| weekday.number_from_monday()),
            Field::MonthOfYear => parse_month(&key),
            _ => None,
        };
        let value = match named {
            Some(value) => value,
            None => key.parse::<u32>().map_err(|_| {
                ScateError::InvalidField(format!("'{}' is not a valid {self} position", s.trim()))
            })?,
        };
        self.validate(value)
    }

    /// Whether a `base`-aligned instant sits at position `value`.
    ///
    /// Always `false` for a `value` outside [`Field::positions`].
    pub fn matches(self, value: u32, t: NaiveDateTime) -> bool {
        if !self.positions().contains(&value) {
            return false;
        }
        let date = t.date();
        match self {
            Field::DayOfWeek => date.weekday().number_from_monday() == value,
            Field::DayOfMonth => date.day() == value,
            Field::DayOfYear => date.ordinal() == value,
            Field::WeekOfMonth => date.weekday() == Weekday::Mon && (date.day() - 1) / 7 + 1 == value,
            Field::WeekOfYear => date.weekday() == Weekday::Mon && date.iso_week().week() == value,
            Field::MonthOfYear => date.day() == 1 && date.month() == value,
            Field::QuarterOfYear => date.day() == 1 && date.month() == value * 3 - 2,
        }
    }

    /// Starts of the occurrences of position `value` between `from` and
    /// `until` (both inclusive), in increasing order.
    pub(crate) fn occurrences(
        self,
        value: u32,
        from: NaiveDateTime,
        until: NaiveDateTime,
    ) -> Result<Vec<NaiveDateTime>> {
        let value = self.validate(value)?;
        let rule_error =
            |detail: String| ScateError::InvalidRule(format!("{self} = {value}: {detail}"));

        let rule = match self {
            Field::DayOfWeek => RRule::new(Frequency::Weekly)
                .by_weekday(vec![NWeekday::Every(weekday_from_number(value)?)]),
            Field::DayOfMonth => RRule::new(Frequency::Monthly)
                .by_month_day(vec![i8::try_from(value).map_err(|e| rule_error(e.to_string()))?]),
            Field::DayOfYear => RRule::new(Frequency::Yearly)
                .by_year_day(vec![i16::try_from(value).map_err(|e| rule_error(e.to_string()))?]),
            Field::WeekOfMonth => RRule::new(Frequency::Monthly).by_weekday(vec![NWeekday::Nth(
                i16::try_from(value).map_err(|e| rule_error(e.to_string()))?,
                Weekday::Mon,
            )]),
            Field::WeekOfYear => RRule::new(Frequency::Yearly)
                .by_week_no(vec![i8::try_from(value).map_err(|e| rule_error(e.to_string()))?])
                .by_weekday(vec![NWeekday::Every(Weekday::Mon)]),
            Field::MonthOfYear => RRule::new(Frequency::Yearly)
                .by_month(&[month_from_number(value)?])
                .by_month_day(vec![1]),
            Field::QuarterOfYear => RRule::new(Frequency::Yearly)
                .by_month(&[month_from_number(value * 3 - 2)?])
                .by_month_day(vec![1]),
        };

        let dt_start = Tz::UTC.from_utc_datetime(&TimeUnit::Day.truncate(from)?);
        let until_utc = Tz::UTC.from_utc_datetime(&until);
        let rule_set = rule
            .until(until_utc)
            .build(dt_start)
            .map_err(|e| rule_error(e.to_string()))?;

        trace!(field = %self, value, from = %from, until = %until, "searching occurrences");

        let occurrences = rule_set
            .all(OCCURRENCE_LIMIT)
            .dates
            .into_iter()
            .map(|occurrence| occurrence.naive_utc())
            .filter(|occurrence| {
                from <= *occurrence && *occurrence <= until && self.matches(value, *occurrence)
            })
            .collect();
        Ok(occurrences)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = ScateError;

    /// Case-insensitive; words may be joined with `-`, `_` or a space.
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase().replace(['_', ' '], "-");
        Self::ALL
            .into_iter()
            .find(|field| field.name() == key)
            .ok_or_else(|| {
                let options: Vec<&str> = Self::ALL.iter().map(|field| field.name()).collect();
                ScateError::InvalidField(format!(
                    "'{}' is not a valid field. Options are: {}",
                    s.trim(),
                    options.join(", ")
                ))
            })
    }
}

// ── Parsing helpers ─────────────────────────────────────────────────────────

/// Parse a lowercase weekday name (full or abbreviated).
fn parse_weekday(s: &str) -> Option<Weekday> {
    match s {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Parse a lowercase month name to its number (1-12).
fn parse_month(s: &str) -> Option<u32> {
    match s {
        "january" | "jan" => Some(1),
        "february" | "feb" => Some(2),
        "march" | "mar" => Some(3),
        "april" | "apr" => Some(4),
        "may" => Some(5),
        "june" | "jun" => Some(6),
        "july" | "jul" => Some(7),
        "august" | "aug" => Some(8),
        "september" | "sep" | "sept" => Some(9),
        "october" | "oct" => Some(10),
        "november" | "nov" => Some(11),
        "december" | "dec" => Some(12),
        _ => None,
    }
}

fn weekday_from_number(n: u32) -> Result<Weekday> {
    u8::try_from(n)
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|n| Weekday::try_from(n).ok())
        .ok_or_else(|| ScateError::InvalidField(format!("no weekday number {n}")))
}

fn month_from_number(n: u32) -> Result<Month> {
    u8::try_from(n)
        .ok()
        .and_then(|n| Month::try_from(n).ok())
        .ok_or_else(|| ScateError::InvalidField(format!("no month number {n}")))
}

// ── Tests ───────────────────────────────────────────────────────────────────

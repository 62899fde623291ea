//! Calendar granularities.
//!
//! A [`TimeUnit`] knows how to truncate an instant down to the start of its
//! containing bucket, and (for a subset of units) how to take calendar-aware
//! steps of `n` units. Steps are calendar-relative rather than fixed durations:
//! adding one month to January 31 lands on the last day of February.
//!
//! Every unit has a bucket width, so every unit can drive a
//! [`RepeatingInterval`](crate::repeating::RepeatingInterval). Only the units
//! listed in [`TimeUnit::PERIOD_NAMES`] can be used for period arithmetic;
//! the rest raise [`ScateError::UnsupportedOperation`].

use std::fmt;
use std::str::FromStr;

use chrono::{
    Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Weekday,
};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScateError};

// ── Configurable week start ─────────────────────────────────────────────────

/// Which day begins a week when truncating to [`TimeUnit::Week`].
///
/// Does **not** affect day-of-week fields or ISO week numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeekStartDay {
    /// ISO 8601 standard (Monday = day 0 of the week).
    #[default]
    Monday,
    /// US/Canada convention (Sunday = day 0 of the week).
    Sunday,
}

impl WeekStartDay {
    /// How many days `weekday` is from the week-start day.
    pub fn days_from_start(self, weekday: Weekday) -> u64 {
        match self {
            WeekStartDay::Monday => u64::from(weekday.num_days_from_monday()),
            WeekStartDay::Sunday => u64::from(weekday.num_days_from_sunday()),
        }
    }
}

// ── TimeUnit ────────────────────────────────────────────────────────────────

/// A calendar granularity, ordered from finest to coarsest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum TimeUnit {
    Microsecond,
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    QuarterYear,
    Year,
    Decade,
    QuarterCentury,
    Century,
    Millennium,
}

/// How far one application of a unit moves an instant.
#[derive(Debug, Clone, Copy)]
enum Shift {
    Delta(TimeDelta),
    Months(i64),
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 14] = [
        TimeUnit::Microsecond,
        TimeUnit::Millisecond,
        TimeUnit::Second,
        TimeUnit::Minute,
        TimeUnit::Hour,
        TimeUnit::Day,
        TimeUnit::Week,
        TimeUnit::Month,
        TimeUnit::QuarterYear,
        TimeUnit::Year,
        TimeUnit::Decade,
        TimeUnit::QuarterCentury,
        TimeUnit::Century,
        TimeUnit::Millennium,
    ];

    /// Unit names accepted by [`Period::parse`](crate::period::Period::parse).
    pub const PERIOD_NAMES: [&'static str; 8] = [
        "year",
        "month",
        "week",
        "day",
        "hour",
        "minute",
        "second",
        "microsecond",
    ];

    /// Canonical lowercase name (e.g. `"quarter-year"`).
    pub fn name(self) -> &'static str {
        match self {
            TimeUnit::Microsecond => "microsecond",
            TimeUnit::Millisecond => "millisecond",
            TimeUnit::Second => "second",
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
            TimeUnit::Month => "month",
            TimeUnit::QuarterYear => "quarter-year",
            TimeUnit::Year => "year",
            TimeUnit::Decade => "decade",
            TimeUnit::QuarterCentury => "quarter-century",
            TimeUnit::Century => "century",
            TimeUnit::Millennium => "millennium",
        }
    }

    /// Whether this unit has a calendar step usable for period arithmetic.
    pub fn is_steppable(self) -> bool {
        matches!(
            self,
            TimeUnit::Microsecond
                | TimeUnit::Second
                | TimeUnit::Minute
                | TimeUnit::Hour
                | TimeUnit::Day
                | TimeUnit::Week
                | TimeUnit::Month
                | TimeUnit::Year
        )
    }

    /// Truncate `t` to the start of its containing bucket, with weeks
    /// starting on Monday.
    ///
    /// # Errors
    ///
    /// Returns [`ScateError::InvalidDatetime`] if the bucket start falls
    /// outside the representable calendar range.
    pub fn truncate(self, t: NaiveDateTime) -> Result<NaiveDateTime> {
        self.truncate_with(t, WeekStartDay::Monday)
    }

    /// Truncate `t` to the start of its containing bucket.
    ///
    /// `week_start` only matters for [`TimeUnit::Week`].
    pub fn truncate_with(self, t: NaiveDateTime, week_start: WeekStartDay) -> Result<NaiveDateTime> {
        let date = t.date();
        let truncated = match self {
            TimeUnit::Microsecond => t.with_nanosecond(t.nanosecond() / 1_000 * 1_000),
            TimeUnit::Millisecond => t.with_nanosecond(t.nanosecond() / 1_000_000 * 1_000_000),
            TimeUnit::Second => t.with_nanosecond(0),
            TimeUnit::Minute => {
                NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).map(|time| date.and_time(time))
            }
            TimeUnit::Hour => NaiveTime::from_hms_opt(t.hour(), 0, 0).map(|time| date.and_time(time)),
            TimeUnit::Day => Some(date.and_time(NaiveTime::MIN)),
            TimeUnit::Week => date
                .checked_sub_days(Days::new(week_start.days_from_start(date.weekday())))
                .map(|monday| monday.and_time(NaiveTime::MIN)),
            TimeUnit::Month => first_of_month(date.year(), date.month()),
            TimeUnit::QuarterYear => first_of_month(date.year(), date.month0() / 3 * 3 + 1),
            TimeUnit::Year => first_of_month(date.year(), 1),
            TimeUnit::Decade => first_of_month(floor_year(date.year(), 10), 1),
            TimeUnit::QuarterCentury => first_of_month(floor_year(date.year(), 25), 1),
            TimeUnit::Century => first_of_month(floor_year(date.year(), 100), 1),
            TimeUnit::Millennium => first_of_month(floor_year(date.year(), 1000), 1),
        };
        truncated.ok_or_else(|| {
            ScateError::InvalidDatetime(format!("cannot truncate {t} to a {self} boundary"))
        })
    }

    /// Take `n` calendar steps of this unit from `t` (negative `n` steps back).
    ///
    /// # Errors
    ///
    /// Returns [`ScateError::UnsupportedOperation`] for units without a
    /// calendar step (millisecond, quarter-year, decade, quarter-century,
    /// century, millennium), or [`ScateError::InvalidDatetime`] on overflow.
    pub fn step(self, t: NaiveDateTime, n: i64) -> Result<NaiveDateTime> {
        if !self.is_steppable() {
            return Err(ScateError::UnsupportedOperation(format!(
                "'{self}' has no calendar step; period arithmetic supports: {}",
                Self::PERIOD_NAMES.join(", ")
            )));
        }
        self.advance(t, n).ok_or_else(|| {
            ScateError::InvalidDatetime(format!("{t} moved by {n} {self}(s) is out of range"))
        })
    }

    /// Move `t` by `n` bucket widths. Defined for every unit; repeating
    /// intervals use this to walk bucket boundaries.
    pub(crate) fn advance(self, t: NaiveDateTime, n: i64) -> Option<NaiveDateTime> {
        match self.shift(n)? {
            Shift::Delta(delta) => t.checked_add_signed(delta),
            Shift::Months(months) => {
                let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
                if months >= 0 {
                    t.checked_add_months(magnitude)
                } else {
                    t.checked_sub_months(magnitude)
                }
            }
        }
    }

    fn shift(self, n: i64) -> Option<Shift> {
        let shift = match self {
            TimeUnit::Microsecond => Shift::Delta(TimeDelta::microseconds(n)),
            TimeUnit::Millisecond => Shift::Delta(TimeDelta::try_milliseconds(n)?),
            TimeUnit::Second => Shift::Delta(TimeDelta::try_seconds(n)?),
            TimeUnit::Minute => Shift::Delta(TimeDelta::try_minutes(n)?),
            TimeUnit::Hour => Shift::Delta(TimeDelta::try_hours(n)?),
            TimeUnit::Day => Shift::Delta(TimeDelta::try_days(n)?),
            TimeUnit::Week => Shift::Delta(TimeDelta::try_weeks(n)?),
            TimeUnit::Month => Shift::Months(n),
            TimeUnit::QuarterYear => Shift::Months(n.checked_mul(3)?),
            TimeUnit::Year => Shift::Months(n.checked_mul(12)?),
            TimeUnit::Decade => Shift::Months(n.checked_mul(120)?),
            TimeUnit::QuarterCentury => Shift::Months(n.checked_mul(300)?),
            TimeUnit::Century => Shift::Months(n.checked_mul(1_200)?),
            TimeUnit::Millennium => Shift::Months(n.checked_mul(12_000)?),
        };
        Some(shift)
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimeUnit {
    type Err = ScateError;

    /// Case-insensitive; accepts singular and plural forms, with `-`, `_`
    /// or a space between words.
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase().replace(['_', ' '], "-");
        let unit = match key.as_str() {
            "microsecond" | "microseconds" => TimeUnit::Microsecond,
            "millisecond" | "milliseconds" => TimeUnit::Millisecond,
            "second" | "seconds" => TimeUnit::Second,
            "minute" | "minutes" => TimeUnit::Minute,
            "hour" | "hours" => TimeUnit::Hour,
            "day" | "days" => TimeUnit::Day,
            "week" | "weeks" => TimeUnit::Week,
            "month" | "months" => TimeUnit::Month,
            "quarter-year" | "quarter-years" | "quarter" | "quarters" => TimeUnit::QuarterYear,
            "year" | "years" => TimeUnit::Year,
            "decade" | "decades" => TimeUnit::Decade,
            "quarter-century" | "quarter-centuries" => TimeUnit::QuarterCentury,
            "century" | "centuries" => TimeUnit::Century,
            "millennium" | "millennia" | "millenniums" => TimeUnit::Millennium,
            _ => {
                let options: Vec<&str> = Self::ALL.iter().map(|unit| unit.name()).collect();
                return Err(ScateError::InvalidUnit(format!(
                    "'{}' is not a valid time unit. Options are: {}",
                    s.trim(),
                    options.join(", ")
                )));
            }
        };
        Ok(unit)
    }
}

// ── Internal helpers ────────────────────────────────────────────────────────

fn first_of_month(year: i32, month: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|date| date.and_time(NaiveTime::MIN))
}

/// Floor `year` to a multiple of `span` (also for negative years).
fn floor_year(year: i32, span: i32) -> i32 {
    year - year.rem_euclid(span)
}

// ── Tests ───────────────────────────────────────────────────────────────────

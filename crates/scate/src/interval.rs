//! Half-open datetime intervals.
//!
//! An [`Interval`] is the value type that flows through the whole crate:
//! every operator takes one as its anchor and produces another. Instants are
//! naive local timestamps with microsecond resolution.
//!
//! # Canonical text form
//!
//! `"{start} {end}"`, each instant rendered as `YYYY-MM-DDTHH:MM:SS`, with a
//! `.ffffff` suffix only when the microsecond component is non-zero.
//! [`Interval::from_str`] parses the same format back.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScateError};
use crate::unit::TimeUnit;

/// A half-open `[start, end)` range of naive datetimes, with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "IntervalFields")]
pub struct Interval {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

#[derive(Deserialize)]
struct IntervalFields {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TryFrom<IntervalFields> for Interval {
    type Error = ScateError;

    fn try_from(fields: IntervalFields) -> Result<Self> {
        Interval::new(fields.start, fields.end)
    }
}

/// Units selected by the number of fields given to [`Interval::of`].
const OF_UNITS: [TimeUnit; 7] = [
    TimeUnit::Year,
    TimeUnit::Month,
    TimeUnit::Day,
    TimeUnit::Hour,
    TimeUnit::Minute,
    TimeUnit::Second,
    TimeUnit::Microsecond,
];

impl Interval {
    /// Create the interval `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns [`ScateError::InvalidDatetime`] unless `start < end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start >= end {
            return Err(ScateError::InvalidDatetime(format!(
                "interval start {} must be before end {}",
                format_instant(&start),
                format_instant(&end)
            )));
        }
        Ok(Self { start, end })
    }

    /// The interval covering one unit of the finest field given.
    ///
    /// `fields` holds, in order, any prefix of
    /// `[month, day, hour, minute, second, microsecond]`; month and day
    /// default to 1. `Interval::of(1985, &[6])` is June 1985, and
    /// `Interval::of(1985, &[6, 17, 23])` is the hour starting 23:00 on
    /// June 17.
    ///
    /// # Errors
    ///
    /// Returns [`ScateError::InvalidDatetime`] if more than six fields are
    /// given or the fields do not name a valid calendar instant.
    pub fn of(year: i32, fields: &[u32]) -> Result<Self> {
        let unit = *OF_UNITS.get(fields.len()).ok_or_else(|| {
            ScateError::InvalidDatetime(format!(
                "at most 6 fields may follow the year, got {}",
                fields.len()
            ))
        })?;
        let field = |i: usize, default: u32| fields.get(i).copied().unwrap_or(default);

        let date = NaiveDate::from_ymd_opt(year, field(0, 1), field(1, 1));
        let time = NaiveTime::from_hms_micro_opt(field(2, 0), field(3, 0), field(4, 0), field(5, 0));
        let start = date.zip(time).map(|(d, t)| d.and_time(t)).ok_or_else(|| {
            ScateError::InvalidDatetime(format!("no such instant: {year} {fields:?}"))
        })?;
        let end = unit.step(start, 1)?;
        Self::new(start, end)
    }

    /// The first instant, included.
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// The first instant past the interval, excluded.
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whether `t` lies in `[start, end)`.
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t < self.end
    }

    /// Whether `other` lies entirely within this interval.
    pub fn covers(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether this interval ends at or before `other` starts.
    pub fn precedes(&self, other: &Interval) -> bool {
        self.end <= other.start
    }

    /// The overlap of two intervals, if they share any instant.
    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(Interval { start, end })
    }

    /// Canonical text form: `"{start} {end}"`.
    pub fn isoformat(&self) -> String {
        format!("{} {}", format_instant(&self.start), format_instant(&self.end))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.isoformat())
    }
}

impl FromStr for Interval {
    type Err = ScateError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let (Some(start), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ScateError::InvalidDatetime(format!(
                "expected two timestamps separated by a space: '{}'",
                s.trim()
            )));
        };
        Interval::new(parse_instant(start)?, parse_instant(end)?)
    }
}

// ── Year constructors ───────────────────────────────────────────────────────

/// The span of years written with `n_missing_digits` trailing digits left off.
///
/// `year(1985, 0)` is the year 1985, `year(198, 1)` the decade 1980–1989 and
/// `year(17, 2)` the century 1700–1799.
///
/// # Errors
///
/// Returns [`ScateError::InvalidDatetime`] if the span leaves the calendar range.
pub fn year(digits: i32, n_missing_digits: u32) -> Result<Interval> {
    let out_of_range = || {
        ScateError::InvalidDatetime(format!(
            "year {digits} with {n_missing_digits} missing digit(s) is out of range"
        ))
    };
    let span = 10i32.checked_pow(n_missing_digits).ok_or_else(out_of_range)?;
    let first = digits.checked_mul(span).ok_or_else(out_of_range)?;
    let start = NaiveDate::from_ymd_opt(first, 1, 1)
        .map(|date| date.and_time(NaiveTime::MIN))
        .ok_or_else(out_of_range)?;
    let end = TimeUnit::Year.step(start, i64::from(span))?;
    Interval::new(start, end)
}

/// Resolve a year suffix (e.g. `'37` or `the '80s`) against the leading
/// digits of `interval`'s start year.
///
/// `year_suffix(&year(1903, 0)?, 37, 2, 0)` is 1937;
/// `year_suffix(&year(1903, 0)?, 8, 1, 1)` is the decade 1980–1989.
pub fn year_suffix(
    interval: &Interval,
    last_digits: i32,
    n_suffix_digits: u32,
    n_missing_digits: u32,
) -> Result<Interval> {
    let out_of_range = || {
        ScateError::InvalidDatetime(format!(
            "suffix {last_digits} ({n_suffix_digits} digit(s)) cannot extend {}",
            interval.start.year()
        ))
    };
    let divider = n_suffix_digits
        .checked_add(n_missing_digits)
        .and_then(|exponent| 10i32.checked_pow(exponent))
        .ok_or_else(out_of_range)?;
    let multiplier = 10i32.checked_pow(n_suffix_digits).ok_or_else(out_of_range)?;
    let digits = interval
        .start
        .year()
        .div_euclid(divider)
        .checked_mul(multiplier)
        .and_then(|prefix| prefix.checked_add(last_digits))
        .ok_or_else(out_of_range)?;
    year(digits, n_missing_digits)
}

// ── Internal helpers ────────────────────────────────────────────────────────

pub(crate) fn format_instant(t: &NaiveDateTime) -> String {
    let seconds = t.format("%Y-%m-%dT%H:%M:%S");
    match t.nanosecond() / 1_000 {
        0 => seconds.to_string(),
        micros => format!("{seconds}.{micros:06}"),
    }
}

/// Instants carry microsecond resolution; finer fractions are rejected so
/// that every parsed instant renders back to the same text.
fn parse_instant(s: &str) -> Result<NaiveDateTime> {
    let t = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| ScateError::InvalidDatetime(format!("'{s}': {e}")))?;
    if t.nanosecond() % 1_000 != 0 {
        return Err(ScateError::InvalidDatetime(format!(
            "'{s}': fractions finer than a microsecond are not supported"
        )));
    }
    Ok(t)
}

// ── Tests ───────────────────────────────────────────────────────────────────

//! Calendar-relative offsets.
//!
//! A [`Period`] is "n units" and a [`Sum`] is an ordered list of periods.
//! Both are calendar-relative: they are applied with calendar steps, never as
//! fixed durations. [`Offset`] is the operand taken by the anchor operators:
//! a period, a sum, or a repeating interval.

use std::fmt;

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScateError};
use crate::interval::Interval;
use crate::repeating::RepeatingInterval;
use crate::unit::TimeUnit;

// ── Period ──────────────────────────────────────────────────────────────────

/// `n` calendar units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    unit: TimeUnit,
    n: i64,
}

impl Period {
    /// Any unit is accepted here; arithmetic with a unit that has no
    /// calendar step fails later with [`ScateError::UnsupportedOperation`].
    pub fn new(unit: TimeUnit, n: i64) -> Self {
        Self { unit, n }
    }

    /// Create a period from a unit name, as written by the upstream parser.
    ///
    /// # Errors
    ///
    /// Returns [`ScateError::InvalidUnit`] unless `unit` is one of
    /// [`TimeUnit::PERIOD_NAMES`]; the message lists the valid names.
    pub fn parse(unit: &str, n: i64) -> Result<Self> {
        let name = unit.trim();
        if !TimeUnit::PERIOD_NAMES.contains(&name) {
            let options: Vec<String> = TimeUnit::PERIOD_NAMES
                .iter()
                .map(|option| format!("\"{option}\""))
                .collect();
            return Err(ScateError::InvalidUnit(format!(
                "\"{name}\" not a valid time unit. Options are: {}",
                options.join(", ")
            )));
        }
        Ok(Self::new(name.parse()?, n))
    }

    /// The granularity each step moves by.
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Number of steps; negative moves backward.
    pub fn n(&self) -> i64 {
        self.n
    }

    /// The same unit, with `n = 1`.
    pub fn one_unit(&self) -> Period {
        Period::new(self.unit, 1)
    }

    pub fn add_to(&self, t: NaiveDateTime) -> Result<NaiveDateTime> {
        self.unit.step(t, self.n)
    }

    pub fn subtract_from(&self, t: NaiveDateTime) -> Result<NaiveDateTime> {
        let n = self.n.checked_neg().ok_or_else(|| {
            ScateError::InvalidDatetime(format!("cannot negate a period of {} units", self.n))
        })?;
        self.unit.step(t, n)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.n, self.unit)?;
        if self.n.abs() != 1 {
            f.write_str("s")?;
        }
        Ok(())
    }
}

// ── Sum ─────────────────────────────────────────────────────────────────────

/// Periods applied one after another, left to right.
///
/// Calendar steps do not commute (month-end clamping, leap days), so the
/// order is kept exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Sum {
    periods: Vec<Period>,
}

impl Sum {
    /// Periods are applied in the order given.
    pub fn new(periods: Vec<Period>) -> Self {
        Self { periods }
    }

    /// The periods, in application order.
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn add_to(&self, t: NaiveDateTime) -> Result<NaiveDateTime> {
        self.periods
            .iter()
            .try_fold(t, |acc, period| period.add_to(acc))
    }

    pub fn subtract_from(&self, t: NaiveDateTime) -> Result<NaiveDateTime> {
        self.periods
            .iter()
            .try_fold(t, |acc, period| period.subtract_from(acc))
    }
}

impl FromIterator<Period> for Sum {
    fn from_iter<I: IntoIterator<Item = Period>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for Sum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.periods.iter().map(Period::to_string).collect();
        f.write_str(&parts.join(" + "))
    }
}

// ── Offset ──────────────────────────────────────────────────────────────────

/// The offset operand of an anchor operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Offset {
    Period(Period),
    Sum(Sum),
    Repeating(RepeatingInterval),
}

impl From<Period> for Offset {
    fn from(period: Period) -> Self {
        Offset::Period(period)
    }
}

impl From<Sum> for Offset {
    fn from(sum: Sum) -> Self {
        Offset::Sum(sum)
    }
}

impl From<RepeatingInterval> for Offset {
    fn from(repeating: RepeatingInterval) -> Self {
        Offset::Repeating(repeating)
    }
}

impl Offset {
    /// Move `t` forward by this offset.
    ///
    /// # Errors
    ///
    /// Returns [`ScateError::InvalidOperand`] for a repeating interval, which
    /// has no extent to add.
    pub fn add_to(&self, t: NaiveDateTime) -> Result<NaiveDateTime> {
        match self {
            Offset::Period(period) => period.add_to(t),
            Offset::Sum(sum) => sum.add_to(t),
            Offset::Repeating(repeating) => Err(not_addable(repeating)),
        }
    }

    /// Move `t` backward by this offset.
    pub fn subtract_from(&self, t: NaiveDateTime) -> Result<NaiveDateTime> {
        match self {
            Offset::Period(period) => period.subtract_from(t),
            Offset::Sum(sum) => sum.subtract_from(t),
            Offset::Repeating(repeating) => Err(not_addable(repeating)),
        }
    }

    /// Shift both endpoints of `interval` forward.
    pub fn shift_forward(&self, interval: &Interval) -> Result<Interval> {
        Interval::new(self.add_to(interval.start())?, self.add_to(interval.end())?)
    }

    /// Shift both endpoints of `interval` backward.
    pub fn shift_backward(&self, interval: &Interval) -> Result<Interval> {
        Interval::new(
            self.subtract_from(interval.start())?,
            self.subtract_from(interval.end())?,
        )
    }

    /// Widen `interval` to exactly one offset's width, centered on its
    /// midpoint, when the offset is longer than the interval. Otherwise the
    /// interval is returned unchanged.
    pub fn expand(&self, interval: &Interval) -> Result<Interval> {
        if self.add_to(interval.start())? <= interval.end() {
            return Ok(*interval);
        }
        let overflow = || {
            ScateError::InvalidDatetime(format!("cannot center {self} on {interval}"))
        };
        let mid = interval
            .start()
            .checked_add_signed(interval.duration() / 2)
            .ok_or_else(overflow)?;
        let half: TimeDelta = (interval.start() - self.subtract_from(interval.start())?) / 2;
        let start = mid.checked_sub_signed(half).ok_or_else(overflow)?;
        Interval::new(start, self.add_to(start)?)
    }
}

fn not_addable(repeating: &RepeatingInterval) -> ScateError {
    ScateError::InvalidOperand(format!(
        "repeating interval ({repeating}) cannot be added to or subtracted from an instant"
    ))
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offset::Period(period) => fmt::Display::fmt(period, f),
            Offset::Sum(sum) => fmt::Display::fmt(sum, f),
            Offset::Repeating(repeating) => fmt::Display::fmt(repeating, f),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::year;
    use chrono::NaiveDate;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    // ── Period tests ────────────────────────────────────────────────────

    #[test]
    fn test_add_and_subtract_years() {
        let period = Period::new(TimeUnit::Year, 5);
        let t = dt(2000, 1, 1, 0, 0, 0);
        assert_eq!(period.add_to(t).unwrap(), dt(2005, 1, 1, 0, 0, 0));
        assert_eq!(period.subtract_from(t).unwrap(), dt(1995, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_add_month_to_month_end() {
        let period = Period::new(TimeUnit::Month, 1);
        assert_eq!(
            period.add_to(dt(2000, 1, 31, 12, 0, 0)).unwrap(),
            dt(2000, 2, 29, 12, 0, 0)
        );
    }

    #[test]
    fn test_parse_accepts_period_names() {
        let period = Period::parse("week", 2).unwrap();
        assert_eq!(period.unit(), TimeUnit::Week);
        assert_eq!(period.n(), 2);
    }

    #[test]
    fn test_parse_rejects_unknown_unit() {
        let err = Period::parse("fortnight", 1).unwrap_err();
        assert!(matches!(err, ScateError::InvalidUnit(_)), "got: {err:?}");
        let message = err.to_string();
        assert!(message.contains("\"microsecond\""), "got: {message}");
        assert!(message.contains("\"year\""), "got: {message}");
    }

    #[test]
    fn test_parse_rejects_non_period_unit() {
        assert!(Period::parse("decade", 1).is_err());
    }

    #[test]
    fn test_unsupported_unit_arithmetic() {
        let period = Period::new(TimeUnit::QuarterYear, 1);
        let err = period.add_to(dt(2000, 1, 1, 0, 0, 0)).unwrap_err();
        assert!(matches!(err, ScateError::UnsupportedOperation(_)), "got: {err:?}");
    }

    #[test]
    fn test_one_unit() {
        assert_eq!(
            Period::new(TimeUnit::Day, 9).one_unit(),
            Period::new(TimeUnit::Day, 1)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Period::new(TimeUnit::Month, 1).to_string(), "1 month");
        assert_eq!(Period::new(TimeUnit::Day, -3).to_string(), "-3 days");
    }

    // ── Sum tests ───────────────────────────────────────────────────────

    #[test]
    fn test_sum_applies_left_to_right() {
        let t = dt(2000, 1, 31, 0, 0, 0);
        let month_then_year: Sum = [
            Period::new(TimeUnit::Month, 1),
            Period::new(TimeUnit::Year, 1),
        ]
        .into_iter()
        .collect();
        // Jan 31 2000 -> Feb 29 2000 -> Feb 28 2001
        assert_eq!(month_then_year.add_to(t).unwrap(), dt(2001, 2, 28, 0, 0, 0));

        let year_then_month = Sum::new(vec![
            Period::new(TimeUnit::Year, 1),
            Period::new(TimeUnit::Month, 1),
        ]);
        // Jan 31 2000 -> Jan 31 2001 -> Feb 28 2001
        assert_eq!(year_then_month.add_to(t).unwrap(), dt(2001, 2, 28, 0, 0, 0));

        let leap = dt(2000, 2, 29, 0, 0, 0);
        // Feb 29 2000 -> Mar 29 2000 -> Mar 29 2001
        assert_eq!(month_then_year.add_to(leap).unwrap(), dt(2001, 3, 29, 0, 0, 0));
        // Feb 29 2000 -> Feb 28 2001 -> Mar 28 2001
        assert_eq!(year_then_month.add_to(leap).unwrap(), dt(2001, 3, 28, 0, 0, 0));
    }

    #[test]
    fn test_sum_subtract() {
        let sum = Sum::new(vec![
            Period::new(TimeUnit::Day, 1),
            Period::new(TimeUnit::Hour, 2),
        ]);
        assert_eq!(
            sum.subtract_from(dt(2000, 1, 1, 0, 0, 0)).unwrap(),
            dt(1999, 12, 30, 22, 0, 0)
        );
    }

    #[test]
    fn test_empty_sum_is_identity() {
        let t = dt(2000, 1, 1, 0, 0, 0);
        assert_eq!(Sum::default().add_to(t).unwrap(), t);
    }

    #[test]
    fn test_sum_display() {
        let sum = Sum::new(vec![
            Period::new(TimeUnit::Year, 1),
            Period::new(TimeUnit::Month, 2),
        ]);
        assert_eq!(sum.to_string(), "1 year + 2 months");
    }

    // ── Offset tests ────────────────────────────────────────────────────

    #[test]
    fn test_shift_interval() {
        let offset = Offset::from(Period::new(TimeUnit::Year, 5));
        let y2000 = year(2000, 0).unwrap();
        assert_eq!(offset.shift_forward(&y2000).unwrap(), year(2005, 0).unwrap());
        assert_eq!(offset.shift_backward(&y2000).unwrap(), year(1995, 0).unwrap());
    }

    #[test]
    fn test_shift_interval_by_sum_is_order_sensitive() {
        let leap_month: Interval = "2000-01-31T00:00:00 2000-02-29T00:00:00".parse().unwrap();
        let month_then_year = Offset::from(Sum::new(vec![
            Period::new(TimeUnit::Month, 1),
            Period::new(TimeUnit::Year, 1),
        ]));
        // start: Jan 31 -> Feb 29 2000 -> Feb 28 2001; end: Feb 29 -> Mar 29 2000 -> Mar 29 2001
        assert_eq!(
            month_then_year.shift_forward(&leap_month).unwrap().isoformat(),
            "2001-02-28T00:00:00 2001-03-29T00:00:00"
        );

        let year_then_month = Offset::from(Sum::new(vec![
            Period::new(TimeUnit::Year, 1),
            Period::new(TimeUnit::Month, 1),
        ]));
        // start: Jan 31 -> Jan 31 2001 -> Feb 28 2001; end: Feb 29 -> Feb 28 2001 -> Mar 28 2001
        assert_eq!(
            year_then_month.shift_forward(&leap_month).unwrap().isoformat(),
            "2001-02-28T00:00:00 2001-03-28T00:00:00"
        );
    }

    #[test]
    fn test_shift_interval_backward_by_sum() {
        let april_ish: Interval = "2000-03-31T00:00:00 2000-04-30T00:00:00".parse().unwrap();
        let offset = Offset::from(Sum::new(vec![
            Period::new(TimeUnit::Month, 1),
            Period::new(TimeUnit::Year, 1),
        ]));
        // start: Mar 31 -> Feb 29 2000 -> Feb 28 1999; end: Apr 30 -> Mar 30 2000 -> Mar 30 1999
        assert_eq!(
            offset.shift_backward(&april_ish).unwrap().isoformat(),
            "1999-02-28T00:00:00 1999-03-30T00:00:00"
        );
    }

    #[test]
    fn test_repeating_offset_is_not_addable() {
        let offset = Offset::from(RepeatingInterval::unit(TimeUnit::Day));
        let err = offset.add_to(dt(2000, 1, 1, 0, 0, 0)).unwrap_err();
        assert!(matches!(err, ScateError::InvalidOperand(_)), "got: {err:?}");
    }

    #[test]
    fn test_expand_smaller_period_is_identity() {
        let y2000 = year(2000, 0).unwrap();
        let offset = Offset::from(Period::new(TimeUnit::Month, 1));
        assert_eq!(offset.expand(&y2000).unwrap(), y2000);
    }

    #[test]
    fn test_expand_equal_period_is_identity() {
        let y2000 = year(2000, 0).unwrap();
        let offset = Offset::from(Period::new(TimeUnit::Year, 1));
        assert_eq!(offset.expand(&y2000).unwrap(), y2000);
    }

    #[test]
    fn test_expand_centers_larger_period() {
        let day = Interval::of(2002, &[3, 22]).unwrap();
        let offset = Offset::from(Period::new(TimeUnit::Day, 3));
        assert_eq!(
            offset.expand(&day).unwrap().isoformat(),
            "2002-03-21T00:00:00 2002-03-24T00:00:00"
        );
    }
}

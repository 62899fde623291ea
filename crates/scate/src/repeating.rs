//! Repeating intervals: lazy, calendar-aligned sequences of buckets.
//!
//! Every variant exposes the same two cursors relative to an instant `t`:
//!
//! - [`RepeatingInterval::preceding`] yields intervals with `end <= t`, latest first.
//! - [`RepeatingInterval::following`] yields intervals with `start >= t`, earliest first.
//!
//! A bucket that starts exactly at `t` is therefore the first element of
//! `following` and never an element of `preceding`. Both sequences are
//! conceptually infinite; they end early only when the calendar overflows,
//! which is logged at `warn` level.

use std::fmt;
use std::iter::Peekable;

use chrono::{NaiveDateTime, Weekday};
use tracing::{trace, warn};

use crate::error::{Result, ScateError};
use crate::field::Field;
use crate::interval::Interval;
use crate::unit::{TimeUnit, WeekStartDay};

/// A lazily produced sequence of intervals.
pub type Intervals = Box<dyn Iterator<Item = Interval>>;

/// Number of occurrence-search windows tried before a field sequence gives up.
const MAX_SEARCH_WINDOWS: usize = 64;

/// Width of one occurrence-search window, in `range` units.
const WINDOW_RANGES: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Backward,
    Forward,
}

// ── RepeatingInterval ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepeatingInterval {
    /// Every bucket of one granularity ("every month").
    Unit(RepeatingUnit),
    /// Every bucket at one field position ("every Friday", "every May").
    Field(RepeatingField),
    /// The ordered merge of several repeating intervals ("Mondays and Fridays").
    Union(RepeatingUnion),
}

impl RepeatingInterval {
    /// Every bucket of `unit`, with Monday-start weeks.
    pub fn unit(unit: TimeUnit) -> Self {
        RepeatingInterval::Unit(RepeatingUnit::new(unit))
    }

    /// Every bucket of `unit`, with weeks starting on `week_start`.
    pub fn unit_with_week_start(unit: TimeUnit, week_start: WeekStartDay) -> Self {
        RepeatingInterval::Unit(RepeatingUnit::with_week_start(unit, week_start))
    }

    /// Every `field.base()` bucket at position `value`.
    ///
    /// # Errors
    ///
    /// Returns [`ScateError::InvalidField`] if `value` is not a position of `field`.
    pub fn field(field: Field, value: u32) -> Result<Self> {
        Ok(RepeatingInterval::Field(RepeatingField::new(field, value)?))
    }

    /// Every day falling on `weekday`.
    pub fn weekday(weekday: Weekday) -> Self {
        RepeatingInterval::Field(RepeatingField {
            field: Field::DayOfWeek,
            value: weekday.number_from_monday(),
        })
    }

    /// The ordered merge of `members`.
    ///
    /// # Errors
    ///
    /// Returns [`ScateError::InvalidOperand`] if `members` is empty.
    pub fn union(members: Vec<RepeatingInterval>) -> Result<Self> {
        Ok(RepeatingInterval::Union(RepeatingUnion::new(members)?))
    }

    /// The size of each produced bucket (the finest member's, for a union).
    pub fn base(&self) -> TimeUnit {
        match self {
            RepeatingInterval::Unit(unit) => unit.unit,
            RepeatingInterval::Field(field) => field.field.base(),
            RepeatingInterval::Union(union) => union
                .members
                .iter()
                .map(RepeatingInterval::base)
                .min()
                .unwrap_or(TimeUnit::Microsecond),
        }
    }

    /// The cycle in which one bucket recurs (the coarsest member's, for a union).
    pub fn range(&self) -> TimeUnit {
        match self {
            RepeatingInterval::Unit(unit) => unit.unit,
            RepeatingInterval::Field(field) => field.field.range(),
            RepeatingInterval::Union(union) => union
                .members
                .iter()
                .map(RepeatingInterval::range)
                .max()
                .unwrap_or(TimeUnit::Microsecond),
        }
    }

    /// Week start of a unit variant; Monday for fields and unions.
    pub fn week_start(&self) -> WeekStartDay {
        match self {
            RepeatingInterval::Unit(unit) => unit.week_start,
            _ => WeekStartDay::Monday,
        }
    }

    /// Intervals ending at or before `t`, latest first.
    pub fn preceding(&self, t: NaiveDateTime) -> Intervals {
        match self {
            RepeatingInterval::Unit(unit) => unit.preceding(t),
            RepeatingInterval::Field(field) => field.preceding(t),
            RepeatingInterval::Union(union) => union.preceding(t),
        }
    }

    /// Intervals starting at or after `t`, earliest first.
    pub fn following(&self, t: NaiveDateTime) -> Intervals {
        match self {
            RepeatingInterval::Unit(unit) => unit.following(t),
            RepeatingInterval::Field(field) => field.following(t),
            RepeatingInterval::Union(union) => union.following(t),
        }
    }
}

impl From<RepeatingUnit> for RepeatingInterval {
    fn from(unit: RepeatingUnit) -> Self {
        RepeatingInterval::Unit(unit)
    }
}

impl From<RepeatingField> for RepeatingInterval {
    fn from(field: RepeatingField) -> Self {
        RepeatingInterval::Field(field)
    }
}

impl fmt::Display for RepeatingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatingInterval::Unit(unit) => fmt::Display::fmt(unit, f),
            RepeatingInterval::Field(field) => fmt::Display::fmt(field, f),
            RepeatingInterval::Union(union) => fmt::Display::fmt(union, f),
        }
    }
}

// ── RepeatingUnit ───────────────────────────────────────────────────────────

/// Gapless buckets of one granularity, aligned to its truncation boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RepeatingUnit {
    unit: TimeUnit,
    week_start: WeekStartDay,
}

impl RepeatingUnit {
    /// Buckets of `unit`, with Monday-start weeks.
    pub fn new(unit: TimeUnit) -> Self {
        Self::with_week_start(unit, WeekStartDay::Monday)
    }

    /// `week_start` only matters for [`TimeUnit::Week`].
    pub fn with_week_start(unit: TimeUnit, week_start: WeekStartDay) -> Self {
        Self { unit, week_start }
    }

    /// The bucket granularity.
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// The day week buckets start on.
    pub fn week_start(&self) -> WeekStartDay {
        self.week_start
    }

    /// Buckets ending at or before `t`, starting with the one ending at
    /// the boundary at or before `t`.
    pub fn preceding(&self, t: NaiveDateTime) -> Intervals {
        let unit = self.unit;
        let mut end = self.boundary(t, Direction::Backward);
        Box::new(std::iter::from_fn(move || {
            let current = end?;
            let bucket = unit
                .advance(current, -1)
                .and_then(|start| Interval::new(start, current).ok());
            end = bucket.map(|bucket| bucket.start());
            match bucket {
                Some(bucket) => trace!(%unit, %bucket, "preceding bucket"),
                None => warn!(%unit, end = %current, "preceding buckets exhausted at calendar limit"),
            }
            bucket
        }))
    }

    /// Buckets starting at or after `t`, starting with the one beginning at
    /// the boundary at or after `t`.
    pub fn following(&self, t: NaiveDateTime) -> Intervals {
        let unit = self.unit;
        let mut start = self.boundary(t, Direction::Forward);
        Box::new(std::iter::from_fn(move || {
            let current = start?;
            let bucket = unit
                .advance(current, 1)
                .and_then(|end| Interval::new(current, end).ok());
            start = bucket.map(|bucket| bucket.end());
            match bucket {
                Some(bucket) => trace!(%unit, %bucket, "following bucket"),
                None => warn!(%unit, start = %current, "following buckets exhausted at calendar limit"),
            }
            bucket
        }))
    }

    /// The bucket boundary at or before (`Backward`) or at or after
    /// (`Forward`) `t`.
    fn boundary(&self, t: NaiveDateTime, direction: Direction) -> Option<NaiveDateTime> {
        let floor = match self.unit.truncate_with(t, self.week_start) {
            Ok(floor) => floor,
            Err(err) => {
                warn!(error = %err, "no bucket boundary near {t}");
                return None;
            }
        };
        match direction {
            Direction::Backward => Some(floor),
            Direction::Forward if floor == t => Some(floor),
            Direction::Forward => self.unit.advance(floor, 1),
        }
    }
}

impl fmt::Display for RepeatingUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "every {}", self.unit)
    }
}

// ── RepeatingField ──────────────────────────────────────────────────────────

/// The `field.base()` buckets at one position of `field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RepeatingField {
    field: Field,
    value: u32,
}

impl RepeatingField {
    /// # Errors
    ///
    /// Returns [`ScateError::InvalidField`] if `value` is not a position of `field`.
    pub fn new(field: Field, value: u32) -> Result<Self> {
        Ok(Self {
            field,
            value: field.validate(value)?,
        })
    }

    /// Build from a field name and a textual position, e.g.
    /// `("day-of-week", "friday")` or `("month-of-year", "5")`.
    pub fn parse(field: &str, value: &str) -> Result<Self> {
        let field: Field = field.parse()?;
        Self::new(field, field.parse_value(value)?)
    }

    /// The positional field.
    pub fn field(&self) -> Field {
        self.field
    }

    /// The selected position, 1-based.
    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn preceding(&self, t: NaiveDateTime) -> Intervals {
        self.cursor(t, Direction::Backward)
    }

    pub fn following(&self, t: NaiveDateTime) -> Intervals {
        self.cursor(t, Direction::Forward)
    }

    fn cursor(&self, t: NaiveDateTime, direction: Direction) -> Intervals {
        let this = *self;
        let mut bound = Some(t);
        Box::new(std::iter::from_fn(move || {
            let current = bound?;
            let found = match this.search(current, direction) {
                Ok(Some(found)) => found,
                Ok(None) => {
                    warn!(field = %this, bound = %current, "no occurrence within search horizon");
                    bound = None;
                    return None;
                }
                Err(err) => {
                    warn!(field = %this, bound = %current, error = %err, "occurrence search failed");
                    bound = None;
                    return None;
                }
            };
            trace!(field = %this, bucket = %found, ?direction, "field occurrence");
            bound = Some(match direction {
                Direction::Backward => found.start(),
                Direction::Forward => found.end(),
            });
            Some(found)
        }))
    }

    /// The occurrence bucket nearest to `bound` on the given side, sliding
    /// the search window away from `bound` until one is found.
    fn search(&self, bound: NaiveDateTime, direction: Direction) -> Result<Option<Interval>> {
        let range = self.field.range();
        let overflow = || {
            ScateError::InvalidDatetime(format!("search window for {self} overflows near {bound}"))
        };

        let mut edge = bound;
        for _ in 0..MAX_SEARCH_WINDOWS {
            let found = match direction {
                Direction::Backward => {
                    let window_start = range.advance(edge, -WINDOW_RANGES).ok_or_else(overflow)?;
                    let found = self
                        .buckets(window_start, edge)?
                        .into_iter()
                        .rev()
                        .find(|bucket| bucket.end() <= bound);
                    edge = window_start;
                    found
                }
                Direction::Forward => {
                    let window_end = range.advance(edge, WINDOW_RANGES).ok_or_else(overflow)?;
                    let found = self
                        .buckets(edge, window_end)?
                        .into_iter()
                        .find(|bucket| bucket.start() >= bound);
                    edge = window_end;
                    found
                }
            };
            if found.is_some() {
                return Ok(found);
            }
        }
        Ok(None)
    }

    fn buckets(&self, from: NaiveDateTime, until: NaiveDateTime) -> Result<Vec<Interval>> {
        let base = self.field.base();
        self.field
            .occurrences(self.value, from, until)?
            .into_iter()
            .map(|start| {
                let end = base.advance(start, 1).ok_or_else(|| {
                    ScateError::InvalidDatetime(format!("{base} starting {start} overflows"))
                })?;
                Interval::new(start, end)
            })
            .collect()
    }
}

impl fmt::Display for RepeatingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.field, self.value)
    }
}

// ── RepeatingUnion ──────────────────────────────────────────────────────────

/// Several repeating intervals merged into one ordered sequence.
///
/// `following` orders by `(start, end)` ascending and `preceding` by
/// `(end, start)` descending. An interval produced by more than one member
/// is yielded once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatingUnion {
    members: Vec<RepeatingInterval>,
}

impl RepeatingUnion {
    /// # Errors
    ///
    /// Returns [`ScateError::InvalidOperand`] if `members` is empty.
    pub fn new(members: Vec<RepeatingInterval>) -> Result<Self> {
        if members.is_empty() {
            return Err(ScateError::InvalidOperand(
                "a union needs at least one repeating interval".to_string(),
            ));
        }
        Ok(Self { members })
    }

    pub fn members(&self) -> &[RepeatingInterval] {
        &self.members
    }

    pub fn preceding(&self, t: NaiveDateTime) -> Intervals {
        let sources = self.members.iter().map(|member| member.preceding(t)).collect();
        merge(sources, Direction::Backward)
    }

    pub fn following(&self, t: NaiveDateTime) -> Intervals {
        let sources = self.members.iter().map(|member| member.following(t)).collect();
        merge(sources, Direction::Forward)
    }
}

impl fmt::Display for RepeatingUnion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.members.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(" | "))
    }
}

fn merge(sources: Vec<Intervals>, direction: Direction) -> Intervals {
    let mut sources: Vec<Peekable<Intervals>> =
        sources.into_iter().map(Iterator::peekable).collect();
    let mut last: Option<Interval> = None;
    Box::new(std::iter::from_fn(move || loop {
        let heads: Vec<Option<Interval>> =
            sources.iter_mut().map(|source| source.peek().copied()).collect();
        let index = heads
            .iter()
            .enumerate()
            .filter_map(|(index, head)| head.map(|head| (index, head)))
            .reduce(|best, candidate| {
                let better = match direction {
                    Direction::Forward => {
                        (candidate.1.start(), candidate.1.end()) < (best.1.start(), best.1.end())
                    }
                    Direction::Backward => {
                        (candidate.1.end(), candidate.1.start()) > (best.1.end(), best.1.start())
                    }
                };
                if better {
                    candidate
                } else {
                    best
                }
            })
            .map(|(index, _)| index)?;
        let next = sources[index].next()?;
        if last == Some(next) {
            continue;
        }
        last = Some(next);
        return Some(next);
    }))
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    fn day(y: i32, mo: u32, d: u32) -> NaiveDateTime {
        dt(y, mo, d, 0, 0, 0)
    }

    fn take(intervals: Intervals, n: usize) -> Vec<String> {
        intervals.take(n).map(|interval| interval.to_string()).collect()
    }

    // ── RepeatingUnit tests ─────────────────────────────────────────────

    #[test]
    fn test_unit_day_preceding() {
        let days = RepeatingInterval::unit(TimeUnit::Day);
        assert_eq!(
            take(days.preceding(dt(2002, 3, 22, 11, 30, 30)), 2),
            vec![
                "2002-03-21T00:00:00 2002-03-22T00:00:00",
                "2002-03-20T00:00:00 2002-03-21T00:00:00",
            ]
        );
    }

    #[test]
    fn test_unit_day_following() {
        let days = RepeatingInterval::unit(TimeUnit::Day);
        assert_eq!(
            take(days.following(dt(2002, 3, 22, 11, 30, 30)), 2),
            vec![
                "2002-03-23T00:00:00 2002-03-24T00:00:00",
                "2002-03-24T00:00:00 2002-03-25T00:00:00",
            ]
        );
    }

    #[test]
    fn test_unit_boundary_instant_belongs_to_following() {
        let days = RepeatingInterval::unit(TimeUnit::Day);
        let t = day(2002, 3, 22);
        assert_eq!(
            take(days.preceding(t), 1),
            vec!["2002-03-21T00:00:00 2002-03-22T00:00:00"]
        );
        assert_eq!(
            take(days.following(t), 1),
            vec!["2002-03-22T00:00:00 2002-03-23T00:00:00"]
        );
    }

    #[test]
    fn test_unit_week_monday_start() {
        let weeks = RepeatingInterval::unit(TimeUnit::Week);
        let t = dt(2002, 3, 22, 11, 30, 30);
        assert_eq!(
            take(weeks.preceding(t), 1),
            vec!["2002-03-11T00:00:00 2002-03-18T00:00:00"]
        );
        assert_eq!(
            take(weeks.following(t), 1),
            vec!["2002-03-25T00:00:00 2002-04-01T00:00:00"]
        );
    }

    #[test]
    fn test_unit_week_sunday_start() {
        let weeks = RepeatingInterval::unit_with_week_start(TimeUnit::Week, WeekStartDay::Sunday);
        assert_eq!(
            take(weeks.following(dt(2002, 3, 22, 11, 30, 30)), 1),
            vec!["2002-03-24T00:00:00 2002-03-31T00:00:00"]
        );
    }

    #[test]
    fn test_unit_month_preceding_is_gapless() {
        let months = RepeatingInterval::unit(TimeUnit::Month);
        assert_eq!(
            take(months.preceding(dt(2002, 3, 22, 11, 30, 30)), 3),
            vec![
                "2002-02-01T00:00:00 2002-03-01T00:00:00",
                "2002-01-01T00:00:00 2002-02-01T00:00:00",
                "2001-12-01T00:00:00 2002-01-01T00:00:00",
            ]
        );
    }

    #[test]
    fn test_unit_non_steppable_granularities() {
        let t = dt(2002, 3, 22, 11, 30, 30);
        assert_eq!(
            take(RepeatingInterval::unit(TimeUnit::QuarterYear).following(t), 1),
            vec!["2002-04-01T00:00:00 2002-07-01T00:00:00"]
        );
        assert_eq!(
            take(RepeatingInterval::unit(TimeUnit::Century).following(t), 1),
            vec!["2100-01-01T00:00:00 2200-01-01T00:00:00"]
        );
        assert_eq!(
            take(RepeatingInterval::unit(TimeUnit::Decade).preceding(t), 1),
            vec!["1990-01-01T00:00:00 2000-01-01T00:00:00"]
        );
    }

    // ── RepeatingField tests ────────────────────────────────────────────

    #[test]
    fn test_field_weekday_following_skips_started_bucket() {
        let fridays = RepeatingInterval::weekday(Weekday::Fri);
        assert_eq!(
            take(fridays.following(dt(2002, 3, 22, 11, 30, 30)), 2),
            vec![
                "2002-03-29T00:00:00 2002-03-30T00:00:00",
                "2002-04-05T00:00:00 2002-04-06T00:00:00",
            ]
        );
    }

    #[test]
    fn test_field_weekday_preceding() {
        let fridays = RepeatingInterval::weekday(Weekday::Fri);
        assert_eq!(
            take(fridays.preceding(dt(2002, 3, 22, 11, 30, 30)), 2),
            vec![
                "2002-03-15T00:00:00 2002-03-16T00:00:00",
                "2002-03-08T00:00:00 2002-03-09T00:00:00",
            ]
        );
    }

    #[test]
    fn test_field_boundaries() {
        let fridays = RepeatingInterval::weekday(Weekday::Fri);
        assert_eq!(
            take(fridays.following(day(2002, 3, 22)), 1),
            vec!["2002-03-22T00:00:00 2002-03-23T00:00:00"]
        );
        assert_eq!(
            take(fridays.preceding(day(2002, 3, 23)), 1),
            vec!["2002-03-22T00:00:00 2002-03-23T00:00:00"]
        );
    }

    #[test]
    fn test_field_month_of_year() {
        let may = RepeatingInterval::field(Field::MonthOfYear, 5).unwrap();
        assert_eq!(
            take(may.preceding(dt(2002, 3, 22, 11, 30, 30)), 2),
            vec![
                "2001-05-01T00:00:00 2001-06-01T00:00:00",
                "2000-05-01T00:00:00 2000-06-01T00:00:00",
            ]
        );
        assert_eq!(
            take(may.following(dt(2003, 5, 10, 22, 10, 20)), 1),
            vec!["2004-05-01T00:00:00 2004-06-01T00:00:00"]
        );
    }

    #[test]
    fn test_field_day_31_skips_short_months() {
        let the_31st = RepeatingInterval::field(Field::DayOfMonth, 31).unwrap();
        assert_eq!(
            take(the_31st.following(dt(2002, 1, 31, 12, 0, 0)), 2),
            vec![
                "2002-03-31T00:00:00 2002-04-01T00:00:00",
                "2002-05-31T00:00:00 2002-06-01T00:00:00",
            ]
        );
        assert_eq!(
            take(the_31st.preceding(day(2002, 5, 15)), 2),
            vec![
                "2002-03-31T00:00:00 2002-04-01T00:00:00",
                "2002-01-31T00:00:00 2002-02-01T00:00:00",
            ]
        );
    }

    #[test]
    fn test_field_day_366_slides_past_common_years() {
        let day_366 = RepeatingInterval::field(Field::DayOfYear, 366).unwrap();
        assert_eq!(
            take(day_366.following(day(2001, 1, 1)), 1),
            vec!["2004-12-31T00:00:00 2005-01-01T00:00:00"]
        );
        assert_eq!(
            take(day_366.preceding(day(2001, 1, 1)), 1),
            vec!["2000-12-31T00:00:00 2001-01-01T00:00:00"]
        );
    }

    #[test]
    fn test_field_week_and_quarter_buckets() {
        let t = dt(2002, 3, 22, 11, 30, 30);
        let first_week = RepeatingInterval::field(Field::WeekOfMonth, 1).unwrap();
        assert_eq!(
            take(first_week.following(t), 1),
            vec!["2002-04-01T00:00:00 2002-04-08T00:00:00"]
        );
        let q2 = RepeatingInterval::field(Field::QuarterOfYear, 2).unwrap();
        assert_eq!(
            take(q2.following(t), 1),
            vec!["2002-04-01T00:00:00 2002-07-01T00:00:00"]
        );
    }

    #[test]
    fn test_field_rejects_invalid_position() {
        let err = RepeatingInterval::field(Field::MonthOfYear, 13).unwrap_err();
        assert!(matches!(err, ScateError::InvalidField(_)), "got: {err}");
    }

    #[test]
    fn test_field_parse() {
        let fridays = RepeatingField::parse("day_of_week", "Friday").unwrap();
        assert_eq!(RepeatingInterval::from(fridays), RepeatingInterval::weekday(Weekday::Fri));
    }

    // ── RepeatingUnion tests ────────────────────────────────────────────

    #[test]
    fn test_union_merges_in_order() {
        let union = RepeatingInterval::union(vec![
            RepeatingInterval::weekday(Weekday::Mon),
            RepeatingInterval::weekday(Weekday::Fri),
        ])
        .unwrap();
        let t = day(2002, 3, 20);
        assert_eq!(
            take(union.following(t), 3),
            vec![
                "2002-03-22T00:00:00 2002-03-23T00:00:00",
                "2002-03-25T00:00:00 2002-03-26T00:00:00",
                "2002-03-29T00:00:00 2002-03-30T00:00:00",
            ]
        );
        assert_eq!(
            take(union.preceding(t), 3),
            vec![
                "2002-03-18T00:00:00 2002-03-19T00:00:00",
                "2002-03-15T00:00:00 2002-03-16T00:00:00",
                "2002-03-11T00:00:00 2002-03-12T00:00:00",
            ]
        );
    }

    #[test]
    fn test_union_deduplicates() {
        let days = RepeatingInterval::unit(TimeUnit::Day);
        let union = RepeatingInterval::union(vec![days.clone(), days.clone()]).unwrap();
        let t = dt(2002, 3, 22, 11, 30, 30);
        assert_eq!(take(union.following(t), 3), take(days.following(t), 3));
    }

    #[test]
    fn test_union_requires_members() {
        let err = RepeatingInterval::union(Vec::new()).unwrap_err();
        assert!(err.to_string().contains("at least one"), "got: {err}");
    }

    #[test]
    fn test_base_and_range() {
        let union = RepeatingInterval::union(vec![
            RepeatingInterval::weekday(Weekday::Mon),
            RepeatingInterval::field(Field::MonthOfYear, 5).unwrap(),
        ])
        .unwrap();
        assert_eq!(union.base(), TimeUnit::Day);
        assert_eq!(union.range(), TimeUnit::Year);
        assert_eq!(RepeatingInterval::unit(TimeUnit::Month).range(), TimeUnit::Month);
    }

    #[test]
    fn test_display() {
        assert_eq!(RepeatingInterval::unit(TimeUnit::Week).to_string(), "every week");
        assert_eq!(
            RepeatingInterval::weekday(Weekday::Fri).to_string(),
            "day-of-week = 5"
        );
        let union = RepeatingInterval::union(vec![
            RepeatingInterval::unit(TimeUnit::Day),
            RepeatingInterval::field(Field::MonthOfYear, 5).unwrap(),
        ])
        .unwrap();
        assert_eq!(union.to_string(), "every day | month-of-year = 5");
    }
}

//! Anchor operators.
//!
//! Each operator combines an anchor [`Interval`] with an [`Offset`] (a period,
//! a sum of periods, or a repeating interval) and resolves a relative
//! expression such as "last May", "two weeks before March" or "the second to
//! last month of 2001" into a concrete interval.
//!
//! All operators are pure functions. Public entry points take the offset as
//! `impl Into<Offset>`, so a [`Period`](crate::period::Period), a
//! [`Sum`](crate::period::Sum) or a [`RepeatingInterval`] can be passed directly.

use std::collections::VecDeque;
use std::fmt;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::{Result, ScateError};
use crate::interval::Interval;
use crate::period::Offset;
use crate::repeating::RepeatingInterval;

/// The side an [`n`] chain walks toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Last,
    Next,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Last => f.write_str("last"),
            Direction::Next => f.write_str("next"),
        }
    }
}

// ── last / next ─────────────────────────────────────────────────────────────

/// The offset-sized interval immediately before the anchor.
///
/// The anchor point is `interval.start()`, or `interval.end()` when
/// `interval_included` is set. A period or sum gives
/// `[anchor - offset, anchor)`; a repeating interval gives its latest
/// occurrence ending at or before the anchor point.
///
/// # Examples
///
/// ```
/// use scate::anchor::last;
/// use scate::interval::year;
/// use scate::period::Period;
/// use scate::unit::TimeUnit;
///
/// let y2k = year(2000, 0).unwrap();
/// let result = last(&y2k, Period::new(TimeUnit::Year, 1), false).unwrap();
/// assert_eq!(result.to_string(), "1999-01-01T00:00:00 2000-01-01T00:00:00");
/// ```
pub fn last(interval: &Interval, offset: impl Into<Offset>, interval_included: bool) -> Result<Interval> {
    resolve_last(interval, &offset.into(), interval_included)
}

/// The offset-sized interval immediately after the anchor.
///
/// The anchor point is `interval.end()`, or `interval.start()` when
/// `interval_included` is set. A period or sum gives
/// `[anchor, anchor + offset)`; a repeating interval gives its earliest
/// occurrence starting at or after the anchor point.
pub fn next(interval: &Interval, offset: impl Into<Offset>, interval_included: bool) -> Result<Interval> {
    resolve_next(interval, &offset.into(), interval_included)
}

fn resolve_last(interval: &Interval, offset: &Offset, interval_included: bool) -> Result<Interval> {
    let anchor = if interval_included {
        interval.end()
    } else {
        interval.start()
    };
    let result = match offset {
        Offset::Repeating(repeating) => first_preceding(repeating, anchor, 1)?,
        _ => Interval::new(offset.subtract_from(anchor)?, anchor)?,
    };
    debug!(op = "last", anchor = %interval, %offset, %result, "resolved");
    Ok(result)
}

fn resolve_next(interval: &Interval, offset: &Offset, interval_included: bool) -> Result<Interval> {
    let anchor = if interval_included {
        interval.start()
    } else {
        interval.end()
    };
    let result = match offset {
        Offset::Repeating(repeating) => first_following(repeating, anchor, 1)?,
        _ => Interval::new(anchor, offset.add_to(anchor)?)?,
    };
    debug!(op = "next", anchor = %interval, %offset, %result, "resolved");
    Ok(result)
}

// ── before / after ──────────────────────────────────────────────────────────

/// The `n`-th (1-based) interval before the anchor.
///
/// For a repeating interval this is the `n`-th element of
/// `preceding(anchor)`, with the anchor point chosen as in [`last`]. For a
/// period or sum the whole anchor interval is shifted back `n` times; both
/// endpoints move, so `interval_included` has no effect on that path.
///
/// # Errors
///
/// Returns [`ScateError::IndexOutOfRange`] if `n` is 0 or the sequence ends
/// before its `n`-th element.
pub fn before(
    interval: &Interval,
    offset: impl Into<Offset>,
    n: usize,
    interval_included: bool,
) -> Result<Interval> {
    let offset = offset.into();
    check_index(n)?;
    let result = match &offset {
        Offset::Repeating(repeating) => {
            let anchor = if interval_included {
                interval.end()
            } else {
                interval.start()
            };
            first_preceding(repeating, anchor, n)?
        }
        _ => (0..n).try_fold(*interval, |shifted, _| offset.shift_backward(&shifted))?,
    };
    debug!(op = "before", anchor = %interval, %offset, n, %result, "resolved");
    Ok(result)
}

/// The `n`-th (1-based) interval after the anchor.
///
/// The mirror image of [`before`]: repeating intervals count through
/// `following(anchor)` with the anchor point chosen as in [`next`], periods
/// and sums shift the anchor interval forward `n` times. As in [`before`],
/// `interval_included` only applies to repeating intervals.
pub fn after(
    interval: &Interval,
    offset: impl Into<Offset>,
    n: usize,
    interval_included: bool,
) -> Result<Interval> {
    let offset = offset.into();
    check_index(n)?;
    let result = match &offset {
        Offset::Repeating(repeating) => {
            let anchor = if interval_included {
                interval.start()
            } else {
                interval.end()
            };
            first_following(repeating, anchor, n)?
        }
        _ => (0..n).try_fold(*interval, |shifted, _| offset.shift_forward(&shifted))?,
    };
    debug!(op = "after", anchor = %interval, %offset, n, %result, "resolved");
    Ok(result)
}

// ── this ────────────────────────────────────────────────────────────────────

/// "This" offset, relative to the anchor.
///
/// A period or sum widens the anchor to exactly one offset width centered
/// on its midpoint, when the offset is longer than the anchor ("this week"
/// around a single day). A repeating interval resolves to its first
/// occurrence inside the `range()`-sized buckets covering the anchor
/// ("this Friday" within the anchor's week).
///
/// # Errors
///
/// Returns [`ScateError::IndexOutOfRange`] if a repeating interval has no
/// occurrence inside the covering buckets.
pub fn this(interval: &Interval, offset: impl Into<Offset>) -> Result<Interval> {
    let offset = offset.into();
    let result = match &offset {
        Offset::Repeating(repeating) => this_repeating(interval, repeating)?,
        _ => offset.expand(interval)?,
    };
    debug!(op = "this", anchor = %interval, %offset, %result, "resolved");
    Ok(result)
}

fn this_repeating(interval: &Interval, repeating: &RepeatingInterval) -> Result<Interval> {
    let range = repeating.range();
    let week_start = repeating.week_start();
    let cover_start = range.truncate_with(interval.start(), week_start)?;
    let last_start = range.truncate_with(interval.end(), week_start)?;
    let cover_end = if last_start == interval.end() {
        last_start
    } else {
        range.advance(last_start, 1).ok_or_else(|| {
            ScateError::InvalidDatetime(format!("{range} after {last_start} is out of range"))
        })?
    };
    repeating
        .following(cover_start)
        .take_while(|occurrence| occurrence.end() <= cover_end)
        .next()
        .ok_or_else(|| {
            ScateError::IndexOutOfRange(format!(
                "no {repeating} within {cover_start} .. {cover_end}"
            ))
        })
}

// ── between ─────────────────────────────────────────────────────────────────

/// The interval between two anchors.
///
/// The result starts at `a.end()` (or `a.start()` when `start_included`)
/// and ends at `b.start()` (or `b.end()` when `end_included`).
///
/// # Errors
///
/// Returns [`ScateError::OrderingViolation`] if `a` does not end at or
/// before the start of `b`, or if no time lies between the chosen bounds.
pub fn between(a: &Interval, b: &Interval, start_included: bool, end_included: bool) -> Result<Interval> {
    if !a.precedes(b) {
        return Err(ScateError::OrderingViolation(format!(
            "{a} does not precede {b}"
        )));
    }
    let start = if start_included { a.start() } else { a.end() };
    let end = if end_included { b.end() } else { b.start() };
    let result = Interval::new(start, end).map_err(|_| {
        ScateError::OrderingViolation(format!("nothing lies between {a} and {b}"))
    })?;
    debug!(op = "between", %a, %b, %result, "resolved");
    Ok(result)
}

// ── nth ─────────────────────────────────────────────────────────────────────

/// The `n`-th (1-based) offset-sized piece of `interval`.
///
/// The anchor is partitioned from its start: a period or sum by repeated
/// addition, a repeating interval by `following(interval.start())`, which
/// includes an occurrence starting exactly on the anchor start. Only pieces
/// lying entirely inside the anchor count. With `from_end` the pieces are
/// counted from the last one backward.
///
/// # Errors
///
/// Returns [`ScateError::IndexOutOfRange`] if `n` is 0 or fewer than `n`
/// pieces fit, and [`ScateError::InvalidOperand`] for an offset that does
/// not move forward.
///
/// # Examples
///
/// ```
/// use scate::anchor::nth;
/// use scate::interval::year;
/// use scate::period::Period;
/// use scate::unit::TimeUnit;
///
/// let y2001 = year(2001, 0).unwrap();
/// let november = nth(&y2001, Period::new(TimeUnit::Month, 1), 2, true).unwrap();
/// assert_eq!(november.to_string(), "2001-11-01T00:00:00 2001-12-01T00:00:00");
/// ```
pub fn nth(interval: &Interval, offset: impl Into<Offset>, n: usize, from_end: bool) -> Result<Interval> {
    let offset = offset.into();
    check_index(n)?;
    let selected = select(partitions(interval, &offset), n, from_end)?;
    let result = selected.ok_or_else(|| {
        ScateError::IndexOutOfRange(format!(
            "{interval} holds fewer than {n} pieces of {offset}"
        ))
    })?;
    debug!(op = "nth", anchor = %interval, %offset, n, from_end, %result, "resolved");
    Ok(result)
}

/// The offset-sized pieces of `interval`, earliest first.
fn partitions<'a>(
    interval: &'a Interval,
    offset: &'a Offset,
) -> Box<dyn Iterator<Item = Result<Interval>> + 'a> {
    if let Offset::Repeating(repeating) = offset {
        return Box::new(
            repeating
                .following(interval.start())
                .take_while(move |piece| interval.covers(piece))
                .map(Ok),
        );
    }

    let mut cursor = Some(interval.start());
    Box::new(std::iter::from_fn(move || {
        let start = cursor.take()?;
        let end = match offset.add_to(start) {
            Ok(end) => end,
            Err(err) => return Some(Err(err)),
        };
        if end <= start {
            return Some(Err(ScateError::InvalidOperand(format!(
                "{offset} does not move forward from {start}"
            ))));
        }
        if end > interval.end() {
            return None;
        }
        cursor = Some(end);
        Some(Interval::new(start, end))
    }))
}

fn select(
    pieces: impl Iterator<Item = Result<Interval>>,
    n: usize,
    from_end: bool,
) -> Result<Option<Interval>> {
    if !from_end {
        for (index, piece) in pieces.enumerate() {
            let piece = piece?;
            if index + 1 == n {
                return Ok(Some(piece));
            }
        }
        return Ok(None);
    }

    let mut window = VecDeque::new();
    for piece in pieces {
        if window.len() == n {
            window.pop_front();
        }
        window.push_back(piece?);
    }
    Ok(if window.len() == n {
        window.pop_front()
    } else {
        None
    })
}

// ── n ───────────────────────────────────────────────────────────────────────

/// `count` consecutive applications of [`last`] or [`next`].
///
/// Each application after the first is anchored at the previous result, so
/// the results run backward in time for [`Direction::Last`] and forward for
/// [`Direction::Next`]. `interval_included` applies to the first
/// application only.
///
/// # Errors
///
/// Returns [`ScateError::IndexOutOfRange`] if `count` is 0 or a repeating
/// sequence ends early, and any error of the underlying operator.
pub fn n(
    direction: Direction,
    interval: &Interval,
    offset: impl Into<Offset>,
    count: usize,
    interval_included: bool,
) -> Result<Vec<Interval>> {
    let offset = offset.into();
    check_index(count)?;

    let mut results = Vec::new();
    let mut anchor = *interval;
    let mut included = interval_included;
    for _ in 0..count {
        let result = match direction {
            Direction::Last => resolve_last(&anchor, &offset, included)?,
            Direction::Next => resolve_next(&anchor, &offset, included)?,
        };
        results.push(result);
        anchor = result;
        included = false;
    }
    debug!(op = "n", %direction, anchor = %interval, %offset, count, "resolved");
    Ok(results)
}

/// Shorthand for [`n`] with [`Direction::Last`].
pub fn last_n(
    interval: &Interval,
    offset: impl Into<Offset>,
    count: usize,
    interval_included: bool,
) -> Result<Vec<Interval>> {
    n(Direction::Last, interval, offset, count, interval_included)
}

/// Shorthand for [`n`] with [`Direction::Next`].
pub fn next_n(
    interval: &Interval,
    offset: impl Into<Offset>,
    count: usize,
    interval_included: bool,
) -> Result<Vec<Interval>> {
    n(Direction::Next, interval, offset, count, interval_included)
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn check_index(n: usize) -> Result<()> {
    if n == 0 {
        return Err(ScateError::IndexOutOfRange(
            "indices start at 1, got 0".to_string(),
        ));
    }
    Ok(())
}

/// The `n`-th (1-based) element of `repeating.preceding(t)`.
fn first_preceding(repeating: &RepeatingInterval, t: NaiveDateTime, n: usize) -> Result<Interval> {
    repeating.preceding(t).nth(n - 1).ok_or_else(|| {
        ScateError::IndexOutOfRange(format!("fewer than {n} of {repeating} end before {t}"))
    })
}

/// The `n`-th (1-based) element of `repeating.following(t)`.
fn first_following(repeating: &RepeatingInterval, t: NaiveDateTime, n: usize) -> Result<Interval> {
    repeating.following(t).nth(n - 1).ok_or_else(|| {
        ScateError::IndexOutOfRange(format!("fewer than {n} of {repeating} start after {t}"))
    })
}

// ── Tests ───────────────────────────────────────────────────────────────────

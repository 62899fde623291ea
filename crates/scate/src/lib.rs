//! # scate
//!
//! Calendar interval algebra for resolving anchor-relative temporal
//! expressions.
//!
//! Upstream parsers turn text like "last Friday", "the 3rd month of next
//! year" or "two weeks before March" into symbolic descriptors (a unit, a
//! field, an offset, an anchor). This crate turns those descriptors into
//! concrete half-open `[start, end)` intervals, using calendar-aware
//! arithmetic rather than fixed durations.
//!
//! ## Modules
//!
//! - [`unit`] — Granularities (microsecond … millennium), truncation and calendar steps
//! - [`field`] — Positional fields (day-of-week, month-of-year, …) and their occurrence rules
//! - [`interval`] — The `[start, end)` value type, year literals, canonical text form
//! - [`period`] — Calendar-relative periods, ordered sums, and the [`Offset`] operand
//! - [`repeating`] — Lazy sequences of calendar-aligned buckets before/after an instant
//! - [`anchor`] — The operators: last, next, before, after, this, between, nth, n
//! - [`error`] — Error types
//!
//! Instants are naive local timestamps ([`chrono::NaiveDateTime`]); time
//! zones are the caller's concern. Operators log their results through
//! `tracing` at `debug` level and never install a subscriber.

pub mod anchor;
pub mod error;
pub mod field;
pub mod interval;
pub mod period;
pub mod repeating;
pub mod unit;

pub use anchor::{after, before, between, last, last_n, n, next, next_n, nth, this, Direction};
pub use error::{Result, ScateError};
pub use field::Field;
pub use interval::{year, year_suffix, Interval};
pub use period::{Offset, Period, Sum};
pub use repeating::{Intervals, RepeatingField, RepeatingInterval, RepeatingUnion, RepeatingUnit};
pub use unit::{TimeUnit, WeekStartDay};

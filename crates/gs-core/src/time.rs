//! Simulation time model.
//!
//! # Design
//!
//! Timestamps are naive wall-clock datetimes (`chrono::NaiveDateTime`), the
//! same convention the exported tables use.  A user's clock is continuous
//! across day boundaries: the clock returned at the end of day `N` is the
//! start of day `N + 1`, it is never reset to midnight.
//!
//! The running clock ([`SimClock`]) keeps sub-second precision while it is
//! advanced by `distance / speed` travel times.  Rounding to whole seconds
//! happens in exactly one place, [`quantize`], which is applied once to every
//! emitted sample and to every clock value handed to the next segment.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use crate::{CoreError, CoreResult};

/// A naive wall-clock timestamp.
pub type Timestamp = NaiveDateTime;

/// Round `t` to the nearest whole second (half-way rounds up).
pub fn quantize(t: Timestamp) -> Timestamp {
    let nanos = t.nanosecond() % 1_000_000_000;
    let floor = t - TimeDelta::nanoseconds(nanos as i64);
    if nanos >= 500_000_000 {
        floor + TimeDelta::seconds(1)
    } else {
        floor
    }
}

/// Midnight at the start of `date`.
#[inline]
pub fn midnight(date: NaiveDate) -> Timestamp {
    date.and_time(NaiveTime::MIN)
}

/// ISO weekday number: 1 = Monday … 7 = Sunday.
#[inline]
pub fn iso_weekday(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}

// ── DayKind ───────────────────────────────────────────────────────────────────

/// Whether a day follows the weekday (work) or weekend (idle) schedule.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum DayKind {
    Weekday,
    Weekend,
}

impl DayKind {
    /// `day_of_week < 6` is a weekday, `6` and `7` are the weekend.
    #[inline]
    pub fn from_iso_weekday(day_of_week: u8) -> Self {
        if day_of_week < 6 { DayKind::Weekday } else { DayKind::Weekend }
    }

    #[inline]
    pub fn of(date: NaiveDate) -> Self {
        Self::from_iso_weekday(iso_weekday(date))
    }
}

impl fmt::Display for DayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DayKind::Weekday => "weekday",
            DayKind::Weekend => "weekend",
        })
    }
}

// ── DateRange ─────────────────────────────────────────────────────────────────

/// An inclusive range of calendar days a user is simulated for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DateRange {
    first: NaiveDate,
    last:  NaiveDate,
}

impl DateRange {
    /// Fails with `InvalidConfiguration` if `last` precedes `first`.
    pub fn new(first: NaiveDate, last: NaiveDate) -> CoreResult<Self> {
        if last < first {
            return Err(CoreError::InvalidConfiguration(format!(
                "date range ends ({last}) before it begins ({first})"
            )));
        }
        Ok(Self { first, last })
    }

    /// Parse two `YYYY-MM-DD` strings.
    pub fn parse(first: &str, last: &str) -> CoreResult<Self> {
        let parse = |s: &str| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map_err(|e| CoreError::Parse(format!("invalid date {s:?}: {e}")))
        };
        Self::new(parse(first)?, parse(last)?)
    }

    pub fn first(&self) -> NaiveDate {
        self.first
    }

    pub fn last(&self) -> NaiveDate {
        self.last
    }

    /// Number of simulated days (always ≥ 1).
    pub fn len_days(&self) -> usize {
        (self.last - self.first).num_days() as usize + 1
    }

    /// Midnight of the first day: the initial clock value of every user.
    pub fn start(&self) -> Timestamp {
        midnight(self.first)
    }

    /// Every day of the range, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.first.iter_days().take(self.len_days())
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// A user's running clock during one activity segment.
///
/// Holds sub-second precision; read it through [`SimClock::quantized`] when
/// stamping a sample.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SimClock {
    now: Timestamp,
}

impl SimClock {
    pub fn new(start: Timestamp) -> Self {
        Self { now: start }
    }

    /// Unrounded current time.
    #[inline]
    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Current time rounded to the nearest second.
    #[inline]
    pub fn quantized(&self) -> Timestamp {
        quantize(self.now)
    }

    /// Advance by a (possibly fractional) number of seconds.
    pub fn advance_secs(&mut self, secs: f64) {
        self.now += TimeDelta::microseconds((secs * 1e6).round() as i64);
    }

    pub fn advance_minutes(&mut self, minutes: i64) {
        self.now += TimeDelta::minutes(minutes);
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.now.format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

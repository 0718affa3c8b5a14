// ABOUTME: Time source abstraction and local calendar day resolution
// ABOUTME: Maps instants to the user's calendar date so "today" is an explicit, testable input
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

//! Calendar and clock
//!
//! "Today" is always the calendar date of the current instant in the user's local
//! offset. Services never read the wall clock directly; they ask a [`Clock`] and
//! resolve the day through a [`LocalCalendar`].

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};
use std::sync::{Mutex, PoisonError};

/// Source of the current instant
pub trait Clock: Send + Sync {
    /// Current instant in UTC
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually controlled time for tests and replays
#[derive(Debug)]
pub struct FixedClock {
    instant: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Clock frozen at `instant`
    #[must_use]
    pub const fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Mutex::new(instant),
        }
    }

    /// Jump to `instant`
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.instant.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }

    /// Move forward by `delta`
    pub fn advance(&self, delta: Duration) {
        let mut guard = self.instant.lock().unwrap_or_else(PoisonError::into_inner);
        *guard += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.instant.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A resolved calendar day together with the instant it was resolved at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    /// Local calendar date
    pub date: NaiveDate,
    /// Instant used for timestamps
    pub now: DateTime<Utc>,
}

/// The user's local calendar, expressed as a fixed UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalCalendar {
    offset: FixedOffset,
}

impl Default for LocalCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl LocalCalendar {
    /// Calendar aligned with UTC
    #[must_use]
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// Calendar for an explicit offset
    #[must_use]
    pub const fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Calendar `minutes` east of UTC (negative for west)
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if the offset is outside what `chrono` accepts
    pub fn from_offset_minutes(minutes: i32) -> AppResult<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
            .ok_or_else(|| AppError::config(format!("UTC offset of {minutes} minutes is out of range")))
    }

    /// Offset of this calendar from UTC
    #[must_use]
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Local calendar date of `instant`
    #[must_use]
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// First instant of `date` in this calendar, as UTC
    #[must_use]
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let local_midnight = date.and_time(chrono::NaiveTime::MIN);
        (local_midnight - Duration::seconds(i64::from(self.offset.local_minus_utc()))).and_utc()
    }

    /// Today according to `clock`
    #[must_use]
    pub fn today(&self, clock: &dyn Clock) -> CalendarDay {
        self.day_at(clock.now())
    }

    /// Calendar day containing `instant`
    #[must_use]
    pub fn day_at(&self, instant: DateTime<Utc>) -> CalendarDay {
        CalendarDay {
            date: self.date_of(instant),
            now: instant,
        }
    }
}

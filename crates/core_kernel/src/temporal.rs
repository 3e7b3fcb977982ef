//! Time handling
//!
//! This module provides:
//! - `Clock`: the source of "now" for every component that stamps or derives times
//! - `Timezone`: a serializable wrapper around `chrono_tz::Tz`
//! - `DateRange`: an inclusive calendar date range (e.g. a coverage window)

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Source of the current time
///
/// Production code uses [`SystemClock`]; tests and fixtures pin time with
/// [`FixedClock`] so that derived schedules are reproducible.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Returns the current instant in UTC
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

/// A clock pinned to a settable instant
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: Arc<RwLock<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Arc::new(RwLock::new(instant)),
        }
    }

    /// Moves the clock to a new instant
    pub fn set(&self, instant: DateTime<Utc>) {
        if let Ok(mut guard) = self.instant.write() {
            *guard = instant;
        }
    }

    /// Moves the clock forward by the given duration
    pub fn advance(&self, by: chrono::Duration) {
        if let Ok(mut guard) = self.instant.write() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
            .read()
            .map(|guard| *guard)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}

/// Timezone wrapper for journey and filing times
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Tz::from_str(&s)
            .map(Timezone)
            .map_err(|_| serde::de::Error::custom(format!("Invalid timezone: {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// The reference timezone used to derive journey times (Asia/Singapore)
    pub fn reference() -> Self {
        Self(chrono_tz::Asia::Singapore)
    }

    /// Converts a UTC datetime to the local timezone
    pub fn to_local(&self, utc: DateTime<Utc>) -> DateTime<Tz> {
        utc.with_timezone(&self.0)
    }

    /// Converts a UTC datetime to local time with its offset fixed, which
    /// serializes as RFC 3339 and survives a round trip through storage
    pub fn to_fixed(&self, utc: DateTime<Utc>) -> DateTime<FixedOffset> {
        self.to_local(utc).fixed_offset()
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must not be after end {end}")]
    InvalidPeriod {
        start: String,
        end: String,
    },
}

/// An inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_fixed_clock_is_stable_until_moved() {
        let instant = Utc.with_ymd_and_hms(2026, 3, 1, 2, 0, 0).unwrap();
        let clock = FixedClock::new(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), instant);

        clock.advance(chrono::Duration::minutes(5));
        assert_eq!(clock.now(), instant + chrono::Duration::minutes(5));
    }

    #[test]
    fn test_reference_timezone_is_utc_plus_eight() {
        let instant = Utc.with_ymd_and_hms(2026, 3, 1, 2, 0, 0).unwrap();
        let local = Timezone::reference().to_fixed(instant);
        assert_eq!(local.hour(), 10);
        assert_eq!(local.offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_date_range_rejects_inverted_bounds() {
        let a = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let b = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert!(DateRange::new(a, b).is_err());
        assert!(DateRange::new(b, a).is_ok());
    }
}

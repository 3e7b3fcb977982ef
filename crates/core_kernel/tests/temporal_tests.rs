//! Unit tests for the temporal module
//!
//! Tests cover the clock implementations, timezone conversion and date ranges.

use chrono::{Duration, NaiveDate, TimeZone, Timelike, Utc};
use core_kernel::{Clock, DateRange, FixedClock, SystemClock, Timezone};

mod clocks {
    use super::*;

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn test_fixed_clock_set() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        let later = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        clock.set(later);
        assert_eq!(clock.now(), later);
    }

    #[test]
    fn test_fixed_clock_clones_share_time() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        let shared = clock.clone();
        clock.advance(Duration::hours(1));
        assert_eq!(shared.now().hour(), 1);
    }
}

mod timezone {
    use super::*;

    #[test]
    fn test_reference_timezone_crosses_midnight() {
        let utc = Utc.with_ymd_and_hms(2026, 3, 1, 20, 0, 0).unwrap();
        let local = Timezone::reference().to_local(utc);
        assert_eq!(local.date_naive(), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert_eq!(local.hour(), 4);
    }

    #[test]
    fn test_timezone_serializes_by_name() {
        let json = serde_json::to_string(&Timezone::reference()).unwrap();
        assert_eq!(json, "\"Asia/Singapore\"");
        let back: Timezone = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Timezone::reference());
    }

    #[test]
    fn test_invalid_timezone_name_is_rejected() {
        let result: Result<Timezone, _> = serde_json::from_str("\"Mars/Olympus\"");
        assert!(result.is_err());
    }
}

mod date_range {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let start = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let range = DateRange::new(start, end).unwrap();
        assert!(range.contains(start));
        assert!(range.contains(end));
        assert!(!range.contains(end.succ_opt().unwrap()));
        assert_eq!(range.days(), 15);
    }
}

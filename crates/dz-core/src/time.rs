//! Timestamps and dwell-window arithmetic.
//!
//! The control core never reads a clock itself: every evaluation receives
//! the current instant from the caller, which keeps it deterministic and
//! lets restored timestamps be compared against the same time base.

use chrono::{DateTime, TimeDelta, Utc};

/// Wall-clock instant used for vent transition bookkeeping.
pub type Timestamp = DateTime<Utc>;

/// Convert a (possibly fractional) number of seconds into a `TimeDelta`.
///
/// Negative and non-finite inputs collapse to zero; the result is
/// millisecond-precise.
pub fn seconds_to_delta(seconds: f64) -> TimeDelta {
    if !seconds.is_finite() || seconds <= 0.0 {
        return TimeDelta::zero();
    }
    // `as` saturates, so huge windows clamp to the largest representable delta
    TimeDelta::milliseconds((seconds * 1000.0).round() as i64)
}

/// `at + delta`, clamped to the latest representable instant.
///
/// A window that ends past the end of time never elapses.
pub fn add_saturating(at: Timestamp, delta: TimeDelta) -> Timestamp {
    at.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Seconds elapsed from `since` to `now` (negative if `now` is earlier).
pub fn elapsed_seconds(since: Timestamp, now: Timestamp) -> f64 {
    (now - since).num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(secs: i64) -> Timestamp {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn delta_from_seconds() {
        assert_eq!(seconds_to_delta(300.0), TimeDelta::seconds(300));
        assert_eq!(seconds_to_delta(1.5), TimeDelta::milliseconds(1500));
        assert_eq!(seconds_to_delta(0.0), TimeDelta::zero());
        assert_eq!(seconds_to_delta(-4.0), TimeDelta::zero());
        assert_eq!(seconds_to_delta(f64::NAN), TimeDelta::zero());
    }

    #[test]
    fn huge_windows_saturate() {
        let end = add_saturating(t(0), seconds_to_delta(1e13));
        assert_eq!(end, DateTime::<Utc>::MAX_UTC);
        assert_eq!(add_saturating(t(0), TimeDelta::seconds(5)), t(5));
    }

    #[test]
    fn elapsed_between_instants() {
        assert_eq!(elapsed_seconds(t(0), t(100)), 100.0);
        assert_eq!(elapsed_seconds(t(100), t(0)), -100.0);
    }
}

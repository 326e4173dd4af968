//! Common time helpers for flip_core.

use std::time::Duration;

/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;
/// Number of microseconds in one millisecond.
pub const MICROS_PER_MILLI: u64 = 1_000;

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
#[inline]
pub fn as_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Convert a seconds value into a `Duration`.
/// Returns `None` for NaN, infinities and negatives.
#[inline]
pub fn secs_to_duration(secs: f64) -> Option<Duration> {
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(secs).ok()
}

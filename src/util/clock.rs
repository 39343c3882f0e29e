//! Clock helpers.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Wall-clock milliseconds since the Unix epoch. Used for audit timestamps only;
/// scheduling decisions run on the monotonic tokio clock.
pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

/// Whole minutes in `d`, rounded toward zero.
pub const fn floor_minutes(d: Duration) -> u64 {
    d.as_secs() / 60
}

/// Whole minutes in `d`, rounded up. A non-zero remainder counts as a minute.
pub const fn ceil_minutes(d: Duration) -> u64 {
    let secs = d.as_secs();
    let extra = if secs % 60 != 0 || d.subsec_nanos() != 0 { 1 } else { 0 };
    secs / 60 + extra
}

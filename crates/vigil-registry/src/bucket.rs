//! Day-bucket arithmetic.
//!
//! The temporal core of the registry, kept as pure functions over plain
//! integers so the streak rules are testable without any storage behind
//! them. A bucket is `floor(now / 86_400)`; the same bucketing defines the
//! attestation epoch.

/// Length of one bucket, seconds.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Bucket containing the given timestamp.
pub fn day_bucket(now: u64) -> u64 {
    now / SECONDS_PER_DAY
}

/// New streak marker produced by a pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    /// Bucket the pulse landed in.
    pub day: u64,
    /// Streak after the pulse.
    pub streak: u32,
}

/// Apply one pulse at `now` to the previous `(day, streak)` marker.
///
/// Same bucket: streak unchanged, so two pulses landing in one bucket are
/// idempotent on the counter in either order. Next consecutive bucket:
/// streak + 1. Anything else, including the first pulse ever: streak
/// restarts at 1. The streak never skips.
pub fn advance_streak(now: u64, last: Option<(u64, u32)>) -> StreakUpdate {
    let day = day_bucket(now);
    let streak = match last {
        Some((last_day, streak)) if day == last_day => streak,
        Some((last_day, streak)) if day == last_day.wrapping_add(1) => streak.saturating_add(1),
        _ => 1,
    };
    StreakUpdate { day, streak }
}

/// Seconds from `now` until the end of `bucket`, or 0 if already past it.
pub fn seconds_until_rollover(now: u64, bucket: u64) -> u64 {
    bucket
        .saturating_add(1)
        .saturating_mul(SECONDS_PER_DAY)
        .saturating_sub(now)
}

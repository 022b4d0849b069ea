//! Exponential backoff with optional jitter.

use std::time::Duration;

use rand::Rng;

/// Calculate the delay slept before retry number `retry` (1-based).
///
/// The schedule is `initial, initial * multiplier, initial * multiplier^2, ...`
/// capped at `max_ms`. A non-zero `jitter_ratio` adds up to that fraction of the
/// delay on top.
pub fn calculate_backoff(
    retry: u32,
    initial_ms: u64,
    multiplier: f64,
    max_ms: u64,
    jitter_ratio: f64,
) -> Duration {
    if retry == 0 {
        return Duration::from_millis(0);
    }

    let exponent = i32::try_from(retry - 1).unwrap_or(i32::MAX);
    let scaled = initial_ms as f64 * multiplier.powi(exponent);
    let capped_delay = if scaled.is_finite() {
        (scaled.round() as u64).min(max_ms)
    } else {
        max_ms
    };

    let jitter_range = (capped_delay as f64 * jitter_ratio) as u64;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

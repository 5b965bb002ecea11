//! Retry delay calculation

use crate::types::RetryPolicy;
use std::time::Duration;

/// Calculate the delay before the next attempt
///
/// `retry` is the 0-indexed number of the failed attempt, so the delay
/// between attempt `i` and `i + 1` is `base_delay_ms * backoff_factor^i`.
/// The result is uncapped unless the policy sets `max_delay_ms`, and
/// saturates at `Duration::MAX` instead of overflowing.
///
/// # Example
///
/// ```rust
/// use moai_core::retry::calculate_delay;
/// use moai_core::types::RetryPolicy;
///
/// let policy = RetryPolicy::default();
///
/// assert_eq!(calculate_delay(&policy, 0).as_millis(), 800);
/// assert_eq!(calculate_delay(&policy, 1).as_millis(), 1600);
/// assert_eq!(calculate_delay(&policy, 2).as_millis(), 3200);
/// ```
pub fn calculate_delay(policy: &RetryPolicy, retry: u32) -> Duration {
    let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
    let mut delay_ms = policy.base_delay_ms as f64 * policy.backoff_factor.powi(exponent);

    if let Some(max_delay_ms) = policy.max_delay_ms {
        delay_ms = delay_ms.min(max_delay_ms as f64);
    }

    millis_to_duration(delay_ms)
}

fn millis_to_duration(delay_ms: f64) -> Duration {
    if delay_ms.is_nan() || delay_ms <= 0.0 {
        return Duration::ZERO;
    }

    let micros = (delay_ms * 1000.0).round();
    if micros >= u64::MAX as f64 {
        Duration::MAX
    } else {
        Duration::from_micros(micros as u64)
    }
}

//! Bounded retry execution engine
//!
//! Wraps an arbitrary async operation with exponential-backoff retry, a
//! bounded attempt count, and an observer hook for each retry.
//!
//! # Features
//!
//! - At most `max_retries + 1` attempts, run strictly sequentially
//! - Delay of `base_delay * backoff_factor^i` after the `i`-th failure,
//!   uncapped unless the policy sets `max_delay_ms`
//! - Observable retries via the `RetryObserver` trait, or a plain
//!   `on_retry` closure
//! - Built-in `TracingObserver` for logging; the executor itself never logs
//! - Terminal errors keep the last attempt's error and can be normalized
//!   into a `Failure`
//!
//! Every error is retried the same way; there is no predicate and no
//! cancellation hook. Cancellation, if needed, belongs inside the operation.
//!
//! # Example
//!
//! ```rust,no_run
//! use moai_core::retry::{RetryError, RetryExecutor};
//! use moai_core::types::RetryPolicy;
//!
//! async fn example() -> Result<String, RetryError<std::io::Error>> {
//!     RetryExecutor::builder()
//!         .with_policy(RetryPolicy::default())
//!         .on_retry(|attempt: u32, error: &std::io::Error| {
//!             eprintln!("retry {}: {}", attempt, error);
//!         })
//!         .build()
//!         .execute(|| async {
//!             // Your fallible operation here
//!             Ok("success".to_string())
//!         })
//!         .await
//! }
//! ```

mod backoff;
mod error;
mod executor;
mod observer;

pub use backoff::calculate_delay;
pub use error::{BoxError, Failure, IntoFailure, RetryError, GENERIC_FAILURE_MESSAGE};
pub use executor::{retry_with_policy, with_retry, RetryExecutor, RetryExecutorBuilder};
pub use observer::{ClosureObserver, NoOpObserver, RetryObserver, StatsObserver, TracingObserver};

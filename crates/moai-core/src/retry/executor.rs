//! Retry execution engine
//!
//! Runs an async operation up to `max_retries + 1` times, strictly one
//! attempt after another, sleeping `base_delay * backoff_factor^i` after the
//! `i`-th failure. The first success is returned immediately; when every
//! attempt fails the error of the last attempt is returned.

use std::future::Future;

use tokio::time::Instant;

use crate::types::RetryPolicy;

use super::backoff::calculate_delay;
use super::error::RetryError;
use super::observer::{ClosureObserver, NoOpObserver, RetryObserver};

/// Execute an async operation with the default retry policy
///
/// Three retries, 800ms base delay, factor 2.
///
/// # Example
///
/// ```rust,no_run
/// use moai_core::retry::with_retry;
///
/// async fn example() {
///     let result = with_retry(|| async {
///         Ok::<_, std::io::Error>("success")
///     }).await;
/// }
/// ```
pub async fn with_retry<F, Fut, T, E>(op: F) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    RetryExecutor::new(RetryPolicy::default()).execute(op).await
}

/// Execute an async operation with retry logic based on a policy
///
/// This is a convenience function for simple retry scenarios. For retry
/// callbacks or logging, use `RetryExecutorBuilder`.
///
/// # Example
///
/// ```rust,no_run
/// use moai_core::retry::retry_with_policy;
/// use moai_core::types::RetryPolicy;
///
/// async fn example() {
///     let policy = RetryPolicy::default().with_max_retries(1);
///
///     let result = retry_with_policy(&policy, || async {
///         Ok::<_, std::io::Error>("success")
///     }).await;
/// }
/// ```
pub async fn retry_with_policy<F, Fut, T, E>(policy: &RetryPolicy, op: F) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    RetryExecutor::new(policy.clone()).execute(op).await
}

/// Builder for configuring a `RetryExecutor`
///
/// # Example
///
/// ```rust
/// use moai_core::retry::{RetryExecutorBuilder, TracingObserver};
/// use moai_core::types::RetryPolicy;
///
/// let executor = RetryExecutorBuilder::new()
///     .with_policy(RetryPolicy::default())
///     .with_observer(TracingObserver::new("download"))
///     .on_retry(|attempt: u32, error: &std::io::Error| {
///         eprintln!("retry {}: {}", attempt, error);
///     })
///     .build();
/// # let _ = executor;
/// ```
pub struct RetryExecutorBuilder<O = NoOpObserver> {
    policy: RetryPolicy,
    observer: O,
}

impl Default for RetryExecutorBuilder<NoOpObserver> {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryExecutorBuilder<NoOpObserver> {
    /// Create a new builder with the default policy and no observer
    pub fn new() -> Self {
        Self {
            policy: RetryPolicy::default(),
            observer: NoOpObserver,
        }
    }
}

impl<O> RetryExecutorBuilder<O> {
    /// Set the retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the observer, replacing any previous one
    pub fn with_observer<O2>(self, observer: O2) -> RetryExecutorBuilder<O2> {
        RetryExecutorBuilder {
            policy: self.policy,
            observer,
        }
    }

    /// Add a callback invoked after each failed attempt that will be retried
    ///
    /// The callback receives the 1-based attempt number and the error. It
    /// runs after the observers already configured.
    pub fn on_retry<F>(self, callback: F) -> RetryExecutorBuilder<(O, ClosureObserver<F>)> {
        RetryExecutorBuilder {
            policy: self.policy,
            observer: (self.observer, ClosureObserver::new(callback)),
        }
    }

    /// Build the executor
    pub fn build(self) -> RetryExecutor<O> {
        RetryExecutor {
            policy: self.policy,
            observer: self.observer,
        }
    }
}

/// A retry executor with a policy and an observer
///
/// The executor holds no state between calls; one instance can run any
/// number of independent `execute` calls.
pub struct RetryExecutor<O = NoOpObserver> {
    policy: RetryPolicy,
    observer: O,
}

impl RetryExecutor<NoOpObserver> {
    /// Create an executor with the given policy and no observer
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            observer: NoOpObserver,
        }
    }

    /// Start configuring an executor
    pub fn builder() -> RetryExecutorBuilder<NoOpObserver> {
        RetryExecutorBuilder::new()
    }
}

impl<O> RetryExecutor<O> {
    /// The policy this executor runs with
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute an operation with retry logic
    ///
    /// # Returns
    ///
    /// The result of the first successful attempt, or a `RetryError` holding
    /// the error of the last attempt.
    pub async fn execute<F, Fut, T, E>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        O: RetryObserver<E>,
    {
        let start = Instant::now();
        let max_attempts = self.policy.max_attempts();
        let mut retry: u32 = 0;

        loop {
            let attempt = retry.saturating_add(1);
            self.observer.on_attempt_start(attempt, max_attempts);

            match op().await {
                Ok(result) => {
                    self.observer.on_success(attempt, start.elapsed());
                    return Ok(result);
                }
                Err(err) => {
                    if retry >= self.policy.max_retries {
                        self.observer.on_exhausted(attempt, &err);
                        return Err(RetryError::new(attempt, err, start.elapsed()));
                    }

                    let delay = calculate_delay(&self.policy, retry);
                    self.observer.on_retry(attempt, &err, delay);

                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    retry += 1;
                }
            }
        }
    }
}

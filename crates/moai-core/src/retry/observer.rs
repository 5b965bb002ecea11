//! Retry observation and logging
//!
//! This module provides the `RetryObserver` trait for monitoring retry
//! attempts. The executor itself never logs; `TracingObserver` does it with
//! the `tracing` crate and `ClosureObserver` adapts a plain `on_retry`
//! callback.
//!
//! Observer hooks return nothing and cannot alter control flow. A panic
//! inside a hook unwinds through the executor and ends the retry sequence.

use std::fmt::Display;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Observer trait for retry attempt events
///
/// Generic over the error type `E` of the operation, so hooks see the actual
/// error value rather than a type-erased wrapper.
///
/// # Example
///
/// ```rust
/// use moai_core::retry::RetryObserver;
/// use std::time::Duration;
///
/// struct PrintObserver;
///
/// impl<E: std::fmt::Debug> RetryObserver<E> for PrintObserver {
///     fn on_retry(&self, attempt: u32, error: &E, delay: Duration) {
///         eprintln!("attempt {} failed: {:?}, retrying in {:?}", attempt, error, delay);
///     }
/// }
/// ```
pub trait RetryObserver<E: ?Sized> {
    /// Called when an attempt is about to start
    ///
    /// # Arguments
    ///
    /// * `attempt` - The attempt number (1-indexed)
    /// * `max_attempts` - The maximum number of attempts configured
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        let _ = (attempt, max_attempts);
    }

    /// Called when an attempt fails and will be retried
    ///
    /// Never called for the final failure.
    ///
    /// # Arguments
    ///
    /// * `attempt` - The attempt number that failed (1-indexed)
    /// * `error` - The error that caused the failure
    /// * `delay` - The delay before the next attempt
    fn on_retry(&self, attempt: u32, error: &E, delay: Duration);

    /// Called when the operation succeeds
    fn on_success(&self, attempt: u32, total_duration: Duration) {
        let _ = (attempt, total_duration);
    }

    /// Called when all attempts are exhausted
    fn on_exhausted(&self, attempts: u32, final_error: &E) {
        let _ = (attempts, final_error);
    }
}

/// A no-op observer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl<E: ?Sized> RetryObserver<E> for NoOpObserver {
    fn on_retry(&self, _attempt: u32, _error: &E, _delay: Duration) {}
}

/// An observer that forwards retry events to a closure
///
/// The closure receives the 1-based number of the attempt that just failed
/// and its error.
///
/// ```rust
/// use moai_core::retry::ClosureObserver;
///
/// let observer = ClosureObserver::new(|attempt: u32, error: &std::io::Error| {
///     eprintln!("retry {}: {}", attempt, error);
/// });
/// # let _ = observer;
/// ```
pub struct ClosureObserver<F> {
    callback: F,
}

impl<F> ClosureObserver<F> {
    /// Create a new closure-based observer
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<E: ?Sized, F> RetryObserver<E> for ClosureObserver<F>
where
    F: Fn(u32, &E),
{
    fn on_retry(&self, attempt: u32, error: &E, _delay: Duration) {
        (self.callback)(attempt, error)
    }
}

/// An observer that logs retry events using the `tracing` crate
///
/// # Log Levels
///
/// - `on_attempt_start`: DEBUG
/// - `on_retry`: WARN
/// - `on_success`: INFO (if > 1 attempt) or DEBUG (first attempt)
/// - `on_exhausted`: ERROR
///
/// Retry warnings read "attempt N of M", with M taken from the most recent
/// `on_attempt_start`.
#[derive(Debug)]
pub struct TracingObserver {
    /// Name of the operation being retried (for log context)
    operation: String,
    /// Attempt budget of the running sequence, 0 until the first attempt
    max_attempts: AtomicU32,
}

impl Clone for TracingObserver {
    fn clone(&self) -> Self {
        Self {
            operation: self.operation.clone(),
            max_attempts: AtomicU32::new(self.max_attempts.load(Ordering::Relaxed)),
        }
    }
}

impl TracingObserver {
    /// Create a new tracing observer
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            max_attempts: AtomicU32::new(0),
        }
    }

    /// Get the operation name
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("retry")
    }
}

impl<E: Display + ?Sized> RetryObserver<E> for TracingObserver {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        self.max_attempts.store(max_attempts, Ordering::Relaxed);
        tracing::debug!(
            operation = %self.operation,
            attempt = attempt,
            max_attempts = max_attempts,
            "starting attempt"
        );
    }

    fn on_retry(&self, attempt: u32, error: &E, delay: Duration) {
        let max_attempts = self.max_attempts.load(Ordering::Relaxed);
        tracing::warn!(
            operation = %self.operation,
            attempt = attempt,
            max_attempts = max_attempts,
            error = %error,
            delay_ms = delay.as_millis() as u64,
            "attempt {} of {} failed, will retry",
            attempt,
            max_attempts
        );
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        if attempt > 1 {
            tracing::info!(
                operation = %self.operation,
                attempt = attempt,
                total_duration_ms = total_duration.as_millis() as u64,
                "succeeded after retry"
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                duration_ms = total_duration.as_millis() as u64,
                "succeeded on first attempt"
            );
        }
    }

    fn on_exhausted(&self, attempts: u32, final_error: &E) {
        tracing::error!(
            operation = %self.operation,
            attempts = attempts,
            error = %final_error,
            "all retry attempts exhausted"
        );
    }
}

/// An observer that collects statistics about retry attempts
///
/// Useful for testing and metrics collection. Besides the event counters it
/// records the attempt number and delay of every retry, in order.
#[derive(Debug, Default)]
pub struct StatsObserver {
    attempt_starts: AtomicU32,
    retries: AtomicU32,
    successes: AtomicU32,
    exhaustions: AtomicU32,
    retry_log: Mutex<Vec<(u32, Duration)>>,
}

impl StatsObserver {
    /// Create a new stats observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of attempt starts
    pub fn attempt_starts(&self) -> u32 {
        self.attempt_starts.load(Ordering::SeqCst)
    }

    /// Get the number of retries
    pub fn retries(&self) -> u32 {
        self.retries.load(Ordering::SeqCst)
    }

    /// Get the number of successes
    pub fn successes(&self) -> u32 {
        self.successes.load(Ordering::SeqCst)
    }

    /// Get the number of exhaustions
    pub fn exhaustions(&self) -> u32 {
        self.exhaustions.load(Ordering::SeqCst)
    }

    /// Attempt numbers passed to `on_retry`, in call order
    pub fn retry_attempts(&self) -> Vec<u32> {
        self.log().iter().map(|(attempt, _)| *attempt).collect()
    }

    /// Delays passed to `on_retry`, in call order
    pub fn retry_delays(&self) -> Vec<Duration> {
        self.log().iter().map(|(_, delay)| *delay).collect()
    }

    fn log(&self) -> std::sync::MutexGuard<'_, Vec<(u32, Duration)>> {
        // A poisoned log still holds valid entries.
        self.retry_log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<E: ?Sized> RetryObserver<E> for StatsObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {
        self.attempt_starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_retry(&self, attempt: u32, _error: &E, delay: Duration) {
        self.retries.fetch_add(1, Ordering::SeqCst);
        self.log().push((attempt, delay));
    }

    fn on_success(&self, _attempt: u32, _total_duration: Duration) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_exhausted(&self, _attempts: u32, _final_error: &E) {
        self.exhaustions.fetch_add(1, Ordering::SeqCst);
    }
}

/// Two observers notified in order
impl<E: ?Sized, A, B> RetryObserver<E> for (A, B)
where
    A: RetryObserver<E>,
    B: RetryObserver<E>,
{
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        self.0.on_attempt_start(attempt, max_attempts);
        self.1.on_attempt_start(attempt, max_attempts);
    }

    fn on_retry(&self, attempt: u32, error: &E, delay: Duration) {
        self.0.on_retry(attempt, error, delay);
        self.1.on_retry(attempt, error, delay);
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        self.0.on_success(attempt, total_duration);
        self.1.on_success(attempt, total_duration);
    }

    fn on_exhausted(&self, attempts: u32, final_error: &E) {
        self.0.on_exhausted(attempts, final_error);
        self.1.on_exhausted(attempts, final_error);
    }
}

macro_rules! forward_observer {
    ($($ptr:ty),* $(,)?) => {
        $(
            impl<E: ?Sized, T: RetryObserver<E> + ?Sized> RetryObserver<E> for $ptr {
                fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
                    (**self).on_attempt_start(attempt, max_attempts)
                }

                fn on_retry(&self, attempt: u32, error: &E, delay: Duration) {
                    (**self).on_retry(attempt, error, delay)
                }

                fn on_success(&self, attempt: u32, total_duration: Duration) {
                    (**self).on_success(attempt, total_duration)
                }

                fn on_exhausted(&self, attempts: u32, final_error: &E) {
                    (**self).on_exhausted(attempts, final_error)
                }
            }
        )*
    };
}

forward_observer!(Arc<T>, Box<T>, &T);

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_noop_observer() {
        let observer = NoOpObserver;
        let error = io::Error::other("test");

        RetryObserver::<io::Error>::on_attempt_start(&observer, 1, 3);
        observer.on_retry(1, &error, Duration::from_millis(100));
        RetryObserver::<io::Error>::on_success(&observer, 2, Duration::from_millis(500));
        observer.on_exhausted(3, &error);
    }

    #[test]
    fn test_stats_observer() {
        let observer = StatsObserver::new();
        let error = io::Error::other("test");

        RetryObserver::<io::Error>::on_attempt_start(&observer, 1, 3);
        RetryObserver::<io::Error>::on_attempt_start(&observer, 2, 3);
        observer.on_retry(1, &error, Duration::from_millis(100));
        RetryObserver::<io::Error>::on_success(&observer, 2, Duration::from_millis(500));

        assert_eq!(observer.attempt_starts(), 2);
        assert_eq!(observer.retries(), 1);
        assert_eq!(observer.successes(), 1);
        assert_eq!(observer.exhaustions(), 0);
        assert_eq!(observer.retry_attempts(), vec![1]);
        assert_eq!(observer.retry_delays(), vec![Duration::from_millis(100)]);
    }

    #[test]
    fn test_stats_observer_exhaustion() {
        let observer = StatsObserver::new();
        let error = io::Error::other("test");

        observer.on_retry(1, &error, Duration::from_millis(100));
        observer.on_retry(2, &error, Duration::from_millis(200));
        observer.on_exhausted(3, &error);

        assert_eq!(observer.retries(), 2);
        assert_eq!(observer.exhaustions(), 1);
        assert_eq!(observer.retry_attempts(), vec![1, 2]);
    }

    #[test]
    fn test_closure_observer_receives_attempt_and_error() {
        let seen = Mutex::new(Vec::new());
        let observer = ClosureObserver::new(|attempt: u32, error: &io::Error| {
            seen.lock().unwrap().push((attempt, error.to_string()));
        });

        observer.on_retry(1, &io::Error::other("first"), Duration::ZERO);
        observer.on_retry(2, &io::Error::other("second"), Duration::ZERO);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![(1, "first".to_string()), (2, "second".to_string())]
        );
    }

    #[test]
    fn test_tracing_observer_creation() {
        let observer = TracingObserver::new("test_operation");
        assert_eq!(observer.operation(), "test_operation");

        let default_observer = TracingObserver::default();
        assert_eq!(default_observer.operation(), "retry");
    }

    #[test]
    fn test_tracing_observer_accepts_plain_strings() {
        let observer = TracingObserver::new("strings");
        observer.on_retry(1, "not an error type", Duration::from_millis(10));
        observer.on_exhausted(2, "still not an error type");
    }

    /// Collects formatted log output in memory
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_tracing_observer_logs_attempt_budget() {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let observer = TracingObserver::new("gemini");
        let error = io::Error::other("503");
        tracing::subscriber::with_default(subscriber, || {
            RetryObserver::<io::Error>::on_attempt_start(&observer, 1, 4);
            observer.on_retry(1, &error, Duration::from_millis(800));
        });

        let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("attempt 1 of 4 failed, will retry"), "{}", logs);
        assert!(logs.contains("operation=gemini"), "{}", logs);

        // Clones carry the budget seen so far
        assert_eq!(observer.clone().max_attempts.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn test_pair_observer_notifies_both() {
        let first = StatsObserver::new();
        let second = StatsObserver::new();
        let pair = (&first, &second);
        let error = io::Error::other("test");

        pair.on_retry(1, &error, Duration::ZERO);
        pair.on_exhausted(2, &error);

        assert_eq!(first.retries(), 1);
        assert_eq!(second.retries(), 1);
        assert_eq!(first.exhaustions(), 1);
        assert_eq!(second.exhaustions(), 1);
    }

    #[test]
    fn test_arc_observer() {
        let observer = Arc::new(StatsObserver::new());
        let error = io::Error::other("test");

        RetryObserver::<io::Error>::on_attempt_start(&observer, 1, 3);
        observer.on_retry(1, &error, Duration::from_millis(100));

        assert_eq!(observer.attempt_starts(), 1);
        assert_eq!(observer.retries(), 1);
    }
}

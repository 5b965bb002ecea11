//! Error types for the retry execution engine
//!
//! [`RetryError`] is returned when every attempt failed and carries the error
//! from the last attempt unchanged. [`Failure`] is the canonical error kind a
//! terminal error can be normalized into, so callers always end up with an
//! error-like value even when the operation failed with a plain string or
//! unit.

use std::error::Error;
use std::fmt;
use std::time::Duration;

/// Boxed, thread-safe error used by [`Failure`]
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Message carried by failures that had no error value of their own
pub const GENERIC_FAILURE_MESSAGE: &str = "operation failed after retries";

/// All attempts of a retried operation failed
///
/// The error is generic over `E`, the error type of the operation being
/// retried. `source` is always the error of the *last* attempt.
#[derive(Debug)]
pub struct RetryError<E> {
    /// Number of attempts made before giving up
    pub attempts: u32,
    /// The error from the final attempt
    pub source: E,
    /// Total duration spent across all attempts, including delays
    pub total_duration: Duration,
}

impl<E> RetryError<E> {
    /// Create a new exhausted error
    pub fn new(attempts: u32, source: E, total_duration: Duration) -> Self {
        Self {
            attempts,
            source,
            total_duration,
        }
    }

    /// Number of attempts made
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Total time spent across all attempts
    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    /// The error from the final attempt
    pub fn last_error(&self) -> &E {
        &self.source
    }

    /// Get the underlying error, consuming this error
    pub fn into_source(self) -> E {
        self.source
    }

    /// Map the error type using a closure
    pub fn map_err<F, E2>(self, f: F) -> RetryError<E2>
    where
        F: FnOnce(E) -> E2,
    {
        RetryError {
            attempts: self.attempts,
            source: f(self.source),
            total_duration: self.total_duration,
        }
    }

    /// Normalize the last error into the canonical [`Failure`] kind
    pub fn into_failure(self) -> Failure
    where
        E: IntoFailure,
    {
        self.source.into_failure()
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "retry exhausted after {} attempts over {:.2}s: {}",
            self.attempts,
            self.total_duration.as_secs_f64(),
            self.source
        )
    }
}

impl<E: Error + 'static> Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Canonical error kind for a failed retry sequence
#[derive(Debug)]
pub enum Failure {
    /// The operation failed with a real error value
    Error(BoxError),

    /// The operation failed with something that is not an error value
    ///
    /// Displays as [`GENERIC_FAILURE_MESSAGE`]; the original value, if it had
    /// a textual form, is kept in `detail`.
    Unknown { detail: Option<String> },
}

impl Failure {
    /// Wrap an error value
    pub fn from_error<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Failure::Error(Box::new(error))
    }

    /// A failure without an error value
    pub fn unknown(detail: Option<String>) -> Self {
        Failure::Unknown { detail }
    }

    /// Check if this failure carries an error value
    pub fn is_error(&self) -> bool {
        matches!(self, Failure::Error(_))
    }

    /// Textual form of the original non-error value, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            Failure::Unknown { detail } => detail.as_deref(),
            Failure::Error(_) => None,
        }
    }

    /// Convert into a boxed error
    pub fn into_boxed(self) -> BoxError {
        match self {
            Failure::Error(err) => err,
            unknown @ Failure::Unknown { .. } => Box::new(unknown),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Error(err) => fmt::Display::fmt(err, f),
            Failure::Unknown { .. } => f.write_str(GENERIC_FAILURE_MESSAGE),
        }
    }
}

impl Error for Failure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Failure::Error(err) => err.source(),
            Failure::Unknown { .. } => None,
        }
    }
}

/// Normalization of an operation's error into a [`Failure`]
///
/// Error types keep their message; values that are not errors (strings,
/// unit) become [`Failure::Unknown`]. Implement this for a crate's own error
/// type with [`Failure::from_error`].
pub trait IntoFailure {
    /// Perform the conversion
    fn into_failure(self) -> Failure;
}

impl IntoFailure for Failure {
    fn into_failure(self) -> Failure {
        self
    }
}

impl IntoFailure for BoxError {
    fn into_failure(self) -> Failure {
        Failure::Error(self)
    }
}

impl IntoFailure for anyhow::Error {
    fn into_failure(self) -> Failure {
        Failure::Error(self.into())
    }
}

impl IntoFailure for std::io::Error {
    fn into_failure(self) -> Failure {
        Failure::from_error(self)
    }
}

impl IntoFailure for crate::error::Error {
    fn into_failure(self) -> Failure {
        Failure::from_error(self)
    }
}

impl IntoFailure for String {
    fn into_failure(self) -> Failure {
        Failure::unknown(Some(self))
    }
}

impl IntoFailure for &'static str {
    fn into_failure(self) -> Failure {
        Failure::unknown(Some(self.to_string()))
    }
}

impl IntoFailure for () {
    fn into_failure(self) -> Failure {
        Failure::unknown(None)
    }
}

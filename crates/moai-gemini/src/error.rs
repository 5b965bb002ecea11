//! Error types for the Gemini client

use moai_core::retry::{Failure, IntoFailure};
use thiserror::Error;

/// Result type for Gemini operations
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Errors from calling the generative API
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("Gemini API key is not set (set MOAI_GEMINI_API_KEY or GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Image generation stopped: {0}")]
    Blocked(String),

    #[error("API returned no image data")]
    NoImage,

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GeminiError {
    /// Build a no-image error from the first candidate's finish reason
    pub fn no_image(finish_reason: Option<String>) -> Self {
        match finish_reason {
            Some(reason) if !reason.is_empty() => GeminiError::Blocked(reason),
            _ => GeminiError::NoImage,
        }
    }

    /// HTTP status code, for status errors
    pub fn status(&self) -> Option<u16> {
        match self {
            GeminiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl IntoFailure for GeminiError {
    fn into_failure(self) -> Failure {
        Failure::from_error(self)
    }
}

//! Runtime configuration types for operational parameters
//!
//! These types define configuration that controls runtime behavior: the
//! generative API endpoint and models, HTTP timeouts, and retry policies.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Operation name for image generation calls
pub const IMAGE_OPERATION: &str = "image";

/// Operation name for JSON (text model) calls
pub const JSON_OPERATION: &str = "json";

/// Complete Moai configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MoaiConfig {
    /// Generative API settings
    #[serde(default)]
    pub gemini: GeminiSettings,

    /// Network and HTTP configuration
    #[serde(default)]
    pub network: NetworkConfig,

    /// Retry policy configurations
    #[serde(default)]
    pub retry: RetryPoliciesConfig,
}

impl MoaiConfig {
    /// Copy of this configuration that is safe to print
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.gemini.api_key.is_some() {
            config.gemini.api_key = Some("********".to_string());
        }
        config
    }
}

/// Generative API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GeminiSettings {
    /// API key passed as the `key` query parameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the API (without the `/v1beta` path)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for image generation
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Model used for JSON responses
    #[serde(default = "default_text_model")]
    pub text_model: String,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            image_model: default_image_model(),
            text_model: default_text_model(),
        }
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}
fn default_image_model() -> String {
    "gemini-2.5-flash-image-preview".to_string()
}
fn default_text_model() -> String {
    "gemini-2.5-flash-preview-05-20".to_string()
}

/// Network and HTTP configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// HTTP timeout in seconds, per attempt
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl NetworkConfig {
    /// HTTP timeout as a duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn default_http_timeout() -> u64 {
    120
}
fn default_user_agent() -> String {
    format!(
        "moai/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Retry policy configurations
///
/// Operations without an entry in `operations` use `default`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryPoliciesConfig {
    /// Default retry policy
    #[serde(default)]
    pub default: RetryPolicy,

    /// Per-operation retry policies
    #[serde(default)]
    pub operations: HashMap<String, RetryPolicy>,
}

impl RetryPoliciesConfig {
    /// Policy for a named operation, falling back to the default policy
    pub fn policy_for(&self, operation: &str) -> &RetryPolicy {
        self.operations.get(operation).unwrap_or(&self.default)
    }
}

/// Retry policy for an operation
///
/// An operation runs at most `max_retries + 1` times. The delay before
/// retry `i` (0-indexed) is `base_delay_ms * backoff_factor^i`, uncapped
/// unless `max_delay_ms` is set.
///
/// `backoff_factor` is expected to be finite and `>= 1`; this is not
/// checked at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryPolicy {
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_base_delay")]
    pub base_delay_ms: u64,

    /// Multiplier applied to the delay after each failed attempt
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,

    /// Optional ceiling for a single delay, in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_delay_ms: Option<u64>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay(),
            backoff_factor: default_backoff_factor(),
            max_delay_ms: None,
        }
    }
}

fn default_max_retries() -> u32 {
    3
}
fn default_base_delay() -> u64 {
    800
}
fn default_backoff_factor() -> f64 {
    2.0
}

impl RetryPolicy {
    /// Total number of attempts this policy allows
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Set the number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the backoff factor
    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Clamp every delay to `max_delay`
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay_ms = Some(u64::try_from(max_delay.as_millis()).unwrap_or(u64::MAX));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.base_delay_ms, 800);
        assert_eq!(policy.backoff_factor, 2.0);
        assert_eq!(policy.max_delay_ms, None);
        assert_eq!(policy.max_attempts(), 4);
    }

    #[test]
    fn test_retry_policy_builders() {
        let policy = RetryPolicy::default()
            .with_max_retries(0)
            .with_backoff_factor(3.0)
            .with_max_delay(Duration::from_secs(1));

        assert_eq!(policy.max_retries, 0);
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(policy.backoff_factor, 3.0);
        assert_eq!(policy.max_delay_ms, Some(1000));
    }

    #[test]
    fn test_max_attempts_saturates() {
        let policy = RetryPolicy::default().with_max_retries(u32::MAX);
        assert_eq!(policy.max_attempts(), u32::MAX);
    }

    #[test]
    fn test_retry_policy_partial_yaml() {
        let policy: RetryPolicy = serde_yaml_ng::from_str("max-retries: 1\n").unwrap();
        assert_eq!(policy.max_retries, 1);
        assert_eq!(policy.base_delay_ms, 800);
        assert_eq!(policy.backoff_factor, 2.0);
    }

    #[test]
    fn test_policy_for_falls_back_to_default() {
        let mut policies = RetryPoliciesConfig::default();
        policies.default = RetryPolicy::default().with_max_retries(7);
        policies
            .operations
            .insert(IMAGE_OPERATION.to_string(), RetryPolicy::default().with_max_retries(1));

        assert_eq!(policies.policy_for(IMAGE_OPERATION).max_retries, 1);
        assert_eq!(policies.policy_for("unknown").max_retries, 7);
    }

    #[test]
    fn test_redacted_hides_api_key() {
        let mut config = MoaiConfig::default();
        config.gemini.api_key = Some("secret-key".to_string());

        let redacted = config.redacted();
        assert_eq!(redacted.gemini.api_key.as_deref(), Some("********"));
        assert_eq!(config.gemini.api_key.as_deref(), Some("secret-key"));

        assert_eq!(MoaiConfig::default().redacted().gemini.api_key, None);
    }

    #[test]
    fn test_gemini_defaults() {
        let settings = GeminiSettings::default();
        assert_eq!(settings.base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(settings.image_model, "gemini-2.5-flash-image-preview");
        assert_eq!(settings.text_model, "gemini-2.5-flash-preview-05-20");
    }
}

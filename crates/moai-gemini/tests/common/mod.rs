//! Common test infrastructure for moai-gemini tests
//!
//! # Modules
//!
//! - `constants`: Model names, keys and canned payloads
//! - `mock_server`: Wiremock setup helpers for `generateContent`

#![allow(dead_code)]

pub mod constants;
pub mod mock_server;

pub use constants::*;
pub use mock_server::*;

use moai_core::types::{GeminiSettings, NetworkConfig, RetryPoliciesConfig, RetryPolicy};
use moai_gemini::GeminiClient;
use wiremock::MockServer;

/// Policy with millisecond delays so retry tests stay fast
pub fn fast_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        base_delay_ms: 1,
        backoff_factor: 2.0,
        max_delay_ms: None,
    }
}

/// Client pointed at the mock server, with fast retry policies
pub fn client_for(server: &MockServer, max_retries: u32) -> GeminiClient {
    client_with_key(server, Some(TEST_API_KEY), max_retries)
}

/// Client pointed at the mock server with an explicit key
pub fn client_with_key(server: &MockServer, key: Option<&str>, max_retries: u32) -> GeminiClient {
    let settings = GeminiSettings {
        api_key: key.map(str::to_string),
        base_url: server.uri(),
        image_model: TEST_IMAGE_MODEL.to_string(),
        text_model: TEST_TEXT_MODEL.to_string(),
    };
    let policies = RetryPoliciesConfig {
        default: fast_policy(max_retries),
        ..Default::default()
    };

    GeminiClient::new(settings, &NetworkConfig::default(), policies).unwrap()
}

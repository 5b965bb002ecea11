//! Mock server helpers for `generateContent`
//!
//! Provides wiremock responders for the common response shapes: an image,
//! a JSON text answer, a blocked generation, and transient failures.

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::constants::*;

/// Response body with one inline image part
pub fn image_response(data: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "parts": [
                { "text": "here you go" },
                { "inlineData": { "mimeType": "image/png", "data": data } }
            ] },
            "finishReason": "STOP"
        }]
    })
}

/// Response body with a single text part
pub fn text_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

/// Response body with no content and the given finish reason
pub fn blocked_response(finish_reason: &str) -> Value {
    json!({ "candidates": [{ "finishReason": finish_reason }] })
}

/// Respond to `model` with `body`
pub async fn mock_generate(server: &MockServer, model: &str, body: Value) {
    Mock::given(method("POST"))
        .and(path(endpoint_path(model)))
        .and(query_param("key", TEST_API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Fail `fail_count` times with `status`, then respond with `body`
pub async fn mock_flaky_generate(
    server: &MockServer,
    model: &str,
    fail_count: u64,
    status: u16,
    body: Value,
) {
    // First N requests fail
    Mock::given(method("POST"))
        .and(path(endpoint_path(model)))
        .respond_with(ResponseTemplate::new(status).set_body_string("try again later"))
        .up_to_n_times(fail_count)
        .mount(server)
        .await;

    // Subsequent requests succeed
    mock_generate(server, model, body).await;
}

/// Always fail with `status` and `message`
pub async fn mock_failing_generate(server: &MockServer, model: &str, status: u16, message: &str) {
    Mock::given(method("POST"))
        .and(path(endpoint_path(model)))
        .respond_with(ResponseTemplate::new(status).set_body_string(message))
        .mount(server)
        .await;
}

//! Shared constants for client tests

pub const TEST_API_KEY: &str = "test-key";
pub const TEST_IMAGE_MODEL: &str = "test-image-model";
pub const TEST_TEXT_MODEL: &str = "test-text-model";

/// base64 of "moai"
pub const IMAGE_B64: &str = "bW9haQ==";

/// Path of the `generateContent` endpoint for `model`
pub fn endpoint_path(model: &str) -> String {
    format!("/v1beta/models/{}:generateContent", model)
}

//! `data:` URL helpers
//!
//! Images travel as base64 inside `data:<mime>;base64,<payload>` strings.

use crate::error::{GeminiError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use camino::Utf8Path;
use std::fs;

/// Payload part of a data URL
///
/// Returns the text between the first and second comma, or the whole input
/// when there is no comma. Empty input yields an empty string.
pub fn extract_base64_payload(data_url: &str) -> &str {
    data_url.split(',').nth(1).unwrap_or(data_url)
}

/// Build a base64 data URL
pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// MIME type for an image path, by extension
pub fn mime_type_for_path(path: &Utf8Path) -> &'static str {
    match path.extension().map(str::to_ascii_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Read a file into a data URL
pub fn read_file_as_data_url(path: &Utf8Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(encode_data_url(mime_type_for_path(path), &bytes))
}

/// A parsed base64 data URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime_type: String,
    pub data: String,
}

impl DataUrl {
    /// Parse `data:<mime>;base64,<payload>`
    pub fn parse(input: &str) -> Result<Self> {
        let rest = input
            .strip_prefix("data:")
            .ok_or_else(|| GeminiError::InvalidDataUrl("missing data: prefix".to_string()))?;
        let (meta, data) = rest
            .split_once(',')
            .ok_or_else(|| GeminiError::InvalidDataUrl("missing payload".to_string()))?;
        let mime_type = meta.strip_suffix(";base64").ok_or_else(|| {
            GeminiError::InvalidDataUrl("only base64 data URLs are supported".to_string())
        })?;

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }

    /// Decode the payload
    pub fn decode(&self) -> Result<Vec<u8>> {
        Ok(STANDARD.decode(self.data.as_bytes())?)
    }
}

impl std::fmt::Display for DataUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}

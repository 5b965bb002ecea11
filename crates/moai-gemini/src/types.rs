//! Request and response wire types for `generateContent`
//!
//! Field names follow the API's camelCase JSON. Only the subset used by the
//! client is modelled; unknown response fields are ignored.

use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateRequest {
    /// A request with a single content block holding `parts`
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content { parts }],
            ..Default::default()
        }
    }

    /// A text-only request
    pub fn text(prompt: impl Into<String>) -> Self {
        Self::from_parts(vec![Part::text(prompt)])
    }

    /// Set the system instruction
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(Content {
            parts: vec![Part::text(instruction)],
        });
        self
    }

    /// Set the generation config
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}

/// A block of content parts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, deserialize_with = "null_as_default")]
    pub parts: Vec<Part>,
}

/// A single content part: text, inline binary data, or both
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    /// A text part
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    /// An inline data part carrying a base64 payload
    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// Base64-encoded binary data with its MIME type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub mime_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: String,
}

/// Generation options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Ask the model for a specific response MIME type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

impl GenerationConfig {
    /// Config requesting an `application/json` response
    pub fn json() -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
        }
    }
}

/// Response body of `generateContent`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// All parts of all candidates, in order
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|content| content.parts.iter())
    }

    /// First part carrying non-empty inline data
    pub fn first_inline_data(&self) -> Option<&InlineData> {
        self.parts()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|d| !d.data.is_empty())
    }

    /// Finish reason of the first candidate
    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }

    /// Concatenated text of every text part
    pub fn text(&self) -> String {
        self.parts().filter_map(|p| p.text.as_deref()).collect()
    }
}

/// A single response candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateRequest::from_parts(vec![
            Part::text("draw a moai"),
            Part::inline("image/png", "AAAA"),
        ])
        .with_generation_config(GenerationConfig::json());

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{
                    "parts": [
                        { "text": "draw a moai" },
                        { "inlineData": { "mimeType": "image/png", "data": "AAAA" } }
                    ]
                }],
                "generationConfig": { "responseMimeType": "application/json" }
            })
        );
    }

    #[test]
    fn test_system_instruction() {
        let request = GenerateRequest::text("hi").with_system_instruction("be brief");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "be brief");
    }

    #[test]
    fn test_response_helpers() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [
                {
                    "content": { "parts": [
                        { "text": "{\"a\":" },
                        { "inlineData": { "mimeType": "image/png", "data": "" } }
                    ] },
                    "finishReason": "STOP"
                },
                {
                    "content": { "parts": [
                        { "text": "1}" },
                        { "inlineData": { "mimeType": "image/webp", "data": "UklG" } }
                    ] }
                }
            ],
            "usageMetadata": { "totalTokenCount": 12 }
        }))
        .unwrap();

        assert_eq!(response.text(), "{\"a\":1}");
        assert_eq!(response.finish_reason(), Some("STOP"));

        let inline = response.first_inline_data().unwrap();
        assert_eq!(inline.mime_type, "image/webp");
        assert_eq!(inline.data, "UklG");
    }

    #[test]
    fn test_empty_response() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(response.candidates.is_empty());
        assert_eq!(response.first_inline_data(), None);
        assert_eq!(response.finish_reason(), None);
        assert_eq!(response.text(), "");
    }

    #[test]
    fn test_null_lists_are_empty() {
        let response: GenerateResponse =
            serde_json::from_str(r#"{"candidates": null}"#).unwrap();
        assert!(response.candidates.is_empty());

        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": null }, "finishReason": "SAFETY" }
            ]
        }))
        .unwrap();
        assert_eq!(response.first_inline_data(), None);
        assert_eq!(response.finish_reason(), Some("SAFETY"));

        let part: Part =
            serde_json::from_str(r#"{"inlineData": {"mimeType": null, "data": "AAAA"}}"#).unwrap();
        assert_eq!(part.inline_data.unwrap().mime_type, "");
    }
}

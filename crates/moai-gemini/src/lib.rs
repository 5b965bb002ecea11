//! Generative image API client for Moai
//!
//! Provides:
//! - `generateContent` calls with bounded exponential-backoff retry
//! - Image generation from a prompt, optionally with an input image
//! - JSON responses from the text model
//! - `data:` URL helpers for moving images in and out of requests

pub mod client;
pub mod data_url;
pub mod error;
pub mod types;

pub use client::{CallOptions, GeminiClient, GeneratedImage};
pub use data_url::{encode_data_url, extract_base64_payload, read_file_as_data_url, DataUrl};
pub use error::{GeminiError, Result};
pub use types::{Content, GenerateRequest, GenerateResponse, GenerationConfig, InlineData, Part};

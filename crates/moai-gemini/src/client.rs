//! HTTP client for the `generateContent` endpoint
//!
//! Every call is wrapped in the retry executor from `moai-core`. Any failure
//! (transport error, non-2xx status, undecodable body) is retried under the
//! call's policy; once attempts run out, the last error is returned.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use moai_core::retry::{RetryExecutor, TracingObserver};
use moai_core::types::{
    GeminiSettings, MoaiConfig, NetworkConfig, RetryPoliciesConfig, RetryPolicy,
    IMAGE_OPERATION, JSON_OPERATION,
};
use reqwest::Url;
use tracing::{debug, info};

use crate::data_url::extract_base64_payload;
use crate::error::{GeminiError, Result};
use crate::types::{GenerateRequest, GenerateResponse, GenerationConfig, Part};

/// MIME type sent with inline input images and assumed for output images
const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Per-call overrides
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Model to call instead of the configured one
    pub model: Option<String>,
    /// Retry policy instead of the configured operation policy
    pub policy: Option<RetryPolicy>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = Some(policy);
        self
    }
}

/// An image returned by the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    /// Base64 payload
    pub data: String,
}

impl GeneratedImage {
    /// The image as a `data:` URL
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Decoded image bytes
    pub fn decode(&self) -> Result<Vec<u8>> {
        Ok(STANDARD.decode(self.data.as_bytes())?)
    }
}

/// Client for the generative API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    settings: GeminiSettings,
    policies: RetryPoliciesConfig,
}

impl GeminiClient {
    /// Create a client from explicit settings
    pub fn new(
        settings: GeminiSettings,
        network: &NetworkConfig,
        policies: RetryPoliciesConfig,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(&network.user_agent)
            .timeout(network.http_timeout())
            .build()?;

        Ok(Self {
            http,
            settings,
            policies,
        })
    }

    /// Create a client from a loaded configuration
    pub fn from_config(config: &MoaiConfig) -> Result<Self> {
        Self::new(
            config.gemini.clone(),
            &config.network,
            config.retry.clone(),
        )
    }

    fn api_key(&self) -> Result<&str> {
        self.settings
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(GeminiError::MissingApiKey)
    }

    /// `generateContent` URL for `model`, without the key
    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            model
        )
    }

    fn resolve_policy(&self, options: &CallOptions, operation: &str) -> RetryPolicy {
        options
            .policy
            .clone()
            .unwrap_or_else(|| self.policies.policy_for(operation).clone())
    }

    /// Send `request` to `model`, retrying under `policy`
    ///
    /// The API key is checked before any request is made.
    pub async fn call(
        &self,
        model: &str,
        request: &GenerateRequest,
        policy: &RetryPolicy,
    ) -> Result<GenerateResponse> {
        let key = self.api_key()?;
        let endpoint = self.endpoint(model);
        let url = Url::parse_with_params(&endpoint, &[("key", key)])
            .map_err(|e| GeminiError::InvalidBaseUrl(format!("{}: {}", endpoint, e)))?;

        debug!(model = %model, max_retries = policy.max_retries, "calling generateContent");

        let executor = RetryExecutor::builder()
            .with_policy(policy.clone())
            .with_observer(TracingObserver::new("gemini"))
            .build();

        executor
            .execute(|| self.send_once(&url, request))
            .await
            .map_err(|err| {
                debug!(
                    model = %model,
                    attempts = err.attempts(),
                    total_ms = err.total_duration().as_millis() as u64,
                    "generateContent gave up"
                );
                err.into_source()
            })
    }

    async fn send_once(&self, url: &Url, request: &GenerateRequest) -> Result<GenerateResponse> {
        let response = self.http.post(url.clone()).json(request).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GeminiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Generate an image and return the first inline image in the response
    pub async fn generate_image(
        &self,
        request: &GenerateRequest,
        options: CallOptions,
    ) -> Result<GeneratedImage> {
        let model = options
            .model
            .clone()
            .unwrap_or_else(|| self.settings.image_model.clone());
        let policy = self.resolve_policy(&options, IMAGE_OPERATION);

        let response = self.call(&model, request, &policy).await?;

        let Some(inline) = response.first_inline_data() else {
            return Err(GeminiError::no_image(
                response.finish_reason().map(str::to_string),
            ));
        };

        let mime_type = if inline.mime_type.is_empty() {
            DEFAULT_IMAGE_MIME.to_string()
        } else {
            inline.mime_type.clone()
        };

        info!(model = %model, mime_type = %mime_type, "image generated");
        Ok(GeneratedImage {
            mime_type,
            data: inline.data.clone(),
        })
    }

    /// Generate an image from a prompt and an input image given as a data URL
    pub async fn generate_image_from_data_url(
        &self,
        prompt: &str,
        data_url: &str,
        options: CallOptions,
    ) -> Result<GeneratedImage> {
        let request = GenerateRequest::from_parts(vec![
            Part::text(prompt),
            Part::inline(DEFAULT_IMAGE_MIME, extract_base64_payload(data_url)),
        ]);

        self.generate_image(&request, options).await
    }

    /// Ask the text model for a JSON response
    ///
    /// `extra_parts` follow the prompt in the single content block.
    pub async fn generate_json(
        &self,
        prompt: &str,
        extra_parts: Vec<Part>,
        options: CallOptions,
    ) -> Result<GenerateResponse> {
        let model = options
            .model
            .clone()
            .unwrap_or_else(|| self.settings.text_model.clone());
        let policy = self.resolve_policy(&options, JSON_OPERATION);

        let mut parts = Vec::with_capacity(extra_parts.len() + 1);
        parts.push(Part::text(prompt));
        parts.extend(extra_parts);

        let request =
            GenerateRequest::from_parts(parts).with_generation_config(GenerationConfig::json());

        self.call(&model, &request, &policy).await
    }
}

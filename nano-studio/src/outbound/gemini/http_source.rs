//! Reqwest-backed Gemini image generator.
//!
//! This adapter owns transport details only: endpoint resolution, the API key
//! header, timeout and HTTP error mapping, and JSON decoding into port types.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{GenerateContentRequestDto, GenerateContentResponseDto};
use crate::domain::ports::{
    GenerationRequest, GenerationResponse, ImageGenerator, ImageGeneratorError,
};

/// Public Generative Language API root.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Image generator calling `models/{model}:generateContent`.
pub struct GeminiHttpImageGenerator {
    client: Client,
    base_url: Url,
    api_key: Option<Zeroizing<String>>,
}

impl GeminiHttpImageGenerator {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// A missing `api_key` is accepted here and reported as
    /// [`ImageGeneratorError::Unauthorized`] on the first call.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
            api_key: api_key
                .filter(|key| !key.trim().is_empty())
                .map(Zeroizing::new),
        })
    }

    fn endpoint(&self, model: &str) -> Result<Url, ImageGeneratorError> {
        self.base_url
            .join(&format!("models/{model}:generateContent"))
            .map_err(|error| {
                ImageGeneratorError::invalid_request(format!("invalid model {model:?}: {error}"))
            })
    }
}

#[async_trait]
impl ImageGenerator for GeminiHttpImageGenerator {
    async fn generate_content(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, ImageGeneratorError> {
        let Some(api_key) = self.api_key.as_ref() else {
            return Err(ImageGeneratorError::unauthorized(
                "no API key configured; set NANO_API_KEY",
            ));
        };
        let endpoint = self.endpoint(&request.model)?;
        let body = GenerateContentRequestDto::from(&request);
        debug!(%endpoint, parts = request.parts.len(), "sending generateContent");

        let response = self
            .client
            .post(endpoint)
            .header(API_KEY_HEADER, api_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, bytes.as_ref()));
        }
        debug!(status = status.as_u16(), bytes = bytes.len(), "generateContent answered");
        parse_response(bytes.as_ref())
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn parse_response(body: &[u8]) -> Result<GenerationResponse, ImageGeneratorError> {
    let decoded: GenerateContentResponseDto = serde_json::from_slice(body).map_err(|error| {
        ImageGeneratorError::decode(format!("invalid generateContent JSON payload: {error}"))
    })?;
    Ok(decoded.into_domain())
}

fn map_transport_error(error: reqwest::Error) -> ImageGeneratorError {
    if error.is_timeout() {
        ImageGeneratorError::timeout(error.to_string())
    } else {
        ImageGeneratorError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ImageGeneratorError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ImageGeneratorError::unauthorized(message)
        }
        StatusCode::TOO_MANY_REQUESTS => ImageGeneratorError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ImageGeneratorError::timeout(message)
        }
        _ if status.is_client_error() => ImageGeneratorError::invalid_request(message),
        _ => ImageGeneratorError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 200;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

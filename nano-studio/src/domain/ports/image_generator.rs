//! Driven port for the remote image model.
//!
//! Requests and responses mirror the content-generation wire shape closely
//! enough that adapters only translate field names. The domain decides what
//! to send and how to read the answer.

use async_trait::async_trait;

use crate::domain::InlineImage;

use super::define_port_error;

/// One ordered piece of request content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPart {
    /// Free text, usually the prompt.
    Text(String),
    /// An input image sent inline.
    InlineImage(InlineImage),
}

/// A single content-generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Model identifier, e.g. `gemini-2.5-flash-image`.
    pub model: String,
    /// Content parts in send order.
    pub parts: Vec<RequestPart>,
    /// Requested output aspect ratio such as `1:1`.
    pub aspect_ratio: Option<String>,
}

/// A part of a candidate answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePart {
    /// Commentary text from the model.
    Text(String),
    /// Generated image data.
    InlineImage(InlineImage),
}

/// One candidate answer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Candidate {
    /// Parts in the order the model produced them.
    pub parts: Vec<ResponsePart>,
}

/// Decoded response body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationResponse {
    /// Candidate answers, best first.
    pub candidates: Vec<Candidate>,
}

impl GenerationResponse {
    /// First inline image part of the first candidate.
    ///
    /// Later candidates are ignored even when the first one carries text only.
    #[must_use]
    pub fn first_inline_image(&self) -> Option<&InlineImage> {
        self.candidates.first()?.parts.iter().find_map(|part| match part {
            ResponsePart::InlineImage(image) => Some(image),
            ResponsePart::Text(_) => None,
        })
    }
}

define_port_error! {
    /// Errors raised by image model adapters.
    pub enum ImageGeneratorError {
        /// The API key is missing or was refused.
        Unauthorized {
            /// Upstream or adapter text.
            message: String,
        } => "image service rejected credentials: {message}",
        /// The service asked the caller to slow down.
        RateLimited {
            /// Upstream or adapter text.
            message: String,
        } => "image service rate limited the request: {message}",
        /// The call did not complete in time.
        Timeout {
            /// Upstream or adapter text.
            message: String,
        } => "image service request timed out: {message}",
        /// The service refused the request as malformed.
        InvalidRequest {
            /// Upstream or adapter text.
            message: String,
        } => "image service rejected the request: {message}",
        /// Network failure or unexpected server error.
        Transport {
            /// Upstream or adapter text.
            message: String,
        } => "image service transport failed: {message}",
        /// The response body could not be decoded.
        Decode {
            /// Upstream or adapter text.
            message: String,
        } => "image service response could not be decoded: {message}",
    }
}

/// Port for issuing content-generation calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Send `request` and return the decoded response.
    async fn generate_content(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, ImageGeneratorError>;
}

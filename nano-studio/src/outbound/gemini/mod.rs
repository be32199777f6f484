//! Gemini content-generation adapter.
//!
//! A thin reqwest implementation of the `ImageGenerator` port.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_GEMINI_BASE_URL, GeminiHttpImageGenerator};

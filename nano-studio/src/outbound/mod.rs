//! Outbound adapters implementing domain ports.
//!
//! - **storage**: slot stores on the filesystem or in memory
//! - **gemini**: reqwest client for the content-generation API
//! - **image_file**: source image loading and download writing
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod gemini;
pub mod image_file;
pub mod storage;

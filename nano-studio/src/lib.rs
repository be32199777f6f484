//! Nano Studio library: accounts, quotas, and AI image generation over local storage.
//!
//! The crate is laid out hexagonally. `domain` owns records, sessions,
//! authentication, and quota policy, and talks to the outside world only
//! through the traits in `domain::ports`. `outbound` holds the adapters:
//! file-backed and in-memory key-value storage, and the HTTP client for the
//! hosted image model.

pub mod config;
pub mod domain;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::StudioSettings;

//! Studio configuration loaded via OrthoConfig.
//!
//! Values come from `NANO_*` environment variables and configuration files.
//! Every key is optional. The timeout carries its default through the
//! merge; accessors supply the rest.

use std::path::PathBuf;
use std::time::Duration;

use camino::{FromPathBufError, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{
    DEFAULT_IMAGE_MODEL, GenerationModels, Locale, UnsupportedLocale,
};
use crate::outbound::gemini::DEFAULT_GEMINI_BASE_URL;

const DEFAULT_DATA_DIR: &str = ".nano-studio";
const DEFAULT_ADMIN_PASSWORD: &str = "banana-pro";
const DEFAULT_WHATSAPP_NUMBER: &str = "+15550100000";

/// Configuration values for the studio binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "NANO")]
pub struct StudioSettings {
    /// Directory holding the `<slot>.json` files.
    pub data_dir: Option<PathBuf>,
    /// API key for the image service.
    pub api_key: Option<String>,
    /// Root URL of the Generative Language API.
    pub api_base_url: Option<String>,
    /// Model used for text-to-image requests.
    pub generation_model: Option<String>,
    /// Model used for image edits.
    pub edit_model: Option<String>,
    /// HTTP request timeout, in seconds.
    #[ortho_config(default = 120)]
    pub request_timeout_secs: u64,
    /// Password admitting the administrator login.
    pub admin_password: Option<String>,
    /// WhatsApp contact for upgrade requests.
    pub whatsapp_number: Option<String>,
    /// Starting language: `en` or `ar`.
    pub locale: Option<String>,
}

impl StudioSettings {
    /// Data directory, defaulting to `.nano-studio` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured path is not valid UTF-8.
    pub fn data_dir(&self) -> Result<Utf8PathBuf, FromPathBufError> {
        self.data_dir.clone().map_or_else(
            || Ok(Utf8PathBuf::from(DEFAULT_DATA_DIR)),
            Utf8PathBuf::try_from,
        )
    }

    /// API key when one is configured and non-blank.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Parsed API root.
    ///
    /// # Errors
    ///
    /// Returns the parse error for a malformed override.
    pub fn api_base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(
            self.api_base_url
                .as_deref()
                .unwrap_or(DEFAULT_GEMINI_BASE_URL),
        )
    }

    /// Generation and edit models.
    #[must_use]
    pub fn models(&self) -> GenerationModels {
        GenerationModels {
            generation: self
                .generation_model
                .clone()
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_owned()),
            edit: self
                .edit_model
                .clone()
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_owned()),
        }
    }

    /// Request timeout, never shorter than one second.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Administrator password.
    #[must_use]
    pub fn admin_password(&self) -> &str {
        self.admin_password
            .as_deref()
            .unwrap_or(DEFAULT_ADMIN_PASSWORD)
    }

    /// Upgrade contact number.
    #[must_use]
    pub fn whatsapp_number(&self) -> &str {
        self.whatsapp_number
            .as_deref()
            .unwrap_or(DEFAULT_WHATSAPP_NUMBER)
    }

    /// Starting language, English when unset.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedLocale`] for anything other than English or Arabic.
    pub fn locale(&self) -> Result<Locale, UnsupportedLocale> {
        self.locale
            .as_deref()
            .map_or(Ok(Locale::default()), str::parse)
    }
}

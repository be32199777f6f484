//! Supported interface languages.
//!
//! The studio speaks English and Arabic. Arabic copy is rendered
//! right-to-left, so callers that lay out text ask the locale for its
//! direction instead of special-casing language codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Interface language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    /// English (`en`).
    #[default]
    #[serde(rename = "en")]
    English,
    /// Arabic (`ar`).
    #[serde(rename = "ar")]
    Arabic,
}

/// Reading direction of a locale's script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    /// Left-to-right scripts.
    LeftToRight,
    /// Right-to-left scripts.
    RightToLeft,
}

impl Locale {
    /// Two-letter language code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Arabic => "ar",
        }
    }

    /// Reading direction used when rendering copy in this locale.
    #[must_use]
    pub const fn direction(self) -> TextDirection {
        match self {
            Self::English => TextDirection::LeftToRight,
            Self::Arabic => TextDirection::RightToLeft,
        }
    }

    /// The other supported locale.
    ///
    /// # Examples
    /// ```
    /// use nano_studio::domain::Locale;
    ///
    /// assert_eq!(Locale::English.toggled(), Locale::Arabic);
    /// assert_eq!(Locale::Arabic.toggled(), Locale::English);
    /// ```
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::English => Self::Arabic,
            Self::Arabic => Self::English,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Returned when a locale code is not `en` or `ar`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedLocale(pub String);

impl fmt::Display for UnsupportedLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported locale '{}': expected 'en' or 'ar'", self.0)
    }
}

impl std::error::Error for UnsupportedLocale {}

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "ar" | "arabic" => Ok(Self::Arabic),
            _ => Err(UnsupportedLocale(raw.to_owned())),
        }
    }
}

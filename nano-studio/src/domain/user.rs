//! User data model.
//!
//! Users are persisted as one JSON array. Field names on the wire are
//! camelCase (`isPremium`, `subscriptionExpiry`, `imagesGenerated`) and the
//! expiry is an RFC 3339 timestamp.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identity::ADMIN_USER_ID;

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Identifier was empty.
    EmptyId,
    /// Identifier carried leading or trailing whitespace.
    PaddedId,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::PaddedId => write!(f, "user id must not contain surrounding whitespace"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Opaque user identifier.
///
/// Newly registered users get a random UUID; ids read back from storage are
/// accepted as-is so long as they are non-empty and unpadded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Id of the administrator identity, which never passes through storage.
    pub(crate) fn administrator() -> Self {
        Self(ADMIN_USER_ID.to_owned())
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::PaddedId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Studio account.
///
/// ## Invariants
/// - `username` is compared case-sensitively; uniqueness is checked only at
///   registration.
/// - `password` is stored in plaintext.
/// - `images_generated` only ever grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    is_premium: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subscription_expiry: Option<DateTime<Utc>>,
    #[serde(default)]
    images_generated: u32,
}

impl User {
    /// Build a fresh free-tier account with no generations and no expiry.
    #[must_use]
    pub fn new(id: UserId, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            password: password.into(),
            is_premium: false,
            subscription_expiry: None,
            images_generated: 0,
        }
    }

    /// Mark the account premium, optionally with an expiry.
    #[must_use]
    pub fn with_premium(mut self, expiry: Option<DateTime<Utc>>) -> Self {
        self.is_premium = true;
        self.subscription_expiry = expiry;
        self
    }

    /// Override the generation counter.
    #[must_use]
    pub fn with_images_generated(mut self, count: u32) -> Self {
        self.images_generated = count;
        self
    }

    /// Stable user identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Login name.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Exact plaintext comparison against the stored password.
    #[must_use]
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    /// Whether the account has premium status.
    #[must_use]
    pub const fn is_premium(&self) -> bool {
        self.is_premium
    }

    /// End of the paid subscription, if one was ever granted.
    #[must_use]
    pub const fn subscription_expiry(&self) -> Option<DateTime<Utc>> {
        self.subscription_expiry
    }

    /// Number of images generated so far.
    #[must_use]
    pub const fn images_generated(&self) -> u32 {
        self.images_generated
    }

    /// Count one more successful generation.
    pub fn record_generation(&mut self) {
        self.images_generated = self.images_generated.saturating_add(1);
    }
}

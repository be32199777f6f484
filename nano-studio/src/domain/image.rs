//! Generated image records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{Error, ErrorMessage};
use super::inline_image::InlineImage;
use super::user::UserId;

/// Opaque image identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    /// Wrap an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random [`ImageId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

impl AsRef<str> for ImageId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// One successful generation.
///
/// ## Invariants
/// - `user_id` is not checked against the user collection; orphans are
///   tolerated.
/// - `url` is either a remote link or an inline `data:` URI.
/// - Records are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    id: ImageId,
    user_id: UserId,
    url: String,
    prompt: String,
    timestamp: DateTime<Utc>,
}

impl GeneratedImage {
    /// Record a new image with a random id.
    #[must_use]
    pub fn new(
        user_id: UserId,
        url: impl Into<String>,
        prompt: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ImageId::random(),
            user_id,
            url: url.into(),
            prompt: prompt.into(),
            timestamp,
        }
    }

    /// Image identifier.
    #[must_use]
    pub const fn id(&self) -> &ImageId {
        &self.id
    }

    /// Owner of the image.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Remote link or inline `data:` URI.
    #[must_use]
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Prompt exactly as the user typed it.
    #[must_use]
    pub fn prompt(&self) -> &str {
        self.prompt.as_str()
    }

    /// Creation time.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// File name offered when the image is downloaded.
    #[must_use]
    pub fn download_file_name(&self) -> String {
        format!("nano-banana-{}.png", self.id)
    }

    /// Decode the inline payload; remote links are rejected.
    pub fn inline_image(&self) -> Result<InlineImage, Error> {
        if !self.url.starts_with("data:") {
            return Err(Error::validation(ErrorMessage::ImageNotInline));
        }
        InlineImage::from_data_uri(&self.url)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for image records.
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 0)
            .single()
            .expect("valid date")
    }

    #[rstest]
    fn download_name_embeds_id(created_at: DateTime<Utc>) {
        let image = GeneratedImage::new(
            UserId::new("u1").expect("id"),
            "data:image/png;base64,aGk=",
            "a banana",
            created_at,
        );
        assert_eq!(
            image.download_file_name(),
            format!("nano-banana-{}.png", image.id())
        );
    }

    #[rstest]
    fn remote_links_are_not_inline(created_at: DateTime<Utc>) {
        let image = GeneratedImage::new(
            UserId::new("u1").expect("id"),
            "https://images.example.com/banana.png",
            "a banana",
            created_at,
        );
        let err = image.inline_image().expect_err("remote link is not inline");
        assert_eq!(err.message(), &ErrorMessage::ImageNotInline);
    }

    #[rstest]
    fn serialises_owner_as_user_id(created_at: DateTime<Utc>) {
        let image = GeneratedImage::new(
            UserId::new("u1").expect("id"),
            "data:image/png;base64,aGk=",
            "a banana",
            created_at,
        );
        let value = serde_json::to_value(&image).expect("serialise image");
        assert_eq!(value["userId"], "u1");
        assert_eq!(value["timestamp"], "2026-10-14T09:30:00Z");
    }
}

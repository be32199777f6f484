//! Inline image payloads and their `data:` URI form.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::error::{Error, ErrorMessage};

const DATA_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Image bytes carried as base64 alongside their MIME type.
///
/// ## Invariants
/// - `mime_type` is non-empty.
/// - `data` is the standard-alphabet base64 encoding of the image bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    mime_type: String,
    data: String,
}

impl InlineImage {
    /// Wrap an already-encoded payload, as returned by the image service.
    pub fn from_base64(
        mime_type: impl Into<String>,
        data: impl Into<String>,
    ) -> Result<Self, Error> {
        let mime_type = mime_type.into();
        if mime_type.trim().is_empty() {
            return Err(Error::validation(ErrorMessage::MalformedDataUri));
        }
        Ok(Self {
            mime_type,
            data: data.into(),
        })
    }

    /// Encode raw file bytes.
    #[must_use]
    pub fn from_bytes(mime_type: &'static str, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.to_owned(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Parse `data:<mime>;base64,<payload>`.
    ///
    /// # Examples
    /// ```
    /// use nano_studio::domain::InlineImage;
    ///
    /// let image = InlineImage::from_data_uri("data:image/png;base64,iVBORw0KGgo=").unwrap();
    /// assert_eq!(image.mime_type(), "image/png");
    /// assert_eq!(image.to_data_uri(), "data:image/png;base64,iVBORw0KGgo=");
    /// ```
    pub fn from_data_uri(uri: &str) -> Result<Self, Error> {
        let malformed = || Error::validation(ErrorMessage::MalformedDataUri);
        let rest = uri.strip_prefix(DATA_SCHEME).ok_or_else(malformed)?;
        let (header, payload) = rest.split_once(',').ok_or_else(malformed)?;
        let mime_type = header.strip_suffix(BASE64_MARKER).ok_or_else(malformed)?;
        Self::from_base64(mime_type, payload)
    }

    /// MIME type such as `image/png`.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        self.mime_type.as_str()
    }

    /// Base64 payload without the URI header.
    #[must_use]
    pub fn data(&self) -> &str {
        self.data.as_str()
    }

    /// Render as a `data:` URI suitable for storing in an image record.
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        format!("{DATA_SCHEME}{}{BASE64_MARKER},{}", self.mime_type, self.data)
    }

    /// Decode the payload back into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, Error> {
        STANDARD
            .decode(self.data.as_bytes())
            .map_err(|_| Error::validation(ErrorMessage::MalformedDataUri))
    }
}

/// MIME type for an image file extension, case-insensitively.
#[must_use]
pub fn mime_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for data URI handling.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn encodes_bytes_into_data_uri() {
        let image = InlineImage::from_bytes("image/png", b"hello");
        assert_eq!(image.to_data_uri(), "data:image/png;base64,aGVsbG8=");
        assert_eq!(image.decode().expect("decode"), b"hello");
    }

    #[rstest]
    #[case("image/png;base64,aGVsbG8=")]
    #[case("data:image/png,aGVsbG8=")]
    #[case("data:image/png;base64")]
    #[case("data:;base64,aGVsbG8=")]
    fn rejects_malformed_uris(#[case] uri: &str) {
        let err = InlineImage::from_data_uri(uri).expect_err("uri must be rejected");
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(err.message(), &ErrorMessage::MalformedDataUri);
    }

    #[rstest]
    fn decode_rejects_invalid_base64() {
        let image = InlineImage::from_base64("image/png", "not base64!").expect("mime ok");
        assert!(image.decode().is_err());
    }

    #[rstest]
    #[case("PNG", Some("image/png"))]
    #[case("jpeg", Some("image/jpeg"))]
    #[case("jpg", Some("image/jpeg"))]
    #[case("webp", Some("image/webp"))]
    #[case("txt", None)]
    fn maps_extensions_to_mime_types(#[case] extension: &str, #[case] expected: Option<&str>) {
        assert_eq!(mime_type_for_extension(extension), expected);
    }
}

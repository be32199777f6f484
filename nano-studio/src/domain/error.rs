//! Domain-level error types.
//!
//! Every failure surfaced to a user carries a stable [`ErrorCode`] and a
//! typed [`ErrorMessage`]. The message is rendered on demand in the caller's
//! [`Locale`], so services never format user-facing copy themselves.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::localization::Locale;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Input has the wrong shape (too short, empty, unsupported type).
    ValidationError,
    /// A uniqueness rule was violated.
    Conflict,
    /// The referenced identity or record does not exist.
    NotFound,
    /// The password did not match a stored user.
    InvalidCredential,
    /// The password did not match the administrator credential.
    InvalidAdminCredential,
    /// The operation needs a logged-in session.
    Unauthenticated,
    /// The session identity may not perform this operation.
    Forbidden,
    /// The free-tier generation allowance is used up.
    QuotaExceeded,
    /// The image service answered without a usable image.
    GenerationError,
    /// The image service could not be reached or rejected the call.
    Transport,
    /// Durable storage could not be read or written.
    Storage,
}

/// Catalogue of user-facing messages.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorMessage {
    /// Registration username below the minimum length.
    UsernameTooShort {
        /// Minimum number of characters.
        min: usize,
    },
    /// Registration password below the minimum length.
    PasswordTooShort {
        /// Minimum number of characters.
        min: usize,
    },
    /// Username already registered or reserved.
    UsernameTaken,
    /// Login username has no stored account.
    UsernameNotFound,
    /// Login password does not match.
    IncorrectPassword,
    /// Administrator password does not match.
    InvalidAdminPassword,
    /// No session is open.
    NotLoggedIn,
    /// Only the administrator may do this.
    AdminOnly,
    /// A user id did not resolve to a stored user.
    UserNotFound,
    /// An image id did not resolve to one of the session user's images.
    ImageNotFound,
    /// The generation prompt was blank.
    EmptyPrompt,
    /// The free generation allowance is exhausted.
    FreeLimitReached {
        /// Free-tier allowance.
        limit: u32,
    },
    /// Text-to-image answered without image data.
    NoImageData,
    /// Image edit answered without image data.
    EditFailed,
    /// The supplied file is not a supported image format.
    UnsupportedImageType {
        /// Offending file extension, lower-cased.
        extension: String,
    },
    /// A `data:` URI could not be decoded.
    MalformedDataUri,
    /// The stored image is a remote link rather than inline data.
    ImageNotInline,
    /// The configured upgrade contact is not a phone number.
    InvalidContactNumber,
    /// Upstream text passed through untouched.
    Verbatim(String),
}

impl ErrorMessage {
    /// Render the message for `locale`.
    ///
    /// # Examples
    /// ```
    /// use nano_studio::domain::{ErrorMessage, Locale};
    ///
    /// let message = ErrorMessage::IncorrectPassword;
    /// assert_eq!(message.render(Locale::English), "Incorrect password");
    /// assert_eq!(message.render(Locale::Arabic), "كلمة المرور غير صحيحة");
    /// ```
    #[must_use]
    pub fn render(&self, locale: Locale) -> String {
        match locale {
            Locale::English => self.render_english(),
            Locale::Arabic => self.render_arabic(),
        }
    }

    fn render_english(&self) -> String {
        match self {
            Self::UsernameTooShort { min } => {
                format!("Username must be at least {min} characters")
            }
            Self::PasswordTooShort { min } => {
                format!("Password must be at least {min} characters")
            }
            Self::UsernameTaken => "Username is already taken".to_owned(),
            Self::UsernameNotFound => "Username not found. Please register first.".to_owned(),
            Self::IncorrectPassword => "Incorrect password".to_owned(),
            Self::InvalidAdminPassword => "Invalid admin password".to_owned(),
            Self::NotLoggedIn => "Please log in first.".to_owned(),
            Self::AdminOnly => {
                "Sorry, this area is strictly reserved for system administrators only.".to_owned()
            }
            Self::UserNotFound => "User not found.".to_owned(),
            Self::ImageNotFound => "Image not found in your history.".to_owned(),
            Self::EmptyPrompt => "Prompt must not be empty.".to_owned(),
            Self::FreeLimitReached { limit } => format!(
                "You have used all {limit} free images. Upgrade to Premium to keep generating."
            ),
            Self::NoImageData => "No image data received from model".to_owned(),
            Self::EditFailed => "Failed to edit image".to_owned(),
            Self::UnsupportedImageType { extension } => {
                format!("Unsupported image type: {extension}")
            }
            Self::MalformedDataUri => "Image data is not a valid base64 data URI.".to_owned(),
            Self::ImageNotInline => "Image is stored as a remote link, not inline data.".to_owned(),
            Self::InvalidContactNumber => {
                "The upgrade contact number is not configured correctly.".to_owned()
            }
            Self::Verbatim(text) => text.clone(),
        }
    }

    fn render_arabic(&self) -> String {
        match self {
            Self::UsernameTooShort { min } => {
                format!("يجب أن يكون اسم المستخدم {min} أحرف على الأقل")
            }
            Self::PasswordTooShort { min } => {
                format!("يجب أن تكون كلمة المرور {min} أحرف على الأقل")
            }
            Self::UsernameTaken => "اسم المستخدم مأخوذ بالفعل".to_owned(),
            Self::UsernameNotFound => "اسم المستخدم غير موجود".to_owned(),
            Self::IncorrectPassword => "كلمة المرور غير صحيحة".to_owned(),
            Self::InvalidAdminPassword => "كلمة مرور المسؤول غير صحيحة".to_owned(),
            Self::NotLoggedIn => "يرجى تسجيل الدخول أولاً.".to_owned(),
            Self::AdminOnly => "عذراً، هذه المنطقة مخصصة حصرياً لمدراء النظام فقط.".to_owned(),
            Self::UserNotFound => "المستخدم غير موجود.".to_owned(),
            Self::ImageNotFound => "الصورة غير موجودة في سجلك.".to_owned(),
            Self::EmptyPrompt => "يجب ألا يكون الوصف فارغاً.".to_owned(),
            Self::FreeLimitReached { limit } => format!(
                "لقد استخدمت جميع الصور المجانية ({limit}). قم بالترقية إلى الحساب المميز للمتابعة."
            ),
            Self::NoImageData => "لم يتم استلام بيانات صورة من النموذج".to_owned(),
            Self::EditFailed => "فشل تعديل الصورة".to_owned(),
            Self::UnsupportedImageType { extension } => {
                format!("نوع الصورة غير مدعوم: {extension}")
            }
            Self::MalformedDataUri => "بيانات الصورة ليست بصيغة base64 صالحة.".to_owned(),
            Self::ImageNotInline => "الصورة محفوظة كرابط خارجي وليست بيانات مضمنة.".to_owned(),
            Self::InvalidContactNumber => {
                "رقم التواصل الخاص بالترقية غير مضبوط بشكل صحيح.".to_owned()
            }
            Self::Verbatim(text) => text.clone(),
        }
    }
}

/// Domain error: a code plus a localizable message.
///
/// # Examples
/// ```
/// use nano_studio::domain::{Error, ErrorCode, ErrorMessage, Locale};
///
/// let err = Error::not_found(ErrorMessage::UsernameNotFound);
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.localized(Locale::Arabic), "اسم المستخدم غير موجود");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainError {
    code: ErrorCode,
    message: ErrorMessage,
}

impl DomainError {
    /// Create an error from its parts.
    #[must_use]
    pub const fn new(code: ErrorCode, message: ErrorMessage) -> Self {
        Self { code, message }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Typed message for adapters that render their own copy.
    #[must_use]
    pub const fn message(&self) -> &ErrorMessage {
        &self.message
    }

    /// Message rendered for `locale`.
    #[must_use]
    pub fn localized(&self, locale: Locale) -> String {
        self.message.render(locale)
    }

    /// Convenience constructor for [`ErrorCode::ValidationError`].
    #[must_use]
    pub const fn validation(message: ErrorMessage) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    #[must_use]
    pub const fn conflict(message: ErrorMessage) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    #[must_use]
    pub const fn not_found(message: ErrorMessage) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Wrong password for a stored user.
    #[must_use]
    pub const fn invalid_credential() -> Self {
        Self::new(ErrorCode::InvalidCredential, ErrorMessage::IncorrectPassword)
    }

    /// Wrong password for the administrator.
    #[must_use]
    pub const fn invalid_admin_credential() -> Self {
        Self::new(
            ErrorCode::InvalidAdminCredential,
            ErrorMessage::InvalidAdminPassword,
        )
    }

    /// No session is open.
    #[must_use]
    pub const fn unauthenticated() -> Self {
        Self::new(ErrorCode::Unauthenticated, ErrorMessage::NotLoggedIn)
    }

    /// The session identity is not the administrator.
    #[must_use]
    pub const fn forbidden() -> Self {
        Self::new(ErrorCode::Forbidden, ErrorMessage::AdminOnly)
    }

    /// Free allowance exhausted.
    #[must_use]
    pub const fn quota_exceeded(limit: u32) -> Self {
        Self::new(
            ErrorCode::QuotaExceeded,
            ErrorMessage::FreeLimitReached { limit },
        )
    }

    /// Convenience constructor for [`ErrorCode::GenerationError`].
    #[must_use]
    pub const fn generation(message: ErrorMessage) -> Self {
        Self::new(ErrorCode::GenerationError, message)
    }

    /// Transport failure; `text` is shown to users unchanged.
    #[must_use]
    pub fn transport(text: impl Into<String>) -> Self {
        Self::new(ErrorCode::Transport, ErrorMessage::Verbatim(text.into()))
    }

    /// Storage failure; `text` is shown to users unchanged.
    #[must_use]
    pub fn storage(text: impl Into<String>) -> Self {
        Self::new(ErrorCode::Storage, ErrorMessage::Verbatim(text.into()))
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message.render(Locale::English))
    }
}

impl std::error::Error for DomainError {}

/// Short name used throughout the domain.
pub type Error = DomainError;

//! Domain primitives, services and ports.
//!
//! Purpose: hold the studio's business rules independent of storage and
//! transport. Adapters live in `crate::outbound` and reach the domain only
//! through the traits in [`ports`].
//!
//! Public surface:
//! - `Studio`: facade driving registration, login, generation and the
//!   administrator tools.
//! - `DomainError` (alias `Error`) / `ErrorCode` / `ErrorMessage`: localized
//!   domain failures.
//! - `User`, `GeneratedImage`, `Identity`: persisted and session records.

pub mod auth;
pub mod error;
pub mod identity;
pub mod image;
pub mod image_generation;
pub mod inline_image;
pub mod localization;
pub mod ports;
pub mod quota;
pub mod record_store;
pub mod session;
pub mod studio;
pub mod upgrade;
pub mod user;

pub use self::auth::{AuthService, Credentials, PASSWORD_MIN_CHARS, USERNAME_MIN_CHARS};
pub use self::error::{DomainError, Error, ErrorCode, ErrorMessage};
pub use self::identity::{ADMIN_USER_ID, ADMIN_USERNAME, Identity};
pub use self::image::{GeneratedImage, ImageId};
pub use self::image_generation::{
    DEFAULT_IMAGE_MODEL, GenerationModels, ImageGenerationService, TEXT_TO_IMAGE_ASPECT_RATIO,
};
pub use self::inline_image::{InlineImage, mime_type_for_extension};
pub use self::localization::{Locale, TextDirection, UnsupportedLocale};
pub use self::quota::{
    FREE_IMAGE_LIMIT, FreeAllowance, SUBSCRIPTION_EXTENSION_DAYS, can_generate,
    ensure_can_generate, extend_subscription, remaining_days, remaining_free_images,
};
pub use self::record_store::{IMAGES_SLOT, RecordStore, USERS_SLOT};
pub use self::session::{SESSION_SLOT, SessionManager};
pub use self::studio::{Dashboard, GenerationPrompt, Studio, StudioOptions, StudioPorts};
pub use self::upgrade::{UPGRADE_MESSAGE, upgrade_link};
pub use self::user::{User, UserId, UserValidationError};

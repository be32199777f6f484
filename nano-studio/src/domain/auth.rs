//! Login and registration.
//!
//! Both flows read the user collection and never write it: `register`
//! returns the new account and the caller appends it to the record store.

use std::fmt;

use tracing::{debug, info};
use zeroize::Zeroizing;

use super::error::{Error, ErrorMessage};
use super::identity::{ADMIN_USERNAME, Identity};
use super::user::{User, UserId};

/// Minimum username length, in characters, accepted at registration.
pub const USERNAME_MIN_CHARS: usize = 3;
/// Minimum password length, in characters, accepted at registration.
pub const PASSWORD_MIN_CHARS: usize = 4;

/// Username and password as typed.
///
/// Neither value is trimmed: usernames match exactly and passwords keep any
/// whitespace the caller supplied. The password buffer is zeroed on drop.
///
/// # Examples
/// ```
/// use nano_studio::domain::Credentials;
///
/// let creds = Credentials::new("ana", "1234");
/// assert_eq!(creds.username(), "ana");
/// assert_eq!(creds.password(), "1234");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Capture raw username/password inputs.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// Username string used for lookups.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Authentication service holding the administrator password.
#[derive(Clone)]
pub struct AuthService {
    admin_password: Zeroizing<String>,
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthService")
            .field("admin_password", &"<redacted>")
            .finish()
    }
}

impl AuthService {
    /// Create a service that admits [`ADMIN_USERNAME`] with `admin_password`.
    #[must_use]
    pub fn new(admin_password: impl Into<String>) -> Self {
        Self {
            admin_password: Zeroizing::new(admin_password.into()),
        }
    }

    /// Resolve credentials into an identity.
    ///
    /// The administrator username is checked first, so a wrong password on
    /// it reports [`DomainError::invalid_admin_credential`] rather than a
    /// missing user.
    ///
    /// [`DomainError::invalid_admin_credential`]: super::error::DomainError::invalid_admin_credential
    pub fn login(&self, users: &[User], credentials: &Credentials) -> Result<Identity, Error> {
        if credentials.username() == ADMIN_USERNAME {
            if credentials.password() == self.admin_password.as_str() {
                info!("administrator logged in");
                return Ok(Identity::administrator());
            }
            info!("administrator login rejected");
            return Err(Error::invalid_admin_credential());
        }

        let Some(user) = users
            .iter()
            .find(|user| user.username() == credentials.username())
        else {
            debug!(username = credentials.username(), "login for unknown user");
            return Err(Error::not_found(ErrorMessage::UsernameNotFound));
        };

        if !user.password_matches(credentials.password()) {
            debug!(user_id = %user.id(), "login password mismatch");
            return Err(Error::invalid_credential());
        }

        info!(user_id = %user.id(), "user logged in");
        Ok(Identity::Regular(user.clone()))
    }

    /// Validate a sign-up and build the new account.
    ///
    /// Length rules are checked before uniqueness, username before password.
    pub fn register(&self, users: &[User], credentials: &Credentials) -> Result<User, Error> {
        if credentials.username().chars().count() < USERNAME_MIN_CHARS {
            return Err(Error::validation(ErrorMessage::UsernameTooShort {
                min: USERNAME_MIN_CHARS,
            }));
        }
        if credentials.password().chars().count() < PASSWORD_MIN_CHARS {
            return Err(Error::validation(ErrorMessage::PasswordTooShort {
                min: PASSWORD_MIN_CHARS,
            }));
        }

        let taken = credentials.username() == ADMIN_USERNAME
            || users
                .iter()
                .any(|user| user.username() == credentials.username());
        if taken {
            debug!(username = credentials.username(), "registration conflict");
            return Err(Error::conflict(ErrorMessage::UsernameTaken));
        }

        let user = User::new(
            UserId::random(),
            credentials.username(),
            credentials.password(),
        );
        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }
}

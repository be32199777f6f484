//! Authenticated identities.
//!
//! The administrator is not a stored record. Login resolves it once into
//! [`Identity::Administrator`], and every privilege check matches on the
//! variant rather than comparing usernames.

use serde::{Deserialize, Serialize};

use super::user::{User, UserId};

/// Reserved administrator login name.
pub const ADMIN_USERNAME: &str = "R2";

/// Fixed identifier given to the administrator identity.
pub const ADMIN_USER_ID: &str = "admin-id";

/// Who the session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "user", rename_all = "snake_case")]
pub enum Identity {
    /// A registered account from the user collection.
    Regular(User),
    /// The reserved administrator, constructed at login.
    Administrator(User),
}

impl Identity {
    /// Build the administrator identity: permanent premium, empty history.
    #[must_use]
    pub fn administrator() -> Self {
        Self::Administrator(
            User::new(UserId::administrator(), ADMIN_USERNAME, "").with_premium(None),
        )
    }

    /// The user record carried by either variant.
    #[must_use]
    pub const fn user(&self) -> &User {
        match self {
            Self::Regular(user) | Self::Administrator(user) => user,
        }
    }

    /// Whether this identity may manage other users.
    #[must_use]
    pub const fn is_administrator(&self) -> bool {
        matches!(self, Self::Administrator(_))
    }

    /// Replace the carried user while keeping the variant.
    #[must_use]
    pub fn with_user(self, user: User) -> Self {
        match self {
            Self::Regular(_) => Self::Regular(user),
            Self::Administrator(_) => Self::Administrator(user),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn administrator_is_premium_with_fixed_id() {
        let admin = Identity::administrator();
        assert!(admin.is_administrator());
        assert!(admin.user().is_premium());
        assert_eq!(admin.user().id().as_ref(), ADMIN_USER_ID);
        assert_eq!(admin.user().username(), ADMIN_USERNAME);
        assert_eq!(admin.user().images_generated(), 0);
    }

    #[rstest]
    fn with_user_keeps_variant() {
        let admin = Identity::administrator();
        let bumped = admin.user().clone().with_images_generated(3);
        let updated = admin.with_user(bumped);
        assert!(updated.is_administrator());
        assert_eq!(updated.user().images_generated(), 3);
    }

    #[rstest]
    fn serialises_with_role_tag() {
        let user = User::new(UserId::new("u1").expect("id"), "ana", "1234");
        let value = serde_json::to_value(Identity::Regular(user)).expect("serialise identity");
        assert_eq!(value["role"], json!("regular"));
        assert_eq!(value["user"]["username"], json!("ana"));
    }
}

//! The single logged-in identity, persisted across runs.

use std::sync::Arc;

use tracing::{debug, warn};

use super::error::Error;
use super::identity::Identity;
use super::ports::KeyValueStore;
use super::record_store::write_json;
use super::user::User;

/// Slot holding the current identity.
pub const SESSION_SLOT: &str = "nano_session";

/// Holds at most one identity.
///
/// The session keeps its own copy of the user. Store updates reach it only
/// through [`SessionManager::refresh`].
#[derive(Debug)]
pub struct SessionManager<S> {
    storage: Arc<S>,
    current: Option<Identity>,
}

impl<S: KeyValueStore> SessionManager<S> {
    /// Reload the persisted identity, if any.
    pub fn restore(storage: Arc<S>) -> Result<Self, Error> {
        let raw = storage.get(SESSION_SLOT).map_err(|err| {
            warn!(kind = err.kind(), error = %err, "session read failed");
            Error::storage(err.to_string())
        })?;
        let current = raw
            .map(|raw| {
                serde_json::from_str::<Identity>(&raw).map_err(|err| {
                    warn!(error = %err, "session slot is corrupt");
                    Error::storage(format!("storage slot {SESSION_SLOT} is corrupt: {err}"))
                })
            })
            .transpose()?;
        debug!(logged_in = current.is_some(), "session restored");
        Ok(Self { storage, current })
    }

    /// The logged-in identity.
    #[must_use]
    pub const fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    /// Replace the session identity and persist it.
    pub fn set(&mut self, identity: Identity) -> Result<(), Error> {
        write_json(self.storage.as_ref(), SESSION_SLOT, &identity)?;
        self.current = Some(identity);
        Ok(())
    }

    /// End the session and delete the slot.
    pub fn clear(&mut self) -> Result<(), Error> {
        self.storage.remove(SESSION_SLOT).map_err(|err| {
            warn!(kind = err.kind(), error = %err, "session remove failed");
            Error::storage(err.to_string())
        })?;
        self.current = None;
        Ok(())
    }

    /// Overwrite the session copy of `user` when it is the session identity.
    ///
    /// Returns whether the session changed.
    pub fn refresh(&mut self, user: &User) -> Result<bool, Error> {
        let Some(current) = self.current.as_ref() else {
            return Ok(false);
        };
        if current.user().id() != user.id() {
            return Ok(false);
        }
        let updated = current.clone().with_user(user.clone());
        self.set(updated)?;
        Ok(true)
    }
}

//! In-memory user and image collections backed by durable slots.
//!
//! Each mutation rewrites the whole affected collection. When the write
//! fails the in-memory change is undone, so a collection in memory always
//! matches its slot. Changes spanning both collections are sequenced by the
//! caller.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::Error;
use super::image::GeneratedImage;
use super::ports::KeyValueStore;
use super::user::{User, UserId};

/// Slot holding the user collection.
pub const USERS_SLOT: &str = "nano_users";
/// Slot holding the image collection.
pub const IMAGES_SLOT: &str = "nano_images";

/// Users and images, loaded once and persisted on every change.
#[derive(Debug)]
pub struct RecordStore<S> {
    storage: Arc<S>,
    users: Vec<User>,
    images: Vec<GeneratedImage>,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Read both collections; an absent slot is an empty collection.
    ///
    /// A slot that exists but does not parse is reported as a storage error
    /// instead of being silently discarded.
    pub fn load(storage: Arc<S>) -> Result<Self, Error> {
        let users = read_collection(storage.as_ref(), USERS_SLOT)?;
        let images = read_collection(storage.as_ref(), IMAGES_SLOT)?;
        debug!(
            users = users.len(),
            images = images.len(),
            "record store loaded"
        );
        Ok(Self {
            storage,
            users,
            images,
        })
    }

    /// All users in insertion order.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// All images in insertion order.
    #[must_use]
    pub fn images(&self) -> &[GeneratedImage] {
        &self.images
    }

    /// Look up a user by id.
    #[must_use]
    pub fn find_user_by_id(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id() == id)
    }

    /// Look up a user by exact username.
    #[must_use]
    pub fn find_user_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|user| user.username() == username)
    }

    /// Append a user and persist the collection.
    pub fn insert_user(&mut self, user: User) -> Result<(), Error> {
        self.users.push(user);
        if let Err(err) = write_json(self.storage.as_ref(), USERS_SLOT, &self.users) {
            self.users.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Replace the user with the same id and persist the collection.
    ///
    /// Returns `Ok(false)` without writing when no user has that id.
    pub fn replace_user(&mut self, user: User) -> Result<bool, Error> {
        let Some(index) = self.users.iter().position(|stored| stored.id() == user.id()) else {
            return Ok(false);
        };
        let Some(stored) = self.users.get_mut(index) else {
            return Ok(false);
        };
        let previous = std::mem::replace(stored, user);
        if let Err(err) = write_json(self.storage.as_ref(), USERS_SLOT, &self.users) {
            if let Some(restored) = self.users.get_mut(index) {
                *restored = previous;
            }
            return Err(err);
        }
        Ok(true)
    }

    /// Remove the user with `id` and persist the collection.
    ///
    /// Returns `Ok(None)` without writing when no user has that id.
    pub fn remove_user(&mut self, id: &UserId) -> Result<Option<User>, Error> {
        let Some(index) = self.users.iter().position(|stored| stored.id() == id) else {
            return Ok(None);
        };
        let removed = self.users.remove(index);
        if let Err(err) = write_json(self.storage.as_ref(), USERS_SLOT, &self.users) {
            self.users.insert(index, removed);
            return Err(err);
        }
        Ok(Some(removed))
    }

    /// Append an image and persist the collection.
    pub fn insert_image(&mut self, image: GeneratedImage) -> Result<(), Error> {
        self.images.push(image);
        if let Err(err) = write_json(self.storage.as_ref(), IMAGES_SLOT, &self.images) {
            self.images.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Images owned by `user_id`, in insertion order.
    pub fn images_for_user<'a>(
        &'a self,
        user_id: &'a UserId,
    ) -> impl Iterator<Item = &'a GeneratedImage> + 'a {
        self.images
            .iter()
            .filter(move |image| image.user_id() == user_id)
    }
}

fn read_collection<S, T>(storage: &S, slot: &str) -> Result<Vec<T>, Error>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let stored = storage.get(slot).map_err(|err| {
        warn!(slot, kind = err.kind(), error = %err, "storage read failed");
        Error::storage(err.to_string())
    })?;
    let Some(raw) = stored else {
        return Ok(Vec::new());
    };
    serde_json::from_str(&raw).map_err(|err| {
        warn!(slot, error = %err, "storage slot is corrupt");
        Error::storage(format!("storage slot {slot} is corrupt: {err}"))
    })
}

pub(crate) fn write_json<S, T>(storage: &S, slot: &str, items: &T) -> Result<(), Error>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(items).map_err(|err| {
        Error::storage(format!("failed to encode storage slot {slot}: {err}"))
    })?;
    storage.set(slot, &json).map_err(|err| {
        warn!(slot, kind = err.kind(), error = %err, "storage write failed");
        Error::storage(err.to_string())
    })
}

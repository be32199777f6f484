//! Filesystem slot store rooted at a data directory.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::debug;

use super::atomic_write::write_atomic;
use crate::domain::ports::{KeyValueStore, StorageError};

const SLOT_EXTENSION: &str = "json";

/// One `<slot>.json` file per slot, accessed through a `cap_std` directory.
///
/// Slot names are restricted to ASCII letters, digits, `_` and `-` so a slot
/// can never name a path outside the data directory.
#[derive(Debug)]
pub struct FileKeyValueStore {
    dir: Dir,
    root: Utf8PathBuf,
}

impl FileKeyValueStore {
    /// Open `root`, creating it (and its parents) when missing.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] when the directory cannot be created or
    /// opened.
    pub fn open(root: impl AsRef<Utf8Path>) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        let open_error = |err: io::Error| StorageError::open(root.as_str(), err.to_string());
        Dir::create_ambient_dir_all(root.as_std_path(), ambient_authority())
            .map_err(open_error)?;
        let dir = Dir::open_ambient_dir(root.as_std_path(), ambient_authority())
            .map_err(open_error)?;
        debug!(root = %root, "file storage opened");
        Ok(Self { dir, root })
    }

    /// Data directory backing the store.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

fn slot_file_name(slot: &str) -> Option<String> {
    let valid = !slot.is_empty()
        && slot
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid.then(|| format!("{slot}.{SLOT_EXTENSION}"))
}

fn invalid_slot(slot: &str) -> String {
    format!("invalid slot name {slot:?}")
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, slot: &str) -> Result<Option<String>, StorageError> {
        let file_name =
            slot_file_name(slot).ok_or_else(|| StorageError::read(slot, invalid_slot(slot)))?;
        match self.dir.read_to_string(&file_name) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::read(slot, err.to_string())),
        }
    }

    fn set(&self, slot: &str, value: &str) -> Result<(), StorageError> {
        let file_name =
            slot_file_name(slot).ok_or_else(|| StorageError::write(slot, invalid_slot(slot)))?;
        write_atomic(&self.dir, &file_name, value)
            .map_err(|err| StorageError::write(slot, err.to_string()))?;
        debug!(slot, bytes = value.len(), "slot written");
        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<(), StorageError> {
        let file_name =
            slot_file_name(slot).ok_or_else(|| StorageError::remove(slot, invalid_slot(slot)))?;
        match self.dir.remove_file(&file_name) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::remove(slot, err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn data_dir() -> TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    fn store_in(dir: &TempDir) -> FileKeyValueStore {
        let root = Utf8Path::from_path(dir.path()).expect("utf-8 temp path");
        FileKeyValueStore::open(root.join("nested").join("data")).expect("open store")
    }

    #[rstest]
    fn absent_slot_reads_as_none(data_dir: TempDir) {
        let store = store_in(&data_dir);
        assert_eq!(store.get("nano_users").expect("read"), None);
    }

    #[rstest]
    fn slots_are_stored_as_json_files(data_dir: TempDir) {
        let store = store_in(&data_dir);
        store.set("nano_users", "[]").expect("write");
        assert_eq!(store.get("nano_users").expect("read").as_deref(), Some("[]"));
        assert!(store.dir.is_file("nano_users.json"));
        assert!(store.root().ends_with("nested/data"));
    }

    #[rstest]
    fn remove_is_idempotent(data_dir: TempDir) {
        let store = store_in(&data_dir);
        store.set("nano_session", "{}").expect("write");
        store.remove("nano_session").expect("remove");
        store.remove("nano_session").expect("second remove");
        assert_eq!(store.get("nano_session").expect("read"), None);
    }

    #[rstest]
    #[case("../escape")]
    #[case("nested/slot")]
    #[case("")]
    #[case("dotted.name")]
    fn rejects_slot_names_that_are_not_plain(data_dir: TempDir, #[case] slot: &str) {
        let store = store_in(&data_dir);
        let err = store.set(slot, "[]").expect_err("slot must be rejected");
        assert_eq!(err.kind(), "write");
    }
}

//! Driven port for the durable slot store.
//!
//! The store maps a handful of fixed slot names to JSON documents. Adapters
//! keep each slot whole: a `set` replaces the previous document entirely and
//! a reader never observes a partial write.

use super::define_port_error;

define_port_error! {
    /// Errors raised by slot store adapters.
    pub enum StorageError {
        /// The backing location could not be opened or created.
        Open {
            /// Where the store lives, as displayed to the user.
            location: String,
            /// Underlying failure text.
            message: String,
        } => "failed to open storage at {location}: {message}",
        /// A slot could not be read.
        Read {
            /// Slot name.
            slot: String,
            /// Underlying failure text.
            message: String,
        } => "failed to read storage slot {slot}: {message}",
        /// A slot could not be written.
        Write {
            /// Slot name.
            slot: String,
            /// Underlying failure text.
            message: String,
        } => "failed to write storage slot {slot}: {message}",
        /// A slot could not be removed.
        Remove {
            /// Slot name.
            slot: String,
            /// Underlying failure text.
            message: String,
        } => "failed to remove storage slot {slot}: {message}",
    }
}

/// Port for reading and replacing named JSON slots.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Read a slot; `Ok(None)` when it has never been written.
    fn get(&self, slot: &str) -> Result<Option<String>, StorageError>;

    /// Replace a slot with `value`.
    fn set(&self, slot: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a slot. Removing an absent slot succeeds.
    fn remove(&self, slot: &str) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn messages_name_the_slot() {
        let err = StorageError::write("nano_users", "disk full");
        assert_eq!(
            err.to_string(),
            "failed to write storage slot nano_users: disk full"
        );
        assert_eq!(err.kind(), "write");
    }
}

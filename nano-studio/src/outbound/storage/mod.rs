//! Slot store adapters.
//!
//! `FileKeyValueStore` persists each slot as `<slot>.json` inside a data
//! directory; `InMemoryKeyValueStore` backs tests and dry runs.

mod atomic_write;
mod file_store;
mod memory_store;

pub use file_store::FileKeyValueStore;
pub use memory_store::InMemoryKeyValueStore;

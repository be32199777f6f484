//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod image_generator;
mod key_value_store;

#[cfg(test)]
pub use image_generator::MockImageGenerator;
pub use image_generator::{
    Candidate, GenerationRequest, GenerationResponse, ImageGenerator, ImageGeneratorError,
    RequestPart, ResponsePart,
};
#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
pub use key_value_store::{KeyValueStore, StorageError};

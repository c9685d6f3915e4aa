use cdmi_model::ModelError;
use thiserror::Error;

/// The common error type used by this crate.
///
/// A missing resource is never an error; every variant here is a genuine
/// backend fault.
#[derive(Error, Debug)]
pub enum StoreError {
    /// An error that occurs when working with the storage substrate
    #[error("Store backend error: {0}")]
    Backend(String),

    /// A resource could not be encoded for storage
    #[error("Failed to encode a resource: {0}")]
    EncodeFailed(String),

    /// A stored document could not be decoded into a resource
    #[error("Failed to decode a resource: {0}")]
    DecodeFailed(String),
}

impl From<ModelError> for StoreError {
    fn from(error: ModelError) -> Self {
        match error {
            ModelError::EncodeFailed(reason) => StoreError::EncodeFailed(reason),
            ModelError::DecodeFailed(reason) => StoreError::DecodeFailed(reason),
        }
    }
}

use thiserror::Error;

/// The common error type used by this crate
#[derive(Error, Debug)]
pub enum ModelError {
    /// A resource could not be encoded to its JSON representation
    #[error("Failed to encode a representation: {0}")]
    EncodeFailed(String),

    /// A JSON representation could not be decoded into a resource
    #[error("Failed to decode a representation: {0}")]
    DecodeFailed(String),
}

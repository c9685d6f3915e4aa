use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cdmi_model::ModelError;
use cdmi_store::StoreError;
use thiserror::Error;

/// The common error type used by this crate.
///
/// Every client-error variant surfaces as HTTP 400 with its message as the
/// response body, so the flavors stay distinguishable on the wire; store
/// faults surface as 500.
#[derive(Error, Debug)]
pub enum CdmiError {
    /// No store matched the identifier after exhausting the fallback chain
    #[error("Not found")]
    NotFound,

    /// The declared write media type does not select a resource kind
    #[error("Bad content type")]
    BadContentType,

    /// A field specifier referenced a representation field that is absent
    #[error("Bad field")]
    BadField,

    /// A `:`-carrying field specifier matched none of the recognized forms
    #[error("Bad prefix")]
    BadPrefix,

    /// A byte or ordinal range was malformed or out of bounds
    #[error("Bad range")]
    BadRange,

    /// The request body could not be read as a JSON representation
    #[error("Bad request")]
    BadRequest,

    /// A create-by-copy referenced a source object that does not exist
    #[error("Bad copy source")]
    BadCopySource,

    /// A resource store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ModelError> for CdmiError {
    fn from(error: ModelError) -> Self {
        CdmiError::Store(StoreError::from(error))
    }
}

impl IntoResponse for CdmiError {
    fn into_response(self) -> Response {
        let status = match &self {
            CdmiError::NotFound => StatusCode::NOT_FOUND,
            CdmiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };

        (status, self.to_string()).into_response()
    }
}

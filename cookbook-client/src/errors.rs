use reqwest::StatusCode;

use crate::auth::Redirect;
use crate::collection::CollectionError;
use crate::payload::PayloadError;
use crate::validation::{messages, Violation};

pub type FormResult<T> = std::result::Result<T, FormError>;

#[derive(thiserror::Error, Debug)]
pub enum FormError {
    #[error("The recipe is not ready to submit: {}", messages(.0).join("; "))]
    Validation(Vec<Violation>),
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("Not allowed to author recipes, redirecting to {0}")]
    AuthorizationDenied(Redirect),
    #[error("A submission is already in flight")]
    SubmissionInFlight,
    #[error("No submission is in flight")]
    NoSubmissionInFlight,
    #[error("No {kind} with id {id} in the catalog")]
    NotInCatalog { kind: &'static str, id: i64 },
    #[error("Editing error: {0}")]
    Collection(#[from] CollectionError),
    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),
}

/// Anything that went wrong talking to the recipe server.
///
/// These are never retried automatically.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server answered {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("Could not build request: {0}")]
    Payload(#[from] PayloadError),
}

impl FormError {
    /// The violation list, if this is a validation failure.
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            FormError::Validation(violations) => Some(violations.as_slice()),
            _ => None,
        }
    }
}

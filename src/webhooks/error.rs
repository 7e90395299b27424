//! Error types for admission handling.

use thiserror::Error;

use super::field::AggregateInvalid;

/// Error returned by a webhook entry point.
#[derive(Error, Debug)]
pub enum AdmissionError {
    /// The object is not the kind this webhook serves.
    #[error("expected a {expected} but got a {actual}")]
    TypeMismatch {
        /// Kind the webhook serves.
        expected: String,
        /// Kind that was received.
        actual: String,
    },

    /// The object could not be decoded into its declared kind.
    #[error("failed to decode {kind}: {source}")]
    Decode {
        /// Declared kind of the object.
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    /// The request lacks an object required by the operation.
    #[error("missing {0} in request")]
    MissingObject(&'static str),

    /// One or more fields failed validation.
    #[error(transparent)]
    Invalid(#[from] AggregateInvalid),
}

impl AdmissionError {
    /// Short machine readable reason, used to prefix denial messages.
    pub fn reason(&self) -> &'static str {
        match self {
            AdmissionError::TypeMismatch { .. }
            | AdmissionError::Decode { .. }
            | AdmissionError::MissingObject(_) => "BadRequest",
            AdmissionError::Invalid(_) => "Invalid",
        }
    }

    /// Whether the submitter can fix this by changing the object.
    pub fn is_user_error(&self) -> bool {
        matches!(self, AdmissionError::Invalid(_))
    }
}

/// Result type alias for webhook entry points
pub type Result<T> = std::result::Result<T, AdmissionError>;

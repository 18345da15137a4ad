use std::time::Duration;

use thiserror::Error;

/// Failures that happen on the way to or back from the remote endpoint.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed response (status {status}): {source}")]
    Malformed {
        status: u16,
        source: serde_json::Error,
    },

    #[error("No response within {0:?}")]
    Timeout(Duration),
}

/// Misuse of a form or values that cannot be turned into a record.
///
/// These are defects in the calling code, never user input problems.
#[derive(Error, Debug)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Failed to encode form values: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Form values did not encode to a flat record")]
    NotARecord,
}

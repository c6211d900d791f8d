//! Error types for alert administration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a remote call to the alert service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Network failure, no answer from the service
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with an error status
    #[error("Service error {status}: {message}")]
    Server { status: u16, message: String },

    /// Alert does not exist (anymore)
    #[error("Alert not found: {0}")]
    NotFound(String),

    /// Answer could not be interpreted
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::MalformedResponse(err.to_string())
    }
}

/// Classification of a workflow failure.
///
/// None of these are fatal: each leaves the editing session re-editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    /// Field-level problem, fixed by editing the form
    Validation,
    /// Order reserved or beyond the maximum, fixed by override or edit
    Conflict,
    /// Network or server failure, fixed by resubmitting
    Remote,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Validation => write!(f, "validation"),
            FailureKind::Conflict => write!(f, "conflict"),
            FailureKind::Remote => write!(f, "remote"),
        }
    }
}

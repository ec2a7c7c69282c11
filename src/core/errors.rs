// src/core/errors.rs

//! Defines the primary error type for the entire application.

use thiserror::Error;

/// The main error enum, representing all possible failures within the recipe core.
///
/// Every variant maps to a machine-readable code and an HTTP status hint, which the
/// GraphQL layer attaches to the error it returns to the client.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LarderError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    OutOfRange(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Token verification failed")]
    Unauthenticated,

    #[error("Upstream recipe provider unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Storage Error: {0}")]
    Storage(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl LarderError {
    /// The machine-readable error code surfaced to clients.
    pub fn code(&self) -> &'static str {
        match self {
            LarderError::InvalidInput(_) => "INPUT_ERROR",
            LarderError::OutOfRange(_) => "RANGE_ERROR",
            LarderError::NotFound(_) => "NOT_FOUND",
            LarderError::Forbidden(_) => "FORBIDDEN",
            LarderError::Unauthenticated => "UNAUTHENTICATED",
            LarderError::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            LarderError::Storage(_) | LarderError::Internal(_) => "INTERNAL",
        }
    }

    /// The HTTP status that best describes this error.
    pub fn http_status(&self) -> u16 {
        match self {
            LarderError::InvalidInput(_) | LarderError::OutOfRange(_) => 400,
            LarderError::Unauthenticated => 401,
            LarderError::Forbidden(_) => 403,
            LarderError::NotFound(_) => 404,
            LarderError::UpstreamUnavailable(_) => 502,
            LarderError::Storage(_) | LarderError::Internal(_) => 500,
        }
    }

    /// Shorthand for the exhaustion condition raised by pagination.
    pub fn no_recipes_left() -> Self {
        LarderError::NotFound("There are no recipes left".to_string())
    }

    /// Shorthand for an unknown recipe id.
    pub fn recipe_not_found() -> Self {
        LarderError::NotFound("Recipe with provided id does not exist".to_string())
    }
}

// --- From trait implementations for easy error conversion ---

impl From<reqwest::Error> for LarderError {
    fn from(e: reqwest::Error) -> Self {
        LarderError::UpstreamUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for LarderError {
    fn from(e: serde_json::Error) -> Self {
        LarderError::Internal(format!("JSON serialization/deserialization error: {e}"))
    }
}

impl From<url::ParseError> for LarderError {
    fn from(e: url::ParseError) -> Self {
        LarderError::Internal(format!("Invalid upstream URL: {e}"))
    }
}

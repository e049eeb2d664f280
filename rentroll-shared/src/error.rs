//! Domain error type
//!
//! Every service and workflow operation returns `DomainResult<T>`. The error
//! carries its kind, a client-facing message, and the HTTP status the API
//! layer should answer with.
//!
//! # Example
//!
//! ```
//! use rentroll_shared::error::{DomainError, ErrorKind};
//!
//! let err = DomainError::not_found("Unit");
//! assert_eq!(err.kind, ErrorKind::NotFound);
//! assert_eq!(err.http_status(), 404);
//! assert_eq!(err.to_string(), "Unit not found");
//! ```

use serde::Serialize;

/// Result alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Category of a domain failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The requested id does not exist
    NotFound,

    /// Input was rejected before touching storage
    ValidationFailure,

    /// Anything else (storage failures, broken invariants)
    Unhandled,
}

impl ErrorKind {
    /// HTTP status code associated with this kind
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::ValidationFailure => 422,
            ErrorKind::Unhandled => 500,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::ValidationFailure => "validation_failure",
            ErrorKind::Unhandled => "unhandled",
        }
    }
}

/// Tagged domain error
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct DomainError {
    /// Failure category
    pub kind: ErrorKind,

    /// Human-readable message
    pub message: String,
}

impl DomainError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Lookup failure for an entity, e.g. `not_found("Tenant")` → "Tenant not found"
    pub fn not_found(entity: &str) -> Self {
        Self::new(ErrorKind::NotFound, format!("{} not found", entity))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationFailure, message)
    }

    pub fn unhandled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unhandled, message)
    }

    /// HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        self.kind.http_status()
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DomainError::new(ErrorKind::NotFound, "Resource not found"),
            other => DomainError::unhandled(format!("Database error: {}", other)),
        }
    }
}

//! Domain error model.

use serde::Serialize;
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// The four business-rule kinds (validation, authorization, conflict, not found)
/// must stay distinguishable all the way to the caller. `Infrastructure` covers
/// storage/transport failures and is surfaced without internal detail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or missing input, with the offending field.
    #[error("validation failed on `{field}`: {message}")]
    Validation { field: String, message: String },

    /// Role or ownership mismatch.
    #[error("not authorized: {0}")]
    Authorization(String),

    /// State-machine violation, lost race or duplicate action.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Storage/transport failure unrelated to business rules.
    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

/// Coarse classification of a [`DomainError`], stable across message changes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Authorization,
    Conflict,
    NotFound,
    Infrastructure,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation_error",
            ErrorKind::Authorization => "authorization_error",
            ErrorKind::Conflict => "conflict",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Infrastructure => "infrastructure_error",
        }
    }
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn authorization(msg: impl Into<String>) -> Self {
        Self::Authorization(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn infrastructure(msg: impl Into<String>) -> Self {
        Self::Infrastructure(msg.into())
    }

    pub fn invalid_id(field: &str, msg: impl core::fmt::Display) -> Self {
        Self::validation(field, format!("invalid identifier: {msg}"))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation { .. } => ErrorKind::Validation,
            DomainError::Authorization(_) => ErrorKind::Authorization,
            DomainError::Conflict(_) => ErrorKind::Conflict,
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::Infrastructure(_) => ErrorKind::Infrastructure,
        }
    }

    /// Field name for validation errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            DomainError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

// ABOUTME: Unified error taxonomy for the training engine with HTTP status mapping
// ABOUTME: Distinguishes user-fixable constraint errors from lifecycle and storage failures
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Engine error handling.
//!
//! Every fallible engine operation returns [`EngineError`]. Resolver outcomes
//! such as "rest day" or "program complete" are not errors; they are modeled
//! as variants of [`crate::trainer::schedule::DailyResolution`].

use crate::models::{MuscleGroup, ProgramStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable error codes exposed in HTTP error envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "INVALID_CONSTRAINT")]
    InvalidConstraint,
    #[serde(rename = "INSUFFICIENT_CATALOG_COVERAGE")]
    InsufficientCatalogCoverage,
    #[serde(rename = "NOT_FOUND")]
    NotFound,
    #[serde(rename = "FORBIDDEN")]
    Forbidden,
    #[serde(rename = "INVALID_TRANSITION")]
    InvalidTransition,
    #[serde(rename = "STORAGE_ERROR")]
    Storage,
    #[serde(rename = "TIMEOUT")]
    Timeout,
}

impl ErrorCode {
    /// HTTP status code for this error.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidConstraint => 400,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::InvalidTransition => 409,
            Self::InsufficientCatalogCoverage => 422,
            Self::Timeout => 503,
            Self::Storage => 500,
        }
    }

    /// Whether the caller may retry the same request unchanged.
    ///
    /// The engine never retries internally; program generation must stay
    /// side-effect-free on retry.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Storage | Self::Timeout)
    }
}

/// Unified error type for all engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Request shape or range violation. User-fixable.
    #[error("invalid constraint: {message}")]
    InvalidConstraint {
        /// What was wrong, naming the field and the accepted bounds.
        message: String,
    },

    /// No exercise in the catalog satisfies a targeted muscle group under the
    /// active equipment filter. Carries the gap so the UI can suggest
    /// relaxing filters.
    #[error("no {muscle_group} exercise matches equipment [{}]", equipment.join(", "))]
    InsufficientCatalogCoverage {
        muscle_group: MuscleGroup,
        equipment: Vec<String>,
    },

    /// The referenced resource does not exist.
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// The caller does not own the referenced resource.
    #[error("not the owner of this {resource}")]
    Forbidden { resource: String },

    /// A lifecycle transition was requested from a state that does not allow
    /// it (e.g. accepting a superseded program).
    #[error("cannot activate a program in {from} state")]
    InvalidTransition { from: ProgramStatus },

    /// Storage backend failure. Retryable by the caller.
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),

    /// A storage or catalog call exceeded its deadline. Retryable by the
    /// caller.
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },
}

impl EngineError {
    /// Constraint violation with a caller-facing message.
    pub fn invalid_constraint(message: impl Into<String>) -> Self {
        Self::InvalidConstraint {
            message: message.into(),
        }
    }

    /// Missing resource.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Ownership violation.
    pub fn forbidden(resource: impl Into<String>) -> Self {
        Self::Forbidden {
            resource: resource.into(),
        }
    }

    /// Stable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidConstraint { .. } => ErrorCode::InvalidConstraint,
            Self::InsufficientCatalogCoverage { .. } => ErrorCode::InsufficientCatalogCoverage,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Forbidden { .. } => ErrorCode::Forbidden,
            Self::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            Self::Storage(_) => ErrorCode::Storage,
            Self::Timeout { .. } => ErrorCode::Timeout,
        }
    }

    /// HTTP status code for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code().http_status()
    }
}

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// HTTP error envelope, shared by every route.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorResponseDetails,
}

/// Body of the error envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl From<&EngineError> for ErrorResponse {
    fn from(error: &EngineError) -> Self {
        let details = match error {
            EngineError::InsufficientCatalogCoverage {
                muscle_group,
                equipment,
            } => serde_json::json!({
                "muscle_group": muscle_group,
                "equipment": equipment,
            }),
            EngineError::Timeout {
                operation,
                timeout_ms,
            } => serde_json::json!({
                "operation": operation,
                "timeout_ms": timeout_ms,
                "retryable": true,
            }),
            _ => serde_json::Value::Null,
        };

        Self {
            error: ErrorResponseDetails {
                code: error.code(),
                message: error.to_string(),
                details,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_mapping() {
        assert_eq!(ErrorCode::InvalidConstraint.http_status(), 400);
        assert_eq!(ErrorCode::NotFound.http_status(), 404);
        assert_eq!(ErrorCode::Forbidden.http_status(), 403);
        assert_eq!(ErrorCode::InsufficientCatalogCoverage.http_status(), 422);
        assert_eq!(ErrorCode::Timeout.http_status(), 503);
    }

    #[test]
    fn coverage_error_names_the_gap() {
        let error = EngineError::InsufficientCatalogCoverage {
            muscle_group: MuscleGroup::Chest,
            equipment: vec!["barbell".into(), "bench".into()],
        };
        let response = ErrorResponse::from(&error);
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("INSUFFICIENT_CATALOG_COVERAGE"));
        assert!(json.contains("chest"));
        assert!(json.contains("barbell"));
    }

    #[test]
    fn retryable_classification() {
        assert!(ErrorCode::Timeout.is_retryable());
        assert!(ErrorCode::Storage.is_retryable());
        assert!(!ErrorCode::InvalidConstraint.is_retryable());
    }
}

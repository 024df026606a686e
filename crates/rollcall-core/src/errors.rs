//! Application error type shared by every service and handler.
//!
//! Each rejected operation carries an [`ErrorKind`] from the domain taxonomy,
//! the HTTP status it maps to, and a human readable reason. Batch operations
//! may additionally record the index of the entry that failed.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// Domain classification of a rejected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A referenced id or name does not exist.
    NotFound,
    /// The entity exists but has the wrong role for the operation.
    RoleMismatch,
    /// The actor does not own the resource.
    Forbidden,
    /// A uniqueness rule would be violated.
    Conflict,
    /// A referential precondition is not met.
    InvalidState,
    /// The request payload is malformed.
    Validation,
    /// Unexpected store-level failure.
    Integrity,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::RoleMismatch => StatusCode::BAD_REQUEST,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::InvalidState => StatusCode::BAD_REQUEST,
            ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Integrity => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::RoleMismatch => "role_mismatch",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Conflict => "conflict",
            ErrorKind::InvalidState => "invalid_state",
            ErrorKind::Validation => "validation",
            ErrorKind::Integrity => "integrity",
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub kind: ErrorKind,
    pub error: Error,
    /// Position of the failing entry when the request was a batch.
    pub entry: Option<usize>,
}

/// JSON body returned for every rejected request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<usize>,
}

impl AppError {
    pub fn new<E>(kind: ErrorKind, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status: kind.status(),
            kind,
            error: err.into(),
            entry: None,
        }
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::NotFound, err)
    }

    pub fn role_mismatch<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::RoleMismatch, err)
    }

    pub fn forbidden<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Forbidden, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Conflict, err)
    }

    pub fn invalid_state<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::InvalidState, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Validation, err)
    }

    pub fn integrity<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Integrity, err)
    }

    /// Tags the error with the index of the batch entry that produced it.
    pub fn at_entry(mut self, index: usize) -> Self {
        self.entry = Some(index);
        self
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.entry {
            Some(index) => write!(f, "{} (entry {}): {}", self.kind.as_str(), index, self.error),
            None => write!(f, "{}: {}", self.kind.as_str(), self.error),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.kind == ErrorKind::Integrity {
            tracing::error!(error = %self.error, "Integrity failure");
        }

        let body = Json(ErrorResponse {
            error: self.error.to_string(),
            kind: self.kind,
            entry: self.entry,
        });

        (self.status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", err))
    }
}

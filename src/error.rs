//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Failure reported by a storage adapter, independent of the engine behind it.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("duplicate key")]
    DuplicateKey,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("invalid id")]
    InvalidId,
    #[error("stored timestamp out of range: {0} ms")]
    InvalidTimestamp(i64),
    #[error(transparent)]
    Sql(#[from] sqlx::Error),
    #[error(transparent)]
    Document(#[from] mongodb::error::Error),
}

/// Rejections produced by the auth gate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("Authorization header is required")]
    MissingHeader,
    #[error("Malformed authorization token")]
    Malformed,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Unrecognized user status '{0}'")]
    InvalidStatus(String),
}

impl AuthFailure {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthFailure::MissingHeader | AuthFailure::Malformed => StatusCode::UNAUTHORIZED,
            AuthFailure::InvalidToken | AuthFailure::InvalidStatus(_) => StatusCode::FORBIDDEN,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthFailure::MissingHeader => "MISSING_AUTH_HEADER",
            AuthFailure::Malformed => "MALFORMED_TOKEN",
            AuthFailure::InvalidToken => "INVALID_TOKEN",
            AuthFailure::InvalidStatus(_) => "INVALID_STATUS",
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    InvalidRequest {
        message: String,
        example: Option<&'static str>,
    },
    #[error("{0}")]
    NotFound(String),
    #[error("Email already exists")]
    DuplicateKey,
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: StoreError,
    },
    #[error(transparent)]
    Auth(#[from] AuthFailure),
}

impl AppError {
    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::InvalidRequest {
            message: message.into(),
            example: None,
        }
    }

    /// Map an adapter failure; `context` becomes the message of a storage failure.
    pub fn from_store(err: StoreError, context: &'static str) -> Self {
        match err {
            StoreError::DuplicateKey => AppError::DuplicateKey,
            StoreError::NotFound(what) => AppError::NotFound(what.to_string()),
            StoreError::InvalidId => AppError::invalid("invalid id"),
            source => AppError::Storage { context, source },
        }
    }
}

pub trait StoreResultExt<T> {
    fn with_context(self, context: &'static str) -> Result<T, AppError>;
}

impl<T> StoreResultExt<T> for Result<T, StoreError> {
    fn with_context(self, context: &'static str) -> Result<T, AppError> {
        self.map_err(|e| AppError::from_store(e, context))
    }
}

/// Error envelope: `{status: "error", message, error?, code?, example?}`.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<&'static str>,
}

impl ErrorBody {
    fn new(message: String) -> Self {
        ErrorBody {
            status: "error",
            message,
            error: None,
            code: None,
            example: None,
        }
    }
}

impl IntoResponse for AuthFailure {
    fn into_response(self) -> Response {
        let mut body = ErrorBody::new(self.to_string());
        body.code = Some(self.code());
        (self.status_code(), Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidRequest { message, example } => {
                let mut body = ErrorBody::new(message);
                body.example = example;
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, Json(ErrorBody::new(message))).into_response(),
            AppError::PayloadTooLarge(message) => {
                (StatusCode::PAYLOAD_TOO_LARGE, Json(ErrorBody::new(message))).into_response()
            }
            AppError::DuplicateKey => {
                let mut body = ErrorBody::new("Email already exists".into());
                body.error = Some("Duplicate email address".into());
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            AppError::Storage { context, source } => {
                tracing::warn!(error = %source, "{}", context);
                let mut body = ErrorBody::new(context.to_string());
                body.error = Some(source.to_string());
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            AppError::Auth(failure) => failure.into_response(),
        }
    }
}

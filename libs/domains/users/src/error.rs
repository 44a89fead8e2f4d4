use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Caller-facing error taxonomy.
///
/// The message is what the caller sees, verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    /// The request failed a business-rule check; nothing was touched
    #[error("{0}")]
    InvalidArgument(String),

    /// The delete target does not exist
    #[error("{0}")]
    NotFound(String),

    /// The persistence gateway failed; message passed through from the store
    #[error("{0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            UserError::InvalidArgument(_) => "invalid_argument",
            UserError::NotFound(_) => "not_found",
            UserError::Internal(_) => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            UserError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            UserError::NotFound(_) => StatusCode::NOT_FOUND,
            UserError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        if let UserError::Internal(msg) = &self {
            tracing::error!("Internal error: {}", msg);
        }

        (
            self.status_code(),
            Json(json!({
                "error": {
                    "type": self.kind(),
                    "message": self.to_string()
                }
            })),
        )
            .into_response()
    }
}

/// Failure reported by a persistence gateway
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user {0} is not present in the database")]
    NotFound(String),

    #[error("{0}")]
    Database(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

/// Failure reported by an event publisher
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Failed to publish to '{subject}': {details}")]
    Publish { subject: String, details: String },

    #[error("Publish not acknowledged on '{subject}': {details}")]
    Ack { subject: String, details: String },

    #[error("Publisher unavailable: {0}")]
    Unavailable(String),
}

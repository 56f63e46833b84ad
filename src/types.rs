// Error taxonomy shared by the server and the search client

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Body of every non-listing response: `{"message": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or malformed input the user can correct.
    #[error("{0}")]
    Validation(String),

    /// Store failure; `public` is the message sent to the caller.
    #[error("Database error: {source}")]
    Database {
        #[source]
        source: sqlx::Error,
        public: &'static str,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub const SERVER_ERROR: &str = "Server error";
pub const SERVER_ERROR_RETRY: &str = "Server error. Please try again later.";

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database { .. } | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Swap the caller-facing message of a server-side failure.
    pub fn with_public_message(self, public: &'static str) -> Self {
        match self {
            AppError::Database { source, .. } => AppError::Database { source, public },
            other => other,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(source: sqlx::Error) -> Self {
        AppError::Database { source, public: SERVER_ERROR }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Validation(message) => message.clone(),
            AppError::Database { public, .. } => {
                error!("Store failure: {}", self);
                public.to_string()
            }
            AppError::Internal(_) => {
                error!("{}", self);
                SERVER_ERROR.to_string()
            }
        };

        (status, Json(MessageResponse { message })).into_response()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;

/// Failures seen by the search client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Server responded with {status}: {message}")]
    Http { status: u16, message: String },

    #[error("{0}")]
    Validation(String),

    #[error("Saved jobs storage error: {0}")]
    Storage(String),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

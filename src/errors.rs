use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fmt, io};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Server startup error: {0}")]
    Server(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        error!("I/O Error occurred: {}", err);
        AppError::Server(err.to_string())
    }
}

/// A single rejected query parameter value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct FieldError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

pub type FieldErrors = BTreeMap<String, FieldError>;

/// Main error type.
/// Contains the following fields:
/// - status_code: the HTTP status code to return
/// - error: a short description of the error
/// - message: a longer description of the error
/// - details: per-field reasons, only for validation failures
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, FieldError>>,
}

impl From<deadpool_diesel::PoolError> for ApiError {
    fn from(err: deadpool_diesel::PoolError) -> Self {
        Self::internal_server_error(format!("Database pool error: {err}"))
    }
}

impl From<deadpool_diesel::InteractError> for ApiError {
    fn from(err: deadpool_diesel::InteractError) -> Self {
        Self::internal_server_error(format!("Database interaction error: {err}"))
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        Self::internal_server_error(format!("Database query error: {err}"))
    }
}

impl ApiError {
    /// Our custom 404 error
    pub fn not_found() -> Self {
        Self {
            error: "Not Found".to_string(),
            message: "Not Found".to_string(),
            status_code: 404,
            details: None,
        }
    }

    /// Our custom 400 error
    pub fn bad_request(message: String) -> Self {
        Self {
            error: "Bad Request".to_string(),
            message,
            status_code: 400,
            details: None,
        }
    }

    /// A required query parameter is absent or empty
    pub fn missing_query_param(name: &str) -> Self {
        Self::bad_request(format!("{name} is required in query"))
    }

    /// 422 carrying the rejected fields
    pub fn validation_failed(details: FieldErrors) -> Self {
        Self {
            error: "Unprocessable Entity".to_string(),
            message: "Validation Failed".to_string(),
            status_code: 422,
            details: Some(details),
        }
    }

    pub fn method_not_allowed() -> Self {
        Self {
            error: "Method Not Allowed".to_string(),
            message: "The requested method is not supported for this path.".to_string(),
            status_code: 405,
            details: None,
        }
    }

    /// This error is converted in middleware to internal_server_error_user
    pub fn internal_server_error(error: String) -> Self {
        Self {
            error: "Internal Server Error".to_string(),
            message: error,
            status_code: 500,
            details: None,
        }
    }

    /// This is internal server error for user with generic message
    pub fn internal_server_error_user() -> Self {
        Self {
            error: "Internal Server Error".to_string(),
            message: "Internal Server Error".to_string(),
            status_code: 500,
            details: None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiError: {}", self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Server errors are logged once, by `error_middleware`
        (status_code, Json(self)).into_response()
    }
}

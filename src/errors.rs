// errors.rs
use thiserror::Error;

use crate::db::StoreError;
use crate::api::ApiError;
use crate::auth::{LoginError, ValidationError};

/// Errors originating from either the server logic
/// (routing, missing resources, permissions) or downstream layers (DB, backend).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Validation failed: {0}")]
    Validation(ValidationError),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Service Unavailable: {0}")]
    Unavailable(String),
    #[error("Database Error: {0}")]
    DbError(String),
    #[error("Internal Server Error")]
    InternalError,
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) | ServerError::Validation(_) => 400,
            ServerError::Unauthorized(_) => 401,
            ServerError::Forbidden(_) => 403,
            ServerError::Unavailable(_) => 503,
            ServerError::DbError(_) | ServerError::InternalError => 500,
        }
    }
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        ServerError::DbError(e.to_string())
    }
}

impl From<ValidationError> for ServerError {
    fn from(e: ValidationError) -> Self {
        ServerError::Validation(e)
    }
}

impl From<ApiError> for ServerError {
    fn from(e: ApiError) -> Self {
        let msg = e.user_message().to_string();
        match e {
            ApiError::NotFound(_) => ServerError::NotFound,
            ApiError::Unauthorized(_) => ServerError::Unauthorized(msg),
            ApiError::BadRequest { .. } => ServerError::BadRequest(msg),
            ApiError::ServiceUnavailable(_) => ServerError::Unavailable(msg),
            ApiError::Network(_) | ApiError::Server { .. } | ApiError::Decode(_) => {
                ServerError::Unavailable(msg)
            }
        }
    }
}

impl From<LoginError> for ServerError {
    fn from(e: LoginError) -> Self {
        let msg = e.user_message();
        match e {
            LoginError::Invalid(v) => ServerError::Validation(v),
            LoginError::Rejected(api) if api.is_retryable() => ServerError::Unavailable(msg),
            LoginError::Rejected(_) | LoginError::MissingToken => ServerError::Unauthorized(msg),
            LoginError::Store(s) => ServerError::from(s),
        }
    }
}

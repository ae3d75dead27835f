use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::ErrorResponse;

/// Generic message returned to callers for store failures.
const INTERNAL_MESSAGE: &str = "Server Error";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("unknown store backend {0:?}, expected \"postgres\" or \"memory\"")]
    UnknownBackend(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Failure of a catalog operation.
///
/// `Conflict` covers both a reused `arweaveId` and a repeated purchase; it is
/// a declined request rather than a fault and maps to 400 like `BadRequest`.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}

impl CatalogError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        CatalogError::BadRequest(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        CatalogError::Conflict(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        CatalogError::NotFound(message.into())
    }
}

impl ResponseError for CatalogError {
    fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::BadRequest(_) | CatalogError::Conflict(_) => StatusCode::BAD_REQUEST,
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            CatalogError::BadRequest(message) => ErrorResponse::bad_request(message),
            CatalogError::Conflict(message) => ErrorResponse::conflict(message),
            CatalogError::NotFound(message) => ErrorResponse::not_found(message),
            CatalogError::Store(_) => ErrorResponse::internal_error(INTERNAL_MESSAGE),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

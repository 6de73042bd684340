use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use thiserror::Error;

use super::types::ErrorResponse;
use crate::database::DatabaseError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DatabaseError::InvalidInput(_) => ApiError::BadRequest(err.to_string()),
            other => {
                tracing::error!(error = %other, "storage failure");
                ApiError::Internal("Storage failure".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

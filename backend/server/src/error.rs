use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use models::{
    Envelope, INTERNAL_ERROR, INVALID_CREDENTIALS, MALFORMED_PAYLOAD, USER_EXISTS, USER_NOT_FOUND,
};
use serde_json::Value;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{}", MALFORMED_PAYLOAD)]
    MalformedPayload,

    #[error("{}", USER_EXISTS)]
    UserExists,

    #[error("{}", USER_NOT_FOUND)]
    UserNotFound,

    #[error("{}", INVALID_CREDENTIALS)]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(#[from] redis::RedisError),

    #[error("Corrupt user record: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedPayload | AppError::UserExists => StatusCode::BAD_REQUEST,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Database { .. } | AppError::Serialization { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = if status.is_server_error() {
            error!("{self}");
            INTERNAL_ERROR.to_string()
        } else {
            self.to_string()
        };

        (status, Json(Envelope::<Value>::failure(message))).into_response()
    }
}

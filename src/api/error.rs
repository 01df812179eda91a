//! API error type and its HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::error::TimerError;
use super::responses::ErrorResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("timer {0} not found")]
    TimerNotFound(Uuid),

    #[error(transparent)]
    Configuration(#[from] TimerError),

    #[error("timer {0} is running or waiting for acknowledgement; configuration can only change while idle")]
    ConfigLocked(Uuid),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::TimerNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Configuration(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ConfigLocked(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        }
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

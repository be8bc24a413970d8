use crate::models::MessageResponse;
use crate::services::converter::ConversionError;
use crate::services::provider::ProviderError;
use crate::services::watcher::WatchError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Provider(#[from] ProviderError),

    #[error("Conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    #[error("{0}")]
    Timeout(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl From<WatchError> for AppError {
    fn from(err: WatchError) -> Self {
        match err {
            WatchError::Timeout { .. } => AppError::Timeout(err.to_string()),
            WatchError::Io(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Provider(_) => StatusCode::BAD_GATEWAY,
            AppError::Conversion(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Validation(msg) => {
                tracing::debug!("Validation error: {}", msg);
                msg.clone()
            }
            AppError::Provider(e) => {
                tracing::error!("Provider error: {}", e);
                e.to_string()
            }
            AppError::Conversion(e) => {
                tracing::error!("Conversion error: {:?}", e);
                self.to_string()
            }
            AppError::Timeout(msg) => {
                tracing::error!("Timeout: {}", msg);
                msg.clone()
            }
            AppError::NotFound(msg) => msg.clone(),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal Server Error".to_string()
            }
        };

        (status, Json(MessageResponse { message })).into_response()
    }
}

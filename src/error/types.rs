use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use uuid::Uuid;

use crate::models::ErrorResponse;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid filename {filename}")]
    InvalidFilename { filename: String },

    #[error("{message}")]
    PersistenceFailure { message: String },

    #[error("error downloading {url}: {message}")]
    FetchFailure { url: String, message: String },

    #[error("error uploading {target}: {message}")]
    UploadFailure { target: String, message: String },

    #[error("invalid api key {provided}")]
    Unauthorized { provided: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidFilename { .. } => "INVALID_FILENAME",
            AppError::PersistenceFailure { .. } => "PERSISTENCE_FAILURE",
            AppError::FetchFailure { .. } => "FETCH_FAILURE",
            AppError::UploadFailure { .. } => "UPLOAD_FAILURE",
            AppError::Unauthorized { .. } => "UNAUTHORIZED",
            AppError::ConfigError { .. } => "CONFIG_ERROR",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidFilename { .. }
            | AppError::PersistenceFailure { .. }
            | AppError::FetchFailure { .. }
            | AppError::UploadFailure { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::ConfigError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();
        let request_id = Uuid::new_v4().to_string();

        tracing::error!(
            error_code = error_code,
            status_code = %status,
            request_id = %request_id,
            error_message = %message,
            "API error occurred"
        );

        match self {
            // Authorization failures answer in plain text, everything else as JSON
            AppError::Unauthorized { .. } => (status, message).into_response(),
            _ => (status, Json(ErrorResponse { error: message })).into_response(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: format!("IO error: {}", err),
        }
    }
}

impl AppError {
    pub fn invalid_filename(filename: impl Into<String>) -> Self {
        AppError::InvalidFilename {
            filename: filename.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        AppError::PersistenceFailure {
            message: message.into(),
        }
    }

    pub fn fetch(url: impl Into<String>, message: impl ToString) -> Self {
        AppError::FetchFailure {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn upload(target: impl Into<String>, message: impl ToString) -> Self {
        AppError::UploadFailure {
            target: target.into(),
            message: message.to_string(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        AppError::ConfigError {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal {
            message: message.into(),
        }
    }
}

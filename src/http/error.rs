//! Error-to-status mapping for the HTTP layer.

use axum::{
    extract::multipart::MultipartRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::upload::UploadError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Caller is not authenticated. No route raises this today.
    #[error("Authentication required")]
    Authentication,

    /// Caller may not perform the request. No route raises this today.
    #[error("Not authorized")]
    Authorization,

    /// The upload did not contain a file part.
    #[error("No picture was uploaded")]
    MissingPicture,

    /// The request could not be read as `multipart/form-data` at all.
    #[error("Failed to decode upload: {0}")]
    NotMultipart(#[from] MultipartRejection),

    #[error(transparent)]
    Multipart(#[from] UploadError),

    #[error("Failed to render page: {0}")]
    Render(#[from] askama::Error),

    /// The blocking optimizer task panicked or was cancelled.
    #[error("Optimizer task failed: {0}")]
    Optimizer(#[from] tokio::task::JoinError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Authentication => StatusCode::UNAUTHORIZED,
            AppError::Authorization => StatusCode::FORBIDDEN,
            AppError::MissingPicture => StatusCode::BAD_REQUEST,
            AppError::Multipart(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            AppError::NotMultipart(_)
            | AppError::Multipart(_)
            | AppError::Render(_)
            | AppError::Optimizer(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::info!(error = %self, status = %status, "Request rejected");
        }

        let body = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, body).into_response()
    }
}

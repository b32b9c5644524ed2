use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::{debug, error};

#[derive(Debug, ThisError)]
pub enum PicturaError {
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Caption generation error: {0}")]
    CaptionGeneration(String),

    #[error("Database error: {0}")]
    Persistence(#[from] SqlxError),

    #[error("Upload error: {message}")]
    Upload { status: StatusCode, message: String },
}

impl PicturaError {
    pub fn upload(status: StatusCode, message: impl Into<String>) -> Self {
        PicturaError::Upload {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            PicturaError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PicturaError::CaptionGeneration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PicturaError::Persistence(SqlxError::PoolTimedOut | SqlxError::PoolClosed) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            PicturaError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PicturaError::Upload { status, .. } => *status,
        }
    }
}

impl From<reqwest::Error> for PicturaError {
    fn from(e: reqwest::Error) -> Self {
        PicturaError::CaptionGeneration(format!("inference request failed: {e}"))
    }
}

impl From<tokio::task::JoinError> for PicturaError {
    fn from(e: tokio::task::JoinError) -> Self {
        PicturaError::CaptionGeneration(format!("blocking task failed: {e}"))
    }
}

impl From<axum::extract::multipart::MultipartError> for PicturaError {
    fn from(e: axum::extract::multipart::MultipartError) -> Self {
        PicturaError::upload(e.status(), e.body_text())
    }
}

impl From<axum::extract::multipart::MultipartRejection> for PicturaError {
    fn from(e: axum::extract::multipart::MultipartRejection) -> Self {
        PicturaError::upload(e.status(), e.body_text())
    }
}

impl IntoResponse for PicturaError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, error = %self, "request failed");
        } else {
            debug!(status = %status, error = %self, "request rejected");
        }
        let body = ApiErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Error payload shared by every endpoint.
#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_failures_are_client_errors() {
        let err = image::load_from_memory(b"definitely not an image").unwrap_err();
        let err = PicturaError::from(err);
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.to_string().starts_with("Image decode error"));
    }

    #[test]
    fn pool_exhaustion_is_service_unavailable() {
        assert_eq!(
            PicturaError::Persistence(SqlxError::PoolTimedOut).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            PicturaError::Persistence(SqlxError::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn upload_carries_its_status() {
        let err = PicturaError::upload(StatusCode::PAYLOAD_TOO_LARGE, "too big");
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.to_string(), "Upload error: too big");
    }
}

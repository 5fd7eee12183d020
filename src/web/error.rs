use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::outputs::ExportError;

/// Errors returned by the HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Page rendering failed: {0}")]
    Render(#[from] askama::Error),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Export(e) => {
                tracing::error!(error = %e, "Export failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Export failed".to_string(),
                    Some(e.to_string()),
                )
            }
            AppError::Render(e) => {
                tracing::error!(error = %e, "Page rendering failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Page rendering failed".to_string(),
                    None,
                )
            }
        };

        (status, Json(ErrorResponse { error, details })).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, body) = body_json(AppError::not_found("No articles collected yet")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No articles collected yet");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_export_error_has_details() {
        let err = AppError::from(ExportError::Buffer("flush failed".to_string()));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Export failed");
        assert_eq!(body["details"], "CSV buffer error: flush failed");
    }

    #[tokio::test]
    async fn test_render_error_hides_details() {
        let err = AppError::from(askama::Error::from(std::fmt::Error));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Page rendering failed");
        assert!(body.get("details").is_none());
    }
}

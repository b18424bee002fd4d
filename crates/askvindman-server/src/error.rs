use askvindman_store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Question not found: {0}")]
    QuestionNotFound(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Page not found")]
    PageNotFound,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Render error: {0}")]
    Render(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::QuestionNotFound(_) | ServerError::ProfileNotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ServerError::PageNotFound | ServerError::Store(StoreError::NotFound) => {
                (StatusCode::NOT_FOUND, "Page not found".to_string())
            }
            ServerError::Store(e) => {
                tracing::error!(error = %e, "store failure while handling request");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            ServerError::Render(e) => {
                tracing::error!(error = %e, "failed to render page");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use clientcache_core::cache::CacheError;
use clientcache_core::storage::{repository_error_to_status_code, RepositoryError};

use super::response::ApiResponse;

/// Request problems detected by handlers.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("{0}")]
    BadRequest(String),
}

/// Application error type that wraps `anyhow::Error`.
///
/// Renders as a failure envelope. Server-side failures get a generic message
/// and are logged with the underlying cause.
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        if let Some(rejection) = self.0.downcast_ref::<JsonRejection>() {
            return (StatusCode::BAD_REQUEST, rejection.body_text());
        }
        if let Some(RequestError::BadRequest(msg)) = self.0.downcast_ref::<RequestError>() {
            return (StatusCode::BAD_REQUEST, msg.clone());
        }
        if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            let status = StatusCode::from_u16(repository_error_to_status_code(repo_error))
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return match repo_error {
                RepositoryError::InvalidData(msg) => (status, msg.clone()),
                _ => (status, "Internal server error".to_string()),
            };
        }
        if self.0.downcast_ref::<CacheError>().is_some() {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                "Cache unavailable".to_string(),
            );
        }
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(error = %self.0, status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "Rejected request");
        }

        ApiResponse::failure(status, message).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// JSON body extractor whose rejection renders as a failure envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_connection_failure_is_503_with_generic_message() {
        let (status, body) = render(AppError::from(RepositoryError::ConnectionFailed(
            "password authentication failed for user app".to_string(),
        )))
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["success"], false);
        assert_eq!(body["statusCode"], 503);
        assert_eq!(body["message"], "Internal server error");
    }

    #[tokio::test]
    async fn test_query_failure_is_500() {
        let (status, body) =
            render(AppError::from(RepositoryError::QueryFailed("syntax".to_string()))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
    }

    #[tokio::test]
    async fn test_bad_request_keeps_message() {
        let (status, body) = render(AppError::from(RequestError::BadRequest(
            "key must not be empty".to_string(),
        )))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "key must not be empty");
    }

    #[tokio::test]
    async fn test_cache_error_is_503() {
        let (status, body) = render(AppError::from(CacheError::Timeout(10_000))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["message"], "Cache unavailable");
    }
}

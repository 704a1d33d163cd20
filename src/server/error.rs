use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid transaction id: {0}")]
    InvalidId(String),

    #[error("transaction not found: {0}")]
    NotFound(String),

    #[error("invalid snapshot: {}", .0.join("; "))]
    InvalidSnapshot(Vec<String>),

    #[error("health unavailable: {0:#}")]
    Unavailable(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidSnapshot(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidId(_) => "invalid_id",
            ApiError::NotFound(_) => "not_found",
            ApiError::InvalidSnapshot(_) => "invalid_snapshot",
            ApiError::Unavailable(_) => "health_unavailable",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let details = match &self {
            ApiError::InvalidSnapshot(errors) => json!(errors),
            _ => json!([]),
        };
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "details": details,
            }
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::InvalidId("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::InvalidSnapshot(vec![]).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(anyhow::anyhow!("disk gone")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        let err = ApiError::InvalidSnapshot(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "invalid snapshot: a; b");
        let err = ApiError::from(anyhow::anyhow!("disk gone"));
        assert_eq!(err.code(), "health_unavailable");
        assert_eq!(err.to_string(), "health unavailable: disk gone");
    }
}

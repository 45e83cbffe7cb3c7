use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{domain}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E2xxx: Profile errors
/// - E3xxx: Matching errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,

    // Profile (E2xxx)
    ProfileNotFound,
    AlreadyRegistered,
    InvalidProfile,

    // Matching (E3xxx)
    InvalidDecision,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",

            // Profile
            Self::ProfileNotFound => "E2001",
            Self::AlreadyRegistered => "E2002",
            Self::InvalidProfile => "E2003",

            // Matching
            Self::InvalidDecision => "E3001",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationError | Self::InvalidProfile | Self::InvalidDecision => {
                StatusCode::BAD_REQUEST
            }
            Self::ProfileNotFound => StatusCode::NOT_FOUND,
            Self::AlreadyRegistered => StatusCode::CONFLICT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    /// A request body that could not be read into the expected shape.
    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    /// The code reported to clients for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Known { code, .. } => *code,
            AppError::Internal(_) => ErrorCode::InternalError,
            AppError::Validation(_) => ErrorCode::ValidationError,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let body = match self {
            AppError::Known { message, details, .. } => ApiErrorResponse::new(code, message, details),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                ApiErrorResponse::new(code, "internal server error", None)
            }
            AppError::Validation(msg) => {
                tracing::debug!(reason = %msg, "rejected request body");
                ApiErrorResponse::new(code, msg, None)
            }
        };

        (code.status_code(), Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

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
    async fn known_error_carries_code_and_status() {
        let (status, body) =
            body_json(AppError::new(ErrorCode::AlreadyRegistered, "you already have a profile")).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "E2002");
        assert_eq!(body["error"]["message"], "you already have a profile");
        assert!(body["error"].get("details").is_none());
    }

    #[tokio::test]
    async fn details_are_forwarded() {
        let err = AppError::with_details(
            ErrorCode::InvalidProfile,
            "invalid profile",
            serde_json::json!({ "field": "age" }),
        );
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["details"]["field"], "age");
    }

    #[tokio::test]
    async fn internal_errors_hide_their_cause() {
        let (status, body) = body_json(AppError::Internal(anyhow::anyhow!("pool exhausted"))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "E0001");
        assert_eq!(body["error"]["message"], "internal server error");
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let (status, body) = body_json(AppError::Validation("action: unknown variant".into())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "E0002");
        assert_eq!(body["error"]["message"], "action: unknown variant");
    }

    #[test]
    fn code_reflects_variant() {
        assert_eq!(AppError::Validation("x".into()).code(), ErrorCode::ValidationError);
        assert_eq!(AppError::Internal(anyhow::anyhow!("x")).code(), ErrorCode::InternalError);
        assert_eq!(ErrorCode::InvalidDecision.code(), "E3001");
        assert_eq!(ErrorCode::ProfileNotFound.status_code(), StatusCode::NOT_FOUND);
    }
}

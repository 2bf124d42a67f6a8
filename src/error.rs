// region:    --- Imports
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

// endregion: --- Imports

// region:    --- App Error
/// PostgreSQL unique_violation
const PG_UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid or missing fields: {0:?}")]
    Validation(Vec<String>),

    #[error("{0}")]
    Conflict(String),

    #[error("invalid credentials")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn validation(detail: impl Into<String>) -> Self {
        AppError::Validation(vec![detail.into()])
    }

    /// unique 제약 위반은 Conflict 로 변환
    pub fn from_unique_violation(err: sqlx::Error, message: &str) -> Self {
        if has_code(&err, PG_UNIQUE_VIOLATION) {
            AppError::Conflict(message.to_string())
        } else {
            AppError::Database(err)
        }
    }
}

/// PostgreSQL 오류 코드 확인
pub fn has_code(err: &sqlx::Error, code: &str) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(code))
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(vec![rejection.body_text()])
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(vec![rejection.body_text()])
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Validation(details) => json!({
                "error": "Invalid or missing fields",
                "details": details,
            }),
            AppError::Conflict(message) => json!({ "error": message }),
            AppError::Unauthorized => json!({ "error": "Invalid credentials" }),
            AppError::Forbidden => json!({ "error": "Forbidden" }),
            AppError::NotFound(what) => json!({ "error": format!("{} not found", what) }),
            AppError::Internal(_) | AppError::Database(_) => {
                error!("{:<12} --> 내부 오류: {}", "Error", self);
                json!({ "error": "Internal server error" })
            }
        };
        (status, Json(body)).into_response()
    }
}

// endregion: --- App Error

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_each_variant_to_status() {
        let cases = [
            (AppError::validation("name is required"), StatusCode::BAD_REQUEST),
            (AppError::Conflict("E-mail already used".into()), StatusCode::CONFLICT),
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::Forbidden, StatusCode::FORBIDDEN),
            (AppError::NotFound("Product"), StatusCode::NOT_FOUND),
            (AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                AppError::Database(sqlx::Error::RowNotFound),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn non_unique_database_errors_stay_internal() {
        let err = AppError::from_unique_violation(sqlx::Error::RowNotFound, "taken");
        assert!(matches!(err, AppError::Database(_)));
    }
}

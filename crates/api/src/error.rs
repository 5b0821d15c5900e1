use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use opencart_core::error::{CoreError, UNEXPECTED_MESSAGE};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses:
///
/// ```json
/// { "error": "a,b", "code": "VALIDATION_ERROR", "errors": ["a", "b"] }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `opencart_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The caller is not (or no longer) authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error. The message is logged, never returned.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Core(core) => match core {
                CoreError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
                CoreError::ValidationFailed(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                CoreError::UserNotFound => (StatusCode::UNAUTHORIZED, "USER_NOT_FOUND"),
                CoreError::CartItemNotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                CoreError::PersistenceFailed(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_FAILED")
                }
                CoreError::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, "CANCELLED"),
                CoreError::Unexpected(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            },
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Messages safe to return to the caller.
    fn messages(&self) -> Vec<String> {
        match self {
            AppError::Core(core) => core.messages(),
            AppError::Unauthorized(msg) | AppError::BadRequest(msg) => vec![msg.clone()],
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                vec![UNEXPECTED_MESSAGE.to_string()]
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let errors = self.messages();

        if let AppError::Core(CoreError::PersistenceFailed(msg)) = &self {
            tracing::error!(error = %msg, "Persistence failed");
        }

        let body = json!({
            "error": errors.join(","),
            "code": code,
            "errors": errors,
        });

        (status, axum::Json(body)).into_response()
    }
}

//! Application error type and its HTTP translation.
//!
//! Every fallible layer below the HTTP boundary returns [`AppError`]. The
//! [`IntoResponse`] implementation is the single place where an error kind is
//! mapped to a status code and a JSON body.
//!
//! # Response Body
//!
//! ```json
//! { "message": "Slug already in use", "code": "validation_error", "details": { "slug": "🎉🎈" } }
//! ```
//!
//! Server-side failures (5xx) omit `details` and carry a `stack` field instead.
//! It holds the error detail only when internal details are exposed (see
//! [`expose_internal_details`]); otherwise it is a fixed placeholder.

use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::utils::slug_codec::CodecError;

/// Placeholder sent in place of internal details outside development mode.
pub const REDACTED_STACK: &str = "🥞";

static EXPOSE_DETAILS: AtomicBool = AtomicBool::new(false);

/// Enables or disables internal error details in 5xx responses.
///
/// Called once at startup from [`crate::server::run`] based on `APP_ENV`.
pub fn expose_internal_details(enabled: bool) {
    EXPOSE_DETAILS.store(enabled, Ordering::Relaxed);
}

fn internal_details_exposed() -> bool {
    EXPOSE_DETAILS.load(Ordering::Relaxed)
}

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Domain error taxonomy shared by all layers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed target URL, unusable slug, or slug already in use.
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// Store uniqueness violation on insert.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// Client exceeded the creation rate limit.
    #[error("{message}")]
    TooManyRequests {
        message: String,
        retry_after_secs: u64,
    },

    /// Store connection lost, pool exhausted, or operation timed out.
    #[error("{message}")]
    StoreUnavailable { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn too_many_requests(message: impl Into<String>, retry_after_secs: u64) -> Self {
        Self::TooManyRequests {
            message: message.into(),
            retry_after_secs,
        }
    }

    pub fn store_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status code for this error kind.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::StoreUnavailable { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::Conflict { .. } => "conflict",
            AppError::TooManyRequests { .. } => "too_many_requests",
            AppError::StoreUnavailable { .. } => "store_unavailable",
            AppError::Internal { .. } => "internal_error",
        }
    }

    fn into_body(self) -> ErrorBody {
        let code = self.code();
        match self {
            AppError::Validation { message, details }
            | AppError::NotFound { message, details }
            | AppError::Conflict { message, details } => ErrorBody {
                message,
                code,
                details: (!details.is_null()).then_some(details),
                stack: None,
            },
            AppError::TooManyRequests {
                message,
                retry_after_secs,
            } => ErrorBody {
                message,
                code,
                details: Some(json!({ "retry_after_secs": retry_after_secs })),
                stack: None,
            },
            AppError::StoreUnavailable { message, details }
            | AppError::Internal { message, details } => {
                tracing::error!(code, details = %details, "{}", message);

                let stack = if internal_details_exposed() {
                    details.to_string()
                } else {
                    REDACTED_STACK.to_string()
                };

                ErrorBody {
                    message,
                    code,
                    details: None,
                    stack: Some(stack),
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let retry_after = match &self {
            AppError::TooManyRequests {
                retry_after_secs, ..
            } => Some(*retry_after_secs),
            _ => None,
        };

        let mut response = (status, Json(self.into_body())).into_response();

        if let Some(secs) = retry_after
            && let Ok(value) = HeaderValue::from_str(&secs.to_string())
        {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }

        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            ),
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => {
                AppError::store_unavailable("Store unavailable", json!({ "reason": e.to_string() }))
            }
            _ => AppError::internal("Database error", json!({ "reason": e.to_string() })),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let message = e
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid request".to_string());

        AppError::bad_request(
            message,
            serde_json::to_value(&e).unwrap_or(Value::Null),
        )
    }
}

impl From<CodecError> for AppError {
    fn from(e: CodecError) -> Self {
        AppError::bad_request(e.to_string(), json!({}))
    }
}

//! API error handling
//!
//! Translates access-layer error kinds into HTTP status codes and JSON
//! bodies. Handlers branch on error type, never on message text.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reconnect_db::access::{AccessError, ConstraintKind};
use serde::Serialize;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    NotFound { resource: &'static str, id: String },
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: impl std::fmt::Display) -> Self {
        ApiError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        ApiError::Forbidden(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::NotFound { entity, id } => ApiError::not_found(entity, id),
            AccessError::Constraint { kind, message } => {
                let detail = match kind {
                    ConstraintKind::ForeignKey => {
                        "record is still referenced by other records".to_string()
                    }
                    ConstraintKind::Unique => "a record with this value already exists".to_string(),
                    ConstraintKind::NotNull | ConstraintKind::Check => message,
                };
                ApiError::Conflict(detail)
            }
            other => {
                tracing::error!(error = %other, "request failed on the database");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::NotFound { resource, id } => ErrorBody {
                error: "not_found",
                message: format!("{resource} with id {id} not found"),
            },
            ApiError::BadRequest(message) => ErrorBody {
                error: "bad_request",
                message,
            },
            ApiError::Unauthorized(message) => ErrorBody {
                error: "unauthorized",
                message,
            },
            ApiError::Forbidden(message) => ErrorBody {
                error: "forbidden",
                message,
            },
            ApiError::Conflict(message) => ErrorBody {
                error: "conflict",
                message,
            },
            ApiError::Internal(message) => ErrorBody {
                error: "internal_error",
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use reconnect_db::access::{AccessError, ConstraintKind};

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError::not_found("pc", 1).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::bad_request("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::unauthorized("who").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::forbidden("no").status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn access_errors_map_by_kind() {
        let err: ApiError = AccessError::Constraint {
            kind: ConstraintKind::ForeignKey,
            message: "FOREIGN KEY constraint failed".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err: ApiError = AccessError::NotFound {
            entity: "bench",
            id: 7,
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err: ApiError = AccessError::Transport("connection reset".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

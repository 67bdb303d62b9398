use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::application::errors::UseCaseError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadGateway(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<UseCaseError> for AppError {
    fn from(err: UseCaseError) -> Self {
        match err {
            UseCaseError::Validation(message) => AppError::BadRequest(message),
            UseCaseError::Forbidden(message) => AppError::Forbidden(message),
            UseCaseError::NotFound(message) => AppError::NotFound(message),
            UseCaseError::Conflict(message) => AppError::Conflict(message),
            UseCaseError::RoleLoading => AppError::Conflict(UseCaseError::RoleLoading.to_string()),
            UseCaseError::External(message, source) => {
                error!(error = ?source, %message, "http: upstream failure");
                AppError::BadGateway(message)
            }
            UseCaseError::Internal(source) => AppError::Internal(source),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal(err) => {
                error!(error = ?err, "http: internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn use_case_errors_map_to_status_codes() {
        let cases = [
            (UseCaseError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (UseCaseError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (UseCaseError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (UseCaseError::Conflict("again".into()), StatusCode::CONFLICT),
            (UseCaseError::RoleLoading, StatusCode::CONFLICT),
            (
                UseCaseError::External("Failed".into(), anyhow::anyhow!("503")),
                StatusCode::BAD_GATEWAY,
            ),
            (
                UseCaseError::Internal(anyhow::anyhow!("pool")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).into_response().status(), expected);
        }
    }
}

use axum::{http::Uri, response::IntoResponse};
use tracing::info;

use crate::infrastructure::axum_http::error_responses::AppError;

pub async fn not_found(uri: Uri) -> impl IntoResponse {
    info!(path = %uri.path(), "router: no route matched");
    AppError::NotFound("Not found".to_string())
}

pub async fn health_check() -> &'static str {
    "OK"
}

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use crate::{
    domain::repositories::video_calls::VideoCallClient,
    infrastructure::axum_http::{auth::AuthUser, error_responses::AppError},
};

pub struct VideoTokenState<V>
where
    V: VideoCallClient + Send + Sync + 'static,
{
    pub video_client: Arc<V>,
    pub api_key: String,
    pub token_ttl_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct VideoTokenResponse {
    pub api_key: String,
    pub user_id: String,
    pub token: String,
    pub expires_in: u64,
}

pub fn routes<V>(state: Arc<VideoTokenState<V>>) -> Router
where
    V: VideoCallClient + Send + Sync + 'static,
{
    Router::new()
        .route("/token", get(issue_token))
        .with_state(state)
}

/// Credentials for the browser SDK to join calls as the signed-in user.
pub async fn issue_token<V>(
    State(state): State<Arc<VideoTokenState<V>>>,
    AuthUser { external_id, .. }: AuthUser,
) -> Result<impl IntoResponse, AppError>
where
    V: VideoCallClient + Send + Sync + 'static,
{
    let token = state
        .video_client
        .issue_user_token(&external_id)
        .map_err(|err| {
            error!(%external_id, error = ?err, "video: failed to issue user token");
            AppError::Internal(err)
        })?;

    Ok(Json(VideoTokenResponse {
        api_key: state.api_key.clone(),
        user_id: external_id,
        token,
        expires_in: state.token_ttl_seconds,
    }))
}

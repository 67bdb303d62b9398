use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::{
    application::usercases::{
        call_lifecycle::CallLifecycleUseCase, meeting_actions::MeetingActionsUseCase,
    },
    domain::repositories::{interviews::InterviewRepository, video_calls::VideoCallClient},
    infrastructure::axum_http::{auth::AuthUser, error_responses::AppError},
};

#[derive(Debug, Deserialize)]
pub struct JoinMeetingRequest {
    pub link: String,
}

pub struct MeetingsState<V, I>
where
    V: VideoCallClient + Send + Sync + 'static,
    I: InterviewRepository + Send + Sync + 'static,
{
    pub meeting_actions: Arc<MeetingActionsUseCase<V>>,
    pub call_lifecycle: Arc<CallLifecycleUseCase<V, I>>,
}

pub fn routes<V, I>(state: Arc<MeetingsState<V, I>>) -> Router
where
    V: VideoCallClient + Send + Sync + 'static,
    I: InterviewRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/instant", post(create_instant_meeting))
        .route("/join", post(join_meeting))
        .route("/:call_id/end", post(end_call))
        .with_state(state)
}

pub async fn create_instant_meeting<V, I>(
    State(state): State<Arc<MeetingsState<V, I>>>,
    AuthUser { external_id, .. }: AuthUser,
) -> Result<impl IntoResponse, AppError>
where
    V: VideoCallClient + Send + Sync + 'static,
    I: InterviewRepository + Send + Sync + 'static,
{
    info!(%external_id, "meetings: instant meeting request received");
    let navigation = state
        .meeting_actions
        .create_instant_meeting(&external_id)
        .await?;

    Ok((StatusCode::CREATED, Json(navigation)))
}

pub async fn join_meeting<V, I>(
    State(state): State<Arc<MeetingsState<V, I>>>,
    AuthUser { external_id, .. }: AuthUser,
    Json(request): Json<JoinMeetingRequest>,
) -> Result<impl IntoResponse, AppError>
where
    V: VideoCallClient + Send + Sync + 'static,
    I: InterviewRepository + Send + Sync + 'static,
{
    let navigation = state
        .meeting_actions
        .join_meeting(&external_id, &request.link)?;

    Ok(Json(navigation))
}

pub async fn end_call<V, I>(
    State(state): State<Arc<MeetingsState<V, I>>>,
    AuthUser { external_id, .. }: AuthUser,
    Path(call_id): Path<String>,
) -> Result<impl IntoResponse, AppError>
where
    V: VideoCallClient + Send + Sync + 'static,
    I: InterviewRepository + Send + Sync + 'static,
{
    info!(%external_id, %call_id, "meetings: end call request received");
    let outcome = state.call_lifecycle.end_call(&external_id, &call_id).await?;

    Ok(Json(outcome))
}

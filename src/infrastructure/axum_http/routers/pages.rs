use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::{
    application::usercases::{
        call_lifecycle::{CallLifecycleUseCase, HOME_PATH},
        interviews::InterviewsUseCase,
        recordings::RecordingsUseCase,
        role_resolution::RoleResolutionUseCase,
        users::UsersUseCase,
    },
    domain::{
        repositories::{
            interviews::InterviewRepository, users::UserRepository, video_calls::VideoCallClient,
        },
        value_objects::{
            enums::{meeting_statuses::MeetingStatus, roles::RoleState},
            interviews::InterviewModel,
        },
    },
    infrastructure::axum_http::{auth::AuthUser, error_responses::AppError},
};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct QuickAction {
    pub title: &'static str,
    pub description: &'static str,
    pub href: &'static str,
}

pub const QUICK_ACTIONS: [QuickAction; 4] = [
    QuickAction {
        title: "New Call",
        description: "Start an instant call",
        href: "/api/v1/meetings/instant",
    },
    QuickAction {
        title: "Join Interview",
        description: "Enter via invitation link",
        href: "/api/v1/meetings/join",
    },
    QuickAction {
        title: "Schedule",
        description: "Plan upcoming interviews",
        href: "/schedule",
    },
    QuickAction {
        title: "Recordings",
        description: "Access past interviews",
        href: "/recordings",
    },
];

#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
enum HomeView {
    Interviewer {
        actions: &'static [QuickAction],
    },
    Candidate {
        interviews: Vec<InterviewCard>,
    },
}

#[derive(Debug, Serialize)]
struct InterviewCard {
    #[serde(flatten)]
    interview: InterviewModel,
    meeting_status: MeetingStatus,
}

impl InterviewCard {
    fn cards(interviews: Vec<InterviewModel>) -> Vec<Self> {
        let now = Utc::now();
        interviews
            .into_iter()
            .map(|interview| Self {
                meeting_status: interview.meeting_status(now),
                interview,
            })
            .collect()
    }
}

pub struct PagesState<U, I, V>
where
    U: UserRepository + Send + Sync + 'static,
    I: InterviewRepository + Send + Sync + 'static,
    V: VideoCallClient + Send + Sync + 'static,
{
    pub role_resolver: Arc<RoleResolutionUseCase<U>>,
    pub interviews_usecase: Arc<InterviewsUseCase<I, V, U>>,
    pub users_usecase: Arc<UsersUseCase<U>>,
    pub call_lifecycle: Arc<CallLifecycleUseCase<V, I>>,
    pub recordings_usecase: Arc<RecordingsUseCase<V>>,
}

pub fn routes<U, I, V>(state: Arc<PagesState<U, I, V>>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    I: InterviewRepository + Send + Sync + 'static,
    V: VideoCallClient + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(home))
        .route("/dashboard", get(dashboard))
        .route("/schedule", get(schedule))
        .route("/meeting/:call_id", get(meeting_room))
        .route("/recordings", get(recordings))
        .with_state(state)
}

/// Role-gated content is never rendered while the role is unresolved.
fn loading_view(page: &str) -> Response {
    (
        StatusCode::ACCEPTED,
        Json(json!({ "page": page, "state": "loading" })),
    )
        .into_response()
}

pub async fn home<U, I, V>(
    State(state): State<Arc<PagesState<U, I, V>>>,
    auth_user: Option<AuthUser>,
) -> Result<Response, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    I: InterviewRepository + Send + Sync + 'static,
    V: VideoCallClient + Send + Sync + 'static,
{
    let external_id = auth_user.map(|auth_user| auth_user.external_id);
    let role = state.role_resolver.resolve(external_id.as_deref()).await?;

    let view = match (role, external_id) {
        (RoleState::Loading, _) | (_, None) => return Ok(loading_view("home")),
        (RoleState::Interviewer, Some(_)) => HomeView::Interviewer {
            actions: &QUICK_ACTIONS,
        },
        (RoleState::Candidate, Some(external_id)) => {
            let interviews = state.interviews_usecase.list_for(&external_id).await?;
            HomeView::Candidate {
                interviews: InterviewCard::cards(interviews),
            }
        }
    };

    Ok(Json(json!({ "page": "home", "view": view })).into_response())
}

pub async fn dashboard<U, I, V>(
    State(state): State<Arc<PagesState<U, I, V>>>,
    AuthUser { external_id, .. }: AuthUser,
) -> Result<Response, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    I: InterviewRepository + Send + Sync + 'static,
    V: VideoCallClient + Send + Sync + 'static,
{
    match state.role_resolver.resolve(Some(&external_id)).await? {
        RoleState::Loading => Ok(loading_view("dashboard")),
        RoleState::Candidate => {
            info!(%external_id, "pages: candidate redirected away from dashboard");
            Ok(Redirect::to(HOME_PATH).into_response())
        }
        RoleState::Interviewer => {
            let groups = state.interviews_usecase.dashboard_groups(&external_id).await?;
            Ok(Json(json!({
                "page": "dashboard",
                "state": "interviewer",
                "groups": groups,
            }))
            .into_response())
        }
    }
}

pub async fn schedule<U, I, V>(
    State(state): State<Arc<PagesState<U, I, V>>>,
    AuthUser { external_id, .. }: AuthUser,
) -> Result<Response, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    I: InterviewRepository + Send + Sync + 'static,
    V: VideoCallClient + Send + Sync + 'static,
{
    match state.role_resolver.resolve(Some(&external_id)).await? {
        RoleState::Loading => Ok(loading_view("schedule")),
        RoleState::Candidate => {
            info!(%external_id, "pages: candidate redirected away from schedule");
            Ok(Redirect::to(HOME_PATH).into_response())
        }
        RoleState::Interviewer => {
            let interviews = state.interviews_usecase.list_for(&external_id).await?;
            let users = state.users_usecase.list_users(&external_id).await?;
            Ok(Json(json!({
                "page": "schedule",
                "state": "interviewer",
                "interviews": InterviewCard::cards(interviews),
                "users": users,
            }))
            .into_response())
        }
    }
}

pub async fn meeting_room<U, I, V>(
    State(state): State<Arc<PagesState<U, I, V>>>,
    AuthUser { external_id, .. }: AuthUser,
    Path(call_id): Path<String>,
) -> Result<Response, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    I: InterviewRepository + Send + Sync + 'static,
    V: VideoCallClient + Send + Sync + 'static,
{
    let room = state
        .call_lifecycle
        .load_meeting_room(&external_id, &call_id)
        .await?;

    Ok(Json(json!({ "page": "meeting", "room": room })).into_response())
}

pub async fn recordings<U, I, V>(
    State(state): State<Arc<PagesState<U, I, V>>>,
    AuthUser { external_id, .. }: AuthUser,
) -> Result<Response, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    I: InterviewRepository + Send + Sync + 'static,
    V: VideoCallClient + Send + Sync + 'static,
{
    let recordings = state
        .recordings_usecase
        .list_recordings(&external_id)
        .await?;

    Ok(Json(json!({ "page": "recordings", "recordings": recordings })).into_response())
}

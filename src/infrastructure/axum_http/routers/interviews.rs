use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    application::usercases::interviews::InterviewsUseCase,
    domain::{
        repositories::{
            interviews::InterviewRepository, users::UserRepository, video_calls::VideoCallClient,
        },
        value_objects::interviews::{ScheduleInterviewModel, UpdateInterviewStatusModel},
    },
    infrastructure::axum_http::{auth::AuthUser, error_responses::AppError},
};

pub fn routes<I, V, U>(interviews_usecase: Arc<InterviewsUseCase<I, V, U>>) -> Router
where
    I: InterviewRepository + Send + Sync + 'static,
    V: VideoCallClient + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list_interviews).post(schedule_interview))
        .route("/call/:call_id", get(find_by_call_id))
        .route("/:interview_id/status", patch(update_status))
        .with_state(interviews_usecase)
}

pub async fn list_interviews<I, V, U>(
    State(interviews_usecase): State<Arc<InterviewsUseCase<I, V, U>>>,
    AuthUser { external_id, .. }: AuthUser,
) -> Result<impl IntoResponse, AppError>
where
    I: InterviewRepository + Send + Sync + 'static,
    V: VideoCallClient + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let interviews = interviews_usecase.list_for(&external_id).await?;
    Ok(Json(interviews))
}

pub async fn schedule_interview<I, V, U>(
    State(interviews_usecase): State<Arc<InterviewsUseCase<I, V, U>>>,
    AuthUser { external_id, .. }: AuthUser,
    Json(schedule_model): Json<ScheduleInterviewModel>,
) -> Result<impl IntoResponse, AppError>
where
    I: InterviewRepository + Send + Sync + 'static,
    V: VideoCallClient + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    info!(%external_id, "interviews: schedule request received");
    let interview = interviews_usecase
        .schedule(&external_id, schedule_model)
        .await?;

    Ok((StatusCode::CREATED, Json(interview)))
}

pub async fn find_by_call_id<I, V, U>(
    State(interviews_usecase): State<Arc<InterviewsUseCase<I, V, U>>>,
    AuthUser { external_id, .. }: AuthUser,
    Path(call_id): Path<String>,
) -> Result<impl IntoResponse, AppError>
where
    I: InterviewRepository + Send + Sync + 'static,
    V: VideoCallClient + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let interview = interviews_usecase
        .find_by_call_id(&external_id, &call_id)
        .await?;
    Ok(Json(interview))
}

pub async fn update_status<I, V, U>(
    State(interviews_usecase): State<Arc<InterviewsUseCase<I, V, U>>>,
    AuthUser { external_id, .. }: AuthUser,
    Path(interview_id): Path<Uuid>,
    Json(update_model): Json<UpdateInterviewStatusModel>,
) -> Result<impl IntoResponse, AppError>
where
    I: InterviewRepository + Send + Sync + 'static,
    V: VideoCallClient + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    info!(
        %external_id,
        %interview_id,
        status = %update_model.status,
        "interviews: status update received"
    );
    let interview = interviews_usecase
        .update_status(&external_id, interview_id, update_model.status)
        .await?;

    Ok(Json(interview))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::usercases::role_resolution::RoleResolutionUseCase,
        domain::{
            entities::{interviews::InterviewEntity, users::UserEntity},
            repositories::{
                interviews::MockInterviewRepository, users::MockUserRepository,
                video_calls::MockVideoCallClient,
            },
        },
    };
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use chrono::Utc;
    use tower::ServiceExt;

    fn users_with_role(role: &'static str) -> MockUserRepository {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_external_id().returning(move |external_id| {
            let now = Utc::now();
            Ok(Some(UserEntity {
                id: Uuid::new_v4(),
                external_id: external_id.to_string(),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                image: None,
                role: role.to_string(),
                created_at: now,
                updated_at: now,
            }))
        });
        user_repo
    }

    fn app(
        interview_repo: MockInterviewRepository,
        video_client: MockVideoCallClient,
        role: &'static str,
    ) -> Router {
        routes(Arc::new(InterviewsUseCase::new(
            Arc::new(interview_repo),
            Arc::new(video_client),
            Arc::new(RoleResolutionUseCase::new(Arc::new(users_with_role(role)))),
        )))
    }

    fn as_user(mut request: Request<Body>, external_id: &str) -> Request<Body> {
        request.extensions_mut().insert(AuthUser {
            external_id: external_id.to_string(),
            session_id: None,
        });
        request
    }

    #[tokio::test]
    async fn candidate_cannot_schedule() {
        let mut video_client = MockVideoCallClient::new();
        video_client.expect_create_call().never();

        let request = Request::post("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"title":"Pairing","start_time":"2026-10-20T10:00:00Z","candidate_id":"user_c"}"#,
            ))
            .unwrap();
        let response = app(MockInterviewRepository::new(), video_client, "candidate")
            .oneshot(as_user(request, "user_c"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn backwards_status_change_is_a_conflict() {
        let mut interview_repo = MockInterviewRepository::new();
        interview_repo.expect_find_by_id().returning(|id| {
            let now = Utc::now();
            Ok(Some(InterviewEntity {
                id,
                title: "Pairing".to_string(),
                description: None,
                start_time: now,
                end_time: None,
                status: "succeeded".to_string(),
                stream_call_id: "call-1".to_string(),
                candidate_id: "user_c".to_string(),
                interviewer_ids: vec!["user_i".to_string()],
                created_at: now,
                updated_at: now,
            }))
        });
        interview_repo.expect_update_status().never();

        let request = Request::patch(format!("/{}/status", Uuid::new_v4()))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"status":"scheduled"}"#))
            .unwrap();
        let response = app(interview_repo, MockVideoCallClient::new(), "interviewer")
            .oneshot(as_user(request, "user_i"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    application::usercases::comments::CommentsUseCase,
    domain::{
        repositories::{
            comments::CommentRepository, interviews::InterviewRepository, users::UserRepository,
        },
        value_objects::comments::AddCommentModel,
    },
    infrastructure::axum_http::{auth::AuthUser, error_responses::AppError},
};

/// Mounted under the interviews prefix.
pub fn routes<C, I, U>(comments_usecase: Arc<CommentsUseCase<C, I, U>>) -> Router
where
    C: CommentRepository + Send + Sync + 'static,
    I: InterviewRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/:interview_id/comments",
            get(list_comments).post(add_comment),
        )
        .with_state(comments_usecase)
}

pub async fn list_comments<C, I, U>(
    State(comments_usecase): State<Arc<CommentsUseCase<C, I, U>>>,
    AuthUser { external_id, .. }: AuthUser,
    Path(interview_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    C: CommentRepository + Send + Sync + 'static,
    I: InterviewRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let comments = comments_usecase
        .list_comments(&external_id, interview_id)
        .await?;
    Ok(Json(comments))
}

pub async fn add_comment<C, I, U>(
    State(comments_usecase): State<Arc<CommentsUseCase<C, I, U>>>,
    AuthUser { external_id, .. }: AuthUser,
    Path(interview_id): Path<Uuid>,
    Json(add_comment_model): Json<AddCommentModel>,
) -> Result<impl IntoResponse, AppError>
where
    C: CommentRepository + Send + Sync + 'static,
    I: InterviewRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let comment = comments_usecase
        .add_comment(&external_id, interview_id, add_comment_model)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

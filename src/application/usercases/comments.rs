use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    application::{
        errors::{UseCaseError, UseCaseResult},
        usercases::role_resolution::RoleResolutionUseCase,
    },
    domain::{
        repositories::{
            comments::CommentRepository, interviews::InterviewRepository, users::UserRepository,
        },
        value_objects::comments::{AddCommentModel, CommentModel, MAX_RATING, MIN_RATING},
    },
};

/// Interviewer feedback attached to an interview.
pub struct CommentsUseCase<C, I, U>
where
    C: CommentRepository + Send + Sync + 'static,
    I: InterviewRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    comment_repository: Arc<C>,
    interview_repository: Arc<I>,
    role_resolver: Arc<RoleResolutionUseCase<U>>,
}

impl<C, I, U> CommentsUseCase<C, I, U>
where
    C: CommentRepository + Send + Sync + 'static,
    I: InterviewRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(
        comment_repository: Arc<C>,
        interview_repository: Arc<I>,
        role_resolver: Arc<RoleResolutionUseCase<U>>,
    ) -> Self {
        Self {
            comment_repository,
            interview_repository,
            role_resolver,
        }
    }

    pub async fn add_comment(
        &self,
        interviewer_id: &str,
        interview_id: Uuid,
        add_comment_model: AddCommentModel,
    ) -> UseCaseResult<CommentModel> {
        self.role_resolver
            .require_interviewer(interviewer_id, "comment on interviews")
            .await?;

        if add_comment_model.content.trim().is_empty() {
            return Err(UseCaseError::Validation("Comment is required".to_string()));
        }
        if !(MIN_RATING..=MAX_RATING).contains(&add_comment_model.rating) {
            return Err(UseCaseError::Validation(format!(
                "Rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }

        self.ensure_interview_exists(interview_id).await?;

        let entity = add_comment_model.to_entity(interview_id, interviewer_id, Utc::now());
        let comment_id = self.comment_repository.insert(entity.clone()).await?;
        info!(interviewer_id, %interview_id, %comment_id, "comments: comment added");

        Ok(CommentModel {
            id: comment_id,
            interview_id: entity.interview_id,
            interviewer_id: entity.interviewer_id,
            content: entity.content,
            rating: entity.rating,
            created_at: entity.created_at,
        })
    }

    /// Newest first.
    pub async fn list_comments(
        &self,
        viewer_id: &str,
        interview_id: Uuid,
    ) -> UseCaseResult<Vec<CommentModel>> {
        self.role_resolver
            .require_interviewer(viewer_id, "read interview comments")
            .await?;
        self.ensure_interview_exists(interview_id).await?;

        let mut comments: Vec<CommentModel> = self
            .comment_repository
            .list_for_interview(interview_id)
            .await?
            .into_iter()
            .map(CommentModel::from)
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(comments)
    }

    async fn ensure_interview_exists(&self, interview_id: Uuid) -> UseCaseResult<()> {
        self.interview_repository
            .find_by_id(interview_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| UseCaseError::NotFound("Interview not found".to_string()))
    }
}

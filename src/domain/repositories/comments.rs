use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::comments::{CommentEntity, InsertCommentEntity};

#[automock]
#[async_trait]
pub trait CommentRepository {
    async fn insert(&self, insert_comment_entity: InsertCommentEntity) -> Result<Uuid>;
    async fn list_for_interview(&self, interview_id: Uuid) -> Result<Vec<CommentEntity>>;
}

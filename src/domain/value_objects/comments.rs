use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::comments::{CommentEntity, InsertCommentEntity};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommentModel {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub interviewer_id: String,
    pub content: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

impl From<CommentEntity> for CommentModel {
    fn from(value: CommentEntity) -> Self {
        Self {
            id: value.id,
            interview_id: value.interview_id,
            interviewer_id: value.interviewer_id,
            content: value.content,
            rating: value.rating,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddCommentModel {
    pub content: String,
    pub rating: i32,
}

impl AddCommentModel {
    pub fn to_entity(
        &self,
        interview_id: Uuid,
        interviewer_id: &str,
        now: DateTime<Utc>,
    ) -> InsertCommentEntity {
        InsertCommentEntity {
            interview_id,
            interviewer_id: interviewer_id.to_string(),
            content: self.content.trim().to_string(),
            rating: self.rating,
            created_at: now,
        }
    }
}

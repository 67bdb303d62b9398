use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::comments;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = comments)]
pub struct CommentEntity {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub interviewer_id: String,
    pub content: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub struct InsertCommentEntity {
    pub interview_id: Uuid,
    pub interviewer_id: String,
    pub content: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

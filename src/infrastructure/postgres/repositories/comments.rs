use anyhow::Result;
use async_trait::async_trait;
use diesel::{insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::comments::{CommentEntity, InsertCommentEntity},
        repositories::comments::CommentRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::comments},
};

pub struct CommentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CommentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CommentRepository for CommentPostgres {
    async fn insert(&self, insert_comment_entity: InsertCommentEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(comments::table)
            .values(&insert_comment_entity)
            .returning(comments::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn list_for_interview(&self, interview_id: Uuid) -> Result<Vec<CommentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = comments::table
            .filter(comments::interview_id.eq(interview_id))
            .select(CommentEntity::as_select())
            .order(comments::created_at.desc())
            .load::<CommentEntity>(&mut conn)?;

        Ok(results)
    }
}

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::interviews::{InsertInterviewEntity, InterviewEntity},
        repositories::interviews::InterviewRepository,
        value_objects::enums::interview_statuses::InterviewStatus,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::interviews},
};

pub struct InterviewPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl InterviewPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl InterviewRepository for InterviewPostgres {
    async fn insert(&self, insert_interview_entity: InsertInterviewEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(interviews::table)
            .values(&insert_interview_entity)
            .returning(interviews::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, interview_id: Uuid) -> Result<Option<InterviewEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = interviews::table
            .find(interview_id)
            .select(InterviewEntity::as_select())
            .first::<InterviewEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_call_id(&self, stream_call_id: &str) -> Result<Option<InterviewEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = interviews::table
            .filter(interviews::stream_call_id.eq(stream_call_id))
            .select(InterviewEntity::as_select())
            .first::<InterviewEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_all(&self) -> Result<Vec<InterviewEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = interviews::table
            .select(InterviewEntity::as_select())
            .order(interviews::start_time.desc())
            .load::<InterviewEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_for_candidate(&self, candidate_id: &str) -> Result<Vec<InterviewEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = interviews::table
            .filter(interviews::candidate_id.eq(candidate_id))
            .select(InterviewEntity::as_select())
            .order(interviews::start_time.desc())
            .load::<InterviewEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update_status(
        &self,
        interview_id: Uuid,
        allowed_from: Vec<InterviewStatus>,
        status: InterviewStatus,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(interviews::table)
            .filter(interviews::id.eq(interview_id))
            .filter(interviews::status.eq_any(stored_values(&allowed_from)))
            .set((
                interviews::status.eq(status.to_string()),
                interviews::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(updated > 0)
    }
}

/// Scheduled rows may still carry the legacy `upcoming` value.
fn stored_values(statuses: &[InterviewStatus]) -> Vec<String> {
    let mut values: Vec<String> = statuses.iter().map(ToString::to_string).collect();
    if statuses.contains(&InterviewStatus::Scheduled) {
        values.push("upcoming".to_string());
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_values_include_legacy_scheduled_spelling() {
        assert_eq!(
            stored_values(&InterviewStatus::Completed.predecessors()),
            vec!["scheduled".to_string(), "upcoming".to_string()]
        );
        assert_eq!(
            stored_values(&[InterviewStatus::Completed]),
            vec!["completed".to_string()]
        );
    }
}

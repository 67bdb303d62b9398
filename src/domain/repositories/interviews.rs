use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::interviews::{InsertInterviewEntity, InterviewEntity},
    value_objects::enums::interview_statuses::InterviewStatus,
};

#[automock]
#[async_trait]
pub trait InterviewRepository {
    async fn insert(&self, insert_interview_entity: InsertInterviewEntity) -> Result<Uuid>;
    async fn find_by_id(&self, interview_id: Uuid) -> Result<Option<InterviewEntity>>;
    async fn find_by_call_id(&self, stream_call_id: &str) -> Result<Option<InterviewEntity>>;
    async fn list_all(&self) -> Result<Vec<InterviewEntity>>;
    async fn list_for_candidate(&self, candidate_id: &str) -> Result<Vec<InterviewEntity>>;
    /// Writes `status` only while the row still holds one of `allowed_from`.
    /// Returns `false` when no row matched.
    async fn update_status(
        &self,
        interview_id: Uuid,
        allowed_from: Vec<InterviewStatus>,
        status: InterviewStatus,
    ) -> Result<bool>;
}

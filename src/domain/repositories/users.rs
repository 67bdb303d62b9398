use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::users::{UpsertUserEntity, UserEntity};

#[automock]
#[async_trait]
pub trait UserRepository {
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<UserEntity>>;
    /// Inserts or refreshes profile fields; never touches `role` on conflict.
    async fn upsert(&self, upsert_user_entity: UpsertUserEntity) -> Result<Uuid>;
    async fn list(&self) -> Result<Vec<UserEntity>>;
}

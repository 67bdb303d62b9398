use anyhow::Result;
use async_trait::async_trait;
use diesel::{insert_into, prelude::*, upsert::excluded};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::users::{UpsertUserEntity, UserEntity},
        repositories::users::UserRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::users},
};

pub struct UserPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl UserPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl UserRepository for UserPostgres {
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = users::table
            .filter(users::external_id.eq(external_id))
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn upsert(&self, upsert_user_entity: UpsertUserEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Role is managed out of band; a resync must not demote an interviewer.
        let result = insert_into(users::table)
            .values(&upsert_user_entity)
            .on_conflict(users::external_id)
            .do_update()
            .set((
                users::name.eq(excluded(users::name)),
                users::email.eq(excluded(users::email)),
                users::image.eq(excluded(users::image)),
                users::updated_at.eq(excluded(users::updated_at)),
            ))
            .returning(users::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn list(&self) -> Result<Vec<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = users::table
            .select(UserEntity::as_select())
            .order(users::name.asc())
            .load::<UserEntity>(&mut conn)?;

        Ok(results)
    }
}

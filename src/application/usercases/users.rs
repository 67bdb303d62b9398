use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    application::{
        errors::{UseCaseError, UseCaseResult},
        usercases::role_resolution::RoleResolutionUseCase,
    },
    domain::{
        repositories::users::UserRepository,
        value_objects::users::{
            IdentityUserPayload, IdentityWebhookEvent, SyncUserModel, UserModel,
        },
    },
};

pub const USER_CREATED_EVENT: &str = "user.created";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    Synced(String),
    Ignored(String),
}

pub struct UsersUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repository: Arc<U>,
    role_resolver: Arc<RoleResolutionUseCase<U>>,
}

impl<U> UsersUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repository: Arc<U>, role_resolver: Arc<RoleResolutionUseCase<U>>) -> Self {
        Self {
            user_repository,
            role_resolver,
        }
    }

    /// Handles an already signature-verified identity webhook event.
    pub async fn handle_identity_event(
        &self,
        event: IdentityWebhookEvent,
    ) -> UseCaseResult<WebhookOutcome> {
        if event.type_ != USER_CREATED_EVENT {
            debug!(event_type = %event.type_, "users: ignoring identity event");
            return Ok(WebhookOutcome::Ignored(event.type_));
        }

        let payload: IdentityUserPayload = serde_json::from_value(event.data).map_err(|err| {
            UseCaseError::Validation(format!("Invalid user payload: {}", err))
        })?;

        let email = payload
            .primary_email()
            .ok_or_else(|| UseCaseError::Validation("User has no email address".to_string()))?
            .to_string();

        let name = match payload.display_name() {
            name if name.is_empty() => email.clone(),
            name => name,
        };

        let sync_model = SyncUserModel {
            external_id: payload.id.clone(),
            name,
            email,
            image: payload.image_url.clone(),
        };

        let user_id = self
            .user_repository
            .upsert(sync_model.to_entity(Utc::now()))
            .await?;
        info!(external_id = %payload.id, %user_id, "users: user synced from identity provider");

        Ok(WebhookOutcome::Synced(payload.id))
    }

    pub async fn list_users(&self, requester_id: &str) -> UseCaseResult<Vec<UserModel>> {
        self.role_resolver
            .require_interviewer(requester_id, "list users")
            .await?;

        let users = self.user_repository.list().await?;
        Ok(users.into_iter().map(UserModel::from).collect())
    }
}

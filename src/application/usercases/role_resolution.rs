use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    application::errors::{UseCaseError, UseCaseResult},
    domain::{
        repositories::users::UserRepository,
        value_objects::enums::roles::{RoleState, UserRole},
    },
};

/// Answers "which role does the current user have" for role-gated views.
pub struct RoleResolutionUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repository: Arc<U>,
}

impl<U> RoleResolutionUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repository: Arc<U>) -> Self {
        Self { user_repository }
    }

    /// `Loading` until both the identity and its user record are known.
    pub async fn resolve(&self, external_id: Option<&str>) -> Result<RoleState> {
        let Some(external_id) = external_id else {
            debug!("role_resolution: no identity yet");
            return Ok(RoleState::Loading);
        };

        let Some(user) = self
            .user_repository
            .find_by_external_id(external_id)
            .await?
        else {
            debug!(external_id, "role_resolution: user record not synced yet");
            return Ok(RoleState::Loading);
        };

        let state = match UserRole::parse(&user.role) {
            Some(role) => RoleState::from(role),
            None => {
                warn!(
                    external_id,
                    role = %user.role,
                    "role_resolution: unknown stored role, treating as candidate"
                );
                RoleState::Candidate
            }
        };

        Ok(state)
    }

    pub async fn require_interviewer(&self, external_id: &str, action: &str) -> UseCaseResult<()> {
        let state = self.resolve(Some(external_id)).await?;
        ensure_interviewer(state, action)
    }
}

pub fn ensure_interviewer(state: RoleState, action: &str) -> UseCaseResult<()> {
    match state {
        RoleState::Interviewer => Ok(()),
        RoleState::Candidate => Err(UseCaseError::Forbidden(format!(
            "Only interviewers can {}",
            action
        ))),
        RoleState::Loading => Err(UseCaseError::RoleLoading),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{entities::users::UserEntity, repositories::users::MockUserRepository};
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_user(external_id: &str, role: &str) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id: Uuid::new_v4(),
            external_id: external_id.to_string(),
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            image: None,
            role: role.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn loading_without_identity_and_no_lookup() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_external_id().never();

        let usecase = RoleResolutionUseCase::new(Arc::new(user_repo));

        assert_eq!(usecase.resolve(None).await.unwrap(), RoleState::Loading);
    }

    #[tokio::test]
    async fn loading_until_user_record_exists() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_external_id()
            .times(1)
            .returning(|_| Ok(None));

        let usecase = RoleResolutionUseCase::new(Arc::new(user_repo));

        assert_eq!(
            usecase.resolve(Some("user_new")).await.unwrap(),
            RoleState::Loading
        );
    }

    #[tokio::test]
    async fn resolves_interviewer() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_external_id()
            .withf(|external_id| external_id == "user_1")
            .returning(|external_id| Ok(Some(sample_user(external_id, "interviewer"))));

        let usecase = RoleResolutionUseCase::new(Arc::new(user_repo));

        assert_eq!(
            usecase.resolve(Some("user_1")).await.unwrap(),
            RoleState::Interviewer
        );
    }

    #[tokio::test]
    async fn defaults_to_candidate_for_any_other_role() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_external_id()
            .times(2)
            .returning(|external_id| {
                let role = if external_id == "user_a" { "candidate" } else { "" };
                Ok(Some(sample_user(external_id, role)))
            });

        let usecase = RoleResolutionUseCase::new(Arc::new(user_repo));

        assert_eq!(
            usecase.resolve(Some("user_a")).await.unwrap(),
            RoleState::Candidate
        );
        assert_eq!(
            usecase.resolve(Some("user_b")).await.unwrap(),
            RoleState::Candidate
        );
    }

    #[test]
    fn ensure_interviewer_matches_every_state() {
        assert!(ensure_interviewer(RoleState::Interviewer, "schedule").is_ok());
        assert!(matches!(
            ensure_interviewer(RoleState::Candidate, "schedule"),
            Err(UseCaseError::Forbidden(message)) if message == "Only interviewers can schedule"
        ));
        assert!(matches!(
            ensure_interviewer(RoleState::Loading, "schedule"),
            Err(UseCaseError::RoleLoading)
        ));
    }

    #[tokio::test]
    async fn propagates_lookup_failures() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_external_id()
            .returning(|_| Err(anyhow::anyhow!("connection refused")));

        let usecase = RoleResolutionUseCase::new(Arc::new(user_repo));

        assert!(usecase.resolve(Some("user_1")).await.is_err());
    }
}

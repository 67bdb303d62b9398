use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::domain::{
    entities::users::{UpsertUserEntity, UserEntity},
    value_objects::enums::roles::UserRole,
};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserModel {
    pub id: Uuid,
    pub external_id: String,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub role: UserRole,
}

impl From<UserEntity> for UserModel {
    fn from(value: UserEntity) -> Self {
        let role = UserRole::parse(&value.role).unwrap_or_else(|| {
            warn!(
                external_id = %value.external_id,
                role = %value.role,
                "users: unknown stored role, treating as candidate"
            );
            UserRole::Candidate
        });

        Self {
            id: value.id,
            external_id: value.external_id,
            name: value.name,
            email: value.email,
            image: value.image,
            role,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncUserModel {
    pub external_id: String,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
}

impl SyncUserModel {
    /// New users always start as candidates.
    pub fn to_entity(&self, now: DateTime<Utc>) -> UpsertUserEntity {
        UpsertUserEntity {
            external_id: self.external_id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            image: self.image.clone(),
            role: UserRole::Candidate.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityWebhookEvent {
    #[serde(rename = "type")]
    pub type_: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityUserPayload {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub primary_email_address_id: Option<String>,
    #[serde(default)]
    pub email_addresses: Vec<IdentityEmailAddress>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityEmailAddress {
    pub id: String,
    pub email_address: String,
}

impl IdentityUserPayload {
    pub fn primary_email(&self) -> Option<&str> {
        let primary = self.primary_email_address_id.as_deref();
        self.email_addresses
            .iter()
            .find(|address| Some(address.id.as_str()) == primary)
            .or_else(|| self.email_addresses.first())
            .map(|address| address.email_address.as_str())
    }

    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> IdentityUserPayload {
        serde_json::from_value(serde_json::json!({
            "id": "user_2abc",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "image_url": "https://img.example/ada.png",
            "primary_email_address_id": "idn_2",
            "email_addresses": [
                { "id": "idn_1", "email_address": "old@example.com" },
                { "id": "idn_2", "email_address": "ada@example.com" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn primary_email_prefers_flagged_address() {
        assert_eq!(payload().primary_email(), Some("ada@example.com"));
    }

    #[test]
    fn display_name_skips_missing_parts() {
        let mut user = payload();
        assert_eq!(user.display_name(), "Ada Lovelace");
        user.last_name = None;
        assert_eq!(user.display_name(), "Ada");
    }

    #[test]
    fn synced_users_start_as_candidates() {
        let model = SyncUserModel {
            external_id: "user_2abc".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            image: None,
        };
        assert_eq!(model.to_entity(Utc::now()).role, "candidate");
    }
}

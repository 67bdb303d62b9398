use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{
    domain::value_objects::iam::Identity,
    infrastructure::axum_http::error_responses::AppError,
};

/// The caller's verified identity, attached to the request by the access gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub external_id: String,
    pub session_id: Option<String>,
}

impl From<Identity> for AuthUser {
    fn from(value: Identity) -> Self {
        Self {
            external_id: value.external_id,
            session_id: value.session_id,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

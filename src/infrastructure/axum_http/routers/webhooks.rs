use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    application::usercases::users::{UsersUseCase, WebhookOutcome},
    domain::{repositories::users::UserRepository, value_objects::users::IdentityWebhookEvent},
    infrastructure::{
        axum_http::error_responses::AppError,
        identity::webhook_signature::{
            WEBHOOK_ID_HEADER, WEBHOOK_SIGNATURE_HEADER, WEBHOOK_TIMESTAMP_HEADER, WebhookHeaders,
            WebhookSignatureVerifier,
        },
    },
};

pub struct IdentityWebhookState<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub signature_verifier: WebhookSignatureVerifier,
    pub users_usecase: Arc<UsersUseCase<U>>,
}

pub fn routes<U>(state: Arc<IdentityWebhookState<U>>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/identity", post(identity_webhook))
        .with_state(state)
}

fn webhook_headers(headers: &HeaderMap) -> Option<WebhookHeaders> {
    let read = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    Some(WebhookHeaders {
        id: read(WEBHOOK_ID_HEADER)?,
        timestamp: read(WEBHOOK_TIMESTAMP_HEADER)?,
        signature: read(WEBHOOK_SIGNATURE_HEADER)?,
    })
}

pub async fn identity_webhook<U>(
    State(state): State<Arc<IdentityWebhookState<U>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Send + Sync + 'static,
{
    let webhook_headers = webhook_headers(&headers).ok_or_else(|| {
        warn!("identity_webhook: missing signature headers");
        AppError::BadRequest("Missing webhook signature headers".to_string())
    })?;

    state
        .signature_verifier
        .verify(&webhook_headers, &body, Utc::now())
        .map_err(|err| {
            warn!(
                webhook_id = %webhook_headers.id,
                error = ?err,
                "identity_webhook: signature rejected"
            );
            AppError::BadRequest("Invalid webhook signature".to_string())
        })?;

    let event: IdentityWebhookEvent = serde_json::from_slice(&body)
        .map_err(|err| AppError::BadRequest(format!("Invalid webhook payload: {}", err)))?;

    let outcome = state.users_usecase.handle_identity_event(event).await?;
    match &outcome {
        WebhookOutcome::Synced(external_id) => {
            info!(webhook_id = %webhook_headers.id, %external_id, "identity_webhook: user synced")
        }
        WebhookOutcome::Ignored(event_type) => {
            info!(webhook_id = %webhook_headers.id, %event_type, "identity_webhook: event ignored")
        }
    }

    Ok((StatusCode::OK, Json(json!({ "received": true }))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::usercases::role_resolution::RoleResolutionUseCase,
        domain::repositories::users::MockUserRepository,
    };
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;
    use uuid::Uuid;

    const SECRET: &str = "whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw";

    fn app(user_repo: MockUserRepository) -> Router {
        let user_repo = Arc::new(user_repo);
        let users_usecase = UsersUseCase::new(
            Arc::clone(&user_repo),
            Arc::new(RoleResolutionUseCase::new(user_repo)),
        );

        routes(Arc::new(IdentityWebhookState {
            signature_verifier: WebhookSignatureVerifier::new(SECRET).unwrap(),
            users_usecase: Arc::new(users_usecase),
        }))
    }

    fn created_body() -> Vec<u8> {
        serde_json::to_vec(&json!({
            "type": "user.created",
            "data": {
                "id": "user_2new",
                "first_name": "Grace",
                "last_name": "Hopper",
                "image_url": "https://img.example/grace.png",
                "primary_email_address_id": "idn_1",
                "email_addresses": [{ "id": "idn_1", "email_address": "grace@example.com" }]
            }
        }))
        .unwrap()
    }

    fn signed_request(body: Vec<u8>, signature: Option<String>) -> Request<Body> {
        let verifier = WebhookSignatureVerifier::new(SECRET).unwrap();
        let timestamp = Utc::now().timestamp().to_string();
        let signature =
            signature.unwrap_or_else(|| verifier.sign("msg_1", &timestamp, &body));

        Request::post("/identity")
            .header(WEBHOOK_ID_HEADER, "msg_1")
            .header(WEBHOOK_TIMESTAMP_HEADER, timestamp)
            .header(WEBHOOK_SIGNATURE_HEADER, signature)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn signed_user_created_event_is_synced() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_upsert()
            .withf(|entity| entity.external_id == "user_2new" && entity.name == "Grace Hopper")
            .times(1)
            .returning(|_| Ok(Uuid::new_v4()));

        let response = app(user_repo)
            .oneshot(signed_request(created_body(), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn bad_signature_is_rejected_before_any_write() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_upsert().never();

        let response = app(user_repo)
            .oneshot(signed_request(
                created_body(),
                Some("v1,bm90LXRoZS1zaWc=".to_string()),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_headers_are_rejected() {
        let response = app(MockUserRepository::new())
            .oneshot(
                Request::post("/identity")
                    .body(Body::from(created_body()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

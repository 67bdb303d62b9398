use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::{
    extract::CookieJar,
    headers::{Authorization, HeaderMapExt, authorization::Bearer},
};
use std::sync::Arc;
use tracing::{debug, info};
use url::form_urlencoded;

use crate::{
    domain::{
        repositories::identity::SessionVerifier,
        value_objects::{
            iam::Identity,
            route_access::{GateDecision, RouteAccessPolicy, RouteClass},
        },
    },
    infrastructure::axum_http::auth::AuthUser,
};

pub const SESSION_COOKIE: &str = "__session";

/// Request gate run in front of every route.
pub struct AccessGate<S>
where
    S: SessionVerifier + Send + Sync + 'static,
{
    policy: RouteAccessPolicy,
    verifier: Arc<S>,
    sign_in_url: String,
}

impl<S> AccessGate<S>
where
    S: SessionVerifier + Send + Sync + 'static,
{
    pub fn new(policy: RouteAccessPolicy, verifier: Arc<S>, sign_in_url: String) -> Self {
        Self {
            policy,
            verifier,
            sign_in_url,
        }
    }

    /// A malformed or expired credential counts as no credential, so a stale
    /// cookie falls through to the bearer token.
    fn authenticate(&self, headers: &HeaderMap) -> Option<AuthUser> {
        session_tokens(headers)
            .into_iter()
            .find_map(|token| match self.verifier.verify(&token) {
                Ok(claims) => Some(AuthUser::from(Identity::from(claims))),
                Err(err) => {
                    debug!(error = ?err, "access_gate: session credential rejected");
                    None
                }
            })
    }

    fn sign_in_location(&self, original: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("redirect_url", original)
            .finish();
        let separator = if self.sign_in_url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.sign_in_url, separator, query)
    }
}

/// Session cookie first, then a bearer token.
pub fn session_tokens(headers: &HeaderMap) -> Vec<String> {
    let jar = CookieJar::from_headers(headers);
    let cookie = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty());
    let bearer = headers
        .typed_get::<Authorization<Bearer>>()
        .map(|authorization| authorization.token().to_string());

    cookie.into_iter().chain(bearer).collect()
}

pub async fn gate<S>(
    State(access_gate): State<Arc<AccessGate<S>>>,
    mut request: Request,
    next: Next,
) -> Response
where
    S: SessionVerifier + Send + Sync + 'static,
{
    let path = request.uri().path().to_string();
    let class = access_gate.policy.classify(&path);
    if class == RouteClass::Ignored {
        return next.run(request).await;
    }

    let auth_user = access_gate.authenticate(request.headers());
    match access_gate.policy.decide(class, auth_user.is_some()) {
        GateDecision::RedirectToSignIn => {
            let original = request
                .uri()
                .path_and_query()
                .map(|path_and_query| path_and_query.as_str())
                .unwrap_or(path.as_str());
            info!(%path, "access_gate: redirecting unauthenticated request to sign-in");
            return Redirect::temporary(&access_gate.sign_in_location(original)).into_response();
        }
        GateDecision::Bypass | GateDecision::Proceed => {}
    }

    if let Some(auth_user) = auth_user {
        request.extensions_mut().insert(auth_user);
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        repositories::identity::MockSessionVerifier, value_objects::iam::SessionClaims,
    };
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request as HttpRequest, StatusCode, header},
        middleware,
        routing::{get, post},
    };
    use tower::ServiceExt;

    fn verifier() -> MockSessionVerifier {
        let mut verifier = MockSessionVerifier::new();
        verifier.expect_verify().returning(|token| {
            if token == "good-token" {
                Ok(SessionClaims {
                    sub: "user_abc".to_string(),
                    exp: usize::MAX,
                    iat: None,
                    sid: Some("sess_1".to_string()),
                    iss: None,
                })
            } else {
                Err(anyhow::anyhow!("invalid signature"))
            }
        });
        verifier
    }

    async fn whoami(auth_user: Option<AuthUser>) -> String {
        auth_user
            .map(|auth_user| auth_user.external_id)
            .unwrap_or_else(|| "anonymous".to_string())
    }

    fn app(verifier: MockSessionVerifier) -> Router {
        let policy = RouteAccessPolicy::from_patterns(
            &["/dashboard(.*)", "/meeting(.*)"],
            &["/"],
            &["/api/webhooks(.*)"],
        );
        let access_gate = Arc::new(AccessGate::new(
            policy,
            Arc::new(verifier),
            "/sign-in".to_string(),
        ));

        Router::new()
            .route("/", get(whoami))
            .route("/dashboard", get(whoami))
            .route("/meeting/:call_id", get(whoami))
            .route("/api/webhooks/identity", post(whoami))
            .layer(middleware::from_fn_with_state(
                access_gate,
                gate::<MockSessionVerifier>,
            ))
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn protected_path_without_session_redirects_to_sign_in() {
        let response = app(verifier())
            .oneshot(
                HttpRequest::get("/meeting/abc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/sign-in?redirect_url=%2Fmeeting%2Fabc123"
        );
    }

    #[tokio::test]
    async fn expired_or_malformed_session_is_treated_as_missing() {
        let response = app(verifier())
            .oneshot(
                HttpRequest::get("/dashboard")
                    .header(header::COOKIE, "__session=forged")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    #[tokio::test]
    async fn valid_cookie_attaches_identity() {
        let response = app(verifier())
            .oneshot(
                HttpRequest::get("/dashboard")
                    .header(header::COOKIE, "theme=dark; __session=good-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "user_abc");
    }

    #[tokio::test]
    async fn bearer_token_is_accepted() {
        let response = app(verifier())
            .oneshot(
                HttpRequest::get("/")
                    .header(header::AUTHORIZATION, "Bearer good-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(body_text(response).await, "user_abc");
    }

    #[tokio::test]
    async fn stale_cookie_falls_back_to_bearer() {
        let response = app(verifier())
            .oneshot(
                HttpRequest::get("/dashboard")
                    .header(header::COOKIE, "__session=expired")
                    .header(header::AUTHORIZATION, "Bearer good-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "user_abc");
    }

    #[tokio::test]
    async fn public_root_needs_no_credential() {
        let response = app(verifier())
            .oneshot(HttpRequest::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "anonymous");
    }

    #[tokio::test]
    async fn ignored_path_never_inspects_the_credential() {
        let mut verifier = MockSessionVerifier::new();
        verifier.expect_verify().never();

        let response = app(verifier)
            .oneshot(
                HttpRequest::post("/api/webhooks/identity")
                    .header(header::COOKIE, "__session=good-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "anonymous");
    }

    #[test]
    fn sign_in_location_appends_to_existing_query() {
        let access_gate = AccessGate::new(
            RouteAccessPolicy::default(),
            Arc::new(MockSessionVerifier::new()),
            "https://accounts.example.com/sign-in?lang=en".to_string(),
        );

        assert_eq!(
            access_gate.sign_in_location("/recordings"),
            "https://accounts.example.com/sign-in?lang=en&redirect_url=%2Frecordings"
        );
    }
}

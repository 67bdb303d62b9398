use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    application::usercases::{role_resolution::RoleResolutionUseCase, users::UsersUseCase},
    domain::{repositories::users::UserRepository, value_objects::enums::roles::RoleState},
    infrastructure::axum_http::{auth::AuthUser, error_responses::AppError},
};

pub struct UsersState<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub users_usecase: Arc<UsersUseCase<U>>,
    pub role_resolver: Arc<RoleResolutionUseCase<U>>,
}

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub role: RoleState,
}

pub fn routes<U>(state: Arc<UsersState<U>>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/users", get(list_users))
        .route("/me/role", get(my_role))
        .with_state(state)
}

pub async fn list_users<U>(
    State(state): State<Arc<UsersState<U>>>,
    AuthUser { external_id, .. }: AuthUser,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Send + Sync + 'static,
{
    let users = state.users_usecase.list_users(&external_id).await?;
    Ok(Json(users))
}

pub async fn my_role<U>(
    State(state): State<Arc<UsersState<U>>>,
    AuthUser { external_id, .. }: AuthUser,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Send + Sync + 'static,
{
    let role = state.role_resolver.resolve(Some(&external_id)).await?;
    Ok(Json(RoleResponse { role }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::users::MockUserRepository;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn role_is_loading_until_the_user_record_exists() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_external_id()
            .returning(|_| Ok(None));
        let user_repo = Arc::new(user_repo);
        let role_resolver = Arc::new(RoleResolutionUseCase::new(Arc::clone(&user_repo)));
        let app = routes(Arc::new(UsersState {
            users_usecase: Arc::new(UsersUseCase::new(user_repo, Arc::clone(&role_resolver))),
            role_resolver,
        }));

        let mut request = Request::get("/me/role").body(Body::empty()).unwrap();
        request.extensions_mut().insert(AuthUser {
            external_id: "user_new".to_string(),
            session_id: None,
        });
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"role":"loading"}"#);
    }
}

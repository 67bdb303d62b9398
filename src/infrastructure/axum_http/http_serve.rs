use crate::{
    application::usercases::{
        call_lifecycle::CallLifecycleUseCase, comments::CommentsUseCase,
        interviews::InterviewsUseCase, meeting_actions::MeetingActionsUseCase,
        recordings::RecordingsUseCase, role_resolution::RoleResolutionUseCase,
        users::UsersUseCase,
    },
    config::config_model::DotEnvyConfig,
    domain::value_objects::route_access::RouteAccessPolicy,
    infrastructure::{
        axum_http::{
            access_gate::{self, AccessGate},
            default_routers,
            routers::{comments, interviews, meetings, pages, users, video, webhooks},
        },
        identity::{jwt_session::JwtSessionVerifier, webhook_signature::WebhookSignatureVerifier},
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                comments::CommentPostgres, interviews::InterviewPostgres, users::UserPostgres,
            },
        },
        video::stream_client::StreamVideoClient,
    },
};
use anyhow::Result;
use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    routing::get,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

/// Builds every client and use case once and wires them into the router.
pub fn build_app(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<Router> {
    let user_repository = Arc::new(UserPostgres::new(Arc::clone(&db_pool)));
    let interview_repository = Arc::new(InterviewPostgres::new(Arc::clone(&db_pool)));
    let comment_repository = Arc::new(CommentPostgres::new(Arc::clone(&db_pool)));
    let video_client = Arc::new(StreamVideoClient::new(&config.video)?);
    if config.stage.is_production() && config.identity.issuer.is_none() {
        warn!("IDENTITY_ISSUER is not set; session tokens from any issuer will be accepted");
    }
    let session_verifier = Arc::new(JwtSessionVerifier::new(
        &config.identity.secret_key,
        config.identity.issuer.as_deref(),
    ));

    let role_resolver = Arc::new(RoleResolutionUseCase::new(Arc::clone(&user_repository)));
    let users_usecase = Arc::new(UsersUseCase::new(
        Arc::clone(&user_repository),
        Arc::clone(&role_resolver),
    ));
    let interviews_usecase = Arc::new(InterviewsUseCase::new(
        Arc::clone(&interview_repository),
        Arc::clone(&video_client),
        Arc::clone(&role_resolver),
    ));
    let comments_usecase = Arc::new(CommentsUseCase::new(
        comment_repository,
        Arc::clone(&interview_repository),
        Arc::clone(&role_resolver),
    ));
    let call_lifecycle = Arc::new(CallLifecycleUseCase::new(
        Arc::clone(&video_client),
        Arc::clone(&interview_repository),
    ));
    let meeting_actions = Arc::new(MeetingActionsUseCase::new(Arc::clone(&video_client)));
    let recordings_usecase = Arc::new(RecordingsUseCase::new(Arc::clone(&video_client)));

    let session_gate = Arc::new(AccessGate::new(
        RouteAccessPolicy::from_patterns(
            &config.access.protected_routes,
            &config.access.public_routes,
            &config.access.ignored_routes,
        ),
        session_verifier,
        config.identity.sign_in_url.clone(),
    ));

    let webhook_state = Arc::new(webhooks::IdentityWebhookState {
        signature_verifier: WebhookSignatureVerifier::new(&config.identity.webhook_secret)?,
        users_usecase: Arc::clone(&users_usecase),
    });

    let app = Router::new()
        .fallback(default_routers::not_found)
        .merge(pages::routes(Arc::new(pages::PagesState {
            role_resolver: Arc::clone(&role_resolver),
            interviews_usecase: Arc::clone(&interviews_usecase),
            users_usecase: Arc::clone(&users_usecase),
            call_lifecycle: Arc::clone(&call_lifecycle),
            recordings_usecase,
        })))
        .nest("/api/webhooks", webhooks::routes(webhook_state))
        .nest(
            "/api/v1",
            users::routes(Arc::new(users::UsersState {
                users_usecase,
                role_resolver,
            })),
        )
        .nest(
            "/api/v1/meetings",
            meetings::routes(Arc::new(meetings::MeetingsState {
                meeting_actions,
                call_lifecycle,
            })),
        )
        .nest(
            "/api/v1/interviews",
            interviews::routes(interviews_usecase).merge(comments::routes(comments_usecase)),
        )
        .nest(
            "/api/v1/video",
            video::routes(Arc::new(video::VideoTokenState {
                video_client,
                api_key: config.video.api_key.clone(),
                token_ttl_seconds: config.video.token_ttl_seconds,
            })),
        )
        .route("/api/v1/health-check", get(default_routers::health_check))
        .layer(middleware::from_fn_with_state(
            session_gate,
            access_gate::gate::<JwtSessionVerifier>,
        ))
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.timeout)))
        .layer(RequestBodyLimitLayer::new(
            (config.server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::PUT,
                    Method::DELETE,
                ])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let app = build_app(Arc::clone(&config), db_pool)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;

    info!(
        stage = %config.stage,
        "Server is running on port {}",
        config.server.port
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = ?err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = ?err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}

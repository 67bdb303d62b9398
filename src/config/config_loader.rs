use anyhow::{Context, Result};

use crate::config::{
    config_model::{Access, Database, DotEnvyConfig, Identity, Server, Video},
    stage::Stage,
};

pub const DEFAULT_PROTECTED_ROUTES: &str =
    "/dashboard(.*),/schedule(.*),/meeting(.*),/recordings(.*)";
pub const DEFAULT_PUBLIC_ROUTES: &str = "/";
pub const DEFAULT_IGNORED_ROUTES: &str = "/api/webhooks(.*),/api/v1/health-check";

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: required("SERVER_PORT")?
            .parse()
            .context("SERVER_PORT is invalid")?,
        body_limit: required("SERVER_BODY_LIMIT")?
            .parse()
            .context("SERVER_BODY_LIMIT is invalid")?,
        timeout: required("SERVER_TIMEOUT")?
            .parse()
            .context("SERVER_TIMEOUT is invalid")?,
    };

    let database = Database {
        url: required("DATABASE_URL")?,
        max_connections: optional("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS is invalid")?,
    };

    let identity = Identity {
        publishable_key: required("IDENTITY_PUBLISHABLE_KEY")?,
        secret_key: required("IDENTITY_SECRET_KEY")?,
        webhook_secret: required("IDENTITY_WEBHOOK_SECRET")?,
        sign_in_url: optional("IDENTITY_SIGN_IN_URL").unwrap_or_else(|| "/sign-in".to_string()),
        issuer: optional("IDENTITY_ISSUER"),
    };

    let video = Video {
        api_key: required("VIDEO_API_KEY")?,
        api_secret: required("VIDEO_API_SECRET")?,
        base_url: optional("VIDEO_BASE_URL")
            .unwrap_or_else(|| "https://video.stream-io-api.com".to_string()),
        call_type: optional("VIDEO_CALL_TYPE").unwrap_or_else(|| "default".to_string()),
        token_ttl_seconds: optional("VIDEO_TOKEN_TTL_SECONDS")
            .unwrap_or_else(|| "3600".to_string())
            .parse()
            .context("VIDEO_TOKEN_TTL_SECONDS is invalid")?,
    };

    let access = Access {
        protected_routes: split_patterns(
            &optional("ACCESS_PROTECTED_ROUTES")
                .unwrap_or_else(|| DEFAULT_PROTECTED_ROUTES.to_string()),
        ),
        public_routes: split_patterns(
            &optional("ACCESS_PUBLIC_ROUTES").unwrap_or_else(|| DEFAULT_PUBLIC_ROUTES.to_string()),
        ),
        ignored_routes: split_patterns(
            &optional("ACCESS_IGNORED_ROUTES")
                .unwrap_or_else(|| DEFAULT_IGNORED_ROUTES.to_string()),
        ),
    };

    Ok(DotEnvyConfig {
        server,
        database,
        identity,
        video,
        access,
        stage: get_stage(),
    })
}

pub fn get_stage() -> Stage {
    optional("STAGE")
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default()
}

pub fn split_patterns(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|pattern| !pattern.is_empty())
        .map(str::to_string)
        .collect()
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{} is invalid", key))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_patterns_drops_blank_entries() {
        let patterns = split_patterns(" /dashboard(.*), ,/schedule(.*),");
        assert_eq!(patterns, vec!["/dashboard(.*)", "/schedule(.*)"]);
    }

    #[test]
    fn default_protected_routes_cover_every_page_prefix() {
        let patterns = split_patterns(DEFAULT_PROTECTED_ROUTES);
        assert_eq!(patterns.len(), 4);
        assert!(patterns.contains(&"/meeting(.*)".to_string()));
        assert!(patterns.contains(&"/recordings(.*)".to_string()));
    }
}

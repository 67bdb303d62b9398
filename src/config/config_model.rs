use crate::config::stage::Stage;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
    pub identity: Identity,
    pub video: Video,
    pub access: Access,
    pub stage: Stage,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct Identity {
    pub publishable_key: String,
    pub secret_key: String,
    pub webhook_secret: String,
    pub sign_in_url: String,
    pub issuer: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Video {
    pub api_key: String,
    pub api_secret: String,
    pub base_url: String,
    pub call_type: String,
    pub token_ttl_seconds: u64,
}

/// Raw route patterns, parsed into a matcher when the access gate is built.
#[derive(Debug, Clone)]
pub struct Access {
    pub protected_routes: Vec<String>,
    pub public_routes: Vec<String>,
    pub ignored_routes: Vec<String>,
}

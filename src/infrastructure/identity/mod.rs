pub mod jwt_session;
pub mod webhook_signature;

pub mod axum_http;
pub mod identity;
pub mod postgres;
pub mod video;

pub mod comments;
pub mod interviews;
pub mod meetings;
pub mod pages;
pub mod users;
pub mod video;
pub mod webhooks;

pub mod call_lifecycle;
pub mod comments;
pub mod interviews;
pub mod meeting_actions;
pub mod recordings;
pub mod role_resolution;
pub mod users;

pub mod comments;
pub mod enums;
pub mod iam;
pub mod interviews;
pub mod meeting_link;
pub mod render_phase;
pub mod route_access;
pub mod users;
pub mod video_calls;

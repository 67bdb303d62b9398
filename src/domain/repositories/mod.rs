pub mod comments;
pub mod identity;
pub mod interviews;
pub mod users;
pub mod video_calls;

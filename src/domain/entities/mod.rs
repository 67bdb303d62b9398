pub mod comments;
pub mod interviews;
pub mod users;

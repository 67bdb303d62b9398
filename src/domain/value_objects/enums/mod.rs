pub mod interview_statuses;
pub mod meeting_statuses;
pub mod roles;

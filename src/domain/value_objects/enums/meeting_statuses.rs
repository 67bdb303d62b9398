use std::fmt::Display;

use serde::Serialize;

/// Time-derived status of an interview's meeting, used for display.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Upcoming,
    Live,
    Completed,
}

impl Display for MeetingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            MeetingStatus::Upcoming => "upcoming",
            MeetingStatus::Live => "live",
            MeetingStatus::Completed => "completed",
        };
        write!(f, "{}", status)
    }
}

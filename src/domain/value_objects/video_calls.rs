use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provider-side call object as this service needs it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallState {
    pub id: String,
    pub created_by_id: String,
    pub starts_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl CallState {
    pub fn is_created_by(&self, user_external_id: &str) -> bool {
        self.created_by_id == user_external_id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateCallModel {
    pub call_id: String,
    pub created_by_id: String,
    pub starts_at: Option<DateTime<Utc>>,
    pub member_ids: Vec<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallRecording {
    pub filename: String,
    pub url: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl CallRecording {
    pub fn duration_seconds(&self) -> Option<i64> {
        self.end_time
            .map(|end| (end - self.start_time).num_seconds())
            .filter(|seconds| *seconds >= 0)
    }
}

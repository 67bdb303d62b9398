use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Role stored on a user record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Interviewer,
    Candidate,
}

impl Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let role = match self {
            UserRole::Interviewer => "interviewer",
            UserRole::Candidate => "candidate",
        };
        write!(f, "{}", role)
    }
}

impl UserRole {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "interviewer" => Some(UserRole::Interviewer),
            "candidate" => Some(UserRole::Candidate),
            _ => None,
        }
    }
}

/// What role-gated code sees. `Loading` is never treated as either role.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoleState {
    Loading,
    Interviewer,
    Candidate,
}

impl From<UserRole> for RoleState {
    fn from(value: UserRole) -> Self {
        match value {
            UserRole::Interviewer => RoleState::Interviewer,
            UserRole::Candidate => RoleState::Candidate,
        }
    }
}

impl RoleState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RoleState::Loading)
    }

    pub fn is_interviewer(&self) -> bool {
        matches!(self, RoleState::Interviewer)
    }

    pub fn is_candidate(&self) -> bool {
        matches!(self, RoleState::Candidate)
    }
}

use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InterviewStatus {
    #[default]
    Scheduled,
    Completed,
    Succeeded,
    Failed,
}

impl Display for InterviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            InterviewStatus::Scheduled => "scheduled",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Succeeded => "succeeded",
            InterviewStatus::Failed => "failed",
        };
        write!(f, "{}", status)
    }
}

impl InterviewStatus {
    pub const ALL: [InterviewStatus; 4] = [
        InterviewStatus::Scheduled,
        InterviewStatus::Completed,
        InterviewStatus::Succeeded,
        InterviewStatus::Failed,
    ];

    /// Rows written before the rename still carry `upcoming`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "scheduled" | "upcoming" => Some(InterviewStatus::Scheduled),
            "completed" => Some(InterviewStatus::Completed),
            "succeeded" => Some(InterviewStatus::Succeeded),
            "failed" => Some(InterviewStatus::Failed),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            InterviewStatus::Scheduled => 0,
            InterviewStatus::Completed => 1,
            InterviewStatus::Succeeded | InterviewStatus::Failed => 2,
        }
    }

    /// Status only moves forward toward completion.
    pub fn can_transition_to(&self, next: InterviewStatus) -> bool {
        next.rank() > self.rank()
    }

    /// Statuses a row may hold for a move to `self` to be allowed.
    pub fn predecessors(&self) -> Vec<InterviewStatus> {
        InterviewStatus::ALL
            .into_iter()
            .filter(|status| status.can_transition_to(*self))
            .collect()
    }

    pub fn is_at_least_completed(&self) -> bool {
        self.rank() >= InterviewStatus::Completed.rank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_are_monotonic() {
        use InterviewStatus::*;

        assert!(Scheduled.can_transition_to(Completed));
        assert!(Scheduled.can_transition_to(Failed));
        assert!(Completed.can_transition_to(Succeeded));
        assert!(Completed.can_transition_to(Failed));

        assert!(!Completed.can_transition_to(Scheduled));
        assert!(!Completed.can_transition_to(Completed));
        assert!(!Succeeded.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Completed));
    }

    #[test]
    fn predecessors_rank_strictly_lower() {
        use InterviewStatus::*;

        assert!(Scheduled.predecessors().is_empty());
        assert_eq!(Completed.predecessors(), vec![Scheduled]);
        assert_eq!(Succeeded.predecessors(), vec![Scheduled, Completed]);
        assert_eq!(Failed.predecessors(), vec![Scheduled, Completed]);
    }

    #[test]
    fn parse_accepts_legacy_upcoming() {
        assert_eq!(
            InterviewStatus::parse("upcoming"),
            Some(InterviewStatus::Scheduled)
        );
        assert_eq!(InterviewStatus::parse("cancelled"), None);
    }
}

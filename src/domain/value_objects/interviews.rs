use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::domain::{
    entities::interviews::{InsertInterviewEntity, InterviewEntity},
    value_objects::enums::{interview_statuses::InterviewStatus, meeting_statuses::MeetingStatus},
};

/// Meetings without an explicit end are treated as one hour long.
pub const DEFAULT_MEETING_LENGTH_MINUTES: i64 = 60;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InterviewModel {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: InterviewStatus,
    pub stream_call_id: String,
    pub candidate_id: String,
    pub interviewer_ids: Vec<String>,
}

impl From<InterviewEntity> for InterviewModel {
    fn from(value: InterviewEntity) -> Self {
        let status = InterviewStatus::parse(&value.status).unwrap_or_else(|| {
            warn!(
                interview_id = %value.id,
                status = %value.status,
                "interviews: unknown stored status, treating as scheduled"
            );
            InterviewStatus::Scheduled
        });

        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            start_time: value.start_time,
            end_time: value.end_time,
            status,
            stream_call_id: value.stream_call_id,
            candidate_id: value.candidate_id,
            interviewer_ids: value.interviewer_ids,
        }
    }
}

impl InterviewModel {
    pub fn effective_end(&self) -> DateTime<Utc> {
        self.end_time
            .unwrap_or(self.start_time + Duration::minutes(DEFAULT_MEETING_LENGTH_MINUTES))
    }

    pub fn meeting_status(&self, now: DateTime<Utc>) -> MeetingStatus {
        if self.status.is_at_least_completed() {
            return MeetingStatus::Completed;
        }
        if now < self.start_time {
            MeetingStatus::Upcoming
        } else if now <= self.effective_end() {
            MeetingStatus::Live
        } else {
            MeetingStatus::Completed
        }
    }

    pub fn involves(&self, external_id: &str) -> bool {
        self.candidate_id == external_id || self.interviewer_ids.iter().any(|id| id == external_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleInterviewModel {
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub candidate_id: String,
    #[serde(default)]
    pub interviewer_ids: Vec<String>,
}

impl ScheduleInterviewModel {
    pub fn to_entity(
        &self,
        stream_call_id: String,
        interviewer_ids: Vec<String>,
        now: DateTime<Utc>,
    ) -> InsertInterviewEntity {
        InsertInterviewEntity {
            title: self.title.trim().to_string(),
            description: self
                .description
                .as_deref()
                .map(str::trim)
                .filter(|description| !description.is_empty())
                .map(str::to_string),
            start_time: self.start_time,
            end_time: self.end_time,
            status: InterviewStatus::Scheduled.to_string(),
            stream_call_id,
            candidate_id: self.candidate_id.trim().to_string(),
            interviewer_ids,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInterviewStatusModel {
    pub status: InterviewStatus,
}

/// Interviews bucketed the way the dashboard lists them.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct InterviewGroups {
    pub upcoming: Vec<InterviewModel>,
    pub completed: Vec<InterviewModel>,
    pub succeeded: Vec<InterviewModel>,
    pub failed: Vec<InterviewModel>,
}

impl InterviewGroups {
    pub fn from_interviews(interviews: Vec<InterviewModel>, now: DateTime<Utc>) -> Self {
        let mut groups = InterviewGroups::default();
        for interview in interviews {
            match interview.status {
                InterviewStatus::Succeeded => groups.succeeded.push(interview),
                InterviewStatus::Failed => groups.failed.push(interview),
                InterviewStatus::Completed => groups.completed.push(interview),
                InterviewStatus::Scheduled => {
                    if interview.effective_end() < now {
                        groups.completed.push(interview);
                    } else {
                        groups.upcoming.push(interview);
                    }
                }
            }
        }
        groups.upcoming.sort_by_key(|interview| interview.start_time);
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interview(status: InterviewStatus, start: DateTime<Utc>) -> InterviewModel {
        InterviewModel {
            id: Uuid::new_v4(),
            title: "Systems design".to_string(),
            description: None,
            start_time: start,
            end_time: None,
            status,
            stream_call_id: Uuid::new_v4().to_string(),
            candidate_id: "user_candidate".to_string(),
            interviewer_ids: vec!["user_interviewer".to_string()],
        }
    }

    #[test]
    fn meeting_status_follows_the_clock() {
        let now = Utc::now();
        let upcoming = interview(InterviewStatus::Scheduled, now + Duration::hours(2));
        let live = interview(InterviewStatus::Scheduled, now - Duration::minutes(10));
        let past = interview(InterviewStatus::Scheduled, now - Duration::hours(3));

        assert_eq!(upcoming.meeting_status(now), MeetingStatus::Upcoming);
        assert_eq!(live.meeting_status(now), MeetingStatus::Live);
        assert_eq!(past.meeting_status(now), MeetingStatus::Completed);
    }

    #[test]
    fn completed_status_overrides_clock() {
        let now = Utc::now();
        let ended_early = interview(InterviewStatus::Completed, now - Duration::minutes(5));
        assert_eq!(ended_early.meeting_status(now), MeetingStatus::Completed);
    }

    #[test]
    fn groups_by_status_then_time() {
        let now = Utc::now();
        let later = interview(InterviewStatus::Scheduled, now + Duration::hours(5));
        let sooner = interview(InterviewStatus::Scheduled, now + Duration::hours(1));
        let stale = interview(InterviewStatus::Scheduled, now - Duration::days(1));
        let passed = interview(InterviewStatus::Succeeded, now - Duration::days(2));
        let rejected = interview(InterviewStatus::Failed, now - Duration::days(2));

        let groups = InterviewGroups::from_interviews(
            vec![later.clone(), stale.clone(), passed, rejected, sooner.clone()],
            now,
        );

        assert_eq!(groups.upcoming, vec![sooner, later]);
        assert_eq!(groups.completed, vec![stale]);
        assert_eq!(groups.succeeded.len(), 1);
        assert_eq!(groups.failed.len(), 1);
    }

    #[test]
    fn involves_candidate_and_interviewers() {
        let model = interview(InterviewStatus::Scheduled, Utc::now());
        assert!(model.involves("user_candidate"));
        assert!(model.involves("user_interviewer"));
        assert!(!model.involves("user_other"));
    }
}

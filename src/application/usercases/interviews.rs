use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::{
        errors::{UseCaseError, UseCaseResult},
        usercases::role_resolution::RoleResolutionUseCase,
    },
    domain::{
        repositories::{
            interviews::InterviewRepository, users::UserRepository,
            video_calls::VideoCallClient,
        },
        value_objects::{
            enums::{interview_statuses::InterviewStatus, roles::RoleState},
            interviews::{InterviewGroups, InterviewModel, ScheduleInterviewModel},
            video_calls::CreateCallModel,
        },
    },
};

pub struct InterviewsUseCase<I, V, U>
where
    I: InterviewRepository + Send + Sync + 'static,
    V: VideoCallClient + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    interview_repository: Arc<I>,
    video_client: Arc<V>,
    role_resolver: Arc<RoleResolutionUseCase<U>>,
}

impl<I, V, U> InterviewsUseCase<I, V, U>
where
    I: InterviewRepository + Send + Sync + 'static,
    V: VideoCallClient + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(
        interview_repository: Arc<I>,
        video_client: Arc<V>,
        role_resolver: Arc<RoleResolutionUseCase<U>>,
    ) -> Self {
        Self {
            interview_repository,
            video_client,
            role_resolver,
        }
    }

    /// Creates the provider call first, then the interview record keyed by it.
    pub async fn schedule(
        &self,
        requester_id: &str,
        schedule_model: ScheduleInterviewModel,
    ) -> UseCaseResult<InterviewModel> {
        self.role_resolver
            .require_interviewer(requester_id, "schedule interviews")
            .await?;

        validate_schedule(&schedule_model)?;

        let mut interviewer_ids: Vec<String> = Vec::new();
        for id in schedule_model
            .interviewer_ids
            .iter()
            .map(|id| id.trim())
            .chain(std::iter::once(requester_id))
        {
            if !id.is_empty() && !interviewer_ids.iter().any(|existing| existing == id) {
                interviewer_ids.push(id.to_string());
            }
        }

        let candidate_id = schedule_model.candidate_id.trim().to_string();
        let mut member_ids = vec![candidate_id.clone()];
        member_ids.extend(interviewer_ids.iter().cloned());

        let call_id = Uuid::new_v4().to_string();
        info!(
            requester_id,
            %call_id,
            %candidate_id,
            interviewers = interviewer_ids.len(),
            "interviews: scheduling interview"
        );

        let call = self
            .video_client
            .create_call(CreateCallModel {
                call_id: call_id.clone(),
                created_by_id: requester_id.to_string(),
                starts_at: Some(schedule_model.start_time),
                member_ids,
                description: Some(schedule_model.title.trim().to_string()),
            })
            .await
            .map_err(|err| {
                error!(%call_id, error = ?err, "interviews: failed to create call");
                UseCaseError::External("Failed to schedule meeting".to_string(), err)
            })?;

        let entity = schedule_model.to_entity(call.id, interviewer_ids, Utc::now());
        let interview_id = self
            .interview_repository
            .insert(entity.clone())
            .await
            .map_err(|err| {
                error!(%call_id, error = ?err, "interviews: failed to insert interview");
                UseCaseError::Internal(err)
            })?;

        Ok(InterviewModel {
            id: interview_id,
            title: entity.title,
            description: entity.description,
            start_time: entity.start_time,
            end_time: entity.end_time,
            status: InterviewStatus::Scheduled,
            stream_call_id: entity.stream_call_id,
            candidate_id: entity.candidate_id,
            interviewer_ids: entity.interviewer_ids,
        })
    }

    /// Interviewers see every interview, candidates only their own.
    pub async fn list_for(&self, viewer_id: &str) -> UseCaseResult<Vec<InterviewModel>> {
        let role = self.role_resolver.resolve(Some(viewer_id)).await?;
        let interviews = match role {
            RoleState::Loading => return Err(UseCaseError::RoleLoading),
            RoleState::Interviewer => self.interview_repository.list_all().await?,
            RoleState::Candidate => {
                self.interview_repository
                    .list_for_candidate(viewer_id)
                    .await?
            }
        };

        Ok(interviews.into_iter().map(InterviewModel::from).collect())
    }

    pub async fn dashboard_groups(&self, viewer_id: &str) -> UseCaseResult<InterviewGroups> {
        self.role_resolver
            .require_interviewer(viewer_id, "view the dashboard")
            .await?;

        let interviews = self.interview_repository.list_all().await?;
        Ok(InterviewGroups::from_interviews(
            interviews.into_iter().map(InterviewModel::from).collect(),
            Utc::now(),
        ))
    }

    pub async fn find_by_call_id(
        &self,
        viewer_id: &str,
        call_id: &str,
    ) -> UseCaseResult<InterviewModel> {
        let role = self.role_resolver.resolve(Some(viewer_id)).await?;
        let interview = self
            .interview_repository
            .find_by_call_id(call_id)
            .await?
            .map(InterviewModel::from)
            .ok_or_else(|| UseCaseError::NotFound("Interview not found".to_string()))?;

        match role {
            RoleState::Loading => Err(UseCaseError::RoleLoading),
            RoleState::Interviewer => Ok(interview),
            RoleState::Candidate if interview.involves(viewer_id) => Ok(interview),
            RoleState::Candidate => Err(UseCaseError::NotFound("Interview not found".to_string())),
        }
    }

    pub async fn update_status(
        &self,
        requester_id: &str,
        interview_id: Uuid,
        status: InterviewStatus,
    ) -> UseCaseResult<InterviewModel> {
        self.role_resolver
            .require_interviewer(requester_id, "update interview status")
            .await?;

        let mut interview = self
            .interview_repository
            .find_by_id(interview_id)
            .await?
            .map(InterviewModel::from)
            .ok_or_else(|| UseCaseError::NotFound("Interview not found".to_string()))?;

        if !interview.status.can_transition_to(status) {
            warn!(
                requester_id,
                %interview_id,
                from = %interview.status,
                to = %status,
                "interviews: rejected non-monotonic status change"
            );
            return Err(UseCaseError::Conflict(format!(
                "Cannot change status from {} to {}",
                interview.status, status
            )));
        }

        let updated = self
            .interview_repository
            .update_status(interview_id, status.predecessors(), status)
            .await?;
        if !updated {
            warn!(
                requester_id,
                %interview_id,
                to = %status,
                "interviews: status changed concurrently, update skipped"
            );
            return Err(UseCaseError::Conflict(format!(
                "Interview status changed before it could be set to {}",
                status
            )));
        }
        info!(requester_id, %interview_id, %status, "interviews: status updated");

        interview.status = status;
        Ok(interview)
    }
}

fn validate_schedule(schedule_model: &ScheduleInterviewModel) -> UseCaseResult<()> {
    if schedule_model.title.trim().is_empty() {
        return Err(UseCaseError::Validation("Title is required".to_string()));
    }
    if schedule_model.candidate_id.trim().is_empty() {
        return Err(UseCaseError::Validation(
            "Candidate is required".to_string(),
        ));
    }
    if let Some(end_time) = schedule_model.end_time {
        if end_time <= schedule_model.start_time {
            return Err(UseCaseError::Validation(
                "End time must be after start time".to_string(),
            ));
        }
    }
    Ok(())
}

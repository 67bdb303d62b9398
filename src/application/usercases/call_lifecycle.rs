use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::errors::{UseCaseError, UseCaseResult},
    domain::{
        repositories::{interviews::InterviewRepository, video_calls::VideoCallClient},
        value_objects::{
            enums::interview_statuses::InterviewStatus, interviews::InterviewModel,
            meeting_link::validate_call_id, video_calls::CallState,
        },
    },
};

pub const HOME_PATH: &str = "/";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EndCallControl {
    Visible,
    Hidden,
}

/// Only the call's creator sees the control, and only once both the call and
/// its interview record are known.
pub fn end_call_control(
    viewer_external_id: &str,
    call: Option<&CallState>,
    interview: Option<&InterviewModel>,
) -> EndCallControl {
    match (call, interview) {
        (Some(call), Some(_)) if call.is_created_by(viewer_external_id) => EndCallControl::Visible,
        _ => EndCallControl::Hidden,
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MeetingRoomView {
    pub call: CallState,
    pub interview: Option<InterviewModel>,
    pub end_call_control: EndCallControl,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EndCallOutcome {
    pub call_id: String,
    pub interview_id: Uuid,
    pub interview_status: InterviewStatus,
    pub redirect_to: String,
}

pub struct CallLifecycleUseCase<V, I>
where
    V: VideoCallClient + Send + Sync + 'static,
    I: InterviewRepository + Send + Sync + 'static,
{
    video_client: Arc<V>,
    interview_repository: Arc<I>,
}

impl<V, I> CallLifecycleUseCase<V, I>
where
    V: VideoCallClient + Send + Sync + 'static,
    I: InterviewRepository + Send + Sync + 'static,
{
    pub fn new(video_client: Arc<V>, interview_repository: Arc<I>) -> Self {
        Self {
            video_client,
            interview_repository,
        }
    }

    pub async fn load_meeting_room(
        &self,
        viewer_external_id: &str,
        call_id: &str,
    ) -> UseCaseResult<MeetingRoomView> {
        let call = self.find_call(call_id).await?;
        let interview = self.find_interview(call_id).await?;
        let end_call_control =
            end_call_control(viewer_external_id, Some(&call), interview.as_ref());

        Ok(MeetingRoomView {
            call,
            interview,
            end_call_control,
        })
    }

    /// Ends the call for everyone, then marks its interview completed.
    ///
    /// A failure after the call has ended leaves the interview as it was.
    pub async fn end_call(
        &self,
        viewer_external_id: &str,
        call_id: &str,
    ) -> UseCaseResult<EndCallOutcome> {
        let call = self.find_call(call_id).await?;
        let interview = self
            .find_interview(call_id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound("Interview not found".to_string()))?;

        if !call.is_created_by(viewer_external_id) {
            warn!(
                viewer_external_id,
                call_id,
                created_by_id = %call.created_by_id,
                "call_lifecycle: end call rejected for non-owner"
            );
            return Err(UseCaseError::Forbidden(
                "Only the meeting owner can end the call".to_string(),
            ));
        }

        self.video_client.end_call(call_id).await.map_err(|err| {
            error!(call_id, error = ?err, "call_lifecycle: failed to end call");
            UseCaseError::External("Failed to end meeting".to_string(), err)
        })?;
        info!(call_id, "call_lifecycle: call ended");

        let interview_status = if interview.status.is_at_least_completed() {
            info!(
                call_id,
                interview_id = %interview.id,
                status = %interview.status,
                "call_lifecycle: interview already completed"
            );
            interview.status
        } else {
            let completed = InterviewStatus::Completed;
            let updated = self
                .interview_repository
                .update_status(interview.id, completed.predecessors(), completed)
                .await
                .map_err(|err| {
                    error!(
                        call_id,
                        interview_id = %interview.id,
                        error = ?err,
                        "call_lifecycle: call ended but interview status update failed"
                    );
                    UseCaseError::External("Failed to end meeting".to_string(), err)
                })?;
            if updated {
                completed
            } else {
                self.current_status(call_id).await?
            }
        };

        Ok(EndCallOutcome {
            call_id: call.id,
            interview_id: interview.id,
            interview_status,
            redirect_to: HOME_PATH.to_string(),
        })
    }

    /// The interview moved on while the call was ending; report what it holds now.
    async fn current_status(&self, call_id: &str) -> UseCaseResult<InterviewStatus> {
        let status = self
            .find_interview(call_id)
            .await?
            .map(|interview| interview.status)
            .unwrap_or(InterviewStatus::Completed);
        info!(call_id, %status, "call_lifecycle: interview already moved past scheduled");

        Ok(status)
    }

    async fn find_call(&self, call_id: &str) -> UseCaseResult<CallState> {
        validate_call_id(call_id).map_err(|err| {
            warn!(call_id, "call_lifecycle: malformed call id");
            UseCaseError::Validation(err.to_string())
        })?;

        self.video_client
            .find_call(call_id)
            .await
            .map_err(|err| {
                error!(call_id, error = ?err, "call_lifecycle: failed to load call");
                UseCaseError::External("Failed to load meeting".to_string(), err)
            })?
            .ok_or_else(|| UseCaseError::NotFound("Meeting not found".to_string()))
    }

    async fn find_interview(&self, call_id: &str) -> UseCaseResult<Option<InterviewModel>> {
        let interview = self
            .interview_repository
            .find_by_call_id(call_id)
            .await
            .map_err(|err| {
                error!(call_id, error = ?err, "call_lifecycle: failed to load interview");
                UseCaseError::Internal(err)
            })?;

        Ok(interview.map(InterviewModel::from))
    }
}

use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::errors::{UseCaseError, UseCaseResult},
    domain::{
        repositories::video_calls::VideoCallClient,
        value_objects::{
            meeting_link::{meeting_path, parse_call_id},
            video_calls::CreateCallModel,
        },
    },
};

/// Where the client should go once a meeting action succeeds.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MeetingNavigation {
    pub call_id: String,
    pub redirect_to: String,
}

impl MeetingNavigation {
    fn to_meeting(call_id: String) -> Self {
        let redirect_to = meeting_path(&call_id);
        Self {
            call_id,
            redirect_to,
        }
    }
}

pub struct MeetingActionsUseCase<V>
where
    V: VideoCallClient + Send + Sync + 'static,
{
    video_client: Arc<V>,
}

impl<V> MeetingActionsUseCase<V>
where
    V: VideoCallClient + Send + Sync + 'static,
{
    pub fn new(video_client: Arc<V>) -> Self {
        Self { video_client }
    }

    pub async fn create_instant_meeting(
        &self,
        external_id: &str,
    ) -> UseCaseResult<MeetingNavigation> {
        let call_id = Uuid::new_v4().to_string();
        info!(external_id, %call_id, "meeting_actions: creating instant meeting");

        let call = self
            .video_client
            .create_call(CreateCallModel {
                call_id: call_id.clone(),
                created_by_id: external_id.to_string(),
                starts_at: Some(chrono::Utc::now()),
                member_ids: vec![external_id.to_string()],
                description: Some("Instant Meeting".to_string()),
            })
            .await
            .map_err(|err| {
                error!(
                    external_id,
                    %call_id,
                    error = ?err,
                    "meeting_actions: failed to create call"
                );
                UseCaseError::External("Failed to create meeting".to_string(), err)
            })?;

        Ok(MeetingNavigation::to_meeting(call.id))
    }

    /// Validates the pasted link before anything leaves the process.
    pub fn join_meeting(&self, external_id: &str, link: &str) -> UseCaseResult<MeetingNavigation> {
        let call_id = parse_call_id(link).map_err(|err| {
            warn!(external_id, error = %err, "meeting_actions: invalid meeting link");
            UseCaseError::Validation(err.to_string())
        })?;

        info!(external_id, %call_id, "meeting_actions: joining meeting");
        Ok(MeetingNavigation::to_meeting(call_id))
    }
}

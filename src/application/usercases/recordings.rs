use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::{
    application::errors::{UseCaseError, UseCaseResult},
    domain::{
        repositories::video_calls::VideoCallClient,
        value_objects::{
            render_phase::{HydrationSafePlayer, RenderPhase},
            video_calls::CallRecording,
        },
    },
};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecordingView {
    pub call_id: String,
    pub filename: String,
    pub url: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_seconds: Option<i64>,
    /// First-render markup; clients swap in the live element after mount.
    pub player_markup: String,
}

impl RecordingView {
    fn from_recording(call_id: &str, recording: CallRecording) -> Self {
        let player_markup =
            HydrationSafePlayer::new(recording.url.as_str()).render(RenderPhase::Initial);
        Self {
            call_id: call_id.to_string(),
            duration_seconds: recording.duration_seconds(),
            filename: recording.filename,
            url: recording.url,
            start_time: recording.start_time,
            end_time: recording.end_time,
            player_markup,
        }
    }
}

pub struct RecordingsUseCase<V>
where
    V: VideoCallClient + Send + Sync + 'static,
{
    video_client: Arc<V>,
}

impl<V> RecordingsUseCase<V>
where
    V: VideoCallClient + Send + Sync + 'static,
{
    pub fn new(video_client: Arc<V>) -> Self {
        Self { video_client }
    }

    /// Recordings of every call the viewer created or joined, newest first.
    pub async fn list_recordings(&self, viewer_id: &str) -> UseCaseResult<Vec<RecordingView>> {
        let calls = self
            .video_client
            .list_calls_for_member(viewer_id)
            .await
            .map_err(|err| {
                error!(viewer_id, error = ?err, "recordings: failed to list calls");
                UseCaseError::External("Failed to load recordings".to_string(), err)
            })?;

        let mut recordings = Vec::new();
        for call in calls {
            let call_recordings = self
                .video_client
                .list_recordings(&call.id)
                .await
                .map_err(|err| {
                    error!(
                        viewer_id,
                        call_id = %call.id,
                        error = ?err,
                        "recordings: failed to list call recordings"
                    );
                    UseCaseError::External("Failed to load recordings".to_string(), err)
                })?;

            recordings.extend(
                call_recordings
                    .into_iter()
                    .map(|recording| RecordingView::from_recording(&call.id, recording)),
            );
        }

        recordings.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        info!(viewer_id, count = recordings.len(), "recordings: listed");

        Ok(recordings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        repositories::video_calls::MockVideoCallClient, value_objects::video_calls::CallState,
    };
    use chrono::Duration;

    fn call(id: &str) -> CallState {
        CallState {
            id: id.to_string(),
            created_by_id: "user_1".to_string(),
            starts_at: None,
            ended_at: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn merges_recordings_across_calls_newest_first() {
        let now = Utc::now();
        let mut video_client = MockVideoCallClient::new();
        video_client
            .expect_list_calls_for_member()
            .returning(|_| Ok(vec![call("call-a"), call("call-b")]));
        video_client
            .expect_list_recordings()
            .times(2)
            .returning(move |call_id| {
                let offset = if call_id == "call-a" { 2 } else { 1 };
                let start_time = now - Duration::hours(offset);
                Ok(vec![CallRecording {
                    filename: format!("{call_id}.mp4"),
                    url: format!("https://cdn.example/{call_id}.mp4"),
                    start_time,
                    end_time: Some(start_time + Duration::minutes(45)),
                }])
            });

        let usecase = RecordingsUseCase::new(Arc::new(video_client));
        let recordings = usecase.list_recordings("user_1").await.unwrap();

        assert_eq!(recordings.len(), 2);
        assert_eq!(recordings[0].call_id, "call-b");
        assert_eq!(recordings[0].duration_seconds, Some(45 * 60));
        assert!(recordings[0].player_markup.starts_with("<div"));
    }

    #[tokio::test]
    async fn provider_failure_is_external() {
        let mut video_client = MockVideoCallClient::new();
        video_client
            .expect_list_calls_for_member()
            .returning(|_| Err(anyhow::anyhow!("503")));

        let usecase = RecordingsUseCase::new(Arc::new(video_client));

        assert!(matches!(
            usecase.list_recordings("user_1").await,
            Err(UseCaseError::External(_, _))
        ));
    }
}

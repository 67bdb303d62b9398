use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::video_calls::{CallRecording, CallState, CreateCallModel};

/// Hosted video-calling provider. Calls are keyed by an opaque string id.
#[automock]
#[async_trait]
pub trait VideoCallClient {
    async fn create_call(&self, create_call_model: CreateCallModel) -> Result<CallState>;
    async fn find_call(&self, call_id: &str) -> Result<Option<CallState>>;
    /// Ends the call for every participant.
    async fn end_call(&self, call_id: &str) -> Result<()>;
    async fn list_recordings(&self, call_id: &str) -> Result<Vec<CallRecording>>;
    /// Calls the user created or was added to as a member.
    async fn list_calls_for_member(&self, external_id: &str) -> Result<Vec<CallState>>;
    fn issue_user_token(&self, external_id: &str) -> Result<String>;
}

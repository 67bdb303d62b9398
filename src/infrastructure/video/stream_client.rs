use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::{
    StatusCode, Url,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error};

use crate::{
    config::config_model::Video,
    domain::{
        repositories::video_calls::VideoCallClient,
        value_objects::video_calls::{CallRecording, CallState, CreateCallModel},
    },
};

const REQUEST_TIMEOUT_SECS: u64 = 10;
const QUERY_CALLS_LIMIT: u32 = 25;
const LOGGED_BODY_LIMIT: usize = 256;

/// Video provider client built on reqwest.
pub struct StreamVideoClient {
    http: reqwest::Client,
    api_key: String,
    api_secret: String,
    base_url: Url,
    call_type: String,
    token_ttl_seconds: u64,
}

#[derive(Debug, Serialize)]
struct ServerClaims {
    server: bool,
    iat: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct UserTokenClaims {
    pub(crate) user_id: String,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
}

#[derive(Debug, Deserialize)]
struct CallEnvelope {
    call: ProviderCall,
}

#[derive(Debug, Deserialize)]
struct ProviderCall {
    id: String,
    created_by: ProviderUser,
    starts_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: String,
}

#[derive(Debug, Deserialize)]
struct QueryCallsResponse {
    #[serde(default)]
    calls: Vec<CallEnvelope>,
}

#[derive(Debug, Deserialize)]
struct RecordingsResponse {
    #[serde(default)]
    recordings: Vec<ProviderRecording>,
}

#[derive(Debug, Deserialize)]
struct ProviderRecording {
    filename: String,
    url: String,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
}

impl From<ProviderCall> for CallState {
    fn from(value: ProviderCall) -> Self {
        Self {
            id: value.id,
            created_by_id: value.created_by.id,
            starts_at: value.starts_at,
            ended_at: value.ended_at,
            created_at: value.created_at,
        }
    }
}

impl From<ProviderRecording> for CallRecording {
    fn from(value: ProviderRecording) -> Self {
        Self {
            filename: value.filename,
            url: value.url,
            start_time: value.start_time,
            end_time: value.end_time,
        }
    }
}

impl StreamVideoClient {
    pub fn new(config: &Video) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build video provider http client")?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            base_url: Url::parse(config.base_url.trim_end_matches('/'))
                .context("VIDEO_BASE_URL is not a valid url")?,
            call_type: config.call_type.clone(),
            token_ttl_seconds: config.token_ttl_seconds,
        })
    }

    /// Each value in `segments` is escaped as a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("video base url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().append_pair("api_key", &self.api_key);
        Ok(url)
    }

    fn call_url(&self, call_id: &str, action: Option<&str>) -> Result<Url> {
        let mut segments = vec!["video", "call", self.call_type.as_str(), call_id];
        segments.extend(action);
        self.endpoint(&segments)
    }

    fn calls_url(&self) -> Result<Url> {
        self.endpoint(&["video", "calls"])
    }

    fn server_token(&self) -> Result<String> {
        let claims = ServerClaims {
            server: true,
            iat: Utc::now().timestamp(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.api_secret.as_bytes()),
        )
        .context("failed to sign video server token")
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        Ok(request
            .header(AUTHORIZATION, self.server_token()?)
            .header("stream-auth-type", "jwt")
            .header(CONTENT_TYPE, "application/json"))
    }

    async fn ensure_success(resp: reqwest::Response, action: &str) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        error!(
            status = status.as_u16(),
            action,
            "video_client: provider request failed"
        );
        debug!(
            action,
            body = %truncated(&body, LOGGED_BODY_LIMIT),
            "video_client: provider error body"
        );
        anyhow::bail!("video provider {} failed with status {}", action, status)
    }
}

#[async_trait]
impl VideoCallClient for StreamVideoClient {
    async fn create_call(&self, create_call_model: CreateCallModel) -> Result<CallState> {
        let members: Vec<_> = create_call_model
            .member_ids
            .iter()
            .map(|user_id| json!({ "user_id": user_id }))
            .collect();
        let body = json!({
            "data": {
                "created_by_id": create_call_model.created_by_id,
                "starts_at": create_call_model.starts_at,
                "members": members,
                "custom": { "description": create_call_model.description },
            }
        });

        let resp = self
            .authorized(self.http.post(self.call_url(&create_call_model.call_id, None)?))?
            .json(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "create call").await?;

        let envelope: CallEnvelope = resp.json().await?;
        debug!(call_id = %envelope.call.id, "video_client: call created");
        Ok(envelope.call.into())
    }

    async fn find_call(&self, call_id: &str) -> Result<Option<CallState>> {
        let resp = self
            .authorized(self.http.get(self.call_url(call_id, None)?))?
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = Self::ensure_success(resp, "get call").await?;

        let envelope: CallEnvelope = resp.json().await?;
        Ok(Some(envelope.call.into()))
    }

    async fn end_call(&self, call_id: &str) -> Result<()> {
        let resp = self
            .authorized(self.http.post(self.call_url(call_id, Some("mark_ended"))?))?
            .json(&json!({}))
            .send()
            .await?;
        Self::ensure_success(resp, "end call").await?;

        Ok(())
    }

    async fn list_recordings(&self, call_id: &str) -> Result<Vec<CallRecording>> {
        let resp = self
            .authorized(self.http.get(self.call_url(call_id, Some("recordings"))?))?
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "list recordings").await?;

        let recordings: RecordingsResponse = resp.json().await?;
        Ok(recordings
            .recordings
            .into_iter()
            .map(CallRecording::from)
            .collect())
    }

    async fn list_calls_for_member(&self, external_id: &str) -> Result<Vec<CallState>> {
        let body = json!({
            "filter_conditions": {
                "$or": [
                    { "created_by_user_id": external_id },
                    { "members": { "$in": [external_id] } },
                ]
            },
            "sort": [{ "field": "starts_at", "direction": -1 }],
            "limit": QUERY_CALLS_LIMIT,
        });

        let resp = self
            .authorized(self.http.post(self.calls_url()?))?
            .json(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "query calls").await?;

        let calls: QueryCallsResponse = resp.json().await?;
        Ok(calls
            .calls
            .into_iter()
            .map(|envelope| envelope.call.into())
            .collect())
    }

    fn issue_user_token(&self, external_id: &str) -> Result<String> {
        let ttl = i64::try_from(self.token_ttl_seconds).context("token ttl is too large")?;
        let iat = Utc::now().timestamp() - 60;
        let claims = UserTokenClaims {
            user_id: external_id.to_string(),
            iat,
            exp: iat + 60 + ttl,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.api_secret.as_bytes()),
        )
        .context("failed to sign video user token")
    }
}

fn truncated(body: &str, limit: usize) -> &str {
    match body.char_indices().nth(limit) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}

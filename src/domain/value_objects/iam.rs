use serde::{Deserialize, Serialize};

/// Claims carried by an identity-provider session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// The verified identity of the caller, keyed by the provider's user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub external_id: String,
    pub session_id: Option<String>,
}

impl From<SessionClaims> for Identity {
    fn from(value: SessionClaims) -> Self {
        Self {
            external_id: value.sub,
            session_id: value.sid,
        }
    }
}

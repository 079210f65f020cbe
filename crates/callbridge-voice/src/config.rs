use crate::error::VoiceError;
use callbridge_types::{DEFAULT_AGENT_NAME, DEFAULT_ROOM_PREFIX};
use livekit_api::access_token::{AccessToken, VideoGrants};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

fn default_token_ttl_seconds() -> u64 {
    600
}

fn default_request_timeout_seconds() -> u64 {
    120
}

/// Connection settings for the LiveKit control plane.
#[derive(Clone, Serialize, Deserialize)]
pub struct LiveKitConfig {
    /// Server URL. `ws://` and `wss://` forms are accepted and mapped to HTTP.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default, skip_serializing)]
    pub api_secret: String,
    /// Lifetime in seconds of the tokens minted for each API call and agent join.
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: u64,
    /// Upper bound on a single control-plane request. Dialing with
    /// `wait_until_answered` holds the request open while the phone rings.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl Default for LiveKitConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            token_ttl_seconds: default_token_ttl_seconds(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

impl fmt::Debug for LiveKitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveKitConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}

impl LiveKitConfig {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            ..Self::default()
        }
    }

    /// Names the first credential that is missing, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.url.trim().is_empty() {
            Some("url")
        } else if self.api_key.is_empty() {
            Some("api_key")
        } else if self.api_secret.is_empty() {
            Some("api_secret")
        } else {
            None
        }
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Base URL for Twirp calls, without a trailing slash.
    pub fn http_base_url(&self) -> String {
        let url = self.url.trim().trim_end_matches('/');
        if let Some(rest) = url.strip_prefix("wss://") {
            format!("https://{}", rest)
        } else if let Some(rest) = url.strip_prefix("ws://") {
            format!("http://{}", rest)
        } else {
            url.to_string()
        }
    }

    /// Mints a token that lets a participant join `room_name` and publish audio.
    pub fn join_token(
        &self,
        room_name: &str,
        participant_identity: &str,
        participant_name: &str,
    ) -> Result<String, VoiceError> {
        let token = AccessToken::with_api_key(&self.api_key, &self.api_secret)
            .with_identity(participant_identity)
            .with_name(participant_name)
            .with_grants(VideoGrants {
                room_join: true,
                room: room_name.to_string(),
                can_publish: true,
                can_subscribe: true,
                can_publish_data: true,
                ..Default::default()
            })
            .with_ttl(self.token_ttl());

        token.to_jwt().map_err(VoiceError::Token)
    }
}

fn default_agent_name() -> String {
    DEFAULT_AGENT_NAME.to_string()
}

fn default_room_prefix() -> String {
    DEFAULT_ROOM_PREFIX.to_string()
}

fn default_play_dialtone() -> bool {
    true
}

/// Outbound dialing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelephonyConfig {
    /// SIP outbound trunk to dial through. Calls fail without one.
    #[serde(default)]
    pub outbound_trunk_id: Option<String>,
    /// Worker name the agent is dispatched under; must match the worker's registration.
    #[serde(default = "default_agent_name")]
    pub agent_name: String,
    #[serde(default = "default_room_prefix")]
    pub room_prefix: String,
    /// Play a dial tone into the room while the call connects.
    #[serde(default = "default_play_dialtone")]
    pub play_dialtone: bool,
}

impl Default for TelephonyConfig {
    fn default() -> Self {
        Self {
            outbound_trunk_id: None,
            agent_name: default_agent_name(),
            room_prefix: default_room_prefix(),
            play_dialtone: default_play_dialtone(),
        }
    }
}

impl TelephonyConfig {
    /// The configured trunk id, treating blank values as absent.
    pub fn trunk_id(&self) -> Option<&str> {
        self.outbound_trunk_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

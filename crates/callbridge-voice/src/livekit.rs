//! LiveKit control-plane client.
//!
//! Room deletion and agent dispatch go through the `livekit-api` service
//! clients. Dialing posts `CreateSIPParticipant` directly because the service
//! client's error type keeps only `code` and `msg`, and the SIP status of a
//! rejected call travels in the Twirp `meta` map.

use crate::client::{
    AgentDispatch, ControlPlane, ControlPlaneClient, CreateAgentDispatchRequest,
    CreateSipParticipantRequest, SipParticipantInfo,
};
use crate::config::LiveKitConfig;
use crate::error::{TwirpError, VoiceError};
use async_trait::async_trait;
use livekit_api::access_token::{AccessToken, SIPGrants, VideoGrants};
use livekit_api::services::agent_dispatch::AgentDispatchClient;
use livekit_api::services::room::RoomClient;
use livekit_protocol as proto;
use std::fmt;
use tracing::debug;

const SIP_SERVICE: &str = "livekit.SIP";

/// Hands out [`LiveKitClient`]s for a fixed server configuration.
#[derive(Debug, Clone)]
pub struct LiveKitControlPlane {
    config: LiveKitConfig,
}

impl LiveKitControlPlane {
    pub fn new(config: LiveKitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LiveKitConfig {
        &self.config
    }
}

#[async_trait]
impl ControlPlane for LiveKitControlPlane {
    async fn connect(&self) -> Result<Box<dyn ControlPlaneClient>, VoiceError> {
        if let Some(field) = self.config.missing_field() {
            return Err(VoiceError::Config(format!("livekit.{} is not set", field)));
        }
        Ok(Box::new(LiveKitClient::new(self.config.clone())?))
    }
}

pub struct LiveKitClient {
    http: reqwest::Client,
    base_url: String,
    config: LiveKitConfig,
    room_client: RoomClient,
    dispatch_client: AgentDispatchClient,
}

impl fmt::Debug for LiveKitClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveKitClient")
            .field("base_url", &self.base_url)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LiveKitClient {
    pub fn new(config: LiveKitConfig) -> Result<Self, VoiceError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        let base_url = config.http_base_url();
        let room_client = RoomClient::with_api_key(&base_url, &config.api_key, &config.api_secret);
        let dispatch_client =
            AgentDispatchClient::with_api_key(&base_url, &config.api_key, &config.api_secret);
        Ok(Self {
            http,
            base_url,
            config,
            room_client,
            dispatch_client,
        })
    }

    /// Short-lived bearer token for dialing into one room.
    fn sip_call_token(&self, room: &str) -> Result<String, VoiceError> {
        AccessToken::with_api_key(&self.config.api_key, &self.config.api_secret)
            .with_grants(VideoGrants {
                room_create: true,
                room_admin: true,
                room: room.to_string(),
                ..Default::default()
            })
            .with_sip_grants(SIPGrants {
                admin: false,
                call: true,
            })
            .with_ttl(self.config.token_ttl())
            .to_jwt()
            .map_err(VoiceError::Token)
    }
}

#[async_trait]
impl ControlPlaneClient for LiveKitClient {
    async fn create_sip_participant(
        &self,
        request: &CreateSipParticipantRequest,
    ) -> Result<SipParticipantInfo, VoiceError> {
        let token = self.sip_call_token(&request.room_name)?;
        let url = format!("{}/twirp/{}/CreateSIPParticipant", self.base_url, SIP_SERVICE);
        debug!(%url, room = %request.room_name, "creating sip participant");

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let err = serde_json::from_slice::<TwirpError>(&bytes).unwrap_or_else(|_| TwirpError {
                code: status.as_u16().to_string(),
                msg: String::from_utf8_lossy(&bytes).trim().to_string(),
                meta: Default::default(),
            });
            return Err(VoiceError::Twirp(err));
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn create_dispatch(
        &self,
        request: &CreateAgentDispatchRequest,
    ) -> Result<AgentDispatch, VoiceError> {
        let dispatch = self
            .dispatch_client
            .create_dispatch(proto::CreateAgentDispatchRequest {
                agent_name: request.agent_name.clone(),
                room: request.room.clone(),
                metadata: request.metadata.clone(),
                ..Default::default()
            })
            .await
            .map_err(|e| VoiceError::Service(e.to_string()))?;

        Ok(AgentDispatch {
            id: dispatch.id,
            agent_name: dispatch.agent_name,
            room: dispatch.room,
            metadata: dispatch.metadata,
        })
    }

    async fn delete_room(&self, room: &str) -> Result<(), VoiceError> {
        self.room_client
            .delete_room(room)
            .await
            .map_err(|e| VoiceError::Service(e.to_string()))
    }

    /// Nothing to flush; the HTTP connection pools are released when the
    /// boxed client is dropped.
    async fn close(&self) {
        debug!(base_url = %self.base_url, "closing control plane client");
    }
}

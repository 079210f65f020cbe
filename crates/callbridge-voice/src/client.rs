//! Control-plane seam and the wire types it exchanges.

use crate::error::VoiceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Request to dial a phone number into a room over a SIP trunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSipParticipantRequest {
    pub sip_trunk_id: String,
    pub sip_call_to: String,
    pub room_name: String,
    pub participant_identity: String,
    /// Hold the request open until the far end picks up.
    pub wait_until_answered: bool,
    pub play_dialtone: bool,
}

/// The participant created for a dialed phone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SipParticipantInfo {
    #[serde(alias = "participantId")]
    pub participant_id: String,
    #[serde(alias = "participantIdentity")]
    pub participant_identity: String,
    #[serde(alias = "roomName")]
    pub room_name: String,
    #[serde(alias = "sipCallId")]
    pub sip_call_id: String,
}

/// Request to start a named agent worker inside a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAgentDispatchRequest {
    pub agent_name: String,
    pub room: String,
    pub metadata: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentDispatch {
    pub id: String,
    #[serde(alias = "agentName")]
    pub agent_name: String,
    pub room: String,
    pub metadata: String,
}

/// Source of control-plane clients.
///
/// A client is acquired per unit of work and closed when that work ends.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn ControlPlaneClient>, VoiceError>;
}

/// Operations this system needs from the platform's control plane.
#[async_trait]
pub trait ControlPlaneClient: Send + Sync {
    async fn create_sip_participant(
        &self,
        request: &CreateSipParticipantRequest,
    ) -> Result<SipParticipantInfo, VoiceError>;

    async fn create_dispatch(
        &self,
        request: &CreateAgentDispatchRequest,
    ) -> Result<AgentDispatch, VoiceError>;

    async fn delete_room(&self, room: &str) -> Result<(), VoiceError>;

    /// Releases the client. Called exactly once per acquired client.
    async fn close(&self);
}

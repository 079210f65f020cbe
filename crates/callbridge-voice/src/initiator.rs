//! Outbound call placement.

use crate::client::{
    ControlPlane, ControlPlaneClient, CreateAgentDispatchRequest, CreateSipParticipantRequest,
    SipParticipantInfo,
};
use crate::config::TelephonyConfig;
use crate::error::VoiceError;
use callbridge_types::{DialInfo, PhoneNumber, ROOM_SUFFIX_DIGITS};
use rand::Rng;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Result of a call attempt that did not hit an unexpected error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialOutcome {
    /// The phone was dialed and the agent dispatched into `room_name`.
    Connected {
        room_name: String,
        participant: SipParticipantInfo,
        dispatch_id: String,
    },
    /// The call could not be placed; no agent was dispatched.
    Failed { reason: String },
}

impl DialOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DialOutcome::Connected { .. })
    }

    pub fn room_name(&self) -> Option<&str> {
        match self {
            DialOutcome::Connected { room_name, .. } => Some(room_name),
            DialOutcome::Failed { .. } => None,
        }
    }
}

/// Generates `<prefix>-<digits>` with [`ROOM_SUFFIX_DIGITS`] random decimal digits.
pub fn generate_room_name(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let digits: String = (0..ROOM_SUFFIX_DIGITS)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();
    format!("{}-{}", prefix, digits)
}

/// Places outbound calls and hands them to the voice agent.
pub struct CallInitiator {
    control_plane: Arc<dyn ControlPlane>,
    telephony: TelephonyConfig,
}

impl CallInitiator {
    pub fn new(control_plane: Arc<dyn ControlPlane>, telephony: TelephonyConfig) -> Self {
        Self {
            control_plane,
            telephony,
        }
    }

    pub fn telephony(&self) -> &TelephonyConfig {
        &self.telephony
    }

    /// Dials `phone_number` and, once the dial succeeds, dispatches the agent
    /// into the same room with the number as metadata.
    ///
    /// A missing trunk or a rejected dial yields [`DialOutcome::Failed`].
    /// Any other control-plane failure is returned as an error. Nothing is
    /// retried.
    pub async fn place_call(
        &self,
        phone_number: &PhoneNumber,
        wait_for_answer: bool,
    ) -> Result<DialOutcome, VoiceError> {
        let Some(trunk_id) = self.telephony.trunk_id() else {
            error!("outbound trunk id is not configured (LIVEKIT_OUTBOUND_TRUNK_ID)");
            return Ok(DialOutcome::Failed {
                reason: "outbound trunk id is not configured".to_string(),
            });
        };

        let room_name = generate_room_name(&self.telephony.room_prefix);
        let client = self.control_plane.connect().await?;

        let result = self
            .dial_and_dispatch(
                client.as_ref(),
                trunk_id,
                &room_name,
                phone_number,
                wait_for_answer,
            )
            .await;

        client.close().await;
        result
    }

    async fn dial_and_dispatch(
        &self,
        client: &dyn ControlPlaneClient,
        trunk_id: &str,
        room_name: &str,
        phone_number: &PhoneNumber,
        wait_for_answer: bool,
    ) -> Result<DialOutcome, VoiceError> {
        info!(
            phone_number = %phone_number,
            room = room_name,
            wait_for_answer,
            "placing outbound call"
        );

        let dial = CreateSipParticipantRequest {
            sip_trunk_id: trunk_id.to_string(),
            sip_call_to: phone_number.to_string(),
            room_name: room_name.to_string(),
            participant_identity: phone_number.to_string(),
            wait_until_answered: wait_for_answer,
            play_dialtone: self.telephony.play_dialtone,
        };

        let participant = match client.create_sip_participant(&dial).await {
            Ok(participant) => participant,
            Err(VoiceError::Twirp(e)) => {
                match e.sip_status() {
                    Some((code, status)) => error!(
                        room = room_name,
                        sip_status_code = code,
                        sip_status = status,
                        "error creating SIP participant: {}",
                        e.msg
                    ),
                    None => error!(room = room_name, "error creating SIP participant: {}", e.msg),
                }
                return Ok(DialOutcome::Failed {
                    reason: format!("error creating SIP participant: {}", e.msg),
                });
            }
            Err(e) => return Err(e),
        };

        if wait_for_answer {
            info!(room = room_name, "call was answered");
        } else {
            info!(room = room_name, "call initiated");
        }

        let metadata = DialInfo::outbound(phone_number).to_metadata()?;
        let dispatch = client
            .create_dispatch(&CreateAgentDispatchRequest {
                agent_name: self.telephony.agent_name.clone(),
                room: room_name.to_string(),
                metadata,
            })
            .await?;

        if dispatch.id.is_empty() {
            warn!(room = room_name, "agent dispatch returned no id");
        }
        info!(
            room = room_name,
            agent_name = %self.telephony.agent_name,
            dispatch_id = %dispatch.id,
            "agent dispatched, call is now active"
        );

        Ok(DialOutcome::Connected {
            room_name: room_name.to_string(),
            participant,
            dispatch_id: dispatch.id,
        })
    }
}

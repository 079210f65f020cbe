#![allow(dead_code)]

use async_trait::async_trait;
use callbridge_server::AppState;
use callbridge_voice::{
    AgentDispatch, CallInitiator, ControlPlane, ControlPlaneClient, CreateAgentDispatchRequest,
    CreateSipParticipantRequest, SipParticipantInfo, TelephonyConfig, TwirpError, VoiceError,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Copy, PartialEq)]
pub enum Mode {
    Answer,
    Reject,
    Unreachable,
}

/// Control plane that answers, rejects, or fails every dial and records
/// what it was asked to do.
pub struct StubControlPlane {
    mode: Mode,
    pub dials: Arc<Mutex<Vec<CreateSipParticipantRequest>>>,
    pub dispatches: Arc<Mutex<Vec<CreateAgentDispatchRequest>>>,
}

impl StubControlPlane {
    pub fn new(mode: Mode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            dials: Arc::default(),
            dispatches: Arc::default(),
        })
    }

    pub fn dials(&self) -> Vec<CreateSipParticipantRequest> {
        self.dials.lock().unwrap().clone()
    }

    pub fn dispatches(&self) -> Vec<CreateAgentDispatchRequest> {
        self.dispatches.lock().unwrap().clone()
    }
}

struct StubClient {
    mode: Mode,
    dials: Arc<Mutex<Vec<CreateSipParticipantRequest>>>,
    dispatches: Arc<Mutex<Vec<CreateAgentDispatchRequest>>>,
}

#[async_trait]
impl ControlPlane for StubControlPlane {
    async fn connect(&self) -> Result<Box<dyn ControlPlaneClient>, VoiceError> {
        Ok(Box::new(StubClient {
            mode: self.mode,
            dials: self.dials.clone(),
            dispatches: self.dispatches.clone(),
        }))
    }
}

#[async_trait]
impl ControlPlaneClient for StubClient {
    async fn create_sip_participant(
        &self,
        request: &CreateSipParticipantRequest,
    ) -> Result<SipParticipantInfo, VoiceError> {
        self.dials.lock().unwrap().push(request.clone());
        match self.mode {
            Mode::Answer => Ok(SipParticipantInfo {
                participant_id: "PA_1".into(),
                participant_identity: request.participant_identity.clone(),
                room_name: request.room_name.clone(),
                sip_call_id: "SCL_1".into(),
            }),
            Mode::Reject => Err(VoiceError::Twirp(TwirpError {
                code: "unavailable".into(),
                msg: "sip call failed".into(),
                meta: HashMap::from([("sip_status_code".to_string(), "486".to_string())]),
            })),
            Mode::Unreachable => Err(VoiceError::Config("livekit unreachable".into())),
        }
    }

    async fn create_dispatch(
        &self,
        request: &CreateAgentDispatchRequest,
    ) -> Result<AgentDispatch, VoiceError> {
        self.dispatches.lock().unwrap().push(request.clone());
        Ok(AgentDispatch {
            id: "AD_1".into(),
            agent_name: request.agent_name.clone(),
            room: request.room.clone(),
            metadata: request.metadata.clone(),
        })
    }

    async fn delete_room(&self, _room: &str) -> Result<(), VoiceError> {
        Ok(())
    }

    async fn close(&self) {}
}

pub fn telephony(trunk: Option<&str>) -> TelephonyConfig {
    TelephonyConfig {
        outbound_trunk_id: trunk.map(str::to_string),
        ..TelephonyConfig::default()
    }
}

pub fn initiator(control_plane: Arc<StubControlPlane>, trunk: Option<&str>) -> CallInitiator {
    CallInitiator::new(control_plane, telephony(trunk))
}

pub fn state(control_plane: Arc<StubControlPlane>, trunk: Option<&str>) -> AppState {
    AppState {
        initiator: Arc::new(initiator(control_plane, trunk)),
    }
}

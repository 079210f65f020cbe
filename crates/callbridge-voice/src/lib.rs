//! Telephony plumbing for callbridge.
//!
//! Talks to the LiveKit control plane to place outbound SIP calls and to
//! dispatch the voice agent into the resulting room. The control plane is
//! reached through the [`ControlPlane`] seam so that the call flow can be
//! exercised without a live server; [`LiveKitControlPlane`] is the
//! production implementation, built on the `livekit-api` service clients.
//!
//! The call flow itself lives in [`CallInitiator`]: dial first, dispatch the
//! agent only once dialing succeeded, and close the client on every path.

pub mod client;
pub mod config;
pub mod error;
pub mod initiator;
pub mod livekit;

pub use client::{
    AgentDispatch, ControlPlane, ControlPlaneClient, CreateAgentDispatchRequest,
    CreateSipParticipantRequest, SipParticipantInfo,
};
pub use config::{LiveKitConfig, TelephonyConfig};
pub use error::{TwirpError, VoiceError};
pub use initiator::{generate_room_name, CallInitiator, DialOutcome};
pub use livekit::{LiveKitClient, LiveKitControlPlane};

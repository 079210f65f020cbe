//! Shared types and constants for the callbridge workspace.
//!
//! This crate holds the value objects that cross component boundaries: the
//! validated phone number carried from the HTTP gateway and CLI into the call
//! initiator, the dial metadata the initiator attaches to an agent dispatch,
//! and the call direction the voice agent derives from that metadata.
//!
//! The agent name lives here because the initiator's dispatch request and the
//! worker's registration must agree on it for a dispatch to reach the worker.

pub mod dial;
pub mod phone;

pub use dial::{CallDirection, DialInfo};
pub use phone::PhoneNumber;

use thiserror::Error;

/// Logical worker name used both when the agent worker registers and when
/// the call initiator dispatches it into a room.
pub const DEFAULT_AGENT_NAME: &str = "my-telephony-agent";

/// Prefix for generated outbound call room names.
pub const DEFAULT_ROOM_PREFIX: &str = "outbound";

/// Number of random decimal digits appended to a generated room name.
pub const ROOM_SUFFIX_DIGITS: usize = 10;

/// Errors produced while constructing shared value types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    /// The phone number is missing its leading `+` country-code marker, or is
    /// otherwise unusable as a dial target.
    #[error("Phone number must start with '+' (e.g., +18005551234)")]
    InvalidPhoneNumber(String),
}

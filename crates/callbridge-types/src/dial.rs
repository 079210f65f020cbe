//! Dispatch metadata exchanged between the call initiator and the voice agent.

use crate::PhoneNumber;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata attached to an agent dispatch for an outbound call.
///
/// Serialized as `{"phone_number": "+15551234567"}`. The agent only relies on
/// the presence of `phone_number` to tell an outbound call from an inbound one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl DialInfo {
    pub fn outbound(phone_number: &PhoneNumber) -> Self {
        Self {
            phone_number: Some(phone_number.as_str().to_string()),
        }
    }

    /// Encodes the metadata string carried by a dispatch request.
    pub fn to_metadata(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Which side placed the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallDirection {
    /// The caller dialed in; the agent speaks first.
    Inbound,
    /// We dialed out; the callee speaks first.
    Outbound { phone_number: String },
}

impl CallDirection {
    /// Derives the direction from raw job metadata.
    ///
    /// Only a JSON object with a non-empty string `phone_number` is outbound.
    /// Anything else, including unparsable metadata, is treated as inbound.
    /// Parse failures are logged, never returned.
    pub fn from_metadata(metadata: Option<&str>) -> Self {
        let raw = match metadata.map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Self::Inbound,
        };

        match serde_json::from_str::<Value>(raw) {
            Ok(value) => match value.get("phone_number").and_then(Value::as_str) {
                Some(phone_number) if !phone_number.is_empty() => Self::Outbound {
                    phone_number: phone_number.to_string(),
                },
                _ => Self::Inbound,
            },
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse job metadata as JSON");
                Self::Inbound
            }
        }
    }

    pub fn is_outbound(&self) -> bool {
        matches!(self, Self::Outbound { .. })
    }
}

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("LiveKit token error: {0}")]
    Token(#[from] livekit_api::access_token::AccessTokenError),

    #[error("control plane request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Twirp(TwirpError),

    #[error("LiveKit service error: {0}")]
    Service(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl VoiceError {
    /// SIP status code and reason carried by a rejected dial, if any.
    pub fn sip_status(&self) -> Option<(&str, &str)> {
        match self {
            VoiceError::Twirp(e) => e.sip_status(),
            _ => None,
        }
    }
}

/// Error body returned by a Twirp service.
///
/// SIP failures carry the far end's response in `meta` under
/// `sip_status_code` and `sip_status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TwirpError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub meta: HashMap<String, String>,
}

impl TwirpError {
    pub fn sip_status(&self) -> Option<(&str, &str)> {
        let code = self.meta.get("sip_status_code")?;
        let reason = self.meta.get("sip_status").map(String::as_str).unwrap_or("");
        Some((code.as_str(), reason))
    }
}

impl fmt::Display for TwirpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "twirp error {}: {}", self.code, self.msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sip_metadata() {
        let body = r#"{"code":"unavailable","msg":"sip call failed","meta":{"sip_status_code":"486","sip_status":"Busy Here"}}"#;
        let err: TwirpError = serde_json::from_str(body).unwrap();
        assert_eq!(err.sip_status(), Some(("486", "Busy Here")));
        assert_eq!(err.to_string(), "twirp error unavailable: sip call failed");
    }

    #[test]
    fn missing_meta_has_no_sip_status() {
        let err: TwirpError = serde_json::from_str(r#"{"code":"not_found","msg":"no trunk"}"#).unwrap();
        assert!(err.sip_status().is_none());
        assert!(VoiceError::Twirp(err).sip_status().is_none());
        assert!(VoiceError::Config("x".into()).sip_status().is_none());
    }
}

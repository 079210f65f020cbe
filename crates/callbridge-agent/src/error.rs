use callbridge_voice::VoiceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("conversation session error: {0}")]
    Session(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Voice(#[from] VoiceError),
}

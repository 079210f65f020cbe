use crate::agent::DEFAULT_INSTRUCTIONS;
use crate::error::AgentError;
use crate::pipeline::PipelineConfig;
use callbridge_types::DEFAULT_AGENT_NAME;
use serde::{Deserialize, Serialize};

fn default_agent_name() -> String {
    DEFAULT_AGENT_NAME.to_string()
}

fn default_instructions() -> String {
    DEFAULT_INSTRUCTIONS.to_string()
}

fn default_participant_name() -> String {
    "Telephony Agent".to_string()
}

/// Worker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Name registered with the platform. Dispatches must use the same name.
    #[serde(default = "default_agent_name")]
    pub agent_name: String,
    /// Display name of the agent participant in the room.
    #[serde(default = "default_participant_name")]
    pub participant_name: String,
    #[serde(default = "default_instructions")]
    pub instructions: String,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            agent_name: default_agent_name(),
            participant_name: default_participant_name(),
            instructions: default_instructions(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.agent_name.trim().is_empty() {
            return Err(AgentError::Config("agent_name must not be empty".to_string()));
        }
        self.pipeline.validate()
    }
}

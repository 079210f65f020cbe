//! Tools the language model may call during a conversation.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Tool/function definition advertised to the language model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_parameters(mut self, schema: Value) -> Self {
        self.parameters = Some(schema);
        self
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub call_id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Result handed back to the model for a [`ToolCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub call_id: String,
    pub output: Value,
}

impl ToolResponse {
    pub fn from_string(call_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            output: Value::String(output.into()),
        }
    }
}

/// The closed set of tools registered with every conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentTool {
    /// Hang up once the agent has finished speaking.
    EndCall,
    /// Leave a voicemail and hang up.
    DetectedAnsweringMachine,
}

impl AgentTool {
    pub const ALL: [AgentTool; 2] = [AgentTool::EndCall, AgentTool::DetectedAnsweringMachine];

    pub fn name(self) -> &'static str {
        match self {
            AgentTool::EndCall => "end_call",
            AgentTool::DetectedAnsweringMachine => "detected_answering_machine",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AgentTool::EndCall => "Called when the user wants to end the call",
            AgentTool::DetectedAnsweringMachine => {
                "Call this tool if you have detected a voicemail system, AFTER hearing the voicemail greeting"
            }
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// Neither tool takes arguments.
    pub fn definition(self) -> ToolDefinition {
        ToolDefinition::new(self.name())
            .with_description(self.description())
            .with_parameters(json!({
                "type": "object",
                "properties": {},
                "required": []
            }))
    }
}

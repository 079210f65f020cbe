use crate::error::AgentError;
use crate::job::{hangup_call, JobContext};
use crate::pipeline::{ConversationSession, PipelineConfig, SessionStarter};
use crate::tools::{AgentTool, ToolCall, ToolDefinition, ToolResponse};
use callbridge_types::CallDirection;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_INSTRUCTIONS: &str =
    "You are a helpful voice AI assistant. You can handle both inbound and outbound calls.";

pub const GREETING_INSTRUCTIONS: &str = "Greet the user and offer your assistance.";

pub const VOICEMAIL_INSTRUCTIONS: &str =
    "Leave a voicemail message letting the user know you'll call back later.";

/// Silence left after a voicemail before hanging up.
pub const VOICEMAIL_TRAILING_GAP: Duration = Duration::from_millis(500);

/// What a tool handler can reach while it runs.
#[derive(Clone)]
pub struct RunContext {
    pub session: Arc<dyn ConversationSession>,
    /// `None` when the session is not running inside a dispatched job.
    pub job: Option<Arc<JobContext>>,
}

/// The phone agent: its standing instructions and its tools.
#[derive(Debug, Clone)]
pub struct TelephonyAgent {
    instructions: String,
}

impl Default for TelephonyAgent {
    fn default() -> Self {
        Self::new(DEFAULT_INSTRUCTIONS)
    }
}

impl TelephonyAgent {
    pub fn new(instructions: impl Into<String>) -> Self {
        Self {
            instructions: instructions.into(),
        }
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Definitions to register with the language model.
    pub fn tools(&self) -> Vec<ToolDefinition> {
        AgentTool::ALL.iter().map(|tool| tool.definition()).collect()
    }

    /// Runs the tool named by `call`.
    pub async fn call_tool(
        &self,
        call: &ToolCall,
        ctx: &RunContext,
    ) -> Result<ToolResponse, AgentError> {
        let tool = AgentTool::from_name(&call.name)
            .ok_or_else(|| AgentError::UnknownTool(call.name.clone()))?;

        info!(tool = tool.name(), call_id = %call.call_id, "tool called");
        match tool {
            AgentTool::EndCall => self.end_call(ctx).await?,
            AgentTool::DetectedAnsweringMachine => self.detected_answering_machine(ctx).await?,
        }
        Ok(ToolResponse::from_string(&call.call_id, "call ended"))
    }

    async fn end_call(&self, ctx: &RunContext) -> Result<(), AgentError> {
        // let the agent finish speaking
        if let Some(speech) = ctx.session.current_speech() {
            speech.wait_for_playout().await;
        }
        hangup_call(ctx.job.as_deref()).await
    }

    async fn detected_answering_machine(&self, ctx: &RunContext) -> Result<(), AgentError> {
        let speech = ctx.session.generate_reply(VOICEMAIL_INSTRUCTIONS).await?;
        speech.wait_for_playout().await;
        tokio::time::sleep(VOICEMAIL_TRAILING_GAP).await;
        hangup_call(ctx.job.as_deref()).await
    }
}

/// Starts the conversation for one job.
///
/// Builds the pipeline, works out whether we placed the call, and greets the
/// caller only when they dialed in. On an outbound call the callee answered
/// and is expected to speak first.
pub async fn entrypoint(
    ctx: Arc<JobContext>,
    starter: &dyn SessionStarter,
    agent: Arc<TelephonyAgent>,
    pipeline: &PipelineConfig,
) -> Result<Arc<dyn ConversationSession>, AgentError> {
    info!(room = ctx.room_name(), url = %ctx.url, "agent connecting to room");
    let session = starter.start(ctx.clone(), agent, pipeline).await?;

    match CallDirection::from_metadata(ctx.job.metadata.as_deref()) {
        CallDirection::Outbound { phone_number } => {
            info!(room = ctx.room_name(), %phone_number, "outbound call connected");
        }
        CallDirection::Inbound => {
            info!(room = ctx.room_name(), "inbound call, greeting caller");
            session.generate_reply(GREETING_INSTRUCTIONS).await?;
        }
    }

    Ok(session)
}

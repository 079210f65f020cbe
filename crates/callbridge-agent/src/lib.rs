//! The telephony voice agent.
//!
//! A worker registers under a fixed agent name and receives jobs, one per
//! call room. For each job it binds a conversation pipeline (hosted speech
//! recognition, language model, speech synthesis, voice-activity and turn
//! detection, telephony noise cancellation) to the room, greets inbound
//! callers, and otherwise waits for the callee to speak first.
//!
//! The hosted pipeline is an external collaborator reached through
//! [`SessionStarter`] and [`ConversationSession`]. The only logic owned here
//! is role detection at start-up and the two tools the language model may
//! call: [`AgentTool::EndCall`] and [`AgentTool::DetectedAnsweringMachine`].
//!
//! This crate ships no binary. The embedding process supplies the worker
//! transport as a [`JobSource`] and the media pipeline as a
//! [`SessionStarter`], then drives them with [`Worker::run`].

pub mod agent;
pub mod config;
pub mod error;
pub mod job;
pub mod pipeline;
pub mod tools;
pub mod worker;

pub use agent::{entrypoint, RunContext, TelephonyAgent};
pub use config::AgentConfig;
pub use error::AgentError;
pub use job::{hangup_call, Job, JobContext};
pub use pipeline::{
    ConversationSession, LlmConfig, NoiseCancellation, PipelineConfig, PlayoutSignal,
    SessionStarter, SpeechHandle, SttConfig, TtsConfig, TurnDetection, VadConfig,
};
pub use tools::{AgentTool, ToolCall, ToolDefinition, ToolResponse};
pub use worker::{ChannelJobSource, JobSource, Worker};

//! Conversation pipeline configuration and the hosted-session seam.

use crate::agent::TelephonyAgent;
use crate::error::AgentError;
use crate::job::JobContext;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// Speech-to-text service selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    pub provider: String,
    pub model: String,
    /// `multi` enables automatic language detection.
    pub language: String,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            provider: "deepgram".to_string(),
            model: "nova-3".to_string(),
            language: "multi".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    pub provider: String,
    /// Provider default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            provider: "cartesia".to_string(),
            model: None,
            voice: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VadConfig {
    pub provider: String,
}

impl Default for VadConfig {
    fn default() -> Self {
        Self {
            provider: "silero".to_string(),
        }
    }
}

/// How end-of-turn is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TurnDetection {
    /// Multilingual end-of-utterance model.
    #[default]
    Multilingual,
    /// Silence reported by the VAD.
    Vad,
    /// Endpointing from the STT provider.
    Stt,
}

/// Noise cancellation applied to inbound audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoiseCancellation {
    None,
    Bvc,
    /// Background voice cancellation tuned for narrowband phone audio.
    #[default]
    BvcTelephony,
}

/// The hosted services bound to one call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub stt: SttConfig,
    pub llm: LlmConfig,
    pub tts: TtsConfig,
    pub vad: VadConfig,
    pub turn_detection: TurnDetection,
    pub noise_cancellation: NoiseCancellation,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), AgentError> {
        let required = [
            ("stt.provider", &self.stt.provider),
            ("stt.model", &self.stt.model),
            ("llm.provider", &self.llm.provider),
            ("llm.model", &self.llm.model),
            ("tts.provider", &self.tts.provider),
            ("vad.provider", &self.vad.provider),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(AgentError::Config(format!("pipeline.{} must not be empty", field)));
            }
        }
        Ok(())
    }
}

/// Handle to one synthesized utterance.
///
/// Clones observe the same utterance. Playout is complete once the paired
/// [`PlayoutSignal`] finishes or is dropped (interrupted speech).
#[derive(Debug, Clone)]
pub struct SpeechHandle {
    id: String,
    done: watch::Receiver<bool>,
}

/// Producer side of a [`SpeechHandle`], owned by whatever plays the audio.
#[derive(Debug)]
pub struct PlayoutSignal {
    tx: watch::Sender<bool>,
}

impl SpeechHandle {
    pub fn new(id: impl Into<String>) -> (Self, PlayoutSignal) {
        let (tx, rx) = watch::channel(false);
        (
            Self {
                id: id.into(),
                done: rx,
            },
            PlayoutSignal { tx },
        )
    }

    /// A handle whose playout has already completed.
    pub fn finished(id: impl Into<String>) -> Self {
        let (handle, signal) = Self::new(id);
        signal.finish();
        handle
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_done(&self) -> bool {
        *self.done.borrow()
    }

    /// Resolves once the utterance has finished playing or was cut off.
    pub async fn wait_for_playout(&self) {
        let mut rx = self.done.clone();
        // Err means the signal was dropped mid-utterance, which also ends playout.
        let _ = rx.wait_for(|done| *done).await;
    }
}

impl PlayoutSignal {
    pub fn finish(&self) {
        self.tx.send_replace(true);
    }
}

/// A running conversation bound to one room.
///
/// Turn-taking, transcription, generation and synthesis happen inside the
/// hosted pipeline. When the language model calls a tool, the session routes
/// it to [`TelephonyAgent::call_tool`].
#[async_trait]
pub trait ConversationSession: Send + Sync {
    /// Asks the language model for a reply steered by `instructions` and
    /// queues it for synthesis.
    async fn generate_reply(&self, instructions: &str) -> Result<SpeechHandle, AgentError>;

    /// The utterance currently being played, if any.
    fn current_speech(&self) -> Option<SpeechHandle>;

    /// Resolves when the session ends, whether by hangup or room deletion.
    async fn closed(&self);
}

/// Builds the hosted pipeline for a job and starts it in the job's room.
#[async_trait]
pub trait SessionStarter: Send + Sync {
    async fn start(
        &self,
        ctx: Arc<JobContext>,
        agent: Arc<TelephonyAgent>,
        pipeline: &PipelineConfig,
    ) -> Result<Arc<dyn ConversationSession>, AgentError>;
}

#![allow(dead_code)]

use async_trait::async_trait;
use callbridge_agent::{
    AgentError, ConversationSession, JobContext, PipelineConfig, PlayoutSignal, SessionStarter,
    SpeechHandle, TelephonyAgent,
};
use callbridge_voice::{
    AgentDispatch, ControlPlane, ControlPlaneClient, CreateAgentDispatchRequest,
    CreateSipParticipantRequest, SipParticipantInfo, VoiceError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::time::Instant;

/// Control plane double that records room deletions.
#[derive(Default)]
pub struct RecordingControlPlane {
    pub deleted: Arc<Mutex<Vec<(String, Instant)>>>,
    pub connects: AtomicUsize,
    pub closes: Arc<AtomicUsize>,
}

impl RecordingControlPlane {
    pub fn client(&self) -> Arc<dyn ControlPlaneClient> {
        Arc::new(RecordingClient {
            deleted: self.deleted.clone(),
            closes: self.closes.clone(),
        })
    }

    pub fn deleted_rooms(&self) -> Vec<String> {
        self.deleted
            .lock()
            .unwrap()
            .iter()
            .map(|(room, _)| room.clone())
            .collect()
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ControlPlane for RecordingControlPlane {
    async fn connect(&self) -> Result<Box<dyn ControlPlaneClient>, VoiceError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(RecordingClient {
            deleted: self.deleted.clone(),
            closes: self.closes.clone(),
        }))
    }
}

pub struct RecordingClient {
    deleted: Arc<Mutex<Vec<(String, Instant)>>>,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl ControlPlaneClient for RecordingClient {
    async fn create_sip_participant(
        &self,
        _request: &CreateSipParticipantRequest,
    ) -> Result<SipParticipantInfo, VoiceError> {
        Err(VoiceError::Config("agent never dials".into()))
    }

    async fn create_dispatch(
        &self,
        _request: &CreateAgentDispatchRequest,
    ) -> Result<AgentDispatch, VoiceError> {
        Err(VoiceError::Config("agent never dispatches".into()))
    }

    async fn delete_room(&self, room: &str) -> Result<(), VoiceError> {
        self.deleted
            .lock()
            .unwrap()
            .push((room.to_string(), Instant::now()));
        Ok(())
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Conversation double. Replies finish playing immediately unless a pending
/// speech is installed with [`FakeSession::speak`].
pub struct FakeSession {
    pub replies: Mutex<Vec<(String, Instant)>>,
    current: Mutex<Option<SpeechHandle>>,
    closed_tx: watch::Sender<bool>,
}

impl FakeSession {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(Vec::new()),
            current: Mutex::new(None),
            closed_tx: watch::channel(false).0,
        })
    }

    /// Installs an utterance that is still playing.
    pub fn speak(&self) -> PlayoutSignal {
        let (handle, signal) = SpeechHandle::new("speech-current");
        *self.current.lock().unwrap() = Some(handle);
        signal
    }

    pub fn reply_instructions(&self) -> Vec<String> {
        self.replies
            .lock()
            .unwrap()
            .iter()
            .map(|(text, _)| text.clone())
            .collect()
    }

    pub fn close(&self) {
        self.closed_tx.send_replace(true);
    }
}

#[async_trait]
impl ConversationSession for FakeSession {
    async fn generate_reply(&self, instructions: &str) -> Result<SpeechHandle, AgentError> {
        let mut replies = self.replies.lock().unwrap();
        replies.push((instructions.to_string(), Instant::now()));
        Ok(SpeechHandle::finished(format!("speech-{}", replies.len())))
    }

    fn current_speech(&self) -> Option<SpeechHandle> {
        self.current.lock().unwrap().clone()
    }

    async fn closed(&self) {
        let mut rx = self.closed_tx.subscribe();
        let _ = rx.wait_for(|closed| *closed).await;
    }
}

/// Starter double that hands out a fresh [`FakeSession`] per job.
#[derive(Default)]
pub struct FakeStarter {
    pub started: Mutex<Vec<(String, Arc<FakeSession>)>>,
    /// Close sessions as soon as they start, so jobs finish on their own.
    pub close_immediately: bool,
    pub fail: bool,
}

impl FakeStarter {
    pub fn sessions(&self) -> Vec<(String, Arc<FakeSession>)> {
        self.started.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionStarter for FakeStarter {
    async fn start(
        &self,
        ctx: Arc<JobContext>,
        _agent: Arc<TelephonyAgent>,
        _pipeline: &PipelineConfig,
    ) -> Result<Arc<dyn ConversationSession>, AgentError> {
        if self.fail {
            return Err(AgentError::Session("pipeline unavailable".into()));
        }
        let session = FakeSession::new();
        if self.close_immediately {
            session.close();
        }
        self.started
            .lock()
            .unwrap()
            .push((ctx.room_name().to_string(), session.clone()));
        Ok(session)
    }
}

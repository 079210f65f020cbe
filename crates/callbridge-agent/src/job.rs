//! Jobs handed to the worker and the per-job context.

use crate::error::AgentError;
use callbridge_voice::ControlPlaneClient;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// A dispatch of this agent into a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub room: String,
    pub agent_name: String,
    /// Raw dispatch metadata. Outbound calls carry `{"phone_number": ...}`.
    #[serde(default)]
    pub metadata: Option<String>,
}

/// Everything a running job needs to reach its room and the control plane.
pub struct JobContext {
    pub job: Job,
    /// Server URL the conversation session joins.
    pub url: String,
    /// Join token for the agent participant.
    pub token: String,
    api: Arc<dyn ControlPlaneClient>,
}

impl fmt::Debug for JobContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobContext")
            .field("job", &self.job)
            .field("url", &self.url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl JobContext {
    pub fn new(
        job: Job,
        url: impl Into<String>,
        token: impl Into<String>,
        api: Arc<dyn ControlPlaneClient>,
    ) -> Self {
        Self {
            job,
            url: url.into(),
            token: token.into(),
            api,
        }
    }

    pub fn room_name(&self) -> &str {
        &self.job.room
    }

    pub fn api(&self) -> &dyn ControlPlaneClient {
        self.api.as_ref()
    }
}

/// Ends the call by deleting its room.
///
/// Without a job context (the agent is not running inside a live session)
/// this does nothing.
pub async fn hangup_call(ctx: Option<&JobContext>) -> Result<(), AgentError> {
    let Some(ctx) = ctx else {
        debug!("hangup requested outside a job context, ignoring");
        return Ok(());
    };

    info!(room = ctx.room_name(), job_id = %ctx.job.id, "hanging up, deleting room");
    ctx.api().delete_room(ctx.room_name()).await?;
    Ok(())
}

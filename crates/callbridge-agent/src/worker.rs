//! Agent worker: receives jobs and runs one conversation per job.

use crate::agent::{entrypoint, TelephonyAgent};
use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::job::{Job, JobContext};
use crate::pipeline::SessionStarter;
use async_trait::async_trait;
use callbridge_voice::{ControlPlane, ControlPlaneClient, LiveKitConfig};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info, warn};

/// Feed of jobs assigned to this worker.
#[async_trait]
pub trait JobSource: Send {
    /// Next job, or `None` once the feed is closed. Must be cancel-safe.
    async fn next_job(&mut self) -> Option<Job>;
}

/// In-process job feed backed by an mpsc channel.
#[derive(Debug)]
pub struct ChannelJobSource {
    rx: mpsc::Receiver<Job>,
}

impl ChannelJobSource {
    pub fn channel(capacity: usize) -> (mpsc::Sender<Job>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self { rx })
    }
}

#[async_trait]
impl JobSource for ChannelJobSource {
    async fn next_job(&mut self) -> Option<Job> {
        self.rx.recv().await
    }
}

/// Long-running agent worker.
pub struct Worker {
    config: AgentConfig,
    livekit: LiveKitConfig,
    control_plane: Arc<dyn ControlPlane>,
    starter: Arc<dyn SessionStarter>,
    agent: Arc<TelephonyAgent>,
}

impl Worker {
    pub fn new(
        config: AgentConfig,
        livekit: LiveKitConfig,
        control_plane: Arc<dyn ControlPlane>,
        starter: Arc<dyn SessionStarter>,
    ) -> Result<Self, AgentError> {
        config.validate()?;
        let agent = Arc::new(TelephonyAgent::new(config.instructions.clone()));
        Ok(Self {
            config,
            livekit,
            control_plane,
            starter,
            agent,
        })
    }

    pub fn agent_name(&self) -> &str {
        &self.config.agent_name
    }

    /// Pulls jobs until the source closes, running each accepted job in its
    /// own task. Returns after every started job has finished.
    pub async fn run(&self, source: &mut dyn JobSource) -> Result<(), AgentError> {
        info!(agent_name = self.agent_name(), "agent worker registered");
        let mut jobs = JoinSet::new();

        loop {
            tokio::select! {
                next = source.next_job() => match next {
                    Some(job) => self.accept(job, &mut jobs),
                    None => break,
                },
                Some(finished) = jobs.join_next(), if !jobs.is_empty() => {
                    log_job_result(finished);
                }
            }
        }

        info!(
            agent_name = self.agent_name(),
            remaining = jobs.len(),
            "job source closed, draining running jobs"
        );
        while let Some(finished) = jobs.join_next().await {
            log_job_result(finished);
        }
        Ok(())
    }

    fn accept(&self, job: Job, jobs: &mut JoinSet<(String, Result<(), AgentError>)>) {
        if job.agent_name != self.config.agent_name {
            warn!(
                job_id = %job.id,
                requested = %job.agent_name,
                registered = self.agent_name(),
                "ignoring job dispatched to another agent"
            );
            return;
        }

        info!(job_id = %job.id, room = %job.room, "job accepted");
        let runner = JobRunner {
            config: self.config.clone(),
            livekit: self.livekit.clone(),
            control_plane: self.control_plane.clone(),
            starter: self.starter.clone(),
            agent: self.agent.clone(),
        };
        jobs.spawn(async move {
            let job_id = job.id.clone();
            (job_id, runner.run(job).await)
        });
    }
}

fn log_job_result(finished: Result<(String, Result<(), AgentError>), JoinError>) {
    match finished {
        Ok((job_id, Ok(()))) => info!(%job_id, "job finished"),
        Ok((job_id, Err(e))) => error!(%job_id, error = %e, "job failed"),
        Err(e) => error!(error = %e, "job task panicked or was cancelled"),
    }
}

struct JobRunner {
    config: AgentConfig,
    livekit: LiveKitConfig,
    control_plane: Arc<dyn ControlPlane>,
    starter: Arc<dyn SessionStarter>,
    agent: Arc<TelephonyAgent>,
}

impl JobRunner {
    async fn run(self, job: Job) -> Result<(), AgentError> {
        let identity = format!("agent-{}", job.id);
        let token = self
            .livekit
            .join_token(&job.room, &identity, &self.config.participant_name)?;

        let api: Arc<dyn ControlPlaneClient> = Arc::from(self.control_plane.connect().await?);
        let ctx = Arc::new(JobContext::new(job, self.livekit.url.clone(), token, api.clone()));

        let result: Result<(), AgentError> = async {
            let session = entrypoint(
                ctx.clone(),
                self.starter.as_ref(),
                self.agent.clone(),
                &self.config.pipeline,
            )
            .await?;
            session.closed().await;
            info!(room = ctx.room_name(), "conversation ended");
            Ok(())
        }
        .await;

        api.close().await;
        result
    }
}

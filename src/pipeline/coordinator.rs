use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{info, warn};

use super::collaborators::Collaborators;
use super::stage::{StageInput, StageKind, StageOutput, StageRecord, StageSpec, StageStatus};
use crate::transcript::Transcript;

/// Bounded retry budget for the artifact poll stage.
#[derive(Debug, Clone, Copy)]
pub struct PollBudget {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollBudget {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(4),
        }
    }
}

/// Runs a session's post-session stage plan, at most once.
///
/// Stages execute in plan order. A stage whose declared input comes from a
/// failed stage is marked failed without its collaborator being called;
/// stages whose input is the transcript itself are unaffected by earlier
/// failures. Nothing is retried automatically.
pub struct PipelineCoordinator {
    plan: Vec<StageSpec>,
    collaborators: Collaborators,
    poll_budget: PollBudget,
    records: Mutex<Vec<StageRecord>>,
    ran: AtomicBool,
}

impl PipelineCoordinator {
    pub fn new(plan: Vec<StageSpec>, collaborators: Collaborators, poll_budget: PollBudget) -> Self {
        let records = plan.iter().map(|spec| StageRecord::pending(*spec)).collect();
        Self {
            plan,
            collaborators,
            poll_budget,
            records: Mutex::new(records),
            ran: AtomicBool::new(false),
        }
    }

    /// Stage statuses for the presentation layer.
    pub async fn stage_records(&self) -> Vec<StageRecord> {
        self.records.lock().await.clone()
    }

    pub fn has_run(&self) -> bool {
        self.ran.load(Ordering::SeqCst)
    }

    /// Execute the plan against the frozen transcript. A second invocation
    /// is a no-op.
    pub async fn run(&self, session_id: &str, transcript: &Transcript) {
        if self.ran.swap(true, Ordering::SeqCst) {
            warn!("Pipeline for session {} already ran, ignoring", session_id);
            return;
        }

        info!(
            "Running post-session pipeline for {} ({} stages)",
            session_id,
            self.plan.len()
        );

        for position in 0..self.plan.len() {
            let spec = self.plan[position];

            // Resolve the declared input; a failed input stage fails this
            // stage without attempting it.
            let input = match spec.input {
                StageInput::Transcript => None,
                StageInput::OutputOf(kind) => {
                    match self.lookup_output(kind).await {
                        Some(output) => Some(output),
                        None => {
                            let error =
                                format!("not attempted: input stage {} failed", kind.name());
                            warn!("Stage {} {}", spec.kind.name(), error);
                            self.update(position, |r| r.fail(error)).await;
                            continue;
                        }
                    }
                }
            };

            self.update(position, |r| r.status = StageStatus::Running)
                .await;

            let outcome = self.execute(spec.kind, session_id, transcript, input).await;
            match outcome {
                Ok(output) => {
                    info!("Stage {} succeeded for {}", spec.kind.name(), session_id);
                    self.update(position, |r| r.succeed(output)).await;
                }
                Err(message) => {
                    warn!(
                        "Stage {} failed for {}: {}",
                        spec.kind.name(),
                        session_id,
                        message
                    );
                    self.update(position, |r| r.fail(message)).await;
                }
            }
        }

        info!("Post-session pipeline finished for {}", session_id);
    }

    async fn execute(
        &self,
        kind: StageKind,
        session_id: &str,
        transcript: &Transcript,
        input: Option<StageOutput>,
    ) -> Result<StageOutput, String> {
        match kind {
            StageKind::PersistTranscript => self
                .collaborators
                .store
                .save(session_id, transcript)
                .await
                .map(StageOutput::TranscriptHandle)
                .map_err(|e| format!("{e:#}")),

            StageKind::GenerateSummary => self
                .collaborators
                .summarizer
                .summarize(transcript)
                .await
                .map(StageOutput::Summary)
                .map_err(|e| format!("{e:#}")),

            StageKind::ProvisionFollowUp => {
                let names = match input {
                    Some(StageOutput::Summary(summary)) => summary.names,
                    _ => return Err("input stage produced no entity names".to_string()),
                };
                self.collaborators
                    .provisioner
                    .provision(session_id, &names)
                    .await
                    .map(StageOutput::FollowUpLink)
                    .map_err(|e| format!("{e:#}"))
            }

            StageKind::CompileArtifact => self
                .collaborators
                .compiler
                .compile(session_id)
                .await
                .map(|_| StageOutput::CompileAccepted)
                .map_err(|e| format!("{e:#}")),

            StageKind::PollArtifact => self.poll_for_artifact(session_id).await,
        }
    }

    /// Bounded poll loop: either the artifact URL or a timeout failure.
    async fn poll_for_artifact(&self, session_id: &str) -> Result<StageOutput, String> {
        use super::collaborators::ArtifactStatus;

        let budget = self.poll_budget;
        for attempt in 1..=budget.max_attempts {
            match self.collaborators.compiler.poll(session_id).await {
                Ok(ArtifactStatus::Ready { url }) => {
                    info!(
                        "Artifact for {} ready after {} attempt(s)",
                        session_id, attempt
                    );
                    return Ok(StageOutput::ArtifactUrl(url));
                }
                Ok(ArtifactStatus::Pending) => {}
                Err(e) => {
                    warn!("Artifact poll attempt {} for {} errored: {:#}", attempt, session_id, e);
                }
            }
            if attempt < budget.max_attempts {
                tokio::time::sleep(budget.interval).await;
            }
        }

        Err(format!(
            "artifact not ready after {} attempts",
            budget.max_attempts
        ))
    }

    async fn lookup_output(&self, kind: StageKind) -> Option<StageOutput> {
        let records = self.records.lock().await;
        records
            .iter()
            .find(|r| r.kind == kind && r.status == StageStatus::Succeeded)
            .and_then(|r| r.output.clone())
    }

    async fn update(&self, position: usize, apply: impl FnOnce(&mut StageRecord)) {
        let mut records = self.records.lock().await;
        if let Some(record) = records.get_mut(position) {
            apply(record);
        }
    }
}

use serde::{Deserialize, Serialize};

use super::collaborators::{FollowUpLink, Summary, TranscriptHandle};

/// The units of post-session work a variant can schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageKind {
    /// Persist the frozen transcript; yields a durable handle.
    PersistTranscript,
    /// Generate a narrative summary plus extracted entity names.
    GenerateSummary,
    /// Provision a follow-up interview for the counterpart, parameterized by
    /// the extracted names.
    ProvisionFollowUp,
    /// Trigger compilation of the merged artifact combining both interview
    /// summaries.
    CompileArtifact,
    /// Poll for the finalized compiled artifact within a bounded budget.
    PollArtifact,
}

impl StageKind {
    pub fn name(&self) -> &'static str {
        match self {
            StageKind::PersistTranscript => "persist-transcript",
            StageKind::GenerateSummary => "generate-summary",
            StageKind::ProvisionFollowUp => "provision-follow-up",
            StageKind::CompileArtifact => "compile-artifact",
            StageKind::PollArtifact => "poll-artifact",
        }
    }
}

/// A stage's declared input, fixed at plan-definition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageInput {
    /// The session's frozen transcript.
    Transcript,
    /// The output of an earlier stage in the plan.
    OutputOf(StageKind),
}

/// One stage of a variant's plan: what to run and what it consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSpec {
    pub kind: StageKind,
    pub input: StageInput,
}

impl StageSpec {
    pub fn new(kind: StageKind, input: StageInput) -> Self {
        Self { kind, input }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// What a succeeded stage produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageOutput {
    TranscriptHandle(TranscriptHandle),
    Summary(Summary),
    FollowUpLink(FollowUpLink),
    /// Compilation accepted by the backend; completion is observed by the
    /// poll stage.
    CompileAccepted,
    /// URL of the finalized compiled artifact.
    ArtifactUrl(String),
}

/// Per-stage bookkeeping exposed to the presentation layer, so partial
/// success is visible stage by stage.
#[derive(Debug, Clone, Serialize)]
pub struct StageRecord {
    pub kind: StageKind,
    pub input: StageInput,
    pub status: StageStatus,
    pub output: Option<StageOutput>,
    pub error: Option<String>,
}

impl StageRecord {
    pub(crate) fn pending(spec: StageSpec) -> Self {
        Self {
            kind: spec.kind,
            input: spec.input,
            status: StageStatus::Pending,
            output: None,
            error: None,
        }
    }

    pub(crate) fn succeed(&mut self, output: StageOutput) {
        self.status = StageStatus::Succeeded;
        self.output = Some(output);
    }

    pub(crate) fn fail(&mut self, error: String) {
        self.status = StageStatus::Failed;
        self.error = Some(error);
    }
}

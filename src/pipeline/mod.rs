//! Post-session pipeline
//!
//! When a session terminates, its frozen transcript is handed to the
//! [`PipelineCoordinator`], which runs the variant's ordered stage plan:
//! persist the transcript, generate a narrative summary with extracted
//! entity names, provision a follow-up interview or trigger artifact
//! compilation, and poll for the finalized compiled artifact. Each stage is
//! attempted once; failures are recorded per stage and propagate only to
//! stages that declared the failed stage's output as their input.

mod collaborators;
mod coordinator;
mod http;
mod stage;

pub use collaborators::{
    ArtifactCompiler, ArtifactStatus, Collaborators, EntityNames, FollowUpLink, FollowUpProvisioner,
    Summarizer, Summary, TranscriptHandle, TranscriptStore,
};
pub use coordinator::{PipelineCoordinator, PollBudget};
pub use http::HttpBackend;
pub use stage::{StageInput, StageKind, StageOutput, StageRecord, StageSpec, StageStatus};

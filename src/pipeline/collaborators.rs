use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::transcript::Transcript;

/// Durable handle to a persisted transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptHandle {
    pub id: String,
}

/// Entity names extracted from a narrative summary: the solution-provider
/// name, the counterpart name, and the project name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityNames {
    pub lead_entity: String,
    pub partner_entity: String,
    pub project_title: String,
}

/// Narrative summary of a transcript plus the names it mentions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub text: String,
    pub names: EntityNames,
}

/// Link to a provisioned follow-up interview for the counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpLink {
    pub url: String,
}

/// Availability of the compiled artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status")]
pub enum ArtifactStatus {
    /// Not compiled yet; poll again.
    Pending,
    /// Finalized and downloadable.
    Ready { url: String },
}

/// Persistence collaborator.
#[async_trait::async_trait]
pub trait TranscriptStore: Send + Sync {
    async fn save(&self, session_id: &str, transcript: &Transcript) -> Result<TranscriptHandle>;
}

/// Summarization collaborator.
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, transcript: &Transcript) -> Result<Summary>;

    /// Re-extract names from edited summary text.
    async fn extract_names(&self, text: &str) -> Result<EntityNames>;
}

/// Interview-provisioning collaborator.
#[async_trait::async_trait]
pub trait FollowUpProvisioner: Send + Sync {
    async fn provision(&self, session_id: &str, names: &EntityNames) -> Result<FollowUpLink>;
}

/// Artifact-compilation collaborator.
#[async_trait::async_trait]
pub trait ArtifactCompiler: Send + Sync {
    /// Trigger compilation of the merged artifact.
    async fn compile(&self, session_id: &str) -> Result<()>;

    /// Check whether the finalized artifact is available.
    async fn poll(&self, session_id: &str) -> Result<ArtifactStatus>;
}

/// The collaborator set a coordinator drives.
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn TranscriptStore>,
    pub summarizer: Arc<dyn Summarizer>,
    pub provisioner: Arc<dyn FollowUpProvisioner>,
    pub compiler: Arc<dyn ArtifactCompiler>,
}

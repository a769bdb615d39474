use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use super::collaborators::{
    ArtifactCompiler, ArtifactStatus, EntityNames, FollowUpLink, FollowUpProvisioner, Summarizer,
    Summary, TranscriptHandle, TranscriptStore,
};
use crate::transcript::Transcript;

/// JSON-over-HTTP implementation of every pipeline collaborator, speaking to
/// the case-study backend. Responses carry a `status` discriminator;
/// anything but `"success"` is treated as a stage failure.
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[derive(Debug, Deserialize)]
struct SaveResponse {
    status: String,
    #[serde(default)]
    transcript_id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    status: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    names: EntityNames,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NamesResponse {
    status: String,
    #[serde(default)]
    names: EntityNames,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LinkResponse {
    status: String,
    #[serde(default)]
    interview_link: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArtifactResponse {
    status: String,
    #[serde(default)]
    artifact_url: Option<String>,
}

fn failure(endpoint: &str, message: Option<String>) -> anyhow::Error {
    anyhow::anyhow!(
        "{} returned error status: {}",
        endpoint,
        message.unwrap_or_else(|| "no detail".to_string())
    )
}

#[async_trait::async_trait]
impl TranscriptStore for HttpBackend {
    async fn save(&self, session_id: &str, transcript: &Transcript) -> Result<TranscriptHandle> {
        let response: SaveResponse = self
            .http
            .post(self.url("save_transcript"))
            .query(&[("session_id", session_id)])
            .json(transcript.entries())
            .send()
            .await
            .context("save_transcript request failed")?
            .json()
            .await
            .context("save_transcript returned invalid JSON")?;

        if response.status != "success" {
            return Err(failure("save_transcript", response.message));
        }

        let id = response
            .transcript_id
            .unwrap_or_else(|| session_id.to_string());
        info!("Transcript for {} persisted as {}", session_id, id);
        Ok(TranscriptHandle { id })
    }
}

#[async_trait::async_trait]
impl Summarizer for HttpBackend {
    async fn summarize(&self, transcript: &Transcript) -> Result<Summary> {
        let body = serde_json::json!({ "transcript": transcript.formatted() });
        let response: SummaryResponse = self
            .http
            .post(self.url("generate_summary"))
            .json(&body)
            .send()
            .await
            .context("generate_summary request failed")?
            .json()
            .await
            .context("generate_summary returned invalid JSON")?;

        if response.status != "success" {
            return Err(failure("generate_summary", response.message));
        }

        Ok(Summary {
            text: response.text,
            names: response.names,
        })
    }

    async fn extract_names(&self, text: &str) -> Result<EntityNames> {
        let body = serde_json::json!({ "summary": text });
        let response: NamesResponse = self
            .http
            .post(self.url("extract_names"))
            .json(&body)
            .send()
            .await
            .context("extract_names request failed")?
            .json()
            .await
            .context("extract_names returned invalid JSON")?;

        if response.status != "success" {
            return Err(failure("extract_names", response.message));
        }

        Ok(response.names)
    }
}

#[async_trait::async_trait]
impl FollowUpProvisioner for HttpBackend {
    async fn provision(&self, session_id: &str, names: &EntityNames) -> Result<FollowUpLink> {
        let body = serde_json::json!({
            "session_id": session_id,
            "solution_provider": names.lead_entity,
            "client_name": names.partner_entity,
            "project_name": names.project_title,
        });
        let response: LinkResponse = self
            .http
            .post(self.url("generate_client_interview_link"))
            .json(&body)
            .send()
            .await
            .context("generate_client_interview_link request failed")?
            .json()
            .await
            .context("generate_client_interview_link returned invalid JSON")?;

        if response.status != "success" {
            return Err(failure("generate_client_interview_link", response.message));
        }

        let url = response
            .interview_link
            .context("generate_client_interview_link returned no link")?;
        info!("Follow-up interview provisioned for {}: {}", session_id, url);
        Ok(FollowUpLink { url })
    }
}

#[async_trait::async_trait]
impl ArtifactCompiler for HttpBackend {
    async fn compile(&self, session_id: &str) -> Result<()> {
        let body = serde_json::json!({ "session_id": session_id });
        let response: StatusResponse = self
            .http
            .post(self.url("generate_full_case_study"))
            .json(&body)
            .send()
            .await
            .context("generate_full_case_study request failed")?
            .json()
            .await
            .context("generate_full_case_study returned invalid JSON")?;

        if response.status != "success" {
            return Err(failure("generate_full_case_study", response.message));
        }
        Ok(())
    }

    async fn poll(&self, session_id: &str) -> Result<ArtifactStatus> {
        let response: ArtifactResponse = self
            .http
            .get(self.url("artifact_status"))
            .query(&[("session_id", session_id)])
            .send()
            .await
            .context("artifact_status request failed")?
            .json()
            .await
            .context("artifact_status returned invalid JSON")?;

        match (response.status.as_str(), response.artifact_url) {
            ("success", Some(url)) => Ok(ArtifactStatus::Ready { url }),
            _ => Ok(ArtifactStatus::Pending),
        }
    }
}

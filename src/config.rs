use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

use crate::pipeline::PollBudget;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub realtime: RealtimeConfig,
    pub backend: BackendConfig,
    pub pipeline: PipelineConfig,
    pub budgets: BudgetConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Parameters of the realtime endpoint and the session-configuration frame.
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    /// Where the local session description is posted during negotiation.
    pub endpoint: String,
    /// Where the ephemeral credential is minted.
    pub credential_url: String,
    pub voice: String,
    pub transcription_model: String,
    pub turn_detection_mode: String,
}

/// The case-study backend the pipeline collaborators call.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub poll_max_attempts: u32,
    pub poll_interval_secs: u64,
}

impl PipelineConfig {
    pub fn poll_budget(&self) -> PollBudget {
        PollBudget {
            max_attempts: self.poll_max_attempts,
            interval: Duration::from_secs(self.poll_interval_secs),
        }
    }
}

/// Maximum-duration budgets per interview variant.
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetConfig {
    pub feedback_secs: u64,
    pub interview_secs: u64,
}

impl BudgetConfig {
    pub fn feedback(&self) -> Duration {
        Duration::from_secs(self.feedback_secs)
    }

    pub fn interview(&self) -> Duration {
        Duration::from_secs(self.interview_secs)
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

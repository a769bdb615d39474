use chrono::{DateTime, Utc};
use serde::Serialize;

use super::profile::ParticipantRole;
use super::state::{EndReason, SessionState};

/// Point-in-time snapshot of a session, served by the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub session_id: String,
    pub role: ParticipantRole,
    pub state: SessionState,
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
    /// Finalized utterances in the transcript so far.
    pub utterances: usize,
    pub end_reason: Option<EndReason>,
}

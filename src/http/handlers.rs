use super::state::AppState;
use crate::error::EngineError;
use crate::pipeline::{EntityNames, PipelineCoordinator};
use crate::session::{EndReason, InterviewSession, SessionProfile, SessionStats};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartInterviewRequest {
    /// Interview variant: "feedback", "provider", or "client".
    pub variant: String,

    /// Optional session ID (if not provided, generate UUID)
    pub session_id: Option<String>,

    /// Interaction surface this session is bound to; at most one live
    /// session per surface.
    pub surface: Option<String>,

    /// Known entity names (required for the client variant).
    pub names: Option<EntityNames>,
}

#[derive(Debug, Serialize)]
pub struct StartInterviewResponse {
    pub session_id: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct EndInterviewResponse {
    pub session_id: String,
    pub status: String,
    pub stats: SessionStats,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: String) -> axum::response::Response {
    (status, Json(ErrorResponse { error })).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /interviews/start
/// Create a session for the requested variant and connect it
pub async fn start_interview(
    State(state): State<AppState>,
    Json(req): Json<StartInterviewRequest>,
) -> impl IntoResponse {
    let session_id = req
        .session_id
        .unwrap_or_else(|| format!("interview-{}", uuid::Uuid::new_v4()));
    let surface = req.surface.unwrap_or_else(|| "default".to_string());

    info!(
        "Starting {} interview {} on surface {}",
        req.variant, session_id, surface
    );

    // One live session per surface.
    {
        let sessions = state.sessions.read().await;
        if sessions.contains_key(&session_id) {
            return error_response(
                StatusCode::CONFLICT,
                format!("Session {} already exists", session_id),
            );
        }
        let busy = sessions
            .values()
            .any(|s| s.surface() == surface && !s.is_ended());
        if busy {
            return error_response(
                StatusCode::CONFLICT,
                format!("Surface {} already has a live session", surface),
            );
        }
    }

    let profile = match build_profile(&state, &req.variant, req.names) {
        Ok(profile) => profile,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    let pipeline = PipelineCoordinator::new(
        profile.stages.clone(),
        state.collaborators.clone(),
        state.config.pipeline.poll_budget(),
    );
    let transport = state.transport_for(&session_id);
    let session = InterviewSession::new(&session_id, &surface, profile, transport, pipeline);

    if let Err(e) = session.start().await {
        error!("Failed to start session {}: {}", session_id, e);
        let status = match e {
            EngineError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::BAD_GATEWAY,
        };
        return error_response(status, format!("Failed to start interview: {e}"));
    }

    {
        let mut sessions = state.sessions.write().await;
        sessions.insert(session_id.clone(), session);
    }

    info!("Interview {} started successfully", session_id);

    (
        StatusCode::OK,
        Json(StartInterviewResponse {
            session_id: session_id.clone(),
            status: "negotiating".to_string(),
            message: format!("Interview {} started", session_id),
        }),
    )
        .into_response()
}

fn build_profile(
    state: &AppState,
    variant: &str,
    names: Option<EntityNames>,
) -> Result<SessionProfile, String> {
    let budgets = &state.config.budgets;
    let mut profile = match variant {
        "feedback" => SessionProfile::feedback().with_max_duration(budgets.feedback()),
        "provider" => SessionProfile::provider().with_max_duration(budgets.interview()),
        "client" => {
            let names =
                names.ok_or_else(|| "client interviews require entity names".to_string())?;
            SessionProfile::client(names).with_max_duration(budgets.interview())
        }
        other => return Err(format!("Unknown interview variant: {other}")),
    };

    let realtime = &state.config.realtime;
    profile.voice = realtime.voice.clone();
    profile.transcription_model = realtime.transcription_model.clone();
    profile.turn_detection_mode = realtime.turn_detection_mode.clone();
    Ok(profile)
}

/// POST /interviews/:session_id/end
/// Explicit user end action. Idempotent.
pub async fn end_interview(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let session = find_session(&state, &session_id).await;

    match session {
        Some(session) => {
            session.end_conversation(EndReason::UserAction).await;
            let stats = session.stats().await;
            (
                StatusCode::OK,
                Json(EndInterviewResponse {
                    session_id,
                    status: "ended".to_string(),
                    stats,
                }),
            )
                .into_response()
        }
        None => not_found(&session_id),
    }
}

/// GET /interviews/:session_id/status
pub async fn get_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match find_session(&state, &session_id).await {
        Some(session) => (StatusCode::OK, Json(session.stats().await)).into_response(),
        None => not_found(&session_id),
    }
}

/// GET /interviews/:session_id/transcript
/// Utterance log accumulated so far
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match find_session(&state, &session_id).await {
        Some(session) => (StatusCode::OK, Json(session.utterances().await)).into_response(),
        None => not_found(&session_id),
    }
}

/// GET /interviews/:session_id/pipeline
/// Post-session stage statuses, including partial failures
pub async fn get_pipeline(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match find_session(&state, &session_id).await {
        Some(session) => (StatusCode::OK, Json(session.pipeline_records().await)).into_response(),
        None => not_found(&session_id),
    }
}

#[derive(Debug, Deserialize)]
pub struct ExtractNamesRequest {
    /// Edited summary text to re-extract entity names from.
    pub summary: String,
}

/// POST /names/extract
/// Re-extract entity names after the summary was edited
pub async fn extract_names(
    State(state): State<AppState>,
    Json(req): Json<ExtractNamesRequest>,
) -> impl IntoResponse {
    match state
        .collaborators
        .summarizer
        .extract_names(&req.summary)
        .await
    {
        Ok(names) => (StatusCode::OK, Json(names)).into_response(),
        Err(e) => {
            error!("Name extraction failed: {:#}", e);
            error_response(
                StatusCode::BAD_GATEWAY,
                format!("Name extraction failed: {e:#}"),
            )
        }
    }
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn find_session(state: &AppState, session_id: &str) -> Option<Arc<InterviewSession>> {
    let sessions = state.sessions.read().await;
    sessions.get(session_id).cloned()
}

fn not_found(session_id: &str) -> axum::response::Response {
    error_response(
        StatusCode::NOT_FOUND,
        format!("Session {} not found", session_id),
    )
}

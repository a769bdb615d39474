//! HTTP API server for external control (the interview page)
//!
//! This module provides a REST API for driving interview sessions:
//! - POST /interviews/start - Create and connect a session
//! - POST /interviews/:id/end - Explicit user end action
//! - GET /interviews/:id/status - Query session state
//! - GET /interviews/:id/transcript - Get the utterance log
//! - GET /interviews/:id/pipeline - Get post-session stage statuses
//! - POST /names/extract - Re-extract entity names from an edited summary
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;

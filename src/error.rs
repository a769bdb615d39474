use thiserror::Error;

/// Errors surfaced at the engine seams.
///
/// Collaborator implementations and the binary use `anyhow` internally; this
/// taxonomy exists where callers need to distinguish outcomes: connection
/// setup, frame decoding, and pipeline stage bookkeeping.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Credential or handshake failure. Fatal to the attempt; the session
    /// stays in `Idle` and is never retried automatically.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Audio capture refused by the user or environment. Fatal to starting.
    #[error("audio capture permission denied: {0}")]
    PermissionDenied(String),

    /// Malformed inbound frame. The frame is dropped and the session
    /// continues.
    #[error("malformed protocol frame: {0}")]
    ProtocolDecode(String),

    /// A pipeline stage's collaborator call failed or returned an error
    /// status. Recorded per-stage; independent stages still run.
    #[error("pipeline stage {stage} failed: {message}")]
    Stage { stage: String, message: String },
}

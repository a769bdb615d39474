pub mod config;
pub mod error;
pub mod http;
pub mod pipeline;
pub mod protocol;
pub mod session;
pub mod transcript;
pub mod transport;

pub use config::Config;
pub use error::EngineError;
pub use http::{create_router, AppState};
pub use pipeline::{
    ArtifactStatus, Collaborators, EntityNames, HttpBackend, PipelineCoordinator, PollBudget,
    StageKind, StageRecord, StageStatus, Summary,
};
pub use protocol::{ClientEvent, ServerEvent};
pub use session::{
    EndReason, FarewellDetector, InterviewSession, ParticipantRole, SessionProfile, SessionState,
    SessionStats,
};
pub use transcript::{Speaker, Transcript, TranscriptAssembler, Utterance};
pub use transport::{TransportAdapter, LoopbackMedia, LoopbackPeer};

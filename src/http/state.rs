use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::pipeline::{Collaborators, HttpBackend};
use crate::session::InterviewSession;
use crate::transport::{
    CredentialProvider, HttpCredentialProvider, HttpNegotiator, MediaFactory, Negotiator,
    TransportAdapter,
};

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Live and ended sessions (session_id → session). Ended sessions stay
    /// queryable for their transcript and pipeline status.
    pub sessions: Arc<RwLock<HashMap<String, Arc<InterviewSession>>>>,
    pub collaborators: Collaborators,
    pub media: Arc<dyn MediaFactory>,
    pub negotiator: Arc<dyn Negotiator>,
    pub credentials: Arc<dyn CredentialProvider>,
}

impl AppState {
    /// Production wiring: HTTP collaborators against the configured backend
    /// and realtime endpoint. The media stack is embedder-provided.
    pub fn new(config: Config, media: Arc<dyn MediaFactory>) -> Self {
        let backend = Arc::new(HttpBackend::new(&config.backend.base_url));
        let collaborators = Collaborators {
            store: backend.clone(),
            summarizer: backend.clone(),
            provisioner: backend.clone(),
            compiler: backend,
        };
        let negotiator = Arc::new(HttpNegotiator::new(&config.realtime.endpoint));
        let credentials = Arc::new(HttpCredentialProvider::new(&config.realtime.credential_url));

        Self::with_services(config, collaborators, media, negotiator, credentials)
    }

    /// Explicit wiring of every collaborator.
    pub fn with_services(
        config: Config,
        collaborators: Collaborators,
        media: Arc<dyn MediaFactory>,
        negotiator: Arc<dyn Negotiator>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            collaborators,
            media,
            negotiator,
            credentials,
        }
    }

    /// A transport adapter for a new session.
    pub fn transport_for(&self, session_id: &str) -> TransportAdapter {
        TransportAdapter::new(
            self.media.create(session_id),
            self.negotiator.clone(),
            self.credentials.clone(),
        )
    }
}

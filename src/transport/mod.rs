//! Realtime transport adapter
//!
//! The adapter owns connection setup and teardown for one session: mint a
//! short-lived credential, produce a local description through the media
//! collaborator, negotiate it against the remote endpoint, and open the
//! event data channel. Teardown releases the capture device exactly once no
//! matter how many termination paths request it.

mod http;
mod loopback;

pub use http::{HttpCredentialProvider, HttpNegotiator};
pub use loopback::{LoopbackFactory, LoopbackMedia, LoopbackPeer, StaticCredentials, StaticNegotiator};

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::EngineError;

/// Short-lived credential minted by the authentication collaborator.
#[derive(Debug, Clone)]
pub struct EphemeralCredential {
    pub secret: String,
}

/// Authentication collaborator: mints the ephemeral credential the
/// negotiation requires.
#[async_trait::async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn mint(&self) -> Result<EphemeralCredential, EngineError>;
}

/// Negotiation collaborator: exchanges the local description for the remote
/// one, authenticated with the ephemeral credential.
#[async_trait::async_trait]
pub trait Negotiator: Send + Sync {
    async fn negotiate(
        &self,
        local_description: &str,
        credential: &EphemeralCredential,
    ) -> Result<String, EngineError>;
}

/// Paired frame channels of the event data channel.
#[derive(Debug)]
pub struct DataChannel {
    /// Frames arriving from the remote endpoint.
    pub inbound: mpsc::Receiver<String>,
    /// Frames sent to the remote endpoint.
    pub outbound: mpsc::Sender<String>,
}

/// Media-stack collaborator. Codec negotiation internals and audio capture
/// live behind this seam; the engine only sequences the calls.
#[async_trait::async_trait]
pub trait MediaEndpoint: Send + Sync {
    /// Acquire the capture device and produce the local description.
    /// Surfaces `PermissionDenied` when capture is refused.
    async fn create_offer(&mut self) -> Result<String, EngineError>;

    /// Apply the negotiated remote description.
    async fn apply_answer(&mut self, answer: &str) -> Result<(), EngineError>;

    /// Open the named event data channel.
    async fn open_data_channel(&mut self, name: &str) -> Result<DataChannel, EngineError>;

    /// Tear down the connection and release the capture device. Must be safe
    /// to call at any point after construction.
    async fn release(&mut self);

    /// Whether the capture device is currently held.
    fn is_capturing(&self) -> bool;

    /// Implementation name for logging.
    fn name(&self) -> &str;
}

/// Name of the data channel carrying protocol frames.
pub const EVENT_CHANNEL: &str = "events";

/// Produces the per-session media endpoint. The embedder supplies the real
/// media stack; the loopback factory stands in where none is available.
pub trait MediaFactory: Send + Sync {
    fn create(&self, session_id: &str) -> Box<dyn MediaEndpoint>;
}

/// Owns the connect/release sequence for one session. The media endpoint is
/// per-session; the negotiator and credential provider are shared services.
pub struct TransportAdapter {
    media: Box<dyn MediaEndpoint>,
    negotiator: Arc<dyn Negotiator>,
    credentials: Arc<dyn CredentialProvider>,
    released: bool,
}

impl TransportAdapter {
    pub fn new(
        media: Box<dyn MediaEndpoint>,
        negotiator: Arc<dyn Negotiator>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            media,
            negotiator,
            credentials,
            released: false,
        }
    }

    /// Establish the connection and hand back the event channel.
    ///
    /// Any failure leaves the capture device released; the caller decides
    /// whether to surface it as a connection or permission error. Never
    /// retries.
    pub async fn connect(&mut self) -> Result<DataChannel, EngineError> {
        let result = self.try_connect().await;
        if result.is_err() {
            self.media.release().await;
        }
        result
    }

    async fn try_connect(&mut self) -> Result<DataChannel, EngineError> {
        let credential = self.credentials.mint().await?;
        let offer = self.media.create_offer().await?;
        info!("Negotiating realtime transport via {}", self.media.name());
        let answer = self.negotiator.negotiate(&offer, &credential).await?;
        self.media.apply_answer(&answer).await?;
        self.media.open_data_channel(EVENT_CHANNEL).await
    }

    /// Tear down the transport and release the capture device. Runs the
    /// media teardown exactly once; later calls are no-ops.
    pub async fn release(&mut self) {
        if self.released {
            warn!("Transport already released, ignoring");
            return;
        }
        self.released = true;
        self.media.release().await;
        info!("Transport released ({})", self.media.name());
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::info;

use super::{
    CredentialProvider, DataChannel, EphemeralCredential, MediaEndpoint, MediaFactory, Negotiator,
};
use crate::error::EngineError;

/// In-process media endpoint backed by channel pairs.
///
/// Serves embedders without a platform media stack and the integration
/// tests, which drive the far side through [`LoopbackPeer`]. Can simulate a
/// capture-permission refusal.
pub struct LoopbackMedia {
    channel: Option<DataChannel>,
    deny_capture: bool,
    open: bool,
}

/// The remote side of a loopback transport: receives what the session sends
/// and injects inbound frames.
pub struct LoopbackPeer {
    /// Frames the session sent.
    pub inbound: mpsc::Receiver<String>,
    /// Sender for frames delivered to the session.
    pub outbound: mpsc::Sender<String>,
}

impl LoopbackMedia {
    /// A connected endpoint/peer pair.
    pub fn pair() -> (Self, LoopbackPeer) {
        let (to_session, session_rx) = mpsc::channel(100);
        let (session_tx, from_session) = mpsc::channel(100);

        let media = Self {
            channel: Some(DataChannel {
                inbound: session_rx,
                outbound: session_tx,
            }),
            deny_capture: false,
            open: false,
        };
        let peer = LoopbackPeer {
            inbound: from_session,
            outbound: to_session,
        };
        (media, peer)
    }

    /// An endpoint whose capture device is refused.
    pub fn denied() -> Self {
        Self {
            channel: None,
            deny_capture: true,
            open: false,
        }
    }
}

#[async_trait::async_trait]
impl MediaEndpoint for LoopbackMedia {
    async fn create_offer(&mut self) -> Result<String, EngineError> {
        if self.deny_capture {
            return Err(EngineError::PermissionDenied(
                "capture device refused".to_string(),
            ));
        }
        self.open = true;
        Ok("v=0 loopback-offer".to_string())
    }

    async fn apply_answer(&mut self, _answer: &str) -> Result<(), EngineError> {
        Ok(())
    }

    async fn open_data_channel(&mut self, _name: &str) -> Result<DataChannel, EngineError> {
        self.channel
            .take()
            .ok_or_else(|| EngineError::Connection("data channel already opened".to_string()))
    }

    async fn release(&mut self) {
        self.open = false;
        self.channel = None;
    }

    fn is_capturing(&self) -> bool {
        self.open
    }

    fn name(&self) -> &str {
        "loopback"
    }
}

/// Creates a loopback endpoint per session and parks the far side, so the
/// channels stay open until the session ends. `take_peer` lets a harness
/// drive the remote half.
#[derive(Default)]
pub struct LoopbackFactory {
    peers: Mutex<HashMap<String, LoopbackPeer>>,
}

impl LoopbackFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the remote half of a session's transport.
    pub fn take_peer(&self, session_id: &str) -> Option<LoopbackPeer> {
        let mut peers = match self.peers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        peers.remove(session_id)
    }
}

impl MediaFactory for LoopbackFactory {
    fn create(&self, session_id: &str) -> Box<dyn MediaEndpoint> {
        info!("Creating loopback media endpoint for {}", session_id);
        let (media, peer) = LoopbackMedia::pair();
        let mut peers = match self.peers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        peers.insert(session_id.to_string(), peer);
        Box::new(media)
    }
}

/// Credential provider returning a fixed secret. Loopback companion.
pub struct StaticCredentials(pub String);

#[async_trait::async_trait]
impl CredentialProvider for StaticCredentials {
    async fn mint(&self) -> Result<EphemeralCredential, EngineError> {
        Ok(EphemeralCredential {
            secret: self.0.clone(),
        })
    }
}

/// Negotiator answering every offer with a canned description. Loopback
/// companion.
pub struct StaticNegotiator;

#[async_trait::async_trait]
impl Negotiator for StaticNegotiator {
    async fn negotiate(
        &self,
        _local_description: &str,
        _credential: &EphemeralCredential,
    ) -> Result<String, EngineError> {
        Ok("v=0 loopback-answer".to_string())
    }
}

use serde::Deserialize;
use tracing::info;

use super::{CredentialProvider, EphemeralCredential, Negotiator};
use crate::error::EngineError;

/// Fetches the ephemeral credential from the authentication collaborator.
pub struct HttpCredentialProvider {
    http: reqwest::Client,
    url: String,
}

impl HttpCredentialProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CredentialResponse {
    client_secret: ClientSecret,
}

#[derive(Debug, Deserialize)]
struct ClientSecret {
    value: String,
}

#[async_trait::async_trait]
impl CredentialProvider for HttpCredentialProvider {
    async fn mint(&self) -> Result<EphemeralCredential, EngineError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| EngineError::Connection(format!("credential fetch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(EngineError::Connection(format!(
                "credential endpoint returned {}",
                response.status()
            )));
        }

        let credential: CredentialResponse = response
            .json()
            .await
            .map_err(|e| EngineError::Connection(format!("invalid credential response: {e}")))?;

        Ok(EphemeralCredential {
            secret: credential.client_secret.value,
        })
    }
}

/// Posts the local SDP offer to the realtime endpoint and returns the answer.
pub struct HttpNegotiator {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpNegotiator {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait::async_trait]
impl Negotiator for HttpNegotiator {
    async fn negotiate(
        &self,
        local_description: &str,
        credential: &EphemeralCredential,
    ) -> Result<String, EngineError> {
        info!("Posting session description to {}", self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&credential.secret)
            .header("Content-Type", "application/sdp")
            .body(local_description.to_string())
            .send()
            .await
            .map_err(|e| EngineError::Connection(format!("negotiation request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(EngineError::Connection(format!(
                "realtime endpoint returned {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| EngineError::Connection(format!("invalid negotiation answer: {e}")))
    }
}

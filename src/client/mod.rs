use reqwest::Client;
use std::error::Error as StdError;
use thiserror::Error;
use url::Url;

use crate::config::Config;
use crate::model::{DiagnosticRequest, DiagnosticResponse, DiagnosticResult, Query};

type BoxError = Box<dyn StdError + Send + Sync>;

/// Any failed exchange with the diagnostic service.
///
/// Unreachable host, non-success status and bad bodies all surface as this one
/// kind. The underlying cause is kept as the source so it can be logged.
#[derive(Debug, Error)]
#[error("diagnostic request failed")]
pub struct TransportError {
    #[source]
    cause: BoxError,
}

impl TransportError {
    fn new(cause: impl Into<BoxError>) -> Self {
        Self {
            cause: cause.into(),
        }
    }
}

/// Sends symptom descriptions to the configured diagnostic endpoint
#[derive(Debug, Clone)]
pub struct DiagnosticClient {
    http: Client,
    endpoint: Url,
}

impl DiagnosticClient {
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        let http = Client::builder()
            .user_agent(config.user_agent())
            .build()
            .map_err(TransportError::new)?;

        Ok(Self {
            http,
            endpoint: config.endpoint().clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Submit one query and wait for the full diagnostic result.
    ///
    /// Issues exactly one POST. No retries.
    pub async fn submit(&self, query: &Query) -> Result<DiagnosticResult, TransportError> {
        tracing::debug!(endpoint = %self.endpoint, chars = query.as_str().len(), "submitting query");

        match self.exchange(query).await {
            Ok(result) => {
                tracing::debug!(
                    condition = %result.detected_condition,
                    medications = result.medications.len(),
                    "diagnostic received"
                );
                Ok(result)
            }
            Err(cause) => {
                tracing::warn!(endpoint = %self.endpoint, error = %cause, "diagnostic request failed");
                Err(TransportError::new(cause))
            }
        }
    }

    async fn exchange(&self, query: &Query) -> Result<DiagnosticResult, BoxError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&DiagnosticRequest::from(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("service answered {status}").into());
        }

        let body = response.bytes().await?;
        let parsed: DiagnosticResponse = serde_json::from_slice(&body)?;
        Ok(parsed.validate()?)
    }
}

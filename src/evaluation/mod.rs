//! The client side of the story evaluation service.

mod error;
mod response;

pub use error::EvaluationError;
pub use response::{AnalysisResponse, Entity};

use std::sync::Arc;

use log::{debug, warn};
use serde_json::{Value, json};

use crate::config::Config;
use crate::consts::truncate;
use crate::transport::HttpTransport;

/// How much of an error body ends up in [`EvaluationError::Server`].
const MAX_ERROR_BODY: usize = 200;

/// One analysis request. Built per call and dropped once sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub description: String,
}

impl AnalysisRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    /// Wire form: `{"description": "..."}`.
    pub fn to_json(&self) -> Value {
        json!({ "description": self.description })
    }
}

/// Sends story descriptions to the evaluation endpoint.
pub struct EvaluationClient {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
}

impl EvaluationClient {
    pub fn new(transport: Arc<dyn HttpTransport>, config: &Config) -> Self {
        Self {
            transport,
            endpoint: config.endpoint(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Evaluate `description`. Issues exactly one POST; resolves once the
    /// service has answered or the request has failed. No retries.
    pub async fn evaluate(&self, description: &str) -> Result<AnalysisResponse, EvaluationError> {
        let request = AnalysisRequest::new(description);
        debug!(
            "POST {} ({} chars)",
            self.endpoint,
            request.description.chars().count()
        );

        let resp = self
            .transport
            .post(&self.endpoint, &request.to_json())
            .await
            .inspect_err(|e| warn!("evaluation request failed: {e}"))?;

        if !resp.is_success() {
            warn!("evaluation service returned {}", resp.status);
            return Err(EvaluationError::Server {
                status: resp.status,
                body: truncate(resp.body.trim(), MAX_ERROR_BODY),
            });
        }

        let parsed = AnalysisResponse::parse(&resp.body)
            .inspect_err(|e| warn!("{e}; body: {}", truncate(&resp.body, MAX_ERROR_BODY)))?;
        debug!("evaluation returned {} entities", parsed.entities().len());
        Ok(parsed)
    }
}

//! The HTTP seam. [`EvaluationClient`](crate::evaluation::EvaluationClient)
//! only talks to the network through [`HttpTransport`], so tests inject
//! [`mock::MockTransport`] and the binary injects [`http::ReqwestTransport`].

pub mod http;
pub mod mock;

use async_trait::async_trait;
use serde_json::Value;

/// A raw HTTP response: status code and undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

/// Posts a JSON body to a URL. Could be reqwest, a mock, or anything else.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post(&self, url: &str, body: &Value) -> Result<HttpResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        let ok = |status| HttpResponse {
            status,
            body: String::new(),
        };
        assert!(ok(200).is_success());
        assert!(ok(204).is_success());
        assert!(!ok(199).is_success());
        assert!(!ok(301).is_success());
        assert!(!ok(500).is_success());
    }

    #[test]
    fn error_messages() {
        assert_eq!(TransportError::Timeout.to_string(), "request timed out");
        assert_eq!(
            TransportError::Connect("refused".into()).to_string(),
            "connection failed: refused"
        );
    }
}

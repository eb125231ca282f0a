use crate::transport::TransportError;

/// Why an evaluation produced no usable response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    /// Unreachable, refused or timed out.
    #[error("network error: {0}")]
    Network(#[from] TransportError),

    /// The service answered with a non-2xx status.
    #[error("server error ({status}): {body}")]
    Server { status: u16, body: String },

    /// The body has no usable entity sequence.
    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String },
}

impl EvaluationError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// Short label for display.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Server { .. } => "server",
            Self::MalformedResponse { .. } => "malformed response",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_convert_to_network() {
        let err: EvaluationError = TransportError::Timeout.into();
        assert_eq!(err, EvaluationError::Network(TransportError::Timeout));
        assert_eq!(err.kind(), "network");
        assert_eq!(err.to_string(), "network error: request timed out");
    }

    #[test]
    fn server_message_includes_status() {
        let err = EvaluationError::Server {
            status: 422,
            body: "bad".into(),
        };
        assert_eq!(err.to_string(), "server error (422): bad");
        assert_eq!(err.kind(), "server");
    }

    #[test]
    fn malformed_helper() {
        let err = EvaluationError::malformed("nope");
        assert_eq!(err.to_string(), "malformed response: nope");
    }
}

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{HttpResponse, HttpTransport, TransportError};

/// A canned answer, optionally delivered after a delay.
#[derive(Debug, Clone)]
pub struct Reply {
    delay: Duration,
    outcome: Result<HttpResponse, TransportError>,
}

impl Reply {
    /// 200 with `value` serialized as the body.
    pub fn json(value: Value) -> Self {
        Self::status(200, &value.to_string())
    }

    /// 200 with a raw body (use for non-JSON payloads).
    pub fn raw(body: &str) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Ok(HttpResponse {
                status,
                body: body.to_string(),
            }),
        }
    }

    pub fn error(err: TransportError) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Err(err),
        }
    }

    /// Hold the reply back for `delay`.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A request the mock has seen.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub url: String,
    pub body: Value,
}

/// A scripted transport for tests. Replies are matched on the request's
/// `description` field, falling back to a default reply. Every call is
/// recorded.
#[derive(Default)]
pub struct MockTransport {
    rules: Vec<(String, Reply)>,
    fallback: Option<Reply>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request gets `reply` unless a rule matches.
    pub fn replying(reply: Reply) -> Self {
        Self {
            fallback: Some(reply),
            ..Self::default()
        }
    }

    /// Answer requests whose description equals `description` with `reply`.
    pub fn on(mut self, description: &str, reply: Reply) -> Self {
        self.rules.push((description.to_string(), reply));
        self
    }

    /// Snapshot of all recorded calls, in arrival order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.recorded().clone()
    }

    pub fn call_count(&self) -> usize {
        self.recorded().len()
    }

    fn recorded(&self) -> MutexGuard<'_, Vec<RecordedCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn reply_for(&self, body: &Value) -> Option<Reply> {
        let description = body.get("description").and_then(Value::as_str);
        self.rules
            .iter()
            .find(|(d, _)| Some(d.as_str()) == description)
            .map(|(_, r)| r.clone())
            .or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn post(&self, url: &str, body: &Value) -> Result<HttpResponse, TransportError> {
        self.recorded().push(RecordedCall {
            url: url.to_string(),
            body: body.clone(),
        });

        let reply = self.reply_for(body).ok_or_else(|| {
            TransportError::Request(format!("MockTransport: no reply scripted for {body}"))
        })?;

        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.outcome
    }
}

//! Render notifications from the view.
//!
//! [`StoryQualityView`](crate::view::StoryQualityView) emits a [`ViewEvent`]
//! every time its state changes. Front ends subscribe via
//! [`EventBus::subscribe`] and redraw. Built on [`tokio::sync::broadcast`]
//! so several listeners can react independently.

use tokio::sync::broadcast;

use crate::evaluation::EvaluationError;

/// Something in the view changed.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// A request went out; `in_flight` counts it.
    AnalysisStarted { in_flight: usize },
    /// The entity list was replaced.
    EntitiesReplaced { count: usize },
    /// The service answered with a score report.
    ReportReceived { score: u32 },
    /// An analysis failed and the view now shows the error.
    AnalysisFailed { error: EvaluationError },
    /// In-flight requests were dropped without a result.
    Cancelled { count: usize },
}

impl ViewEvent {
    /// True for events that finish a request and change what is displayed.
    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            Self::EntitiesReplaced { .. } | Self::ReportReceived { .. } | Self::AnalysisFailed { .. }
        )
    }
}

/// A broadcast channel for view events.
#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<ViewEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit to all current subscribers. Returns how many will see it.
    pub fn emit(&self, event: ViewEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    /// Future events only; nothing is replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(crate::consts::EVENT_CAPACITY)
    }
}

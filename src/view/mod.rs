//! The story quality view: one text input, one action, one entity list.
//!
//! [`StoryQualityView::trigger_analysis`] never blocks. It spawns the
//! evaluation on the tokio runtime and returns at once; the result is
//! applied when it arrives. Concurrent analyses are not coordinated, so the
//! one that completes last owns the entity list. Every state change is
//! announced on the view's [`EventBus`].

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::evaluation::{AnalysisResponse, Entity, EvaluationClient, EvaluationError};
use crate::events::{EventBus, ViewEvent};

/// Whether a request is outstanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Awaiting {
        in_flight: usize,
    },
}

/// Score report, when the service answers with one instead of entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub score: u32,
    pub feedback: Vec<String>,
}

/// Everything the view displays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub text_input: String,
    pub entities: Vec<Entity>,
    pub status: Status,
    /// Last failure. Cleared by the next successful analysis.
    pub error: Option<EvaluationError>,
    pub report: Option<Report>,
}

/// Outcome counters for the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub completed: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl Stats {
    pub fn total(&self) -> usize {
        self.completed + self.failed + self.cancelled
    }
}

struct Inner {
    state: ViewState,
    stats: Stats,
    pending: HashSet<u64>,
    next_id: u64,
    disposed: bool,
}

impl Inner {
    fn refresh_status(&mut self) {
        self.state.status = if self.pending.is_empty() {
            Status::Idle
        } else {
            Status::Awaiting {
                in_flight: self.pending.len(),
            }
        };
    }
}

struct Shared {
    inner: Mutex<Inner>,
    events: EventBus,
    /// Bumped on every cancellation; in-flight tasks watch it.
    cancel: watch::Sender<u64>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn complete(&self, id: u64, result: Result<AnalysisResponse, EvaluationError>) {
        let mut inner = self.lock();
        if inner.disposed || !inner.pending.remove(&id) {
            debug!("dropping result of analysis #{id}: no longer pending");
            return;
        }
        inner.refresh_status();

        let event = match result {
            Ok(AnalysisResponse::Entities { entities, .. }) => {
                let count = entities.len();
                info!("analysis #{id} returned {count} entities");
                inner.state.entities = entities;
                inner.state.error = None;
                inner.state.report = None;
                inner.stats.completed += 1;
                ViewEvent::EntitiesReplaced { count }
            }
            Ok(AnalysisResponse::Scored { score, feedback }) => {
                info!("analysis #{id} scored {score}");
                inner.state.entities.clear();
                inner.state.error = None;
                inner.state.report = Some(Report { score, feedback });
                inner.stats.completed += 1;
                ViewEvent::ReportReceived { score }
            }
            Err(error) => {
                warn!("analysis #{id} failed: {error}");
                inner.state.entities.clear();
                inner.state.report = None;
                inner.state.error = Some(error.clone());
                inner.stats.failed += 1;
                ViewEvent::AnalysisFailed { error }
            }
        };
        self.events.emit(event);
    }
}

/// Owns the input text and entity list and drives an [`EvaluationClient`].
pub struct StoryQualityView {
    client: Arc<EvaluationClient>,
    shared: Arc<Shared>,
}

impl StoryQualityView {
    pub fn new(client: Arc<EvaluationClient>) -> Self {
        let (cancel, _) = watch::channel(0);
        Self {
            client,
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state: ViewState::default(),
                    stats: Stats::default(),
                    pending: HashSet::new(),
                    next_id: 1,
                    disposed: false,
                }),
                events: EventBus::default(),
                cancel,
            }),
        }
    }

    /// Replace the input text. Ignored once disposed.
    pub fn set_text(&self, text: impl Into<String>) {
        let mut inner = self.shared.lock();
        if !inner.disposed {
            inner.state.text_input = text.into();
        }
    }

    pub fn text(&self) -> String {
        self.shared.lock().state.text_input.clone()
    }

    /// Evaluate the current input text in the background.
    ///
    /// Returns immediately. The handle resolves after the result has been
    /// applied (or dropped, if the request was cancelled). The text is sent
    /// as-is, empty or not.
    pub fn trigger_analysis(&self) -> JoinHandle<()> {
        let (id, text) = {
            let mut inner = self.shared.lock();
            if inner.disposed {
                debug!("trigger_analysis on a disposed view ignored");
                return tokio::spawn(async {});
            }
            let id = inner.next_id;
            inner.next_id += 1;
            inner.pending.insert(id);
            inner.refresh_status();
            self.shared.events.emit(ViewEvent::AnalysisStarted {
                in_flight: inner.pending.len(),
            });
            (id, inner.state.text_input.clone())
        };

        let mut cancelled = self.shared.cancel.subscribe();
        let client = Arc::clone(&self.client);
        let shared = Arc::clone(&self.shared);

        debug!("analysis #{id} started");
        tokio::spawn(async move {
            let result = tokio::select! {
                result = client.evaluate(&text) => result,
                _ = cancelled.changed() => {
                    debug!("analysis #{id} cancelled");
                    return;
                }
            };
            shared.complete(id, result);
        })
    }

    /// Set the text and trigger an analysis of it.
    pub fn submit(&self, text: impl Into<String>) -> JoinHandle<()> {
        self.set_text(text);
        self.trigger_analysis()
    }

    /// Drop every in-flight request. Displayed entities are kept.
    /// Returns how many requests were cancelled.
    pub fn cancel_in_flight(&self) -> usize {
        let mut inner = self.shared.lock();
        let count = inner.pending.len();
        if count == 0 {
            return 0;
        }
        inner.pending.clear();
        inner.refresh_status();
        inner.stats.cancelled += count;
        self.shared.cancel.send_modify(|epoch| *epoch += 1);
        if !inner.disposed {
            self.shared.events.emit(ViewEvent::Cancelled { count });
        }
        count
    }

    /// Tear the view down: cancel in-flight requests and stop accepting
    /// results or emitting events. Idempotent; also runs on drop.
    pub fn dispose(&self) {
        let mut inner = self.shared.lock();
        if inner.disposed {
            return;
        }
        inner.disposed = true;
        let count = inner.pending.len();
        inner.pending.clear();
        inner.refresh_status();
        inner.stats.cancelled += count;
        self.shared.cancel.send_modify(|epoch| *epoch += 1);
        debug!("view disposed, {count} request(s) cancelled");
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.lock().disposed
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> ViewState {
        self.shared.lock().state.clone()
    }

    pub fn entities(&self) -> Vec<Entity> {
        self.shared.lock().state.entities.clone()
    }

    pub fn status(&self) -> Status {
        self.shared.lock().state.status
    }

    pub fn stats(&self) -> Stats {
        self.shared.lock().stats
    }

    /// Render notifications from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.shared.events.subscribe()
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }
}

impl Drop for StoryQualityView {
    fn drop(&mut self) {
        self.dispose();
    }
}

use serde::Serialize;
use std::sync::Arc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::gate::SingleFlightGate;
use super::history::HistoryBuffer;
use crate::config::EngineConfig;
use crate::models::{CommentaryItem, Subject};

/// Mutable engine state, owned by one engine instance
///
/// Reset in place on every subject change; never handed out directly.
/// Consumers see [`EngineSnapshot`]s instead.
#[derive(Debug)]
pub struct EngineState {
    pub(crate) subject: Option<Subject>,
    pub(crate) current: Option<CommentaryItem>,
    pub(crate) history: HistoryBuffer,
    pub(crate) last_attempt: Option<Instant>,
    pub(crate) generation: u64,
    pub(crate) playing: bool,
    pub(crate) playback_time: f64,
    pub(crate) last_error: Option<String>,
    /// Gate of the current generation; replaced on subject change
    pub(crate) gate: Arc<SingleFlightGate>,
    pub(crate) config: EngineConfig,
    /// Cancels the running timer task, if armed
    pub(crate) timer: Option<CancellationToken>,
}

impl EngineState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            subject: None,
            current: None,
            history: HistoryBuffer::new(config.history_cap),
            last_attempt: None,
            generation: 0,
            playing: false,
            playback_time: 0.0,
            last_error: None,
            gate: Arc::new(SingleFlightGate::new()),
            config,
            timer: None,
        }
    }

    /// Start a new generation for `subject`
    ///
    /// Clears display state, forgets the last attempt and installs a fresh
    /// gate so a request still in flight for the old subject cannot block
    /// the new one. The caller is responsible for the timer.
    pub(crate) fn begin_generation(&mut self, subject: Option<Subject>) {
        self.generation += 1;
        self.subject = subject;
        self.current = None;
        self.history.clear();
        self.last_attempt = None;
        self.last_error = None;
        self.playback_time = 0.0;
        self.gate = Arc::new(SingleFlightGate::new());
    }

    pub fn subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }

    pub fn current(&self) -> Option<&CommentaryItem> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_fetching(&self) -> bool {
        self.gate.is_held()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            subject: self.subject.clone(),
            current: self.current.clone(),
            history: self.history.to_vec(),
            is_fetching: self.is_fetching(),
            playing: self.playing,
            last_error: self.last_error.clone(),
            generation: self.generation,
        }
    }
}

/// Read-only view of the engine for UI consumers
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
    pub subject: Option<Subject>,
    pub current: Option<CommentaryItem>,
    /// Most recent first; the head equals `current` once anything was accepted
    pub history: Vec<CommentaryItem>,
    pub is_fetching: bool,
    pub playing: bool,
    /// Error text of the latest failed cycle, cleared by the next accepted result
    pub last_error: Option<String>,
    pub generation: u64,
}

impl EngineSnapshot {
    pub fn subject_id(&self) -> Option<&str> {
        self.subject.as_ref().map(|s| s.id.as_str())
    }

    /// History without the current head ("recent commentary")
    pub fn previous(&self) -> &[CommentaryItem] {
        self.history.get(1..).unwrap_or(&[])
    }
}

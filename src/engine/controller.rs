//! Lifecycle controller
//!
//! [`LiveCommentaryEngine`] is the only entry point consumers use. It owns the
//! engine state behind an async mutex, arms and disarms its own polling timer,
//! spawns fetch cycles and publishes an [`EngineSnapshot`] after every change.
//!
//! The state lock is never held across the backend call: a fetch cycle takes
//! the lock to dispatch, releases it for the network round trip and takes it
//! again to reconcile.

use std::sync::{Arc, Weak};
use tokio::sync::{Mutex, watch};
use tokio::time::{Instant, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::reconciler::{ReconcileOutcome, ResultReconciler};
use super::scheduler::{FetchTicket, PollingScheduler, TickDecision};
use super::state::{EngineSnapshot, EngineState};
use crate::config::EngineConfig;
use crate::errors::{AppError, AppResult, CommentaryError};
use crate::models::{NormalizedResult, Subject};
use crate::services::CommentaryBackend;
use crate::sources::SubjectResolver;
use crate::utils::time::format_timestamp;

/// Playback-synchronised commentary engine
///
/// Must be used from within a tokio runtime. Dropping the engine cancels its
/// timer and any request still in flight.
pub struct LiveCommentaryEngine {
    shared: Arc<EngineShared>,
}

struct EngineShared {
    state: Mutex<EngineState>,
    backend: Arc<dyn CommentaryBackend>,
    resolver: SubjectResolver,
    snapshots: watch::Sender<EngineSnapshot>,
    shutdown: CancellationToken,
}

impl LiveCommentaryEngine {
    /// Create an idle engine using the default recognizer chain
    pub fn new(backend: Arc<dyn CommentaryBackend>, config: EngineConfig) -> AppResult<Self> {
        Self::with_resolver(backend, config, SubjectResolver::with_default_recognizers())
    }

    pub fn with_resolver(
        backend: Arc<dyn CommentaryBackend>,
        config: EngineConfig,
        resolver: SubjectResolver,
    ) -> AppResult<Self> {
        config.validate()?;

        let state = EngineState::new(config);
        let (snapshots, _) = watch::channel(state.snapshot());

        Ok(Self {
            shared: Arc::new(EngineShared {
                state: Mutex::new(state),
                backend,
                resolver,
                snapshots,
                shutdown: CancellationToken::new(),
            }),
        })
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> EngineSnapshot {
        self.shared.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<EngineSnapshot> {
        self.shared.snapshots.subscribe()
    }

    /// Switch to `subject`, starting a new generation
    ///
    /// Setting the subject that is already active is a no-op. Any request in
    /// flight for the previous subject keeps running, but its result is
    /// discarded.
    pub async fn set_subject(&self, subject: Option<Subject>) {
        let shared = &self.shared;
        let mut state = shared.state.lock().await;

        let unchanged = match (state.subject.as_ref(), subject.as_ref()) {
            (Some(active), Some(next)) => active.same_as(next),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        shared.disarm(&mut state);
        state.begin_generation(subject);
        match state.subject.as_ref() {
            Some(subject) => info!(
                "Watching {} '{}' (generation {})",
                subject.kind,
                subject.id,
                state.generation
            ),
            None => info!("Subject cleared (generation {})", state.generation),
        }

        shared.sync_timer(&mut state);
        shared.publish(&state);
    }

    /// Resolve `raw_url` and switch to the resulting subject
    ///
    /// An unrecognised URL is rejected and leaves the engine untouched.
    pub async fn set_subject_url(&self, raw_url: &str) -> AppResult<Subject> {
        let subject = self
            .shared
            .resolver
            .resolve(raw_url)
            .ok_or_else(|| AppError::validation(format!("Unsupported video URL: '{}'", raw_url.trim())))?;

        self.set_subject(Some(subject.clone())).await;
        Ok(subject)
    }

    /// Resolve `raw_url`, seek to `start_at` seconds and start playback
    ///
    /// A subject change resets the playback position, so the seek is applied
    /// after the switch and before the first check runs.
    pub async fn watch_url(&self, raw_url: &str, start_at: f64) -> AppResult<Subject> {
        let subject = self.set_subject_url(raw_url).await?;
        self.set_playback_time(start_at).await;
        self.set_playing(true).await;
        Ok(subject)
    }

    pub async fn set_playing(&self, playing: bool) {
        let shared = &self.shared;
        let mut state = shared.state.lock().await;
        if state.playing == playing {
            return;
        }

        state.playing = playing;
        debug!("Playback {}", if playing { "started" } else { "paused" });
        shared.sync_timer(&mut state);
        shared.publish(&state);
    }

    /// Record the playback position in seconds
    ///
    /// Non-finite values are ignored; negative values are clamped to zero.
    pub async fn set_playback_time(&self, seconds: f64) {
        if !seconds.is_finite() {
            return;
        }
        self.shared.state.lock().await.playback_time = seconds.max(0.0);
    }

    /// Apply a new engine configuration
    ///
    /// A lower history cap truncates immediately. A running timer is re-armed
    /// when the tick interval changes; `last_attempt` is kept either way.
    pub async fn configure(&self, config: EngineConfig) -> AppResult<()> {
        config.validate()?;

        let shared = &self.shared;
        let mut state = shared.state.lock().await;
        if state.config == config {
            return Ok(());
        }

        let cadence_changed = state.config.tick_interval != config.tick_interval;
        state.history.set_cap(config.history_cap);
        state.config = config;

        if cadence_changed && state.is_armed() {
            debug!("Re-arming timer every {:?}", state.config.tick_interval);
            shared.disarm(&mut state);
            shared.sync_timer(&mut state);
        }

        shared.publish(&state);
        Ok(())
    }

    /// Run a scheduler check right now
    ///
    /// Obeys the same rules as a timer tick. Returns whether a fetch cycle was
    /// dispatched.
    pub async fn poll_now(&self) -> bool {
        let shared = &self.shared;
        let mut state = shared.state.lock().await;
        shared.evaluate_and_dispatch(&mut state)
    }

    /// Stop the timer and cancel in-flight requests for good
    pub async fn shutdown(&self) {
        let shared = &self.shared;
        shared.shutdown.cancel();

        let mut state = shared.state.lock().await;
        shared.disarm(&mut state);
        info!("Live commentary engine shut down");
        shared.publish(&state);
    }
}

impl Drop for LiveCommentaryEngine {
    fn drop(&mut self) {
        self.shared.shutdown.cancel();
    }
}

impl EngineShared {
    fn publish(&self, state: &EngineState) {
        self.snapshots.send_replace(state.snapshot());
    }

    /// Arm or disarm the timer to match the current state
    fn sync_timer(self: &Arc<Self>, state: &mut EngineState) {
        let should_run =
            state.subject.is_some() && state.playing && !self.shutdown.is_cancelled();

        match (should_run, state.is_armed()) {
            (true, false) => self.arm(state),
            (false, true) => self.disarm(state),
            _ => {}
        }
    }

    fn arm(self: &Arc<Self>, state: &mut EngineState) {
        let token = self.shutdown.child_token();
        state.timer = Some(token.clone());
        debug!(
            "Timer armed (tick {:?}, update {:?})",
            state.config.tick_interval, state.config.update_interval
        );

        let weak: Weak<Self> = Arc::downgrade(self);
        PollingScheduler::spawn_timer(token, state.config.tick_interval, move || {
            let weak = weak.clone();
            async move {
                if let Some(shared) = weak.upgrade() {
                    let mut state = shared.state.lock().await;
                    shared.evaluate_and_dispatch(&mut state);
                }
            }
        });

        self.evaluate_and_dispatch(state);
    }

    fn disarm(&self, state: &mut EngineState) {
        if let Some(token) = state.timer.take() {
            token.cancel();
            debug!("Timer disarmed");
        }
    }

    fn evaluate_and_dispatch(self: &Arc<Self>, state: &mut EngineState) -> bool {
        if self.shutdown.is_cancelled() {
            return false;
        }

        match PollingScheduler::evaluate(state, Instant::now()) {
            TickDecision::Dispatch(ticket) => {
                self.spawn_fetch(ticket, state.config.request_timeout);
                self.publish(state);
                true
            }
            TickDecision::NotDue { remaining } => {
                trace!("Tick skipped, next request due in {:?}", remaining);
                false
            }
            TickDecision::GateHeld => {
                debug!("Tick skipped, a request is already in flight");
                false
            }
            TickDecision::Inactive => false,
        }
    }

    fn spawn_fetch(self: &Arc<Self>, ticket: FetchTicket, limit: std::time::Duration) {
        let shared = Arc::clone(self);

        tokio::spawn(async move {
            let FetchTicket {
                request,
                generation,
                captured_timestamp,
                guard,
            } = ticket;

            let response = tokio::select! {
                _ = shared.shutdown.cancelled() => {
                    debug!("Fetch for '{}' cancelled by shutdown", request.video_id);
                    return;
                }
                response = timeout(limit, shared.backend.live_commentary(&request)) => response,
            };

            let result = match response {
                Ok(Ok(result)) => result,
                Ok(Err(error)) => NormalizedResult::from_error(&error, captured_timestamp),
                Err(_) => {
                    let error = CommentaryError::Timeout { after: limit };
                    warn!("Commentary request for '{}' {}", request.video_id, error);
                    NormalizedResult::from_error(&error, captured_timestamp)
                }
            };

            let mut state = shared.state.lock().await;
            let outcome =
                ResultReconciler::reconcile(&mut state, &result, captured_timestamp, generation);
            drop(guard);

            match &outcome {
                ReconcileOutcome::Accepted(item) => {
                    info!("[{}] {}", format_timestamp(item.timestamp()), item.text());
                }
                ReconcileOutcome::Skipped { error: Some(error) } => {
                    warn!("Commentary skipped at {}: {}", format_timestamp(captured_timestamp), error);
                }
                ReconcileOutcome::Skipped { error: None } => {
                    debug!("Nothing new at {}", format_timestamp(captured_timestamp));
                }
                ReconcileOutcome::Empty => {
                    debug!("Empty commentary at {}", format_timestamp(captured_timestamp));
                }
                ReconcileOutcome::Stale {
                    result_generation,
                    current_generation,
                } => {
                    debug!(
                        "Discarding result of generation {} (now {})",
                        result_generation, current_generation
                    );
                    return;
                }
            }

            shared.publish(&state);
        });
    }
}

//! Shared helpers for engine integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Notify, Semaphore, watch};

use live_commentary::config::EngineConfig;
use live_commentary::engine::{EngineSnapshot, LiveCommentaryEngine};
use live_commentary::errors::{CommentaryError, CommentaryResult};
use live_commentary::models::{LiveCommentaryRequest, NormalizedResult};
use live_commentary::services::CommentaryBackend;

type Responder = dyn Fn(&LiveCommentaryRequest) -> CommentaryResult<NormalizedResult> + Send + Sync;

/// In-process backend with scripted answers
///
/// When gated, every call parks until the test hands out a permit with
/// [`ScriptedBackend::release`]; permits are granted in call order.
pub struct ScriptedBackend {
    respond: Box<Responder>,
    gate: Option<Semaphore>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    requests: Mutex<Vec<LiveCommentaryRequest>>,
    called: Notify,
}

impl ScriptedBackend {
    pub fn new<F>(respond: F) -> Arc<Self>
    where
        F: Fn(&LiveCommentaryRequest) -> CommentaryResult<NormalizedResult> + Send + Sync + 'static,
    {
        Arc::new(Self::build(respond, None))
    }

    pub fn gated<F>(respond: F) -> Arc<Self>
    where
        F: Fn(&LiveCommentaryRequest) -> CommentaryResult<NormalizedResult> + Send + Sync + 'static,
    {
        Arc::new(Self::build(respond, Some(Semaphore::new(0))))
    }

    fn build<F>(respond: F, gate: Option<Semaphore>) -> Self
    where
        F: Fn(&LiveCommentaryRequest) -> CommentaryResult<NormalizedResult> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            gate,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            called: Notify::new(),
        }
    }

    /// Let `n` parked calls complete
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<LiveCommentaryRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Wait until at least `n` calls have started
    pub async fn wait_for_calls(&self, n: usize) {
        let wait = async {
            loop {
                let notified = self.called.notified();
                if self.calls() >= n {
                    return;
                }
                notified.await;
            }
        };
        tokio::time::timeout(Duration::from_secs(600), wait)
            .await
            .unwrap_or_else(|_| panic!("backend saw {} call(s), expected {n}", self.calls()));
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CommentaryBackend for ScriptedBackend {
    async fn live_commentary(
        &self,
        request: &LiveCommentaryRequest,
    ) -> CommentaryResult<NormalizedResult> {
        self.requests.lock().unwrap().push(request.clone());
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _in_flight = InFlight(&self.in_flight);
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.called.notify_waiters();

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| CommentaryError::transport(e.to_string()))?
                .forget();
        }

        (self.respond)(request)
    }
}

/// A 2xx answer carrying `text`
pub fn commentary(text: impl Into<String>, request: &LiveCommentaryRequest) -> NormalizedResult {
    NormalizedResult {
        commentary: Some(text.into()),
        raw_action: None,
        timestamp: request.timestamp,
        skipped: false,
        error: None,
    }
}

/// A deliberate "nothing new" answer
pub fn skipped(request: &LiveCommentaryRequest) -> NormalizedResult {
    NormalizedResult {
        commentary: None,
        raw_action: None,
        timestamp: request.timestamp,
        skipped: true,
        error: None,
    }
}

/// Engine config with a fast cadence for tests
pub fn fast_config(update_interval: Duration) -> EngineConfig {
    EngineConfig {
        update_interval,
        tick_interval: Duration::from_millis(10),
        ..EngineConfig::default()
    }
}

pub fn engine_with(backend: Arc<ScriptedBackend>, config: EngineConfig) -> LiveCommentaryEngine {
    LiveCommentaryEngine::new(backend, config).expect("valid engine config")
}

/// Wait for a snapshot satisfying `predicate`
pub async fn wait_for_snapshot<F>(
    snapshots: &mut watch::Receiver<EngineSnapshot>,
    predicate: F,
) -> EngineSnapshot
where
    F: FnMut(&EngineSnapshot) -> bool,
{
    let snapshot = tokio::time::timeout(Duration::from_secs(600), snapshots.wait_for(predicate))
        .await
        .expect("snapshot condition not reached in time")
        .expect("engine dropped");
    snapshot.clone()
}

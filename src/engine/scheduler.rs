//! Polling scheduler
//!
//! Two halves: [`PollingScheduler::evaluate`] decides, for one tick, whether
//! a fetch cycle may start; [`PollingScheduler::spawn_timer`] drives ticks at
//! a fixed cadence until its cancellation token fires.
//!
//! A tick is a no-op when nothing is being watched, when the update interval
//! has not elapsed since the last attempt, or when the gate is held. Skipped
//! ticks are simply dropped; nothing queues behind a slow request.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::gate::GateGuard;
use super::state::EngineState;
use crate::models::LiveCommentaryRequest;

/// Everything a fetch cycle needs, captured at dispatch time
#[derive(Debug)]
pub struct FetchTicket {
    pub request: LiveCommentaryRequest,
    pub generation: u64,
    /// Playback position frozen when the cycle started
    pub captured_timestamp: f64,
    pub guard: GateGuard,
}

#[derive(Debug)]
pub enum TickDecision {
    Dispatch(FetchTicket),
    /// No subject, or playback is paused
    Inactive,
    NotDue { remaining: Duration },
    GateHeld,
}

pub struct PollingScheduler;

impl PollingScheduler {
    /// Decide whether a fetch cycle starts now
    ///
    /// On dispatch the gate is taken, `last_attempt` is set to `now` and the
    /// current playback time is copied into the ticket.
    pub fn evaluate(state: &mut EngineState, now: Instant) -> TickDecision {
        let Some(subject) = state.subject.as_ref() else {
            return TickDecision::Inactive;
        };
        if !state.playing {
            return TickDecision::Inactive;
        }

        if let Some(last_attempt) = state.last_attempt {
            let elapsed = now.saturating_duration_since(last_attempt);
            if elapsed < state.config.update_interval {
                return TickDecision::NotDue {
                    remaining: state.config.update_interval - elapsed,
                };
            }
        }

        let Some(guard) = state.gate.try_acquire() else {
            return TickDecision::GateHeld;
        };

        let captured_timestamp = state.playback_time;
        let request = LiveCommentaryRequest {
            video_id: subject.id.clone(),
            timestamp: captured_timestamp,
            window_size: state.config.window_size,
        };
        state.last_attempt = Some(now);

        TickDecision::Dispatch(FetchTicket {
            request,
            generation: state.generation,
            captured_timestamp,
            guard,
        })
    }

    /// Run `on_tick` every `tick_interval` until `token` is cancelled
    ///
    /// The first timer tick fires one interval after spawning; callers run
    /// the arming check themselves. Missed ticks are skipped, not replayed.
    pub fn spawn_timer<F, Fut>(
        token: CancellationToken,
        tick_interval: Duration,
        on_tick: F,
    ) -> JoinHandle<()>
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + tick_interval, tick_interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("Polling timer cancelled");
                        break;
                    }
                    _ = ticks.tick() => on_tick().await,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::models::Subject;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn watching_state() -> EngineState {
        let config = EngineConfig {
            update_interval: Duration::from_secs(2),
            ..EngineConfig::default()
        };
        let mut state = EngineState::new(config);
        state.begin_generation(Some(Subject::from_id("abc")));
        state.playing = true;
        state
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_dispatches_with_frozen_timestamp() {
        let mut state = watching_state();
        state.playback_time = 12.3;
        let now = Instant::now();

        let TickDecision::Dispatch(ticket) = PollingScheduler::evaluate(&mut state, now) else {
            panic!("expected dispatch");
        };
        state.playback_time = 20.0;

        assert_eq!(ticket.captured_timestamp, 12.3);
        assert_eq!(ticket.request.timestamp, 12.3);
        assert_eq!(ticket.request.video_id, "abc");
        assert_eq!(ticket.request.window_size, 5.0);
        assert_eq!(ticket.generation, state.generation());
        assert_eq!(state.last_attempt, Some(now));
        assert!(state.is_fetching());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_inside_update_interval_is_not_due() {
        let mut state = watching_state();
        let start = Instant::now();
        let TickDecision::Dispatch(ticket) = PollingScheduler::evaluate(&mut state, start) else {
            panic!("expected dispatch");
        };
        drop(ticket);

        let decision = PollingScheduler::evaluate(&mut state, start + Duration::from_millis(50));
        assert!(matches!(
            decision,
            TickDecision::NotDue { remaining } if remaining == Duration::from_millis(1950)
        ));
        assert_eq!(state.last_attempt, Some(start));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_while_gate_held_does_not_touch_last_attempt() {
        let mut state = watching_state();
        let start = Instant::now();
        let TickDecision::Dispatch(_ticket) = PollingScheduler::evaluate(&mut state, start) else {
            panic!("expected dispatch");
        };

        let later = start + Duration::from_secs(10);
        assert!(matches!(
            PollingScheduler::evaluate(&mut state, later),
            TickDecision::GateHeld
        ));
        assert_eq!(state.last_attempt, Some(start));
    }

    #[tokio::test(start_paused = true)]
    async fn test_inactive_without_subject_or_playback() {
        let mut state = EngineState::new(EngineConfig::default());
        assert!(matches!(
            PollingScheduler::evaluate(&mut state, Instant::now()),
            TickDecision::Inactive
        ));

        let mut paused = watching_state();
        paused.playing = false;
        assert!(matches!(
            PollingScheduler::evaluate(&mut paused, Instant::now()),
            TickDecision::Inactive
        ));
        assert!(!paused.is_fetching());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_ticks_at_cadence_until_cancelled() {
        let token = CancellationToken::new();
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);

        let handle = PollingScheduler::spawn_timer(token.clone(), Duration::from_secs(1), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);

        token.cancel();
        handle.await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }
}

//! Acceptance policy for fetched results
//!
//! A result replaces the displayed commentary only when it belongs to the
//! current generation, is not skipped and carries non-empty commentary.
//! Anything else leaves `current` and `history` exactly as they were.

use super::state::EngineState;
use crate::models::{CommentaryItem, NormalizedResult};

/// What reconciling one result did to the state
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    /// Became `current` and was prepended to history
    Accepted(CommentaryItem),
    /// Backend skipped; `error` is `None` for a deliberate "nothing new"
    Skipped { error: Option<String> },
    /// Not skipped, but no usable commentary
    Empty,
    /// Belonged to a superseded generation; state untouched
    Stale { result_generation: u64, current_generation: u64 },
}

impl ReconcileOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ReconcileOutcome::Accepted(_))
    }
}

pub struct ResultReconciler;

impl ResultReconciler {
    /// Apply `result`, fetched for `generation` at `captured_timestamp`
    ///
    /// Accepted items are attributed to `captured_timestamp`, never to the
    /// playback position at completion time nor to the backend's echo.
    pub fn reconcile(
        state: &mut EngineState,
        result: &NormalizedResult,
        captured_timestamp: f64,
        generation: u64,
    ) -> ReconcileOutcome {
        if generation != state.generation {
            return ReconcileOutcome::Stale {
                result_generation: generation,
                current_generation: state.generation,
            };
        }

        if result.skipped {
            if let Some(error) = &result.error {
                state.last_error = Some(error.clone());
            }
            return ReconcileOutcome::Skipped {
                error: result.error.clone(),
            };
        }

        let item = result.commentary_text().and_then(|text| {
            CommentaryItem::new(text, captured_timestamp, result.raw_action.clone())
        });

        match item {
            Some(item) => {
                state.current = Some(item.clone());
                state.history.push(item.clone());
                state.last_error = None;
                ReconcileOutcome::Accepted(item)
            }
            None => {
                if let Some(error) = &result.error {
                    state.last_error = Some(error.clone());
                }
                ReconcileOutcome::Empty
            }
        }
    }
}

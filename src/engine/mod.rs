//! Polling and reconciliation engine
//!
//! Keeps the displayed commentary in step with playback: the scheduler decides
//! when to ask the backend, the gate keeps at most one request in flight per
//! generation, and the reconciler decides which answers are shown.

pub mod controller;
pub mod gate;
pub mod history;
pub mod reconciler;
pub mod scheduler;
pub mod state;

pub use controller::LiveCommentaryEngine;
pub use gate::{GateGuard, SingleFlightGate};
pub use history::HistoryBuffer;
pub use reconciler::{ReconcileOutcome, ResultReconciler};
pub use scheduler::{FetchTicket, PollingScheduler, TickDecision};
pub use state::{EngineSnapshot, EngineState};

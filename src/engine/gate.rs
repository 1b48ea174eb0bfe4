//! Single-flight gate
//!
//! An atomic flag plus an RAII guard. Whoever holds the [`GateGuard`] owns the
//! only fetch cycle of its generation; dropping the guard releases the gate,
//! which also covers early returns, panics and task cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct SingleFlightGate {
    held: AtomicBool,
}

impl SingleFlightGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the gate if it is free
    pub fn try_acquire(self: &Arc<Self>) -> Option<GateGuard> {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GateGuard { gate: Arc::clone(self) })
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

/// Proof of holding a [`SingleFlightGate`]; releases it on drop
#[derive(Debug)]
#[must_use = "dropping the guard releases the gate immediately"]
pub struct GateGuard {
    gate: Arc<SingleFlightGate>,
}

impl GateGuard {
    /// Whether this guard belongs to `gate`
    pub fn guards(&self, gate: &Arc<SingleFlightGate>) -> bool {
        Arc::ptr_eq(&self.gate, gate)
    }
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        self.gate.held.store(false, Ordering::Release);
    }
}

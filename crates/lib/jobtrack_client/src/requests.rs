//! Stale-response guard.
//!
//! Each [`Operation`] has a generation counter. Starting a request bumps it
//! and hands out a [`Ticket`]; a response is applied only while its ticket
//! is still the latest for that operation.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::action::Operation;

/// Proof of which request generation a response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    op: Operation,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct RequestGenerations {
    counters: [AtomicU64; Operation::ALL.len()],
}

impl RequestGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request for `op`, superseding any in flight.
    pub fn begin(&self, op: Operation) -> Ticket {
        let generation = self.counters[op.index()].fetch_add(1, Ordering::SeqCst) + 1;
        Ticket { op, generation }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.counters[ticket.op.index()].load(Ordering::SeqCst) == ticket.generation
    }

    /// Supersede every in-flight request (used on logout).
    pub fn invalidate_all(&self) {
        for counter in &self.counters {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Supersede in-flight requests that carry a bearer token.
    pub fn invalidate_authenticated(&self) {
        for op in Operation::ALL.iter().filter(|op| op.is_authenticated()) {
            self.counters[op.index()].fetch_add(1, Ordering::SeqCst);
        }
    }
}

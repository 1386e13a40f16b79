//! Deferred interactions produced by a handler.

use dutch_core::AuctionEvent;

use crate::ledger::LedgerOp;

/// What a handler decided, after its state mutations have been applied.
#[derive(Clone, Debug)]
pub struct Effects<T> {
    /// Value returned to the caller on success.
    pub outcome: T,

    /// Ledger instructions, in issue order.
    pub ops: Vec<LedgerOp>,

    /// Events to record if every instruction succeeds.
    pub events: Vec<AuctionEvent>,
}

impl<T> Effects<T> {
    /// Start with no instructions and no events.
    pub fn new(outcome: T) -> Self {
        Self {
            outcome,
            ops: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Queue an instruction. Zero-amount instructions are dropped.
    pub fn push_op(&mut self, op: LedgerOp) {
        if !op.is_noop() {
            self.ops.push(op);
        }
    }

    /// Queue an event.
    pub fn push_event(&mut self, event: AuctionEvent) {
        self.events.push(event);
    }
}

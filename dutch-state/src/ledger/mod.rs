//! Value ledger seam.
//!
//! The engine owns no balances. It instructs a [`ValueLedger`] to pull bid
//! payments into custody, pay out tokens and refunds, and burn unsold supply.
//! A ledger transfer may hand control to the recipient, which may call back
//! into the engine before the outer operation returns.
//!
//! Each engine operation brackets its instructions with
//! [`ValueLedger::checkpoint`] and either [`ValueLedger::commit`] or
//! [`ValueLedger::rollback`], so a failed operation leaves no ledger effect.

mod memory;

pub use memory::InMemoryLedger;

use dutch_core::{AccountId, Amount, Asset, Units};

use crate::error::LedgerResult;

/// Opaque marker returned by [`ValueLedger::checkpoint`].
///
/// Checkpoints nest: an inner checkpoint must be committed or rolled back
/// before the outer one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedgerCheckpoint(usize);

impl LedgerCheckpoint {
    /// Wrap a journal depth.
    pub fn new(depth: usize) -> Self {
        Self(depth)
    }

    /// Journal depth this checkpoint restores to.
    pub fn depth(&self) -> usize {
        self.0
    }
}

/// One instruction from the engine to the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerOp {
    /// Pull a bid payment from the bidder into custody.
    Collect { from: AccountId, amount: Amount },
    /// Pay `amount` of `asset` out of custody.
    TransferOut {
        asset: Asset,
        to: AccountId,
        amount: Amount,
    },
    /// Destroy `amount` of `asset` held in custody.
    Burn { asset: Asset, amount: Amount },
}

impl LedgerOp {
    /// True for instructions that move nothing.
    pub fn is_noop(&self) -> bool {
        match self {
            LedgerOp::Collect { amount, .. }
            | LedgerOp::TransferOut { amount, .. }
            | LedgerOp::Burn { amount, .. } => *amount == 0,
        }
    }
}

/// Custodian of the sale token and the payment asset.
pub trait ValueLedger {
    /// Whether the engine may transfer out `units` sale tokens.
    fn escrow_check(&self, units: Units) -> bool;

    /// Move a bid payment from `from` into the engine's custody.
    fn collect(&mut self, from: &AccountId, amount: Amount) -> LedgerResult<()>;

    /// Pay `amount` of `asset` from custody to `to`.
    ///
    /// This is the point where a recipient may re-enter the engine.
    fn transfer_out(&mut self, asset: Asset, to: &AccountId, amount: Amount) -> LedgerResult<()>;

    /// Irreversibly destroy `amount` of `asset` from custody.
    fn burn(&mut self, asset: Asset, amount: Amount) -> LedgerResult<()>;

    /// Open a checkpoint.
    fn checkpoint(&mut self) -> LedgerCheckpoint;

    /// Keep everything done since `checkpoint`.
    fn commit(&mut self, checkpoint: LedgerCheckpoint);

    /// Undo everything done since `checkpoint`.
    fn rollback(&mut self, checkpoint: LedgerCheckpoint);

    /// Execute one instruction.
    fn apply(&mut self, op: &LedgerOp) -> LedgerResult<()> {
        match op {
            LedgerOp::Collect { from, amount } => self.collect(from, *amount),
            LedgerOp::TransferOut { asset, to, amount } => self.transfer_out(*asset, to, *amount),
            LedgerOp::Burn { asset, amount } => self.burn(*asset, *amount),
        }
    }
}

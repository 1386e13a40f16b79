//! In-memory value ledger for tests and simulation.

use std::collections::{BTreeMap, BTreeSet};

use dutch_core::{short_hex, AccountId, Amount, Asset, Units};

use super::{LedgerCheckpoint, ValueLedger};
use crate::error::{LedgerError, LedgerResult};

#[derive(Clone, Debug)]
struct JournalEntry {
    balances: BTreeMap<(Asset, AccountId), Amount>,
    burned: BTreeMap<Asset, Amount>,
}

/// Balances of both assets for every account, plus the engine's custody.
///
/// Rollback restores a saved copy of the balance tables, so nested
/// checkpoints (one per engine operation, including reentrant ones) unwind
/// in order.
#[derive(Clone, Debug)]
pub struct InMemoryLedger {
    /// Account holding the engine's escrow and collected payments.
    custodian: AccountId,

    balances: BTreeMap<(Asset, AccountId), Amount>,

    burned: BTreeMap<Asset, Amount>,

    /// Recipients that refuse incoming transfers.
    rejecting: BTreeSet<AccountId>,

    journal: Vec<JournalEntry>,
}

impl InMemoryLedger {
    /// Create an empty ledger with `custodian` as the engine's account.
    pub fn new(custodian: AccountId) -> Self {
        Self {
            custodian,
            balances: BTreeMap::new(),
            burned: BTreeMap::new(),
            rejecting: BTreeSet::new(),
            journal: Vec::new(),
        }
    }

    /// The engine's custody account.
    pub fn custodian(&self) -> AccountId {
        self.custodian
    }

    /// Create `amount` of `asset` out of thin air for `to`. Setup only.
    pub fn mint(&mut self, asset: Asset, to: &AccountId, amount: Amount) {
        *self.balances.entry((asset, *to)).or_insert(0) += amount;
    }

    /// Balance of `asset` held by `account`.
    pub fn balance_of(&self, asset: Asset, account: &AccountId) -> Amount {
        self.balances.get(&(asset, *account)).copied().unwrap_or(0)
    }

    /// Balance of `asset` held in custody.
    pub fn custody_balance(&self, asset: Asset) -> Amount {
        self.balance_of(asset, &self.custodian)
    }

    /// Total of `asset` destroyed so far.
    pub fn burned(&self, asset: Asset) -> Amount {
        self.burned.get(&asset).copied().unwrap_or(0)
    }

    /// Sum of all balances of `asset`.
    pub fn circulating(&self, asset: Asset) -> Amount {
        self.balances
            .iter()
            .filter(|((a, _), _)| *a == asset)
            .map(|(_, amount)| *amount)
            .sum()
    }

    /// Make `account` refuse incoming transfers.
    pub fn reject_transfers_to(&mut self, account: &AccountId) {
        self.rejecting.insert(*account);
    }

    /// Undo [`InMemoryLedger::reject_transfers_to`].
    pub fn accept_transfers_to(&mut self, account: &AccountId) {
        self.rejecting.remove(account);
    }

    /// Number of checkpoints neither committed nor rolled back.
    pub fn open_checkpoints(&self) -> usize {
        self.journal.len()
    }

    /// Move `amount` of `asset` between two accounts.
    pub fn transfer(
        &mut self,
        asset: Asset,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> LedgerResult<()> {
        if self.rejecting.contains(to) {
            return Err(LedgerError::RecipientRejected {
                asset,
                account: *to,
            });
        }
        self.debit(asset, from, amount)?;
        *self.balances.entry((asset, *to)).or_insert(0) += amount;
        Ok(())
    }

    fn debit(&mut self, asset: Asset, from: &AccountId, amount: Amount) -> LedgerResult<()> {
        let available = self.balance_of(asset, from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                asset,
                account: *from,
                available,
                requested: amount,
            });
        }
        self.balances.insert((asset, *from), available - amount);
        Ok(())
    }
}

impl ValueLedger for InMemoryLedger {
    fn escrow_check(&self, units: Units) -> bool {
        self.custody_balance(Asset::SaleToken) >= Amount::from(units)
    }

    fn collect(&mut self, from: &AccountId, amount: Amount) -> LedgerResult<()> {
        let custodian = self.custodian;
        self.transfer(Asset::Payment, from, &custodian, amount)
    }

    fn transfer_out(&mut self, asset: Asset, to: &AccountId, amount: Amount) -> LedgerResult<()> {
        let custodian = self.custodian;
        self.transfer(asset, &custodian, to, amount)
    }

    fn burn(&mut self, asset: Asset, amount: Amount) -> LedgerResult<()> {
        let custodian = self.custodian;
        self.debit(asset, &custodian, amount)?;
        *self.burned.entry(asset).or_insert(0) += amount;
        Ok(())
    }

    fn checkpoint(&mut self) -> LedgerCheckpoint {
        let depth = self.journal.len();
        self.journal.push(JournalEntry {
            balances: self.balances.clone(),
            burned: self.burned.clone(),
        });
        LedgerCheckpoint::new(depth)
    }

    fn commit(&mut self, checkpoint: LedgerCheckpoint) {
        if checkpoint.depth() >= self.journal.len() {
            tracing::warn!(depth = checkpoint.depth(), "Commit of unknown ledger checkpoint");
            return;
        }
        self.journal.truncate(checkpoint.depth());
    }

    fn rollback(&mut self, checkpoint: LedgerCheckpoint) {
        let Some(entry) = self.journal.split_off(checkpoint.depth()).into_iter().next() else {
            tracing::warn!(depth = checkpoint.depth(), "Rollback of unknown ledger checkpoint");
            return;
        };
        self.balances = entry.balances;
        self.burned = entry.burned;
        tracing::debug!(
            custodian = %short_hex(&self.custodian),
            depth = checkpoint.depth(),
            "Ledger rolled back"
        );
    }
}

//! The append-only transaction log of one account.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::{
    EngineError, MoneyCents, NewTransaction, ResultEngine, Transaction, TransactionKind,
    filters::filter_transactions,
};

/// Aggregates over the whole ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub deposits: MoneyCents,
    pub withdrawals: MoneyCents,
    pub balance: MoneyCents,
    pub count: usize,
}

/// In-memory ledger of one account (or one session).
///
/// Entries are kept in insertion order and receive increasing ids starting
/// from 0. Nothing is ever updated or removed.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    entries: Vec<Transaction>,
    next_id: u64,
    // running sums, updated together with every push
    deposits: MoneyCents,
    withdrawals: MoneyCents,
    balance: MoneyCents,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new transaction, assigning it the next id.
    ///
    /// Returns the stored entry. A negative amount, or one that would overflow
    /// the deposit or withdrawal totals, is rejected with [`EngineError::InvalidAmount`] and the
    /// ledger is left untouched.
    pub fn add_transaction(&mut self, draft: NewTransaction) -> ResultEngine<&Transaction> {
        if draft.amount.is_negative() {
            tracing::warn!(amount = %draft.amount, "rejected negative amount");
            return Err(EngineError::InvalidAmount(format!(
                "amount must be >= 0, got {}",
                draft.amount
            )));
        }
        // Both per-kind sums stay within i64, so their difference (the
        // balance) always fits and is never i64::MIN.
        let (deposits, withdrawals) = match draft.kind {
            TransactionKind::Deposit => (
                self.deposits.checked_add(draft.amount),
                Some(self.withdrawals),
            ),
            TransactionKind::Withdrawal => (
                Some(self.deposits),
                self.withdrawals.checked_add(draft.amount),
            ),
        };
        let (Some(deposits), Some(withdrawals)) = (deposits, withdrawals) else {
            tracing::warn!(amount = %draft.amount, "rejected amount overflowing the totals");
            return Err(EngineError::InvalidAmount("amount too large".to_string()));
        };

        let id = self.next_id;
        self.next_id += 1;
        self.deposits = deposits;
        self.withdrawals = withdrawals;
        self.balance += draft.kind.signed(draft.amount);
        tracing::debug!(id, kind = draft.kind.as_str(), amount = %draft.amount, "transaction added");

        let index = self.entries.len();
        self.entries.push(Transaction::from_draft(id, draft));
        Ok(&self.entries[index])
    }

    /// All entries, in insertion order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.entries
    }

    /// Returns the entry with the given id, if any.
    pub fn get(&self, id: u64) -> Option<&Transaction> {
        // ids are increasing, so the log is sorted by id
        self.entries
            .binary_search_by_key(&id, |tx| tx.id)
            .ok()
            .map(|index| &self.entries[index])
    }

    /// Deposits minus withdrawals, accumulated in insertion order.
    pub fn total(&self) -> MoneyCents {
        self.balance
    }

    /// The id the next stored transaction will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            deposits: self.deposits,
            withdrawals: self.withdrawals,
            balance: self.balance,
            count: self.entries.len(),
        }
    }

    /// Entries matching every `field value` pair in `tokens`.
    ///
    /// See [`filter_transactions`].
    pub fn filter<S: AsRef<str>>(&self, tokens: &[S]) -> ResultEngine<Vec<&Transaction>> {
        filter_transactions(&self.entries, tokens)
    }
}

/// A [`Ledger`] that can be shared between threads.
///
/// Writers are serialized and readers never observe a half-applied insert.
/// Every reading method works on one consistent view of the ledger.
#[derive(Clone, Debug, Default)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    // An insert validates everything before touching any field and nothing
    // after validation can panic, so a poisoned lock still guards a whole
    // ledger.
    fn read(&self) -> RwLockReadGuard<'_, Ledger> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Ledger> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_transaction(&self, draft: NewTransaction) -> ResultEngine<Transaction> {
        let mut ledger = self.write();
        ledger.add_transaction(draft).cloned()
    }

    pub fn snapshot(&self) -> Vec<Transaction> {
        self.read().transactions().to_vec()
    }

    pub fn total(&self) -> MoneyCents {
        self.read().total()
    }

    pub fn summary(&self) -> Summary {
        self.read().summary()
    }

    pub fn next_id(&self) -> u64 {
        self.read().next_id()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn filter<S: AsRef<str>>(&self, tokens: &[S]) -> ResultEngine<Vec<Transaction>> {
        let ledger = self.read();
        let matched = ledger.filter(tokens)?;
        Ok(matched.into_iter().cloned().collect())
    }
}

impl From<Ledger> for SharedLedger {
    fn from(ledger: Ledger) -> Self {
        Self::new(ledger)
    }
}

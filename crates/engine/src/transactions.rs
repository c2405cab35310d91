//! Transaction primitives.
//!
//! A `Transaction` is one recorded deposit or withdrawal. It is created by the
//! [`Ledger`](crate::Ledger) from a [`NewTransaction`] draft and never changes
//! afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }

    /// Returns the contribution of `amount` to the balance for this kind.
    #[must_use]
    pub fn signed(self, amount: MoneyCents) -> MoneyCents {
        match self {
            Self::Deposit => amount,
            Self::Withdrawal => -amount,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deposit => f.write_str("Deposit"),
            Self::Withdrawal => f.write_str("Withdrawal"),
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    /// Case-insensitive; plural and short forms are accepted.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "deposit" | "deposits" => Ok(Self::Deposit),
            "withdrawal" | "withdrawals" | "withdraw" => Ok(Self::Withdrawal),
            _ => Err(EngineError::invalid_value("type", value)),
        }
    }
}

/// A transaction before it is stored: everything but the id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTransaction {
    pub occurred_at: DateTime<Utc>,
    pub amount: MoneyCents,
    pub kind: TransactionKind,
}

impl NewTransaction {
    pub fn new(kind: TransactionKind, amount: MoneyCents, occurred_at: DateTime<Utc>) -> Self {
        Self {
            occurred_at,
            amount,
            kind,
        }
    }

    /// Draft stamped with the current wall-clock time.
    pub fn now(kind: TransactionKind, amount: MoneyCents) -> Self {
        Self::new(kind, amount, Utc::now())
    }

    pub fn deposit(amount: MoneyCents, occurred_at: DateTime<Utc>) -> Self {
        Self::new(TransactionKind::Deposit, amount, occurred_at)
    }

    pub fn withdrawal(amount: MoneyCents, occurred_at: DateTime<Utc>) -> Self {
        Self::new(TransactionKind::Withdrawal, amount, occurred_at)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u64,
    pub occurred_at: DateTime<Utc>,
    pub amount: MoneyCents,
    pub kind: TransactionKind,
}

impl Transaction {
    pub(crate) fn from_draft(id: u64, draft: NewTransaction) -> Self {
        Self {
            id,
            occurred_at: draft.occurred_at,
            amount: draft.amount,
            kind: draft.kind,
        }
    }
}

//! In-memory transaction ledger and its filtering engine.
//!
//! The [`Ledger`] is the append-only log of an account's deposits and
//! withdrawals; it assigns ids and computes the balance. The [`filters`]
//! module answers `field value` queries over a snapshot of the log.

pub use error::EngineError;
pub use filters::{
    Comparison, FieldParser, FilterRegistry, Predicate, TransactionFilter, filter_transactions,
};
pub use ledger::{Ledger, SharedLedger, Summary};
pub use money::MoneyCents;
pub use transactions::{NewTransaction, Transaction, TransactionKind};

mod error;
pub mod filters;
mod ledger;
mod money;
mod transactions;

pub type ResultEngine<T> = Result<T, EngineError>;

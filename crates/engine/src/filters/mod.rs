//! Criteria-based filtering of ledger entries.
//!
//! A query is a flat list of `field value` token pairs, e.g.
//! `["year", "2022", "type", "deposit"]`. Every pair becomes a [`Predicate`]
//! and an entry is kept only if it satisfies all of them.
//!
//! Field names are looked up in a [`FilterRegistry`], which maps each name to
//! a parser for its value. The default registry knows:
//!
//! | field    | value                     | keeps entries whose            |
//! |----------|---------------------------|--------------------------------|
//! | `year`   | four digits               | date is in that year           |
//! | `month`  | `1`..=`12`                | date is in that month          |
//! | `type`   | `deposit` / `withdrawal`  | kind matches                   |
//! | `amount` | decimal                   | amount is equal                |
//! | `min`    | decimal                   | amount is `>=` the value       |
//! | `max`    | decimal                   | amount is `<=` the value       |
//! | `from`   | `YYYY-MM-DD`              | date is on or after the day    |
//! | `to`     | `YYYY-MM-DD`              | date is before the day         |
//!
//! The whole token list is parsed before any entry is looked at, so a bad
//! query never yields a partial result.

use std::{collections::BTreeMap, fmt, str::FromStr, sync::LazyLock};

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::{EngineError, MoneyCents, ResultEngine, Transaction, TransactionKind};

/// Parses the value of one filter field. `None` means the value is malformed.
pub type FieldParser = fn(&str) -> Option<Predicate>;

static DEFAULT_REGISTRY: LazyLock<FilterRegistry> = LazyLock::new(FilterRegistry::default);

/// How a transaction attribute is compared with the filter value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    AtLeast,
    AtMost,
    Below,
}

impl Comparison {
    fn holds<T: Ord>(self, actual: T, expected: T) -> bool {
        match self {
            Self::Equal => actual == expected,
            Self::AtLeast => actual >= expected,
            Self::AtMost => actual <= expected,
            Self::Below => actual < expected,
        }
    }
}

/// A single field-scoped test on a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Predicate {
    Year(i32),
    Month(u32),
    Kind(TransactionKind),
    Amount(Comparison, MoneyCents),
    OccurredAt(Comparison, DateTime<Utc>),
}

impl Predicate {
    pub fn matches(&self, tx: &Transaction) -> bool {
        match *self {
            Self::Year(year) => tx.occurred_at.year() == year,
            Self::Month(month) => tx.occurred_at.month() == month,
            Self::Kind(kind) => tx.kind == kind,
            Self::Amount(cmp, value) => cmp.holds(tx.amount, value),
            Self::OccurredAt(cmp, value) => cmp.holds(tx.occurred_at, value),
        }
    }
}

fn parse_year(value: &str) -> Option<Predicate> {
    if value.len() != 4 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok().map(Predicate::Year)
}

fn parse_month(value: &str) -> Option<Predicate> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value
        .parse()
        .ok()
        .filter(|month| (1..=12).contains(month))
        .map(Predicate::Month)
}

fn parse_kind(value: &str) -> Option<Predicate> {
    TransactionKind::try_from(value).ok().map(Predicate::Kind)
}

fn parse_money(value: &str) -> Option<MoneyCents> {
    value.parse().ok()
}

fn parse_amount(value: &str) -> Option<Predicate> {
    parse_money(value).map(|v| Predicate::Amount(Comparison::Equal, v))
}

fn parse_min(value: &str) -> Option<Predicate> {
    parse_money(value).map(|v| Predicate::Amount(Comparison::AtLeast, v))
}

fn parse_max(value: &str) -> Option<Predicate> {
    parse_money(value).map(|v| Predicate::Amount(Comparison::AtMost, v))
}

fn parse_day(value: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
}

fn parse_from(value: &str) -> Option<Predicate> {
    parse_day(value).map(|day| Predicate::OccurredAt(Comparison::AtLeast, day))
}

fn parse_to(value: &str) -> Option<Predicate> {
    parse_day(value).map(|day| Predicate::OccurredAt(Comparison::Below, day))
}

/// Table of known filter fields.
///
/// Names are case-insensitive. New fields are added with
/// [`register`](FilterRegistry::register).
#[derive(Clone)]
pub struct FilterRegistry {
    fields: BTreeMap<String, FieldParser>,
}

impl Default for FilterRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register("year", parse_year)
            .register("month", parse_month)
            .register("type", parse_kind)
            .register("amount", parse_amount)
            .register("min", parse_min)
            .register("max", parse_max)
            .register("from", parse_from)
            .register("to", parse_to);
        registry
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.fields.keys()).finish()
    }
}

impl FilterRegistry {
    /// A registry without any field.
    pub fn empty() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) a field.
    pub fn register(&mut self, name: &str, parser: FieldParser) -> &mut Self {
        self.fields.insert(name.to_ascii_lowercase(), parser);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(&name.to_ascii_lowercase())
    }

    /// Registered field names, sorted.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Parses a `field value ...` token list, stopping at the first bad pair.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> ResultEngine<TransactionFilter> {
        if tokens.len() % 2 != 0 {
            return Err(EngineError::MalformedFilterExpression(tokens.len()));
        }

        let predicates = tokens
            .chunks_exact(2)
            .map(|pair| {
                let (field, value) = (pair[0].as_ref(), pair[1].as_ref());
                let parser = self
                    .fields
                    .get(&field.to_ascii_lowercase())
                    .ok_or_else(|| EngineError::UnknownFilterField(field.to_string()))?;
                parser(value).ok_or_else(|| EngineError::invalid_value(field, value))
            })
            .collect::<ResultEngine<Vec<_>>>()?;

        Ok(TransactionFilter { predicates })
    }
}

/// A parsed query: the conjunction of its predicates.
///
/// An empty filter matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    predicates: Vec<Predicate>,
}

impl TransactionFilter {
    pub fn new(predicates: Vec<Predicate>) -> Self {
        Self { predicates }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        self.predicates.iter().all(|p| p.matches(tx))
    }

    /// Keeps the matching entries, in their original order.
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        let matched: Vec<&Transaction> = transactions.iter().filter(|tx| self.matches(tx)).collect();
        tracing::debug!(
            predicates = self.predicates.len(),
            scanned = transactions.len(),
            matched = matched.len(),
            "filter evaluated"
        );
        matched
    }
}

impl FromStr for TransactionFilter {
    type Err = EngineError;

    /// Parses a whitespace-separated query with the default fields.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        DEFAULT_REGISTRY.parse(&tokens)
    }
}

/// Returns the entries of `transactions` matching every `field value` pair in
/// `tokens`, using the default fields.
///
/// # Examples
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use engine::{Ledger, MoneyCents, NewTransaction, filter_transactions};
///
/// let mut ledger = Ledger::new();
/// let when = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
/// ledger.add_transaction(NewTransaction::deposit(MoneyCents::from_units(100), when)).unwrap();
///
/// let found = filter_transactions(ledger.transactions(), &["year", "2022"]).unwrap();
/// assert_eq!(found.len(), 1);
/// ```
pub fn filter_transactions<'a, S: AsRef<str>>(
    transactions: &'a [Transaction],
    tokens: &[S],
) -> ResultEngine<Vec<&'a Transaction>> {
    let filter = DEFAULT_REGISTRY.parse(tokens)?;
    Ok(filter.apply(transactions))
}

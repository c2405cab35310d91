//! One interactive session: owns the ledger and turns commands into text.

use chrono::Utc;
use engine::{Ledger, MoneyCents, NewTransaction, Transaction, TransactionKind};

use crate::{
    commands::{COMMANDS, Command},
    error::CommandError,
    settings::Settings,
};

/// What the shell should do after a line.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Print(String),
    Exit,
}

#[derive(Debug)]
pub struct Session {
    ledger: Ledger,
    currency_symbol: String,
}

impl Session {
    pub fn new(settings: &Settings) -> Self {
        Self {
            ledger: Ledger::new(),
            currency_symbol: settings.currency_symbol.clone(),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Runs one input line. Errors are rendered as text; the session stays
    /// usable after any of them.
    pub fn execute(&mut self, line: &str) -> Outcome {
        let command = match Command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Outcome::Print(String::new()),
            Err(err) => return Outcome::Print(format!("Error: {err}")),
        };
        if command == Command::Exit {
            return Outcome::Exit;
        }

        match self.run(command) {
            Ok(text) => Outcome::Print(text),
            Err(err) => {
                tracing::debug!(%err, "command failed");
                Outcome::Print(format!("Error: {err}"))
            }
        }
    }

    fn run(&mut self, command: Command) -> Result<String, CommandError> {
        let text = match command {
            Command::Help => help(),
            Command::Balance => format!(
                "Your current balance is {}. You've made a total of {} transactions.",
                self.money(self.ledger.total()),
                self.ledger.len()
            ),
            Command::Summary => {
                let summary = self.ledger.summary();
                format!(
                    "Deposits:    {}\nWithdrawals: {}\nBalance:     {}\nTransactions: {}",
                    self.money(summary.deposits),
                    self.money(summary.withdrawals),
                    self.money(summary.balance),
                    summary.count
                )
            }
            Command::Deposit { amount, date } => {
                self.add(TransactionKind::Deposit, amount, date)?
            }
            Command::Withdraw { amount, date } => {
                self.add(TransactionKind::Withdrawal, amount, date)?
            }
            Command::List => self.render(self.ledger.transactions().iter()),
            Command::Filter(tokens) => {
                let found = self.ledger.filter(tokens.as_slice())?;
                self.render(found.into_iter())
            }
            Command::Exit => String::new(),
        };
        Ok(text)
    }

    fn add(
        &mut self,
        kind: TransactionKind,
        amount: MoneyCents,
        date: Option<chrono::DateTime<Utc>>,
    ) -> Result<String, CommandError> {
        let draft = NewTransaction::new(kind, amount, date.unwrap_or_else(Utc::now));
        let tx = self.ledger.add_transaction(draft)?;
        let line = format!("Recorded {}", render_line(tx, &self.currency_symbol));
        tracing::info!(id = tx.id, kind = kind.as_str(), "transaction recorded");
        Ok(line)
    }

    fn money(&self, amount: MoneyCents) -> String {
        money(&self.currency_symbol, amount)
    }

    fn render<'a>(&self, transactions: impl Iterator<Item = &'a Transaction>) -> String {
        let lines: Vec<String> = transactions
            .map(|tx| render_line(tx, &self.currency_symbol))
            .collect();
        let count = format!("{} transaction(s)", lines.len());
        lines.into_iter().chain([count]).collect::<Vec<_>>().join("\n")
    }
}

fn help() -> String {
    let width = COMMANDS.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    COMMANDS
        .iter()
        .map(|(name, description)| format!("{name:<width$}  {description}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders `amount` with the sign before the currency symbol (`-$7.50`).
fn money(symbol: &str, amount: MoneyCents) -> String {
    let text = amount.to_string();
    match text.strip_prefix('-') {
        Some(magnitude) => format!("-{symbol}{magnitude}"),
        None => format!("{symbol}{text}"),
    }
}

fn render_line(tx: &Transaction, symbol: &str) -> String {
    format!(
        "#{:<4} {}  {:<10}  {:>12}",
        tx.id,
        tx.occurred_at.format("%Y-%m-%d"),
        tx.kind.to_string(),
        money(symbol, tx.amount)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(&Settings::default())
    }

    fn print(session: &mut Session, line: &str) -> String {
        match session.execute(line) {
            Outcome::Print(text) => text,
            Outcome::Exit => panic!("unexpected exit on {line:?}"),
        }
    }

    #[test]
    fn balance_reports_total_and_count() {
        let mut s = session();
        print(&mut s, "deposit 100 2022-01-01");
        print(&mut s, "withdraw 50");

        assert_eq!(
            print(&mut s, "balance"),
            "Your current balance is $50.00. You've made a total of 2 transactions."
        );
    }

    #[test]
    fn negative_balance_puts_sign_before_symbol() {
        let mut s = session();
        print(&mut s, "withdraw 7.5");
        assert!(print(&mut s, "balance").contains("-$7.50"));
    }

    #[test]
    fn extreme_amounts_render_without_overflow() {
        assert_eq!(money("$", MoneyCents::new(i64::MIN)), "-$92233720368547758.08");
        assert_eq!(money("$", MoneyCents::new(i64::MAX)), "$92233720368547758.07");

        let mut s = session();
        print(&mut s, "withdraw 92233720368547758.07");
        assert!(print(&mut s, "withdraw 0.01").starts_with("Error: Invalid amount"));
        print(&mut s, "deposit 92233720368547758.07");
        assert!(print(&mut s, "deposit 0.01").starts_with("Error: Invalid amount"));

        assert_eq!(
            print(&mut s, "balance"),
            "Your current balance is $0.00. You've made a total of 2 transactions."
        );
        assert!(print(&mut s, "summary").contains("Withdrawals: $92233720368547758.07"));
        assert!(print(&mut s, "list").ends_with("2 transaction(s)"));
    }

    #[test]
    fn filter_lists_matching_entries() {
        let mut s = session();
        print(&mut s, "deposit 100 2022-01-01");
        print(&mut s, "withdraw 50 2023-06-15");

        let out = print(&mut s, "filter year 2022");
        assert!(out.contains("#0"));
        assert!(!out.contains("#1"));
        assert!(out.ends_with("1 transaction(s)"));
    }

    #[test]
    fn errors_are_printed_and_state_is_kept() {
        let mut s = session();
        print(&mut s, "deposit 10");

        assert!(print(&mut s, "deposit -5").starts_with("Error: Invalid amount"));
        assert_eq!(
            print(&mut s, "filter year"),
            "Error: Malformed filter expression: expected field/value pairs, got 1 tokens"
        );
        assert_eq!(
            print(&mut s, "filter colour red"),
            "Error: Unknown filter field \"colour\""
        );
        assert_eq!(
            print(&mut s, "filter type refund"),
            "Error: Invalid value \"refund\" for filter field \"type\""
        );
        assert!(print(&mut s, "frobnicate").starts_with("Error: unknown command"));

        assert_eq!(s.ledger().len(), 1);
        assert_eq!(s.ledger().next_id(), 1);
    }

    #[test]
    fn summary_and_list() {
        let mut s = session();
        print(&mut s, "deposit 20");
        print(&mut s, "withdraw 5");

        let summary = print(&mut s, "summary");
        assert!(summary.contains("Deposits:    $20.00"));
        assert!(summary.contains("Withdrawals: $5.00"));
        assert!(summary.contains("Balance:     $15.00"));

        let list = print(&mut s, "list");
        assert_eq!(list.lines().count(), 3);
    }

    #[test]
    fn help_lists_every_command() {
        let out = print(&mut session(), "help");
        for (name, _) in COMMANDS {
            assert!(out.contains(name));
        }
    }

    #[test]
    fn exit_and_blank_lines() {
        let mut s = session();
        assert_eq!(s.execute(""), Outcome::Print(String::new()));
        assert_eq!(s.execute("exit"), Outcome::Exit);
    }
}

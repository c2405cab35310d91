//! Shell commands and their parsing.

use chrono::{DateTime, NaiveDate, Utc};
use engine::MoneyCents;

use crate::error::CommandError;

/// Name and description of every command, in the order `help` lists them.
pub const COMMANDS: &[(&str, &str)] = &[
    ("help", "Shows this message."),
    ("balance", "Shows your current balance."),
    ("summary", "Shows deposits, withdrawals and balance."),
    ("deposit <amount> [YYYY-MM-DD]", "Records a deposit."),
    ("withdraw <amount> [YYYY-MM-DD]", "Records a withdrawal."),
    ("list", "Lists every transaction."),
    (
        "filter <field> <value> ...",
        "Lists transactions matching all the given fields.",
    ),
    ("exit", "Ends the session."),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Balance,
    Summary,
    Deposit {
        amount: MoneyCents,
        date: Option<DateTime<Utc>>,
    },
    Withdraw {
        amount: MoneyCents,
        date: Option<DateTime<Utc>>,
    },
    List,
    Filter(Vec<String>),
    Exit,
}

impl Command {
    /// Parses one input line. A blank line is `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = tokens.collect();

        let command = match name.to_ascii_lowercase().as_str() {
            "help" | "?" => no_args(&args, Self::Help)?,
            "balance" => no_args(&args, Self::Balance)?,
            "summary" => no_args(&args, Self::Summary)?,
            "list" => no_args(&args, Self::List)?,
            "exit" | "quit" => no_args(&args, Self::Exit)?,
            "deposit" => {
                let (amount, date) = amount_and_date(&args)?;
                Self::Deposit { amount, date }
            }
            "withdraw" | "withdrawal" => {
                let (amount, date) = amount_and_date(&args)?;
                Self::Withdraw { amount, date }
            }
            "filter" => Self::Filter(args.iter().map(|s| s.to_string()).collect()),
            _ => return Err(CommandError::UnknownCommand(name.to_string())),
        };
        Ok(Some(command))
    }
}

fn no_args(args: &[&str], command: Command) -> Result<Command, CommandError> {
    match args.first() {
        Some(extra) => Err(CommandError::UnexpectedArgument(extra.to_string())),
        None => Ok(command),
    }
}

fn amount_and_date(args: &[&str]) -> Result<(MoneyCents, Option<DateTime<Utc>>), CommandError> {
    let amount = args
        .first()
        .ok_or(CommandError::MissingArgument("amount"))?
        .parse::<MoneyCents>()?;
    let date = args.get(1).map(|raw| parse_date(raw)).transpose()?;
    if let Some(extra) = args.get(2) {
        return Err(CommandError::UnexpectedArgument(extra.to_string()));
    }
    Ok((amount, date))
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, CommandError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| CommandError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use engine::EngineError;

    use super::*;

    #[test]
    fn blank_line_is_no_command() {
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(Command::parse("Balance").unwrap(), Some(Command::Balance));
        assert_eq!(Command::parse("QUIT").unwrap(), Some(Command::Exit));
    }

    #[test]
    fn deposit_with_and_without_date() {
        assert_eq!(
            Command::parse("deposit 12,50").unwrap(),
            Some(Command::Deposit {
                amount: MoneyCents::new(1250),
                date: None
            })
        );
        assert_eq!(
            Command::parse("withdraw 3 2022-01-31").unwrap(),
            Some(Command::Withdraw {
                amount: MoneyCents::new(300),
                date: Some(Utc.with_ymd_and_hms(2022, 1, 31, 0, 0, 0).unwrap()),
            })
        );
    }

    #[test]
    fn negative_amount_parses_and_is_left_to_the_ledger() {
        assert_eq!(
            Command::parse("deposit -5").unwrap(),
            Some(Command::Deposit {
                amount: MoneyCents::new(-500),
                date: None
            })
        );
    }

    #[test]
    fn bad_arguments_are_reported() {
        assert_eq!(
            Command::parse("deposit"),
            Err(CommandError::MissingArgument("amount"))
        );
        assert!(matches!(
            Command::parse("deposit ten"),
            Err(CommandError::Engine(EngineError::InvalidAmount(_)))
        ));
        assert_eq!(
            Command::parse("deposit 1 31/01/2022"),
            Err(CommandError::InvalidDate("31/01/2022".to_string()))
        );
        assert_eq!(
            Command::parse("deposit 1 2022-01-31 extra"),
            Err(CommandError::UnexpectedArgument("extra".to_string()))
        );
        assert_eq!(
            Command::parse("balance now"),
            Err(CommandError::UnexpectedArgument("now".to_string()))
        );
        assert_eq!(
            Command::parse("transfer 10"),
            Err(CommandError::UnknownCommand("transfer".to_string()))
        );
    }

    #[test]
    fn filter_keeps_tokens_verbatim() {
        assert_eq!(
            Command::parse("filter year 2022  type Deposit").unwrap(),
            Some(Command::Filter(vec![
                "year".to_string(),
                "2022".to_string(),
                "type".to_string(),
                "Deposit".to_string(),
            ]))
        );
    }
}

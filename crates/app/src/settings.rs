//! Shell settings.
//!
//! Sources, lowest priority first: built-in defaults, the TOML file
//! (`config/ledger.toml` unless `--config` is given), `LEDGER_*` environment
//! variables, command line flags.

use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/ledger.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log level for the shell and the engine.
    pub level: String,
    pub currency_symbol: String,
    pub prompt: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            currency_symbol: "$".to_string(),
            prompt: "> ".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "ledger", about = "Personal ledger: deposits, withdrawals and balance")]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override log level (e.g. debug, info, warn).
    #[arg(long)]
    level: Option<String>,
    /// Override the currency symbol shown before amounts.
    #[arg(long)]
    currency_symbol: Option<String>,
    /// Override the input prompt.
    #[arg(long)]
    prompt: Option<String>,
}

pub fn load() -> Result<Settings> {
    load_from(Args::parse())
}

pub fn load_from(args: Args) -> Result<Settings> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("LEDGER"));
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(level) = args.level {
        settings.level = level;
    }
    if let Some(currency_symbol) = args.currency_symbol {
        settings.currency_symbol = currency_symbol;
    }
    if let Some(prompt) = args.prompt {
        settings.prompt = prompt;
    }

    Ok(settings)
}

use std::io::{self, BufRead, Write};

use session::{Outcome, Session};

mod commands;
mod error;
mod session;
mod settings;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "ledger_shell={level},engine={level}",
            level = settings.level
        ))
        .with_writer(io::stderr)
        .init();

    tracing::info!("session started");
    let mut session = Session::new(&settings);
    run(&mut session, &settings.prompt, io::stdin().lock(), io::stdout().lock())?;
    tracing::info!(transactions = session.ledger().len(), "session ended");

    Ok(())
}

/// Reads commands until `exit` or end of input.
fn run(
    session: &mut Session,
    prompt: &str,
    mut input: impl BufRead,
    mut output: impl Write,
) -> error::Result<()> {
    let mut line = String::new();
    loop {
        write!(output, "{prompt}")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(());
        }

        match session.execute(&line) {
            Outcome::Print(text) if text.is_empty() => {}
            Outcome::Print(text) => writeln!(output, "{text}")?,
            Outcome::Exit => return Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn runs_until_exit() {
        let mut session = Session::new(&Settings::default());
        let input = "deposit 100 2022-01-01\nwithdraw 50\n\nbalance\nexit\nbalance\n";
        let mut output = Vec::new();

        run(&mut session, "> ", input.as_bytes(), &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Your current balance is $50.00."));
        assert_eq!(output.matches("Your current balance").count(), 1);
        assert_eq!(session.ledger().len(), 2);
    }

    #[test]
    fn stops_at_end_of_input() {
        let mut session = Session::new(&Settings::default());
        let mut output = Vec::new();

        run(&mut session, "> ", "deposit 1\n".as_bytes(), &mut output).unwrap();

        assert_eq!(session.ledger().len(), 1);
    }
}

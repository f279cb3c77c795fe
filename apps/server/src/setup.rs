//! Interactive first-run setup.

use rates_alerts::{ConfigStore, StoreError};
use rates_core::Credentials;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Bot token and chat ID must not be empty")]
    EmptyInput,
    #[error("Console I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Prompt for the bot token and chat ID, then persist them.
///
/// Blank answers abort without touching the store.
pub fn run_setup<R, W>(
    input: &mut R,
    output: &mut W,
    store: &ConfigStore,
) -> Result<Credentials, SetupError>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "--- Initial bot setup ---")?;
    let token = prompt(input, output, "Enter your Telegram bot token: ")?;
    let chat_id = prompt(input, output, "Enter your Telegram chat ID: ")?;

    let credentials = match Credentials::new(&token, &chat_id) {
        Ok(credentials) => credentials,
        Err(_) => {
            writeln!(output, "❌ Bot token and chat ID cannot be empty. Exiting.")?;
            return Err(SetupError::EmptyInput);
        }
    };

    store.save(&credentials)?;
    writeln!(output, "✅ Settings saved to '{}'.", store.path().display())?;

    Ok(credentials)
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> io::Result<String> {
    write!(output, "{}", label)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result, bail};
use dialoguer::{Input, theme::ColorfulTheme};
use tracing::debug;

/// Pick the one-time code sent with a role assumption.
///
/// A serial without an inline code asks `prompt`; without a serial no code is sent.
pub fn token_code(
    serial: Option<&str>,
    code: Option<&str>,
    prompt: impl FnOnce(&str) -> Result<String>,
) -> Result<Option<String>> {
    match (serial, code) {
        (Some(_), Some(code)) => Ok(Some(code.to_string())),
        (Some(serial), None) => prompt(serial).map(Some),
        (None, code) => {
            if code.is_some() {
                debug!("No MFA serial configured, ignoring token code");
            }
            Ok(None)
        }
    }
}

/// Ask for the current one-time code of an MFA device.
///
/// The prompt goes to stderr, so stdout stays safe to `eval`. Without a
/// terminal the code is read as a plain line from stdin.
pub fn prompt_token_code(serial: &str) -> Result<String> {
    if !io::stderr().is_terminal() {
        return read_token_code(serial, io::stdin().lock(), io::stderr());
    }

    let theme = ColorfulTheme::default();

    Input::<String>::with_theme(&theme)
        .with_prompt(format!("Assume Role MFA token code for {serial}"))
        .validate_with(|input: &String| {
            if is_valid_token_code(input) {
                Ok(())
            } else {
                Err("MFA token code must be 6 digits")
            }
        })
        .interact_text()
        .context("Failed to read MFA token code")
}

fn read_token_code(
    serial: &str,
    mut input: impl BufRead,
    mut prompt: impl Write,
) -> Result<String> {
    write!(prompt, "Assume Role MFA token code for {serial}: ")?;
    prompt.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read MFA token code")?;

    let code = line.trim();
    if !is_valid_token_code(code) {
        bail!("MFA token code must be 6 digits");
    }
    Ok(code.to_string())
}

fn is_valid_token_code(code: &str) -> bool {
    code.len() == 6 && code.chars().all(|c| c.is_ascii_digit())
}

//! Interactive prompts

use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};

/// True when stdin is a terminal someone can answer prompts on
pub fn is_interactive() -> bool {
    atty::is(atty::Stream::Stdin)
}

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !is_interactive() {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

/// Read a password from stdin
///
/// Prints a prompt only when stdin is a terminal so the password can be
/// piped in from scripts.
pub fn read_password() -> Result<String> {
    if is_interactive() {
        print!("Password: ");
        io::stdout().flush()?;
    }
    read_secret(io::stdin().lock())
}

fn read_secret(mut reader: impl BufRead) -> Result<String> {
    let mut input = String::new();
    if reader.read_line(&mut input)? == 0 {
        bail!("No password given");
    }
    Ok(input.trim_end_matches(&['\r', '\n'][..]).to_string())
}

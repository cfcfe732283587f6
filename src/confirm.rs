use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

/// Decides whether an existing output may be overwritten.
///
/// The command helpers receive one of these instead of prompting themselves, so
/// callers can swap the terminal prompt for `--yes` or a scripted answer.
pub trait Confirm {
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// Accepts every question; backs the `--yes` flag.
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _question: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Asks on stderr and reads a `y`/`yes` answer from stdin.
pub struct StdinPrompt;

impl Confirm for StdinPrompt {
    fn confirm(&self, question: &str) -> Result<bool> {
        let mut stderr = io::stderr();
        write!(stderr, "{} [y/N] ", question)?;
        stderr.flush()?;

        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .context("Failed to read confirmation from stdin")?;
        Ok(is_yes(&answer))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

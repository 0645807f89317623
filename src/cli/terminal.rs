use std::io::{self, BufRead, IsTerminal, Write};

use console::Term;
use dialoguer::{theme::ColorfulTheme, Input};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerminalError {
    /// Ctrl+C while a raw-mode prompt was reading.
    #[error("Input interrupted")]
    Interrupted,

    #[error("Input closed")]
    Closed,

    /// The cause is part of the message and not exposed as `source()`.
    #[error("Terminal I/O error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for TerminalError {
    fn from(err: io::Error) -> Self {
        TerminalError::Io(err)
    }
}

impl TerminalError {
    /// Whether the operator asked to leave, as opposed to a read that merely failed.
    pub fn is_termination(&self) -> bool {
        matches!(self, TerminalError::Interrupted | TerminalError::Closed)
    }
}

/// Line-oriented console the storefront talks to.
pub trait Terminal {
    fn read_line(&mut self, prompt: &str) -> Result<String, TerminalError>;
    fn write_line(&mut self, line: &str);
}

/// Prompts through dialoguer on a TTY and falls back to plain line reads when stdin is piped.
pub struct ConsoleTerminal {
    term: Term,
    theme: ColorfulTheme,
}

impl ConsoleTerminal {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            theme: ColorfulTheme::default(),
        }
    }

    fn read_piped_line(&mut self, prompt: &str) -> Result<String, TerminalError> {
        print!("{}: ", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(TerminalError::Closed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl Default for ConsoleTerminal {
    fn default() -> Self {
        Self::new()
    }
}

/// Dialoguer reads keys from `/dev/tty` when stdin is not a terminal, so both ends must be one.
fn prompts_interactively(stdout_is_term: bool, stdin_is_term: bool) -> bool {
    stdout_is_term && stdin_is_term
}

impl Terminal for ConsoleTerminal {
    fn read_line(&mut self, prompt: &str) -> Result<String, TerminalError> {
        if !prompts_interactively(self.term.is_term(), io::stdin().is_terminal()) {
            return self.read_piped_line(prompt);
        }

        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|err| match err {
                dialoguer::Error::IO(e) => match e.kind() {
                    io::ErrorKind::Interrupted => TerminalError::Interrupted,
                    io::ErrorKind::UnexpectedEof => TerminalError::Closed,
                    _ => TerminalError::Io(e),
                },
            })
    }

    fn write_line(&mut self, line: &str) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piped_stdin_skips_dialoguer() {
        assert!(prompts_interactively(true, true));
        assert!(!prompts_interactively(true, false));
        assert!(!prompts_interactively(false, true));
    }

    #[test]
    fn test_io_error_cause_is_not_repeated() {
        let err = TerminalError::from(io::Error::new(io::ErrorKind::Other, "device hiccup"));
        let chained = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(chained, "Terminal I/O error: device hiccup");
    }

    #[test]
    fn test_termination_kinds() {
        assert!(TerminalError::Interrupted.is_termination());
        assert!(TerminalError::Closed.is_termination());
        assert!(!TerminalError::from(io::Error::new(io::ErrorKind::Other, "x")).is_termination());
    }
}

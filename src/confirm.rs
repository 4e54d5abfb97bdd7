//! Operator confirmation checkpoints.
//!
//! A checkpoint offers exactly two choices. The pipeline only ever sees the
//! [`Confirm`] trait, so tests and `--yes` runs swap the terminal prompt for a
//! scripted or fixed responder.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::Mutex;

/// Yes/no decision source for checkpoints
pub trait Confirm {
    /// Ask the operator, showing `message` first when present.
    ///
    /// `Ok(false)` means "no"; the caller must not continue.
    fn confirm(&self, message: Option<&str>) -> io::Result<bool>;
}

/// Interactive prompt on the controlling terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

impl TerminalConfirm {
    /// Create a terminal prompt
    pub fn new() -> Self {
        Self
    }

    /// Prompt on arbitrary streams. End of input counts as "no".
    pub fn ask<R: BufRead, W: Write>(
        message: Option<&str>,
        input: &mut R,
        output: &mut W,
    ) -> io::Result<bool> {
        if let Some(message) = message {
            writeln!(output, "{}", message)?;
        }

        loop {
            writeln!(output, "1) Yes")?;
            writeln!(output, "2) No")?;
            write!(output, "#? ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                return Ok(false);
            }

            match line.trim().to_lowercase().as_str() {
                "1" | "y" | "yes" => return Ok(true),
                "2" | "n" | "no" => return Ok(false),
                _ => continue,
            }
        }
    }
}

impl Confirm for TerminalConfirm {
    fn confirm(&self, message: Option<&str>) -> io::Result<bool> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        Self::ask(message, &mut input, &mut output)
    }
}

/// Gives the same answer to every checkpoint
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm {
    answer: bool,
}

impl AutoConfirm {
    /// Accept every checkpoint
    pub fn accept() -> Self {
        Self { answer: true }
    }

    /// Reject every checkpoint
    pub fn reject() -> Self {
        Self { answer: false }
    }
}

impl Confirm for AutoConfirm {
    fn confirm(&self, message: Option<&str>) -> io::Result<bool> {
        if let Some(message) = message {
            log::info!("{} -> {}", message, if self.answer { "yes" } else { "no" });
        }
        Ok(self.answer)
    }
}

/// Answers from a fixed script and records what was asked.
///
/// Once the script runs out every further checkpoint is rejected.
#[derive(Debug, Default)]
pub struct ScriptedConfirm {
    answers: Mutex<VecDeque<bool>>,
    asked: Mutex<Vec<Option<String>>>,
}

impl ScriptedConfirm {
    /// Responder that answers with `answers` in order
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Messages of the checkpoints asked so far
    pub fn asked(&self) -> Vec<Option<String>> {
        self.asked
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, message: Option<&str>) -> io::Result<bool> {
        self.asked
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message.map(str::to_string));
        let answer = self
            .answers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or(false);
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ask(message: Option<&str>, typed: &str) -> (bool, String) {
        let mut input = Cursor::new(typed.as_bytes().to_vec());
        let mut output = Vec::new();
        let answer = TerminalConfirm::ask(message, &mut input, &mut output).unwrap();
        (answer, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_terminal_yes_and_no() {
        assert!(ask(Some("Tag 1.0?"), "1\n").0);
        assert!(ask(None, "yes\n").0);
        assert!(!ask(None, "2\n").0);
        assert!(!ask(None, "No\n").0);
    }

    #[test]
    fn test_terminal_reprompts_on_other_input() {
        let (answer, shown) = ask(Some("Upload?"), "maybe\n3\n1\n");
        assert!(answer);
        assert!(shown.starts_with("Upload?\n"));
        assert_eq!(shown.matches("1) Yes").count(), 3);
    }

    #[test]
    fn test_terminal_eof_is_no() {
        assert!(!ask(Some("Push?"), "").0);
    }

    #[test]
    fn test_scripted_runs_out_to_no() {
        let confirm = ScriptedConfirm::new([true]);
        assert!(confirm.confirm(Some("first")).unwrap());
        assert!(!confirm.confirm(None).unwrap());
        assert_eq!(confirm.asked(), vec![Some("first".to_string()), None]);
    }

    #[test]
    fn test_auto_confirm() {
        assert!(AutoConfirm::accept().confirm(Some("x")).unwrap());
        assert!(!AutoConfirm::reject().confirm(None).unwrap());
    }
}

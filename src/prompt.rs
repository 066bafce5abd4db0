//! Line-oriented operator interaction.
//!
//! Selection and deployment code only talks to the [`Prompter`] trait.
//! [`ConsolePrompter`] drives a real terminal; [`ScriptedPrompter`] replays
//! canned answers for tests and non-interactive drivers.

use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Mutex;

use crate::error::DeployError;

/// Widest menu rule drawn, in columns.
const MAX_RULE_WIDTH: usize = 64;

/// Operator-facing I/O used by the selection flow and the orchestrator.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter: Send + Sync {
    /// Display a numbered menu. Options are numbered from 1; `zero_label`
    /// describes what `0` does (exit or back).
    fn show_menu(&self, title: &str, options: &[String], zero_label: &str);

    /// Read one line of input after showing `prompt`, without the trailing
    /// newline.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::InputUnavailable`] if input is not interactive
    /// or has been exhausted.
    fn read_line(&self, prompt: &str) -> Result<String, DeployError>;

    /// Show an informational message to the operator.
    fn notice(&self, msg: &str);
}

/// Render a menu as text lines, with a rule `width` columns wide.
#[must_use]
pub fn render_menu(title: &str, options: &[String], zero_label: &str, width: usize) -> String {
    let rule = "-".repeat(width);
    let mut out = format!("{rule}\n{title}\n{rule}\n");
    for (i, option) in options.iter().enumerate() {
        out.push_str(&format!("{:>3}. {option}\n", i + 1));
    }
    out.push_str(&format!("{:>3}. {zero_label}\n{rule}\n", 0));
    out
}

/// Width of the menu rule for the current terminal.
fn rule_width() -> usize {
    terminal_size::terminal_size()
        .map_or(MAX_RULE_WIDTH, |(terminal_size::Width(w), _)| {
            usize::from(w).min(MAX_RULE_WIDTH)
        })
}

/// [`Prompter`] over the process's stdin and stdout.
#[derive(Debug, Default)]
pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
    fn show_menu(&self, title: &str, options: &[String], zero_label: &str) {
        print!("\n{}", render_menu(title, options, zero_label, rule_width()));
    }

    fn read_line(&self, prompt: &str) -> Result<String, DeployError> {
        let stdin = io::stdin();
        if !stdin.is_terminal() {
            return Err(DeployError::InputUnavailable(
                "standard input is not a terminal".to_string(),
            ));
        }

        print!("{prompt}");
        io::stdout()
            .flush()
            .map_err(|e| DeployError::InputUnavailable(e.to_string()))?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| DeployError::InputUnavailable(e.to_string()))?;
        if read == 0 {
            return Err(DeployError::InputUnavailable("end of input".to_string()));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn notice(&self, msg: &str) {
        println!("{msg}");
    }
}

/// [`Prompter`] that answers from a fixed script.
///
/// Menus and notices are recorded so callers can inspect what would have
/// been shown. Once the script runs out every read fails with
/// [`DeployError::InputUnavailable`].
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    shown: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    /// Create a prompter that will answer with `answers` in order.
    #[must_use]
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            shown: Mutex::new(Vec::new()),
        }
    }

    /// Titles of menus and text of notices, in display order.
    #[must_use]
    pub fn shown(&self) -> Vec<String> {
        self.shown
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Number of answers not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    fn record(&self, entry: String) {
        self.shown
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(entry);
    }
}

impl Prompter for ScriptedPrompter {
    fn show_menu(&self, title: &str, _options: &[String], _zero_label: &str) {
        self.record(title.to_string());
    }

    fn read_line(&self, _prompt: &str) -> Result<String, DeployError> {
        self.answers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front()
            .ok_or_else(|| DeployError::InputUnavailable("script exhausted".to_string()))
    }

    fn notice(&self, msg: &str) {
        self.record(msg.to_string());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn render_menu_numbers_from_one() {
        let options = vec!["XiFan HandHelds".to_string(), "YMC".to_string()];
        insta::assert_snapshot!(render_menu("Select brand", &options, "Exit", 16), @r"
        ----------------
        Select brand
        ----------------
          1. XiFan HandHelds
          2. YMC
          0. Exit
        ----------------
        ");
    }

    #[test]
    fn scripted_prompter_replays_then_fails() {
        let prompter = ScriptedPrompter::new(["1", ""]);
        assert_eq!(prompter.read_line("> ").unwrap(), "1");
        assert_eq!(prompter.read_line("> ").unwrap(), "");
        assert_eq!(prompter.remaining(), 0);
        assert!(matches!(
            prompter.read_line("> "),
            Err(DeployError::InputUnavailable(_))
        ));
    }

    #[test]
    fn scripted_prompter_records_menus_and_notices() {
        let prompter = ScriptedPrompter::new(Vec::<String>::new());
        prompter.show_menu("Select brand", &[], "Exit");
        prompter.notice("hello");
        assert_eq!(prompter.shown(), ["Select brand", "hello"]);
    }

    #[test]
    fn rule_width_is_capped() {
        assert!(rule_width() <= MAX_RULE_WIDTH);
    }
}

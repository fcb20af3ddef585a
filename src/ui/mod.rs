//! User interface module - logging and prompts.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - the [Logger] and [Confirmer] capabilities and their
//!   terminal and in-memory implementations

use crate::boundary::ReleaseWarning;
use crate::error::Result;
use console::Term;
use std::collections::VecDeque;
use std::sync::Mutex;

pub mod formatter;

pub use formatter::{format_error, format_step, format_success, format_versions, format_warning};

/// Severity of a logged line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warn,
    Error,
}

/// Capability for user-facing output
pub trait Logger {
    fn log(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn success(&self, message: &str) {
        self.log(Level::Success, message);
    }

    fn warn(&self, warning: &ReleaseWarning) {
        self.log(Level::Warn, &warning.to_string());
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    /// A finished step and the command it stands for
    fn step(&self, message: &str, command: &str) {
        self.log(Level::Info, &format!("{} > {}", message, command));
    }
}

/// [Logger] writing styled lines to the terminal
///
/// Quiet mode drops everything except errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleLogger {
    quiet: bool,
}

impl ConsoleLogger {
    pub fn new(quiet: bool) -> Self {
        ConsoleLogger { quiet }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::Error => eprintln!("{}", format_error(message)),
            _ if self.quiet => {}
            Level::Info => println!("{}", message),
            Level::Success => println!("{}", format_success(message)),
            Level::Warn => eprintln!("{}", console::style(message).yellow().bold()),
        }
    }

    fn warn(&self, warning: &ReleaseWarning) {
        if !self.quiet {
            eprintln!("{}", format_warning(warning));
        }
    }

    fn step(&self, message: &str, command: &str) {
        if !self.quiet {
            println!("{}", format_step(message, command));
        }
    }
}

/// [Logger] keeping every line in memory
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<(Level, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Messages only, any level
    pub fn messages(&self) -> Vec<String> {
        self.lines().into_iter().map(|(_, m)| m).collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: Level, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, message.to_string()));
        }
    }
}

/// Capability for interactive questions
pub trait Confirmer {
    /// Ask a yes/no question; the default answer is yes
    fn confirm(&self, question: &str) -> Result<bool>;

    /// Ask for an npm one-time password, printing `notice` first when given
    ///
    /// `Ok(None)` when the user entered nothing.
    fn one_time_password(&self, notice: Option<&str>) -> Result<Option<String>>;
}

/// Whether a confirmation answer means yes (empty counts as yes)
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "" | "y" | "yes")
}

/// [Confirmer] reading answers from the terminal
#[derive(Debug, Clone)]
pub struct TerminalConfirmer {
    term: Term,
}

impl TerminalConfirmer {
    pub fn new() -> Self {
        TerminalConfirmer { term: Term::stdout() }
    }
}

impl Default for TerminalConfirmer {
    fn default() -> Self {
        Self::new()
    }
}

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, question: &str) -> Result<bool> {
        self.term.write_str(&format!(
            "{} {} ",
            console::style(question).green(),
            console::style("(yes)").dim()
        ))?;
        let answer = self.term.read_line()?;
        Ok(is_affirmative(&answer))
    }

    fn one_time_password(&self, notice: Option<&str>) -> Result<Option<String>> {
        if let Some(notice) = notice {
            self.term.write_line(&console::style(notice).yellow().to_string())?;
        }
        self.term.write_str("npm one-time password: ")?;
        let answer = self.term.read_line()?;
        let answer = answer.trim();

        Ok(if answer.is_empty() {
            None
        } else {
            Some(answer.to_string())
        })
    }
}

/// [Confirmer] answering from prepared queues
///
/// Confirmations default to yes and passwords to none once exhausted.
/// Notices shown with password prompts are recorded.
#[derive(Debug, Default)]
pub struct ScriptedConfirmer {
    confirmations: Mutex<VecDeque<bool>>,
    passwords: Mutex<VecDeque<String>>,
    notices: Mutex<Vec<Option<String>>>,
}

impl ScriptedConfirmer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(self, yes: bool) -> Self {
        if let Ok(mut queue) = self.confirmations.lock() {
            queue.push_back(yes);
        }
        self
    }

    pub fn password(self, code: impl Into<String>) -> Self {
        if let Ok(mut queue) = self.passwords.lock() {
            queue.push_back(code.into());
        }
        self
    }

    /// Notice passed to each password prompt, in order
    pub fn notices(&self) -> Vec<Option<String>> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&self, _question: &str) -> Result<bool> {
        Ok(self
            .confirmations
            .lock()
            .ok()
            .and_then(|mut q| q.pop_front())
            .unwrap_or(true))
    }

    fn one_time_password(&self, notice: Option<&str>) -> Result<Option<String>> {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice.map(str::to_string));
        }
        Ok(self
            .passwords
            .lock()
            .ok()
            .and_then(|mut q| q.pop_front())
            .filter(|code| !code.is_empty()))
    }
}

//! Bracket-tag diagnostics on stderr.
//!
//! Status notices look like `[parsing] format=turtle` with the tag
//! colored; results themselves go to stdout untouched, so batch output
//! stays pipeable.

use colored::Colorize;

/// Diagnostic output channel for the session.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    verbose: bool,
}

impl Console {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Print a `[tag] message` notice.
    pub fn info(&self, tag: &str, message: &str) {
        let tag = format!("[{}]", tag);
        if message.is_empty() {
            eprintln!("{}", tag.cyan());
        } else {
            eprintln!("{} {}", tag.cyan(), message);
        }
    }

    /// Print a notice only under `--verbose`.
    pub fn verbose(&self, tag: &str, message: &str) {
        if self.verbose {
            self.info(tag, message);
        }
    }

    /// Print an `[error] message` diagnostic.
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "[error]".red(), message);
    }

    /// Echo a statement back before it runs.
    pub fn echo(&self, statement: &str) {
        eprintln!();
        eprintln!("{}", statement.dimmed());
    }
}

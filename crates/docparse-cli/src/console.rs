//! User-facing console output.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// How much the console prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Progress and results.
    Normal,
    /// Everything, including input details.
    Verbose,
}

impl Verbosity {
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Normal,
            (false, _) => Verbosity::Verbose,
        }
    }
}

/// Console reporter with status prefixes and a per-stage spinner.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    verbosity: Verbosity,
}

impl Console {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    fn shows(&self, verbose_only: bool) -> bool {
        match self.verbosity {
            Verbosity::Quiet => false,
            Verbosity::Normal => !verbose_only,
            Verbosity::Verbose => true,
        }
    }

    pub fn info(&self, message: &str) {
        if self.shows(false) {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    pub fn success(&self, message: &str) {
        if self.shows(false) {
            println!("{} {}", style("✓").green(), message);
        }
    }

    pub fn warning(&self, message: &str) {
        if self.shows(false) {
            println!("{} {}", style("⚠").yellow(), style(message).yellow());
        }
    }

    pub fn verbose(&self, message: &str) {
        if self.shows(true) {
            println!("{} {}", style("→").dim(), style(message).dim());
        }
    }

    /// Errors are printed in every mode.
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), style(message).red());
    }

    /// Start a spinner for a pipeline stage; hidden in quiet mode.
    pub fn progress(&self, message: &str) -> ProgressBar {
        if self.verbosity == Verbosity::Quiet {
            return ProgressBar::hidden();
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}

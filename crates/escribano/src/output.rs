//! Status line formatting

use console::{style, Term};

use crate::config::CliConfig;

/// Writes status lines to stderr, keeping stdout for documents.
#[derive(Debug)]
pub struct StatusReporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl StatusReporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            use_color,
            quiet,
        }
    }

    /// Create a reporter from the CLI configuration
    #[must_use]
    pub fn from_config(config: &CliConfig) -> Self {
        Self::new(config.color.should_color(), config.verbosity.is_quiet())
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.write(&self.prefix("✓", "OK", Tone::Green), message);
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Always print failures, even in quiet mode
        self.write(&self.prefix("✗", "FAIL", Tone::Red), message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.write(&self.prefix("⚠", "WARN", Tone::Yellow), message);
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.write(&self.prefix("ℹ", "INFO", Tone::Blue), message);
    }

    /// Status prefix: a colored symbol, or a plain word without colors
    #[must_use]
    fn prefix(&self, symbol: &str, word: &str, tone: Tone) -> String {
        if !self.use_color {
            return word.to_string();
        }
        let styled = style(symbol).bold();
        let styled = match tone {
            Tone::Green => styled.green(),
            Tone::Red => styled.red(),
            Tone::Yellow => styled.yellow(),
            Tone::Blue => styled.blue(),
        };
        styled.to_string()
    }

    fn write(&self, prefix: &str, message: &str) {
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Green,
    Red,
    Yellow,
    Blue,
}

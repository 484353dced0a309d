//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Escribano: turn recorded browser sessions into scenario documents
#[derive(Parser, Debug)]
#[command(name = "escribano")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a scenario document from a recorded session
    ///
    /// Reads one recorded action per line (JSON) and writes the scenario
    /// as YAML, one step per retained action.
    Generate(GenerateArgs),

    /// Map a single recorded selector and print its structured form
    Selector(SelectorArgs),

    /// Parse and validate a scenario document
    Check(CheckArgs),
}

/// Arguments for the generate command
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Recorded session (JSON lines); reads stdin when omitted or `-`
    pub input: Option<PathBuf>,

    /// Base URL for the scenario header (inferred from the first navigation otherwise)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Scenario name (defaults to the base URL host)
    #[arg(long)]
    pub name: Option<String>,

    /// Embed the recorded action, mapping warnings and base index in every step
    #[arg(long, env = "ESCRIBA_DEBUG")]
    pub debug: bool,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl GenerateArgs {
    /// Input path, or `None` for stdin
    #[must_use]
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input
            .as_ref()
            .filter(|path| path.as_os_str() != "-")
    }
}

/// Arguments for the selector command
#[derive(Parser, Debug)]
pub struct SelectorArgs {
    /// Raw recorded selector, e.g. `internal:role=button[name="Go"i]`
    pub selector: String,

    /// Output format
    #[arg(short, long, default_value = "yaml")]
    pub format: SelectorFormat,

    /// Also print mapping warnings and the chosen base part
    #[arg(long, env = "ESCRIBA_DEBUG")]
    pub debug: bool,
}

/// Output format for the selector command
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectorFormat {
    /// Block YAML, as written into scenario steps
    #[default]
    Yaml,
    /// Pretty-printed JSON
    Json,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Scenario files to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Color argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

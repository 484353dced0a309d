//! Escribano: recorded browser sessions to scenario documents
//!
//! ## Usage
//!
//! ```bash
//! escribano generate session.jsonl -o login.yaml   # Session file to scenario
//! recorder | escribano generate --debug            # Stream from stdin
//! escribano selector 'internal:role=button[name="Go"i]'
//! escribano check login.yaml checkout.yaml
//! ```

use clap::Parser;
use escribano::{
    handlers::{execute_check, execute_generate, execute_selector},
    init_logging, Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = build_config(&cli);
    console::set_colors_enabled_stderr(config.color.should_color());
    init_logging(&config);

    match cli.command {
        Commands::Generate(args) => execute_generate(&config, &args),
        Commands::Selector(args) => execute_selector(&config, &args),
        Commands::Check(args) => execute_check(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(color)
}

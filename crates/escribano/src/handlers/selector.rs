//! Selector command handler

use escriba::mapping::{resolve_selector, DebugSink};
use escriba::{render_block, strip_defaults, Selector};
use serde::Serialize;

use crate::commands::SelectorFormat;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::StatusReporter;
use crate::SelectorArgs;

/// Selector plus the diagnostics gathered while mapping it.
#[derive(Debug, Serialize)]
struct MappingReport {
    selector: Selector,
    warnings: Vec<String>,
    base_index: Option<usize>,
}

/// Execute the selector command
pub fn execute_selector(config: &CliConfig, args: &SelectorArgs) -> CliResult<()> {
    let reporter = StatusReporter::from_config(config);
    let mut sink = DebugSink::default();
    let selector = resolve_selector(Some(&args.selector), Some(&mut sink));

    for warning in &sink.warnings {
        reporter.warning(warning);
    }
    if config.verbosity.is_verbose() {
        reporter.info(&summarize(&selector));
    }

    let text = if args.debug {
        let report = MappingReport {
            selector,
            warnings: sink.warnings,
            base_index: sink.base_index,
        };
        render(&report, args.format)?
    } else {
        render(&selector, args.format)?
    };
    print!("{text}");
    Ok(())
}

/// Map `raw` and render the structured selector in `format`.
pub fn render_selector(raw: &str, format: SelectorFormat) -> CliResult<String> {
    render(&resolve_selector(Some(raw), None), format)
}

/// One-line description of what the selector targets.
fn summarize(selector: &Selector) -> String {
    let base = selector
        .element
        .as_ref()
        .map_or("unknown", escriba::Element::kind);
    match selector.nth {
        Some(nth) => format!("{base} element, match {nth}"),
        None => format!("{base} element"),
    }
}

fn render<T: Serialize>(value: &T, format: SelectorFormat) -> CliResult<String> {
    let value = strip_defaults(&serde_yaml_ng::to_value(value)?);
    Ok(match format {
        SelectorFormat::Yaml => render_block(&value, 0),
        SelectorFormat::Json => {
            let mut text = serde_json::to_string_pretty(&value)?;
            text.push('\n');
            text
        }
    })
}

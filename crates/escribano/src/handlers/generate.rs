//! Generate command handler

use std::fs::File;
use std::io::{BufRead, BufReader, Write};

use escriba::{parse_action_line, EmitterOptions, ScenarioEmitter, StepKind};
use tracing::{info, warn};

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::StatusReporter;
use crate::GenerateArgs;

/// What went into a streamed scenario document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Recorded actions decoded
    pub actions: usize,
    /// Steps written
    pub steps: usize,
    /// Steps written as `<name>.unsupported`
    pub unsupported: usize,
    /// Input lines that could not be decoded
    pub skipped: usize,
}

/// Execute the generate command
pub fn execute_generate(config: &CliConfig, args: &GenerateArgs) -> CliResult<()> {
    let reporter = StatusReporter::from_config(config);

    let mut options = EmitterOptions::default();
    options.base_url.clone_from(&args.base_url);
    options.name.clone_from(&args.name);

    let reader: Box<dyn BufRead> = match args.input_path() {
        Some(path) => Box::new(BufReader::new(File::open(path).map_err(|e| {
            CliError::input(format!("{}: {e}", path.display()))
        })?)),
        None => Box::new(std::io::stdin().lock()),
    };
    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path).map_err(|e| CliError::output(path, e))?),
        None => Box::new(std::io::stdout().lock()),
    };

    let summary = stream_document(reader, &mut writer, &options, args.debug, &reporter)?;
    info!(
        actions = summary.actions,
        steps = summary.steps,
        skipped = summary.skipped,
        "scenario generated"
    );

    if summary.unsupported > 0 {
        reporter.warning(&format!(
            "{} recorded action(s) have no step equivalent and were kept as unsupported",
            summary.unsupported
        ));
    }
    if let Some(path) = &args.output {
        reporter.success(&format!(
            "{} steps from {} actions written to {}",
            summary.steps,
            summary.actions,
            path.display()
        ));
    }

    Ok(())
}

/// Feed recorded actions through a fresh emitter one line at a time, writing
/// and flushing each fragment as soon as it is produced. Lines that do not
/// decode are reported and skipped.
pub fn stream_document<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    options: &EmitterOptions,
    debug: bool,
    reporter: &StatusReporter,
) -> CliResult<GenerateSummary> {
    let mut emitter = ScenarioEmitter::new(debug);
    let mut summary = GenerateSummary::default();
    emit(writer, &emitter.generate_header(options))?;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_action_line(index + 1, &line) {
            Ok(action) => {
                summary.actions += 1;
                emit(writer, &emitter.generate_action(&action))?;
            }
            Err(err) => {
                summary.skipped += 1;
                warn!(error = %err, "skipping recorded line");
                reporter.warning(&format!("skipped: {err}"));
            }
        }
    }
    emit(writer, &emitter.generate_footer())?;

    let steps = emitter.scenario().steps;
    summary.steps = steps.len();
    summary.unsupported = steps
        .iter()
        .filter(|step| matches!(step.action, StepKind::Unsupported(_)))
        .count();
    Ok(summary)
}

fn emit<W: Write>(writer: &mut W, fragment: &str) -> CliResult<()> {
    if fragment.is_empty() {
        return Ok(());
    }
    writer.write_all(fragment.as_bytes())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use escriba::Scenario;
    use std::io::Cursor;

    const SESSION: &str = r##"{"action": {"name": "navigate", "url": "about:blank"}}
{"action": {"name": "navigate", "url": "https://example.com/login"}}
{"action": {"name": "fill", "selector": "internal:label=\"Password\"i", "text": "hunter2"}}

{"action": {"name": "click", "selector": "internal:role=button[name=\"Sign in\"s]"}}
{"action": {"name": "hover", "selector": "#menu"}}
"##;

    fn quiet() -> StatusReporter {
        StatusReporter::new(false, true)
    }

    fn generate(input: &str, options: &EmitterOptions, debug: bool) -> (String, GenerateSummary) {
        let mut out = Vec::new();
        let summary =
            stream_document(Cursor::new(input), &mut out, options, debug, &quiet()).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    /// Writer that records every flush, to observe incremental output.
    #[derive(Default)]
    struct FlushLog {
        buffer: Vec<u8>,
        flushed: Vec<usize>,
    }

    impl Write for FlushLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.buffer.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.push(self.buffer.len());
            Ok(())
        }
    }

    #[test]
    fn test_counts() {
        let (_, summary) = generate(SESSION, &EmitterOptions::default(), false);
        assert_eq!(
            summary,
            GenerateSummary {
                actions: 5,
                steps: 4,
                unsupported: 1,
                skipped: 0,
            }
        );
    }

    #[test]
    fn test_document_parses_back() {
        let (document, _) = generate(SESSION, &EmitterOptions::default(), false);
        let scenario = Scenario::from_yaml(&document).unwrap();
        assert_eq!(scenario.name, "example.com");
        assert_eq!(scenario.base_url.as_deref(), Some("https://example.com"));
        assert_eq!(scenario.steps[1].text.as_deref(), Some("***"));
        assert_eq!(scenario.steps[3].action.to_string(), "hover.unsupported");
    }

    #[test]
    fn test_each_step_flushed_as_produced() {
        let mut log = FlushLog::default();
        stream_document(
            Cursor::new(SESSION),
            &mut log,
            &EmitterOptions::default(),
            false,
            &quiet(),
        )
        .unwrap();
        assert_eq!(log.flushed.len(), 4);
        let first = String::from_utf8(log.buffer[..log.flushed[0]].to_vec()).unwrap();
        assert!(first.ends_with("  - action: \"navigate\"\n    url: \"/login\"\n"));
    }

    #[test]
    fn test_bad_line_skipped_not_fatal() {
        let input = concat!(
            "{\"action\": {\"name\": \"navigate\", \"url\": \"https://example.com/\"}}\n",
            "not json\n",
            "{\"action\": {\"name\": \"click\", \"selector\": \"#go\"}}\n",
        );
        let (document, summary) = generate(input, &EmitterOptions::default(), false);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.steps, 2);
        assert_eq!(document.matches("  - action:").count(), 2);
    }

    #[test]
    fn test_options_reach_header() {
        let options = EmitterOptions::default()
            .with_base_url("https://example.com")
            .with_name("Login");
        let (document, _) = generate(SESSION, &options, false);
        assert!(document
            .starts_with("version: \"1.0\"\nname: \"Login\"\nbaseURL: \"https://example.com\"\n"));
    }

    #[test]
    fn test_debug_payload() {
        let (document, _) = generate(SESSION, &EmitterOptions::default(), true);
        assert_eq!(document.matches("    debug:\n").count(), 4);
        assert!(!document.contains("hunter2"));
    }

    #[test]
    fn test_empty_session_writes_nothing() {
        let (document, summary) = generate("", &EmitterOptions::default(), false);
        assert_eq!(document, "");
        assert_eq!(summary.steps, 0);
    }
}

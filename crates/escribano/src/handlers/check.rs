//! Check command handler

use std::fs;
use std::path::Path;

use escriba::{EscribaError, Scenario};

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::StatusReporter;
use crate::CheckArgs;

/// Execute the check command. Every file is checked; the command fails if
/// any of them is invalid.
pub fn execute_check(config: &CliConfig, args: &CheckArgs) -> CliResult<()> {
    let reporter = StatusReporter::from_config(config);
    let mut failed = 0;

    for path in &args.files {
        match check_file(path) {
            Ok(scenario) => reporter.success(&format!(
                "{}: \"{}\" ({} steps)",
                path.display(),
                scenario.name,
                scenario.steps.len()
            )),
            Err(err) => {
                failed += 1;
                reporter.failure(&format!("{}: {err}", path.display()));
            }
        }
    }

    if failed > 0 {
        return Err(CliError::check(failed, args.files.len()));
    }
    Ok(())
}

/// Parse and validate one scenario document.
pub fn check_file(path: &Path) -> CliResult<Scenario> {
    let text = fs::read_to_string(path)?;
    Scenario::from_yaml(&text)
        .map_err(EscribaError::from)
        .map_err(CliError::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const VALID: &str = concat!(
        "version: \"1.0\"\n",
        "name: \"Login\"\n",
        "steps:\n",
        "  - action: \"navigate\"\n",
        "    url: \"/login\"\n",
        "  - action: \"click\"\n",
        "    selector:\n",
        "      element:\n",
        "        testId: \"submit\"\n",
    );

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_valid_file() {
        let dir = TempDir::new().unwrap();
        let scenario = check_file(&write(&dir, "ok.yaml", VALID)).unwrap();
        assert_eq!(scenario.name, "Login");
        assert_eq!(scenario.steps.len(), 2);
    }

    #[test]
    fn test_missing_field() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "bad.yaml",
            "version: \"1.0\"\nname: \"x\"\nsteps:\n  - action: \"click\"\n",
        );
        let err = check_file(&path).unwrap_err();
        assert!(err.to_string().contains("selector"));
    }

    #[test]
    fn test_missing_file() {
        let err = check_file(Path::new("/nonexistent/scenario.yaml")).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }

    #[test]
    fn test_execute_counts_failures() {
        let dir = TempDir::new().unwrap();
        let args = CheckArgs {
            files: vec![
                write(&dir, "ok.yaml", VALID),
                write(&dir, "bad.yaml", "version: \"2.0\"\nname: \"x\"\nsteps: []\n"),
            ],
        };
        let config = CliConfig::new().with_verbosity(crate::Verbosity::Quiet);
        let err = execute_check(&config, &args).unwrap_err();
        assert!(matches!(err, CliError::Check { failed: 1, total: 2 }));
    }
}

//! Incremental scenario emission.
//!
//! A [`ScenarioEmitter`] turns recorded actions into document fragments, one
//! call per action. The header is written lazily with the first action that
//! yields a step, so a base URL inferred from the first real navigation still
//! makes it into the header.
//!
//! ```text
//! Uninitialized --generate_header--> Configured --first step--> Streaming --generate_footer--> Done
//! ```

use tracing::{debug, error, warn};
use url::Url;

use crate::mapping::{infer_origin, is_trivial_url, map_action, MapOptions};
use crate::recorder::{Action, ActionInContext, RecordedAction};
use crate::render::{render_header, render_step};
use crate::scenario::{Scenario, ScenarioError, Step};

/// Name used when neither an explicit name nor a base URL host is known.
pub const DEFAULT_SCENARIO_NAME: &str = "recorded scenario";

/// Header options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitterOptions {
    /// Seed base URL; inferred from the first navigation when absent
    pub base_url: Option<String>,
    /// Scenario name; derived from the base URL host when absent
    pub name: Option<String>,
}

impl EmitterOptions {
    /// Set the seed base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the scenario name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Emitter lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitterState {
    /// No header options yet
    Uninitialized,
    /// Options set, nothing written
    Configured,
    /// Header and at least one step written
    Streaming,
    /// Footer written
    Done,
}

/// Streaming scenario writer.
#[derive(Debug, Clone)]
pub struct ScenarioEmitter {
    debug: bool,
    state: EmitterState,
    base_url: Option<String>,
    name: Option<String>,
    header_written: bool,
    steps: Vec<Step>,
}

impl ScenarioEmitter {
    /// Create an emitter. With `debug`, every step carries the recorded
    /// action, mapping warnings and the chosen base part index.
    #[must_use]
    pub const fn new(debug: bool) -> Self {
        Self {
            debug,
            state: EmitterState::Uninitialized,
            base_url: None,
            name: None,
            header_written: false,
            steps: Vec::new(),
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> EmitterState {
        self.state
    }

    /// Base URL in effect (seeded or inferred)
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Configure the header and reset per-run state. Writes nothing.
    pub fn generate_header(&mut self, options: &EmitterOptions) -> String {
        self.base_url = options.base_url.clone();
        self.name = options
            .name
            .clone()
            .or_else(|| options.base_url.as_deref().and_then(host_of));
        self.header_written = false;
        self.steps.clear();
        self.state = EmitterState::Configured;
        String::new()
    }

    /// Map one recorded action and return the text to append: empty when
    /// the action yields no step, otherwise the step (preceded by the header
    /// the first time).
    pub fn generate_action(&mut self, context: &ActionInContext) -> String {
        match self.state {
            EmitterState::Uninitialized => {
                debug!("no header options given, using defaults");
                self.generate_header(&EmitterOptions::default());
            }
            EmitterState::Done => warn!("appending an action after the footer"),
            EmitterState::Configured | EmitterState::Streaming => {}
        }

        if !self.header_written && self.base_url.is_none() {
            self.infer_base_url(context);
        }

        let options = MapOptions {
            base_url: self.base_url.as_deref(),
            debug: self.debug,
        };
        let Some(step) = map_action(context, options) else {
            return String::new();
        };

        match self.render(&step) {
            Ok(text) => {
                self.steps.push(step);
                if self.state != EmitterState::Done {
                    self.state = EmitterState::Streaming;
                }
                text
            }
            Err(err) => {
                error!(error = %err, action = %context.action.name(), "failed to render step");
                String::new()
            }
        }
    }

    /// Finish the document. The block layout needs no closing text.
    pub fn generate_footer(&mut self) -> String {
        self.state = EmitterState::Done;
        String::new()
    }

    /// The document written so far, as a value.
    #[must_use]
    pub fn scenario(&self) -> Scenario {
        let mut scenario = self.header();
        scenario.steps.clone_from(&self.steps);
        scenario
    }

    fn header(&self) -> Scenario {
        let name = self
            .name
            .clone()
            .or_else(|| self.base_url.as_deref().and_then(host_of))
            .unwrap_or_else(|| DEFAULT_SCENARIO_NAME.to_string());
        Scenario::new(name).with_base_url(self.base_url.clone())
    }

    fn infer_base_url(&mut self, context: &ActionInContext) {
        let RecordedAction::Known(Action::Navigate { url, .. } | Action::OpenPage { url, .. }) =
            &context.action
        else {
            return;
        };
        if is_trivial_url(url) {
            return;
        }
        if let Some(origin) = infer_origin(url) {
            debug!(base_url = %origin, "inferred base URL from first navigation");
            self.base_url = Some(origin);
        }
    }

    fn render(&mut self, step: &Step) -> Result<String, ScenarioError> {
        let mut out = String::new();
        if !self.header_written {
            out.push_str(&render_header(&self.header())?);
            out.push_str("steps:\n");
        }
        out.push_str(&render_step(step)?);
        self.header_written = true;
        Ok(out)
    }
}

impl Default for ScenarioEmitter {
    fn default() -> Self {
        Self::new(false)
    }
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
}

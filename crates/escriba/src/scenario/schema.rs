//! Scenario document schema types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::normalize::Modifier;
use crate::render;
use crate::selector::Selector;

/// Schema version written to and required from every document.
pub const SCENARIO_VERSION: &str = "1.0";

/// Root scenario document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Schema version (must be "1.0")
    pub version: String,
    /// Scenario name
    pub name: String,
    /// Origin that relative step URLs resolve against
    #[serde(rename = "baseURL", default)]
    pub base_url: Option<String>,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Tags for filtering
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Variables available to consumers
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vars: BTreeMap<String, String>,
    /// Steps run around the main sequence
    #[serde(default)]
    pub hooks: Option<ScenarioHooks>,
    /// Steps in execution order
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Setup and teardown steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioHooks {
    /// Steps run before the scenario
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub setup: Vec<Step>,
    /// Steps run after the scenario
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub teardown: Vec<Step>,
}

impl Scenario {
    /// Create an empty scenario
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: SCENARIO_VERSION.to_string(),
            name: name.into(),
            base_url: None,
            description: None,
            tags: Vec::new(),
            vars: BTreeMap::new(),
            hooks: None,
            steps: Vec::new(),
        }
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    /// Parse a scenario from YAML and validate it.
    ///
    /// # Errors
    /// Returns [`ScenarioError`] for malformed YAML or an invalid document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ScenarioError> {
        let scenario: Self =
            serde_yaml_ng::from_str(yaml).map_err(|e| ScenarioError::ParseError(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Render the document in the same layout the streaming emitter writes.
    ///
    /// # Errors
    /// Returns [`ScenarioError::RenderError`] if a value cannot be converted
    /// to a YAML tree.
    pub fn to_yaml(&self) -> Result<String, ScenarioError> {
        let mut out = render::render_header(self)?;
        if self.steps.is_empty() {
            out.push_str("steps: []\n");
            return Ok(out);
        }
        out.push_str("steps:\n");
        for step in &self.steps {
            out.push_str(&render::render_step(step)?);
        }
        Ok(out)
    }

    /// Validate the scenario structure.
    ///
    /// # Errors
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.version != SCENARIO_VERSION {
            return Err(ScenarioError::InvalidVersion(self.version.clone()));
        }
        if self.name.trim().is_empty() {
            return Err(ScenarioError::EmptyName);
        }
        for (index, step) in self.steps.iter().enumerate() {
            if let Some(field) = step.missing_field() {
                return Err(ScenarioError::MissingField {
                    index,
                    action: step.action.to_string(),
                    field,
                });
            }
        }
        Ok(())
    }
}

/// Step action tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Load a URL
    Navigate,
    /// Single click
    Click,
    /// Double click
    Dblclick,
    /// Type into a field
    Fill,
    /// Press a key
    Press,
    /// Check a checkbox
    Check,
    /// Uncheck a checkbox
    Uncheck,
    /// Choose select options
    Select,
    /// Assert element text
    AssertText,
    /// Assert input value
    AssertValue,
    /// Assert checked state
    AssertChecked,
    /// Assert visibility
    AssertVisible,
    /// Close the page
    ClosePage,
    /// Recorded action with no structured mapping, by recorded name
    Unsupported(String),
}

impl StepKind {
    /// Suffix appended to the recorded name of unsupported actions
    pub const UNSUPPORTED_SUFFIX: &'static str = ".unsupported";

    /// Whether the step acts on an element
    #[must_use]
    pub const fn targets_element(&self) -> bool {
        !matches!(
            self,
            Self::Navigate | Self::ClosePage | Self::Unsupported(_)
        )
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Unsupported(name) => {
                return write!(f, "{name}{}", Self::UNSUPPORTED_SUFFIX);
            }
            Self::Navigate => "navigate",
            Self::Click => "click",
            Self::Dblclick => "dblclick",
            Self::Fill => "fill",
            Self::Press => "press",
            Self::Check => "check",
            Self::Uncheck => "uncheck",
            Self::Select => "select",
            Self::AssertText => "assert.text",
            Self::AssertValue => "assert.value",
            Self::AssertChecked => "assert.checked",
            Self::AssertVisible => "assert.visible",
            Self::ClosePage => "closePage",
        };
        f.write_str(tag)
    }
}

impl FromStr for StepKind {
    type Err = String;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let kind = match tag {
            "navigate" => Self::Navigate,
            "click" => Self::Click,
            "dblclick" => Self::Dblclick,
            "fill" => Self::Fill,
            "press" => Self::Press,
            "check" => Self::Check,
            "uncheck" => Self::Uncheck,
            "select" => Self::Select,
            "assert.text" => Self::AssertText,
            "assert.value" => Self::AssertValue,
            "assert.checked" => Self::AssertChecked,
            "assert.visible" => Self::AssertVisible,
            "closePage" => Self::ClosePage,
            other => match other.strip_suffix(Self::UNSUPPORTED_SUFFIX) {
                Some(name) if !name.is_empty() => Self::Unsupported(name.to_string()),
                _ => return Err(format!("unknown step action `{other}`")),
            },
        };
        Ok(kind)
    }
}

impl Serialize for StepKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StepKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}

/// Mouse button of a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    /// Primary button
    #[default]
    Left,
    /// Wheel button
    Middle,
    /// Secondary button
    Right,
}

/// One option of a `select` step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Option value
    pub value: String,
}

/// Side effect a step is expected to trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Expectation {
    /// Page navigates
    Navigation {
        /// Exact destination
        #[serde(default)]
        url: Option<String>,
        /// Destination substring
        #[serde(rename = "urlContains", default)]
        url_contains: Option<String>,
    },
    /// A popup page opens
    Popup {
        /// Alias of the new page
        #[serde(rename = "pageAlias", default)]
        page_alias: Option<String>,
    },
    /// A download starts
    Download,
    /// A dialog opens
    Dialog {
        /// Dialog type (`alert`, `confirm`, `prompt`, `beforeunload`)
        #[serde(default)]
        kind: Option<String>,
        /// Dialog message
        #[serde(default)]
        message: Option<String>,
        /// Whether the dialog was accepted
        #[serde(default)]
        accepted: Option<bool>,
    },
}

/// A single scenario step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Action tag
    pub action: StepKind,
    /// Navigation target
    #[serde(default)]
    pub url: Option<String>,
    /// Target element
    #[serde(default)]
    pub selector: Option<Selector>,
    /// Text to type or expect
    #[serde(default)]
    pub text: Option<String>,
    /// Key to press
    #[serde(default)]
    pub key: Option<String>,
    /// Expected input value
    #[serde(default)]
    pub value: Option<String>,
    /// Expected checked state
    #[serde(default)]
    pub checked: Option<bool>,
    /// Expected visibility (only written when negated)
    #[serde(default)]
    pub visible: Option<bool>,
    /// Substring text matching
    #[serde(default)]
    pub substring: Option<bool>,
    /// Options to choose
    #[serde(default)]
    pub options: Option<Vec<SelectOption>>,
    /// Non-default mouse button
    #[serde(default)]
    pub button: Option<MouseButton>,
    /// Held modifiers
    #[serde(default)]
    pub modifiers: Option<Vec<Modifier>>,
    /// Click count when not 1 or 2
    #[serde(default)]
    pub click_count: Option<u32>,
    /// Expected side effects
    #[serde(default)]
    pub expectations: Option<Vec<Expectation>>,
    /// Raw diagnostic payload
    #[serde(default)]
    pub debug: Option<serde_json::Value>,
}

impl Step {
    /// Create a step with only its action tag set
    #[must_use]
    pub const fn new(action: StepKind) -> Self {
        Self {
            action,
            url: None,
            selector: None,
            text: None,
            key: None,
            value: None,
            checked: None,
            visible: None,
            substring: None,
            options: None,
            button: None,
            modifiers: None,
            click_count: None,
            expectations: None,
            debug: None,
        }
    }

    /// Set the target element
    #[must_use]
    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.selector = Some(selector);
        self
    }

    /// Set the URL
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Required field missing for this action, if any
    fn missing_field(&self) -> Option<&'static str> {
        if self.action.targets_element() && self.selector.is_none() {
            return Some("selector");
        }
        match self.action {
            StepKind::Navigate if self.url.is_none() => Some("url"),
            StepKind::Fill | StepKind::AssertText if self.text.is_none() => Some("text"),
            StepKind::Press if self.key.is_none() => Some("key"),
            StepKind::AssertValue if self.value.is_none() => Some("value"),
            _ => None,
        }
    }
}

/// Errors that can occur during scenario parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioError {
    #[error("Failed to parse YAML: {0}")]
    ParseError(String),

    #[error("Failed to render YAML: {0}")]
    RenderError(String),

    #[error("Invalid version '{0}', expected '1.0'")]
    InvalidVersion(String),

    #[error("Scenario name cannot be empty")]
    EmptyName,

    #[error("Step {index} ('{action}') is missing required field '{field}'")]
    MissingField {
        index: usize,
        action: String,
        field: &'static str,
    },
}

impl From<serde_yaml_ng::Error> for ScenarioError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        Self::RenderError(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::selector::Element;

    const VALID_SCENARIO: &str = r#"
version: "1.0"
name: "example.com"
baseURL: "https://example.com"
tags:
  - "smoke"
steps:
  - action: "navigate"
    url: "/login"
  - action: "fill"
    selector:
      element:
        testId: "login-password"
    text: "***"
  - action: "click"
    selector:
      element:
        role: "button"
        name:
          regex: "^Submit$"
          flags: "i"
    modifiers:
      - "Alt"
      - "Shift"
    expectations:
      - type: "navigation"
        urlContains: "/home"
  - action: "hover.unsupported"
    debug:
      name: "hover"
"#;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parse_valid_scenario() {
            let scenario = Scenario::from_yaml(VALID_SCENARIO).unwrap();
            assert_eq!(scenario.version, "1.0");
            assert_eq!(scenario.base_url.as_deref(), Some("https://example.com"));
            assert_eq!(scenario.tags, vec!["smoke".to_string()]);
            assert_eq!(scenario.steps.len(), 4);
            assert_eq!(scenario.steps[1].action, StepKind::Fill);
            assert_eq!(
                scenario.steps[1].selector.as_ref().unwrap().element,
                Some(Element::test_id("login-password"))
            );
            assert_eq!(
                scenario.steps[2].modifiers,
                Some(vec![Modifier::Alt, Modifier::Shift])
            );
            assert_eq!(
                scenario.steps[3].action,
                StepKind::Unsupported("hover".to_string())
            );
        }

        #[test]
        fn test_invalid_version() {
            let yaml = VALID_SCENARIO.replace("\"1.0\"", "\"2.0\"");
            let result = Scenario::from_yaml(&yaml);
            assert!(matches!(result, Err(ScenarioError::InvalidVersion(_))));
        }

        #[test]
        fn test_empty_name() {
            let yaml = "version: \"1.0\"\nname: \"  \"\nsteps: []\n";
            assert_eq!(Scenario::from_yaml(yaml), Err(ScenarioError::EmptyName));
        }

        #[test]
        fn test_unknown_action_is_parse_error() {
            let yaml = "version: \"1.0\"\nname: \"x\"\nsteps:\n  - action: \"hover\"\n";
            assert!(matches!(
                Scenario::from_yaml(yaml),
                Err(ScenarioError::ParseError(_))
            ));
        }

        #[test]
        fn test_missing_required_field() {
            let yaml = "version: \"1.0\"\nname: \"x\"\nsteps:\n  - action: \"navigate\"\n";
            assert_eq!(
                Scenario::from_yaml(yaml),
                Err(ScenarioError::MissingField {
                    index: 0,
                    action: "navigate".to_string(),
                    field: "url",
                })
            );
        }

        #[test]
        fn test_metadata_accepted() {
            let yaml = r#"
version: "1.0"
name: "checkout"
description: "Buy one item"
vars:
  user: "alice"
hooks:
  setup:
    - action: "navigate"
      url: "/reset"
steps: []
"#;
            let scenario = Scenario::from_yaml(yaml).unwrap();
            assert_eq!(scenario.vars.get("user").map(String::as_str), Some("alice"));
            assert_eq!(scenario.hooks.unwrap().setup.len(), 1);
        }
    }

    mod step_kind_tests {
        use super::*;

        #[test]
        fn test_tags() {
            assert_eq!(StepKind::AssertText.to_string(), "assert.text");
            assert_eq!(StepKind::ClosePage.to_string(), "closePage");
            assert_eq!(
                StepKind::Unsupported("hover".to_string()).to_string(),
                "hover.unsupported"
            );
        }

        #[test]
        fn test_parse() {
            assert_eq!("dblclick".parse::<StepKind>(), Ok(StepKind::Dblclick));
            assert_eq!(
                "drag.unsupported".parse::<StepKind>(),
                Ok(StepKind::Unsupported("drag".to_string()))
            );
            assert!(".unsupported".parse::<StepKind>().is_err());
            assert!("hover".parse::<StepKind>().is_err());
        }
    }

    mod render_tests {
        use super::*;

        #[test]
        fn test_to_yaml_round_trip() {
            let scenario = Scenario::from_yaml(VALID_SCENARIO).unwrap();
            let yaml = scenario.to_yaml().unwrap();
            assert!(yaml.starts_with("version: \"1.0\"\nname: \"example.com\"\n"));
            assert!(yaml.contains("steps:\n  - action: \"navigate\"\n    url: \"/login\"\n"));
            assert_eq!(Scenario::from_yaml(&yaml).unwrap(), scenario);
        }

        #[test]
        fn test_empty_steps() {
            let yaml = Scenario::new("empty").to_yaml().unwrap();
            assert_eq!(yaml, "version: \"1.0\"\nname: \"empty\"\nsteps: []\n");
        }

        #[test]
        fn test_expectation_shapes() {
            let value = serde_json::to_value(Expectation::Download).unwrap();
            assert_eq!(value, serde_json::json!({"type": "download"}));
            let value = serde_json::to_value(Expectation::Popup {
                page_alias: Some("page1".to_string()),
            })
            .unwrap();
            assert_eq!(value, serde_json::json!({"type": "popup", "pageAlias": "page1"}));
        }
    }
}

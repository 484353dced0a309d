//! Recorded interaction input.
//!
//! The recorder delivers one [`ActionInContext`] per user interaction:
//!
//! ```json
//! {"frame": {"pageAlias": "page", "framePath": ["iframe[name=\"pay\"]"]},
//!  "action": {"name": "click", "selector": "internal:role=button[name=\"Pay\"i]",
//!             "button": "left", "modifiers": 0, "clickCount": 1,
//!             "signals": [{"name": "navigation", "url": "https://shop.test/done"}]}}
//! ```
//!
//! Actions whose name is unknown, or whose payload does not decode, are kept
//! as [`RecordedAction::Unsupported`] with their raw JSON.

use std::io::BufRead;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::result::{EscribaError, EscribaResult};
use crate::scenario::MouseButton;

/// Alias of the page a recording starts on.
pub const DEFAULT_PAGE_ALIAS: &str = "page";

fn default_page_alias() -> String {
    DEFAULT_PAGE_ALIAS.to_string()
}

const fn default_click_count() -> u32 {
    1
}

/// Decode signals one by one; a malformed entry becomes [`Signal::Unknown`]
/// instead of failing the whole action.
fn lenient_signals<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Signal>, D::Error> {
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .iter()
        .map(|value| {
            Signal::deserialize(value).unwrap_or_else(|err| {
                debug!(error = %err, "ignoring malformed signal");
                Signal::Unknown
            })
        })
        .collect())
}

/// Page and frame an action happened in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDescription {
    /// Page alias
    #[serde(default = "default_page_alias")]
    pub page_alias: String,
    /// Raw frame selectors from the page down to the action's frame
    #[serde(default)]
    pub frame_path: Vec<String>,
}

impl Default for FrameDescription {
    fn default() -> Self {
        Self {
            page_alias: default_page_alias(),
            frame_path: Vec::new(),
        }
    }
}

/// A recorded action with its frame context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionInContext {
    /// Where the action happened
    #[serde(default)]
    pub frame: FrameDescription,
    /// What happened
    pub action: RecordedAction,
}

impl ActionInContext {
    /// Action on the main page, outside any frame
    #[must_use]
    pub fn on_main_page(action: Action) -> Self {
        Self {
            frame: FrameDescription::default(),
            action: RecordedAction::Known(action),
        }
    }
}

/// Side effect observed while an action ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum Signal {
    /// The page navigated
    Navigation {
        /// Destination URL
        #[serde(default)]
        url: Option<String>,
    },
    /// A popup opened
    Popup {
        /// Alias given to the popup page
        #[serde(rename = "popupAlias", default)]
        popup_alias: Option<String>,
    },
    /// A download started
    Download {},
    /// A dialog opened
    Dialog {
        /// Alias given to the dialog
        #[serde(rename = "dialogAlias", default)]
        dialog_alias: Option<String>,
        /// Dialog type
        #[serde(rename = "type", default)]
        kind: Option<String>,
        /// Dialog message
        #[serde(default)]
        message: Option<String>,
        /// Whether the dialog was accepted
        #[serde(default)]
        accepted: Option<bool>,
    },
    /// Any signal kind without a mapping
    #[serde(other)]
    Unknown,
}

/// A recognized recorded action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum Action {
    /// Navigate the current page
    Navigate {
        /// Destination URL
        url: String,
        /// Observed side effects
        #[serde(default, deserialize_with = "lenient_signals")]
        signals: Vec<Signal>,
    },
    /// Open a new page
    OpenPage {
        /// Initial URL
        url: String,
        /// Observed side effects
        #[serde(default, deserialize_with = "lenient_signals")]
        signals: Vec<Signal>,
    },
    /// Close the page
    ClosePage {
        /// Observed side effects
        #[serde(default, deserialize_with = "lenient_signals")]
        signals: Vec<Signal>,
    },
    /// Mouse click
    #[serde(rename_all = "camelCase")]
    Click {
        /// Target selector
        selector: Option<String>,
        /// Mouse button
        #[serde(default)]
        button: MouseButton,
        /// Modifier bitmask
        #[serde(default)]
        modifiers: u32,
        /// Number of clicks
        #[serde(default = "default_click_count")]
        click_count: u32,
        /// Observed side effects
        #[serde(default, deserialize_with = "lenient_signals")]
        signals: Vec<Signal>,
    },
    /// Fill an input
    Fill {
        /// Target selector
        selector: Option<String>,
        /// Text entered
        text: String,
        /// Observed side effects
        #[serde(default, deserialize_with = "lenient_signals")]
        signals: Vec<Signal>,
    },
    /// Key press
    Press {
        /// Target selector
        selector: Option<String>,
        /// Key name
        key: String,
        /// Modifier bitmask
        #[serde(default)]
        modifiers: u32,
        /// Observed side effects
        #[serde(default, deserialize_with = "lenient_signals")]
        signals: Vec<Signal>,
    },
    /// Check a checkbox
    Check {
        /// Target selector
        selector: Option<String>,
        /// Observed side effects
        #[serde(default, deserialize_with = "lenient_signals")]
        signals: Vec<Signal>,
    },
    /// Uncheck a checkbox
    Uncheck {
        /// Target selector
        selector: Option<String>,
        /// Observed side effects
        #[serde(default, deserialize_with = "lenient_signals")]
        signals: Vec<Signal>,
    },
    /// Choose select options
    Select {
        /// Target selector
        selector: Option<String>,
        /// Chosen option values
        options: Vec<String>,
        /// Observed side effects
        #[serde(default, deserialize_with = "lenient_signals")]
        signals: Vec<Signal>,
    },
    /// Assert element text
    AssertText {
        /// Target selector
        selector: Option<String>,
        /// Expected text
        text: String,
        /// Substring match instead of full match
        #[serde(default)]
        substring: bool,
        /// Observed side effects
        #[serde(default, deserialize_with = "lenient_signals")]
        signals: Vec<Signal>,
    },
    /// Assert input value
    AssertValue {
        /// Target selector
        selector: Option<String>,
        /// Expected value
        value: String,
        /// Observed side effects
        #[serde(default, deserialize_with = "lenient_signals")]
        signals: Vec<Signal>,
    },
    /// Assert checked state
    AssertChecked {
        /// Target selector
        selector: Option<String>,
        /// Expected state
        checked: bool,
        /// Observed side effects
        #[serde(default, deserialize_with = "lenient_signals")]
        signals: Vec<Signal>,
    },
    /// Assert visibility
    AssertVisible {
        /// Target selector
        selector: Option<String>,
        /// Expected visibility, when recorded
        #[serde(default)]
        visible: Option<bool>,
        /// Observed side effects
        #[serde(default, deserialize_with = "lenient_signals")]
        signals: Vec<Signal>,
    },
}

impl Action {
    /// Recorded action name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Navigate { .. } => "navigate",
            Self::OpenPage { .. } => "openPage",
            Self::ClosePage { .. } => "closePage",
            Self::Click { .. } => "click",
            Self::Fill { .. } => "fill",
            Self::Press { .. } => "press",
            Self::Check { .. } => "check",
            Self::Uncheck { .. } => "uncheck",
            Self::Select { .. } => "select",
            Self::AssertText { .. } => "assertText",
            Self::AssertValue { .. } => "assertValue",
            Self::AssertChecked { .. } => "assertChecked",
            Self::AssertVisible { .. } => "assertVisible",
        }
    }

    /// Raw selector of the action, when it targets an element
    #[must_use]
    pub fn selector(&self) -> Option<&str> {
        match self {
            Self::Navigate { .. } | Self::OpenPage { .. } | Self::ClosePage { .. } => None,
            Self::Click { selector, .. }
            | Self::Fill { selector, .. }
            | Self::Press { selector, .. }
            | Self::Check { selector, .. }
            | Self::Uncheck { selector, .. }
            | Self::Select { selector, .. }
            | Self::AssertText { selector, .. }
            | Self::AssertValue { selector, .. }
            | Self::AssertChecked { selector, .. }
            | Self::AssertVisible { selector, .. } => selector.as_deref(),
        }
    }

    /// Observed side effects
    #[must_use]
    pub fn signals(&self) -> &[Signal] {
        match self {
            Self::Navigate { signals, .. }
            | Self::OpenPage { signals, .. }
            | Self::ClosePage { signals }
            | Self::Click { signals, .. }
            | Self::Fill { signals, .. }
            | Self::Press { signals, .. }
            | Self::Check { signals, .. }
            | Self::Uncheck { signals, .. }
            | Self::Select { signals, .. }
            | Self::AssertText { signals, .. }
            | Self::AssertValue { signals, .. }
            | Self::AssertChecked { signals, .. }
            | Self::AssertVisible { signals, .. } => signals,
        }
    }
}

/// A recorded action: recognized, or kept raw.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedAction {
    /// Action with a structured mapping
    Known(Action),
    /// Anything else, with its original payload
    Unsupported {
        /// Recorded action name
        name: String,
        /// Raw JSON payload
        payload: Value,
    },
}

impl RecordedAction {
    /// Decode a raw action payload, keeping undecodable payloads raw.
    #[must_use]
    pub fn from_value(payload: Value) -> Self {
        match Action::deserialize(&payload) {
            Ok(action) => Self::Known(action),
            Err(err) => {
                let name = payload
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string();
                debug!(action = %name, error = %err, "keeping recorded action as unsupported");
                Self::Unsupported { name, payload }
            }
        }
    }

    /// Recorded action name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Known(action) => action.name(),
            Self::Unsupported { name, .. } => name,
        }
    }
}

impl From<Action> for RecordedAction {
    fn from(action: Action) -> Self {
        Self::Known(action)
    }
}

impl Serialize for RecordedAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(action) => action.serialize(serializer),
            Self::Unsupported { payload, .. } => payload.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for RecordedAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_value(Value::deserialize(deserializer)?))
    }
}

/// Parse one JSON line of recorder output.
///
/// # Errors
/// Returns [`EscribaError::InvalidAction`] when the line is not an action in
/// context.
pub fn parse_action_line(line: usize, text: &str) -> EscribaResult<ActionInContext> {
    serde_json::from_str(text).map_err(|e| EscribaError::invalid_action(line, e.to_string()))
}

/// Read a JSON-lines stream of recorded actions, skipping blank lines.
///
/// # Errors
/// Returns an I/O error, or the first line that fails to decode.
pub fn read_actions<R: BufRead>(reader: R) -> EscribaResult<Vec<ActionInContext>> {
    let mut actions = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        actions.push(parse_action_line(index + 1, &line)?);
    }
    Ok(actions)
}

//! Escriba: recorded browser interactions → portable scenario documents.
//!
//! Escriba (Spanish: "scribe") reads the action stream of a browser recorder,
//! resolves each action's chained query-engine selector into a structured
//! description of the target element, and writes the actions out as a
//! versioned YAML scenario, one step per action, as they arrive.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ recorded     │   │ selector     │   │ action       │   │ scenario     │
//! │ action       │──►│ mapping      │──►│ mapping      │──►│ emitter      │
//! │ (JSON)       │   │ (grammar)    │   │ (Step)       │   │ (YAML text)  │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! Mapping is total: every action produces structured output or is skipped
//! deliberately (trivial navigations). Selectors that cannot be expressed
//! structurally fall back to a `css` element holding the chain text.
//!
//! # Example
//!
//! ```
//! use escriba::prelude::*;
//!
//! let mut emitter = ScenarioEmitter::new(false);
//! emitter.generate_header(&EmitterOptions::default());
//! let line = r#"{"action": {"name": "navigate", "url": "https://example.com/login"}}"#;
//! let action = parse_action_line(1, line).unwrap();
//! let text = emitter.generate_action(&action);
//! assert!(text.contains("baseURL: \"https://example.com\""));
//! assert!(text.contains("url: \"/login\""));
//! ```

#![warn(missing_docs)]

mod emitter;
pub mod grammar;
pub mod mapping;
mod normalize;
mod recorder;
mod render;
mod result;
pub mod scenario;
mod selector;
mod strip;
mod text_matcher;

pub use emitter::{EmitterOptions, EmitterState, ScenarioEmitter, DEFAULT_SCENARIO_NAME};
pub use normalize::{
    decode_modifiers, encode_modifiers, parse_aria_state, parse_level, AriaState, Modifier,
};
pub use recorder::{
    parse_action_line, read_actions, Action, ActionInContext, FrameDescription, RecordedAction,
    Signal, DEFAULT_PAGE_ALIAS,
};
pub use render::{render_block, render_header, render_step};
pub use result::{EscribaError, EscribaResult};
pub use scenario::{
    Expectation, MouseButton, Scenario, ScenarioError, ScenarioHooks, SelectOption, Step,
    StepKind, SCENARIO_VERSION,
};
pub use selector::{
    Element, FrameRef, RoleElement, Selector, SelectorFilters, UNKNOWN_SELECTOR,
};
pub use strip::strip_defaults;
pub use text_matcher::{compile_regex, parse_text_matcher, TextMatcher};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::grammar::{parse_selector, stringify_selector, ParsedSelector};
    pub use super::mapping::{map_action, map_selector, resolve_selector, DebugSink, MapOptions};
    pub use super::{
        parse_action_line, read_actions, ActionInContext, Element, EmitterOptions, EscribaError,
        EscribaResult, Expectation, FrameRef, RecordedAction, Scenario, ScenarioEmitter, Selector,
        SelectorFilters, Step, StepKind, TextMatcher,
    };
}

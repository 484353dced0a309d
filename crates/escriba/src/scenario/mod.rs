//! Scenario documents: the versioned, step-by-step output format.
//!
//! # Example
//!
//! ```yaml
//! version: "1.0"
//! name: "example.com"
//! baseURL: "https://example.com"
//! steps:
//!   - action: "navigate"
//!     url: "/login"
//!   - action: "fill"
//!     selector:
//!       element:
//!         label: "Email"
//!     text: "alice@example.com"
//!   - action: "click"
//!     selector:
//!       element:
//!         role: "button"
//!         name:
//!           exact: "Sign in"
//!           caseSensitive: true
//!     expectations:
//!       - type: "navigation"
//!         urlContains: "/home"
//! ```

pub mod schema;

pub use schema::{
    Expectation, MouseButton, Scenario, ScenarioError, ScenarioHooks, SelectOption, Step,
    StepKind, SCENARIO_VERSION,
};

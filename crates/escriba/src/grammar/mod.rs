//! Query-engine selector grammar.
//!
//! Recorded selectors are chains of `engine=body` parts joined by `>>`:
//!
//! ```text
//! internal:role=button[name="Submit"i] >> nth=1
//! css=.list >> internal:has="internal:text=\"Item\"s" >> visible=true
//! ```
//!
//! [`parse_selector`] splits a chain into [`SelectorPart`]s (decoding nested
//! sub-selectors of `internal:has` and friends), [`stringify_selector`] turns a
//! parsed chain back into canonical text, and [`parse_attribute_selector`]
//! reads the bracketed bodies used by the `role`, `testid` and `attr` engines.

pub mod attribute;
pub mod chain;

pub use attribute::{
    parse_attribute_selector, Attribute, AttributeOp, AttributeSelector, AttributeValue,
};
pub use chain::{parse_selector, stringify_selector, ParsedSelector, PartBody, SelectorPart};

/// Errors produced while parsing selector text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorParseError {
    #[error("selector cannot be empty")]
    Empty,

    #[error("malformed selector `{selector}`: {message}")]
    Malformed { selector: String, message: String },

    #[error("only one part of `{selector}` can capture using the * modifier")]
    MultipleCaptures { selector: String },

    #[error("invalid nested selector for `{engine}`: {message}")]
    Nested { engine: String, message: String },

    #[error("error while parsing `{selector}` at position {position}: {message}")]
    Attribute {
        selector: String,
        position: usize,
        message: String,
    },
}

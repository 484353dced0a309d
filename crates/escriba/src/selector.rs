//! Structured selector model.
//!
//! A [`Selector`] describes *which element* a step targets: the page alias,
//! the frames to descend into, the base [`Element`], narrowing
//! [`SelectorFilters`] and an ordinal position among the matches.
//!
//! Every type serializes to the compact map shape used in scenario documents:
//!
//! ```yaml
//! selector:
//!   framePath:
//!     - name: "checkout"
//!       kind: "iframe"
//!   element:
//!     role: "button"
//!     name:
//!       regex: "^Pay$"
//!       flags: "i"
//!   filters:
//!     visible: true
//!   nth: 1
//! ```

use serde::{Deserialize, Serialize};

use crate::normalize::AriaState;
use crate::text_matcher::TextMatcher;

/// Marker used when an action carries no selector text at all.
pub const UNKNOWN_SELECTOR: &str = "UNKNOWN";

/// Accessible-role element query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleElement {
    /// ARIA role
    pub role: String,
    /// Accessible name
    pub name: Option<TextMatcher>,
    /// `aria-checked` state
    pub checked: Option<AriaState>,
    /// `aria-pressed` state
    pub pressed: Option<AriaState>,
    /// `aria-selected` state
    pub selected: Option<AriaState>,
    /// `aria-expanded` state
    pub expanded: Option<AriaState>,
    /// `aria-disabled` state
    pub disabled: Option<AriaState>,
    /// Match elements hidden from the accessibility tree
    pub include_hidden: Option<bool>,
    /// Heading level
    pub level: Option<u32>,
}

impl RoleElement {
    /// Create a role query with no constraints
    #[must_use]
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            name: None,
            checked: None,
            pressed: None,
            selected: None,
            expanded: None,
            disabled: None,
            include_hidden: None,
            level: None,
        }
    }

    /// Set the accessible name matcher
    #[must_use]
    pub fn with_name(mut self, name: TextMatcher) -> Self {
        self.name = Some(name);
        self
    }
}

/// The base element of a selector. Exactly one kind per value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Element {
    /// By ARIA role
    Role(RoleElement),
    /// By `data-testid`
    TestId {
        /// Test id value
        #[serde(rename = "testId")]
        test_id: String,
    },
    /// By CSS selector (also the fallback for unrecognized engines)
    Css {
        /// CSS selector text
        css: String,
    },
    /// By XPath expression
    Xpath {
        /// XPath expression
        xpath: String,
    },
    /// By text content
    Text {
        /// Text matcher
        text: TextMatcher,
    },
    /// By associated label
    Label {
        /// Label matcher
        label: TextMatcher,
    },
    /// By placeholder attribute
    Placeholder {
        /// Placeholder matcher
        placeholder: TextMatcher,
    },
    /// By `alt` attribute
    Alt {
        /// Alt text matcher
        alt: TextMatcher,
    },
    /// By `title` attribute
    Title {
        /// Title matcher
        title: TextMatcher,
    },
}

impl Element {
    /// Create a CSS element
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css {
            css: selector.into(),
        }
    }

    /// Create a test id element
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId { test_id: id.into() }
    }

    /// Create an XPath element
    #[must_use]
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::Xpath {
            xpath: expression.into(),
        }
    }

    /// Short name of the element kind
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Role(_) => "role",
            Self::TestId { .. } => "testId",
            Self::Css { .. } => "css",
            Self::Xpath { .. } => "xpath",
            Self::Text { .. } => "text",
            Self::Label { .. } => "label",
            Self::Placeholder { .. } => "placeholder",
            Self::Alt { .. } => "alt",
            Self::Title { .. } => "title",
        }
    }

    /// The field that identifies the element to a reader: test id, label,
    /// placeholder, accessible name, text, CSS or XPath.
    #[must_use]
    pub fn discriminating_text(&self) -> Option<&str> {
        match self {
            Self::TestId { test_id } => Some(test_id),
            Self::Css { css } => Some(css),
            Self::Xpath { xpath } => Some(xpath),
            Self::Role(role) => role.name.as_ref().map(TextMatcher::value),
            Self::Text { text } => Some(text.value()),
            Self::Label { label } => Some(label.value()),
            Self::Placeholder { placeholder } => Some(placeholder.value()),
            Self::Alt { .. } | Self::Title { .. } => None,
        }
    }
}

/// Filters narrowing the matches of the base element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorFilters {
    /// Element must contain this text
    pub has_text: Option<TextMatcher>,
    /// Element must not contain this text
    pub has_not_text: Option<TextMatcher>,
    /// Visibility requirement
    pub visible: Option<bool>,
    /// Element must contain a descendant matching this selector
    pub has: Option<Box<Selector>>,
    /// Element must not contain a descendant matching this selector
    pub has_not: Option<Box<Selector>>,
}

impl SelectorFilters {
    /// True when no filter is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.has_text.is_none()
            && self.has_not_text.is_none()
            && self.visible.is_none()
            && self.has.is_none()
            && self.has_not.is_none()
    }
}

/// Reference to a frame on the path from the page to the target element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrameRef {
    /// By frame name
    Name {
        /// Frame name
        name: String,
        /// Frame element tag (`iframe`, `frame`)
        kind: Option<String>,
    },
    /// By exact frame URL
    Url {
        /// Frame URL
        url: String,
        /// Frame element tag
        kind: Option<String>,
    },
    /// By frame URL substring
    UrlContains {
        /// URL substring
        #[serde(rename = "urlContains")]
        url_contains: String,
        /// Frame element tag
        kind: Option<String>,
    },
    /// By position among sibling frames
    Index {
        /// 0-based index
        index: u32,
        /// Frame element tag
        kind: Option<String>,
    },
    /// Raw frame selector that none of the other forms can express
    Selector {
        /// Selector text as recorded
        selector: String,
    },
}

/// Structured target of a step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    /// Page alias, when not the main page
    pub page: Option<String>,
    /// Frames to descend into, outermost first
    pub frame_path: Option<Vec<FrameRef>>,
    /// Base element
    pub element: Option<Element>,
    /// Filters on the base element
    pub filters: Option<SelectorFilters>,
    /// 0-based position among matches (`-1` for the last match)
    pub nth: Option<i32>,
}

impl Selector {
    /// Create a selector for an element
    #[must_use]
    pub fn from_element(element: Element) -> Self {
        Self {
            element: Some(element),
            ..Self::default()
        }
    }

    /// Selector for raw text no mapper could interpret: the text as CSS, or
    /// [`UNKNOWN_SELECTOR`] when there is no text.
    #[must_use]
    pub fn fallback(raw: Option<&str>) -> Self {
        Self::from_element(Element::css(raw.unwrap_or(UNKNOWN_SELECTOR)))
    }

    /// Set the page alias
    #[must_use]
    pub fn with_page(mut self, page: Option<String>) -> Self {
        self.page = page;
        self
    }

    /// Set the frame path; an empty path clears it
    #[must_use]
    pub fn with_frame_path(mut self, frame_path: Vec<FrameRef>) -> Self {
        self.frame_path = (!frame_path.is_empty()).then_some(frame_path);
        self
    }

    /// Set the filters; empty filters clear them
    #[must_use]
    pub fn with_filters(mut self, filters: SelectorFilters) -> Self {
        self.filters = (!filters.is_empty()).then_some(filters);
        self
    }

    /// Set the ordinal position
    #[must_use]
    pub const fn with_nth(mut self, nth: Option<i32>) -> Self {
        self.nth = nth;
        self
    }
}

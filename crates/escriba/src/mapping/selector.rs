//! Raw selector chain → structured [`Selector`].
//!
//! The part of the chain that names the target element (the *base*) is the
//! captured part when one is marked with `*`, otherwise the last part that is
//! neither a filter nor ignored. Parts after the base become filters and the
//! ordinal position; parts before it are not representable and are reported.
//!
//! Mapping never fails: anything that cannot be expressed structurally
//! becomes a `css` element holding the re-stringified chain.

use tracing::warn;

use crate::grammar::{
    parse_attribute_selector, parse_selector, stringify_selector, Attribute, AttributeSelector,
    AttributeValue, ParsedSelector, SelectorPart,
};
use crate::normalize::{parse_aria_state, parse_level, AriaState};
use crate::selector::{Element, RoleElement, Selector, SelectorFilters};
use crate::text_matcher::{parse_text_matcher, TextMatcher};

/// Engines that narrow the base element rather than name it.
pub const FILTER_ENGINES: [&str; 6] = [
    "has-text",
    "has-not-text",
    "has",
    "has-not",
    "visible",
    "nth",
];

/// Engines that carry no targeting information.
pub const IGNORED_ENGINES: [&str; 1] = ["describe"];

/// Diagnostics collected while mapping one selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugSink {
    /// Non-fatal mapping warnings, in order
    pub warnings: Vec<String>,
    /// Index of the part chosen as the base element
    pub base_index: Option<usize>,
}

impl DebugSink {
    fn warn(&mut self, message: String) {
        warn!(%message, "selector mapping");
        self.warnings.push(message);
    }
}

/// Map a raw selector string.
///
/// Returns `None` when there is no selector or it cannot be parsed at all.
#[must_use]
pub fn map_selector(raw: Option<&str>, sink: Option<&mut DebugSink>) -> Option<Selector> {
    let mut scratch = DebugSink::default();
    let sink = sink.unwrap_or(&mut scratch);
    let raw = raw?;
    match parse_selector(raw) {
        Ok(parsed) => {
            sink.base_index = resolve_base_index(&parsed);
            Some(map_parsed(&parsed, raw, sink))
        }
        Err(err) => {
            sink.warn(format!("unparseable selector `{raw}`: {err}"));
            None
        }
    }
}

/// Map a raw selector, substituting a `css` element for anything unparseable.
#[must_use]
pub fn resolve_selector(raw: Option<&str>, sink: Option<&mut DebugSink>) -> Selector {
    map_selector(raw, sink).unwrap_or_else(|| Selector::fallback(raw))
}

/// Index of the part that names the target element.
#[must_use]
pub fn resolve_base_index(parsed: &ParsedSelector) -> Option<usize> {
    if let Some(capture) = parsed.capture.filter(|c| *c < parsed.parts.len()) {
        return Some(capture);
    }
    parsed.parts.iter().rposition(|part| {
        let engine = part.engine();
        !FILTER_ENGINES.contains(&engine) && !IGNORED_ENGINES.contains(&engine)
    })
}

fn map_parsed(parsed: &ParsedSelector, raw: &str, sink: &mut DebugSink) -> Selector {
    let Some(base) = resolve_base_index(parsed) else {
        return Selector::from_element(Element::css(raw));
    };
    let part = &parsed.parts[base];
    let Some(element) = map_element(part, sink) else {
        // The whole chain already carries its filters.
        return Selector::from_element(Element::css(stringify_selector(parsed)));
    };

    for ancestor in &parsed.parts[..base] {
        if !IGNORED_ENGINES.contains(&ancestor.engine()) {
            sink.warn(format!(
                "ancestor part `{}={}` is not representable and was dropped",
                ancestor.name, ancestor.source
            ));
        }
    }

    let (filters, nth) = map_filters(&parsed.parts[base + 1..], sink);
    Selector::from_element(element)
        .with_filters(filters)
        .with_nth(nth)
}

/// Element for the base part, or `None` when only the whole chain can express it.
fn map_element(part: &SelectorPart, sink: &mut DebugSink) -> Option<Element> {
    let Some(body) = part.text() else {
        sink.warn(format!("`{}` cannot name the target element", part.name));
        return None;
    };
    match part.engine() {
        "testid" => map_test_id(body, sink),
        "role" => map_role(body, sink),
        "text" => Some(Element::Text {
            text: text_matcher(body),
        }),
        "label" => Some(Element::Label {
            label: text_matcher(body),
        }),
        "placeholder" => Some(Element::Placeholder {
            placeholder: text_matcher(body),
        }),
        "css" | "css:light" => Some(Element::css(body)),
        "xpath" => Some(Element::xpath(body)),
        "attr" => map_attr(body, sink),
        other => {
            sink.warn(format!("unsupported selector engine `{other}`"));
            None
        }
    }
}

fn text_matcher(body: &str) -> TextMatcher {
    parse_text_matcher(Some(body)).unwrap_or_else(|| TextMatcher::plain(body))
}

fn attribute_body(body: &str, sink: &mut DebugSink) -> Option<AttributeSelector> {
    match parse_attribute_selector(body, true) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            sink.warn(format!("unparseable attribute body `{body}`: {err}"));
            None
        }
    }
}

fn map_test_id(body: &str, sink: &mut DebugSink) -> Option<Element> {
    let parsed = attribute_body(body, sink)?;
    let id = parsed.attributes.first().and_then(|attr| attr.value.as_text());
    if id.is_none() {
        sink.warn(format!("test id selector `{body}` has no value"));
    }
    id.map(Element::test_id)
}

fn map_role(body: &str, sink: &mut DebugSink) -> Option<Element> {
    let parsed = attribute_body(body, sink)?;
    let mut role = RoleElement::new(parsed.name);
    for attr in &parsed.attributes {
        match attr.name.as_str() {
            "name" => role.name = attribute_matcher(attr),
            "include-hidden" => {
                role.include_hidden = aria_state(attr, sink).and_then(|state| state.as_bool());
            }
            "checked" => role.checked = aria_state(attr, sink),
            "pressed" => role.pressed = aria_state(attr, sink),
            "selected" => role.selected = aria_state(attr, sink),
            "expanded" => role.expanded = aria_state(attr, sink),
            "disabled" => role.disabled = aria_state(attr, sink),
            "level" => {
                role.level = parse_level(&attr.value);
                if role.level.is_none() {
                    sink.warn(format!("role level `{}` is not an integer", attr.raw_value));
                }
            }
            other => sink.warn(format!("unknown role attribute `{other}`")),
        }
    }
    Some(Element::Role(role))
}

/// Matcher for an attribute value, keeping its recorded spelling: regex,
/// `i` suffix (case-insensitive exact), `s` suffix (case-sensitive exact) or
/// plain.
fn attribute_matcher(attr: &Attribute) -> Option<TextMatcher> {
    match &attr.value {
        AttributeValue::Regex { pattern, flags } => Some(TextMatcher::regex(pattern, flags)),
        AttributeValue::Str(text) if is_quoted(&attr.raw_value) => Some(if !attr.case_sensitive {
            TextMatcher::exact_ignore_case(text)
        } else if attr.raw_value.ends_with(['s', 'S']) {
            TextMatcher::exact(text.as_str(), true)
        } else {
            TextMatcher::plain(text.as_str())
        }),
        other => other.as_text().map(TextMatcher::Plain),
    }
}

fn aria_state(attr: &Attribute, sink: &mut DebugSink) -> Option<AriaState> {
    let state = parse_aria_state(attr);
    if state.is_none() {
        sink.warn(format!(
            "role attribute `{}` has unrecognized value `{}`",
            attr.name, attr.raw_value
        ));
    }
    state
}

fn map_attr(body: &str, sink: &mut DebugSink) -> Option<Element> {
    let parsed = attribute_body(body, sink)?;
    let attr = parsed.attributes.first()?;
    let Some(matcher) = attribute_matcher(attr) else {
        sink.warn(format!("attribute selector `{body}` has no value"));
        return None;
    };
    match attr.name.as_str() {
        "alt" => Some(Element::Alt { alt: matcher }),
        "title" => Some(Element::Title { title: matcher }),
        "placeholder" => Some(Element::Placeholder {
            placeholder: matcher,
        }),
        other => {
            sink.warn(format!("unsupported attribute `{other}` in `{body}`"));
            None
        }
    }
}

fn is_quoted(raw: &str) -> bool {
    raw.starts_with('"') || raw.starts_with('\'')
}

fn map_filters(parts: &[SelectorPart], sink: &mut DebugSink) -> (SelectorFilters, Option<i32>) {
    let mut filters = SelectorFilters::default();
    let mut nth = None;
    for part in parts {
        let body = part.source.as_str();
        match part.engine() {
            "has-text" => filters.has_text = Some(text_matcher(body)),
            "has-not-text" => filters.has_not_text = Some(text_matcher(body)),
            "visible" => filters.visible = Some(body.trim() != "false"),
            "has" => filters.has = nested(part, sink).map(Box::new),
            "has-not" => filters.has_not = nested(part, sink).map(Box::new),
            "nth" => match body.trim().parse::<i32>() {
                Ok(index) => nth = Some(index),
                Err(_) => sink.warn(format!("nth index `{body}` is not an integer")),
            },
            engine if IGNORED_ENGINES.contains(&engine) => {}
            other => sink.warn(format!("unsupported filter `{other}` after the target element")),
        }
    }
    (filters, nth)
}

fn nested(part: &SelectorPart, sink: &mut DebugSink) -> Option<Selector> {
    let Some(inner) = part.nested() else {
        sink.warn(format!("`{}` has no nested selector", part.name));
        return None;
    };
    let text = stringify_selector(inner);
    Some(map_parsed(inner, &text, sink))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn map(raw: &str) -> Selector {
        map_selector(Some(raw), None).unwrap()
    }

    fn map_with_sink(raw: &str) -> (Selector, DebugSink) {
        let mut sink = DebugSink::default();
        let selector = map_selector(Some(raw), Some(&mut sink)).unwrap();
        (selector, sink)
    }

    mod base_resolution_tests {
        use super::*;

        #[test]
        fn test_last_non_filter_part_is_base() {
            let (selector, sink) = map_with_sink("css=.btn >> internal:has-text=\"Go\" >> nth=2");
            assert_eq!(sink.base_index, Some(0));
            assert_eq!(selector.element, Some(Element::css(".btn")));
            let filters = selector.filters.unwrap();
            assert_eq!(filters.has_text, Some(TextMatcher::plain("Go")));
            assert_eq!(selector.nth, Some(2));
        }

        #[test]
        fn test_capture_wins() {
            let (selector, sink) = map_with_sink("*css=.row >> css=.cell");
            assert_eq!(sink.base_index, Some(0));
            assert_eq!(selector.element, Some(Element::css(".row")));
            assert_eq!(sink.warnings.len(), 1);
        }

        #[test]
        fn test_describe_is_skipped() {
            let (selector, sink) =
                map_with_sink("internal:testid=[data-testid=\"save\"s] >> internal:describe=\"Save button\"");
            assert_eq!(sink.base_index, Some(0));
            assert_eq!(selector.element, Some(Element::test_id("save")));
            assert!(sink.warnings.is_empty());
        }

        #[test]
        fn test_only_filters_falls_back_to_raw_css() {
            let (selector, sink) = map_with_sink("nth=0");
            assert_eq!(sink.base_index, None);
            assert_eq!(selector.element, Some(Element::css("nth=0")));
        }

        #[test]
        fn test_ancestor_parts_warn() {
            let (selector, sink) = map_with_sink("#form >> internal:label=\"Email\"");
            assert_eq!(sink.base_index, Some(1));
            assert_eq!(
                selector.element,
                Some(Element::Label {
                    label: TextMatcher::plain("Email")
                })
            );
            assert_eq!(sink.warnings.len(), 1);
            assert!(sink.warnings[0].contains("#form"));
        }
    }

    mod element_tests {
        use super::*;

        #[test]
        fn test_role_with_case_insensitive_name() {
            let selector = map("internal:role=button[name=\"Submit\"i]");
            let Some(Element::Role(role)) = selector.element else {
                panic!("expected role element");
            };
            assert_eq!(role.role, "button");
            let name = role.name.unwrap();
            assert_eq!(name, TextMatcher::regex("^Submit$", "i"));
            assert!(name.matches("SUBMIT"));
            assert!(!name.matches("Submit now"));
        }

        #[test]
        fn test_role_name_forms() {
            let name_of = |raw: &str| match map(raw).element {
                Some(Element::Role(role)) => role.name,
                _ => None,
            };
            assert_eq!(
                name_of("internal:role=link[name=\"Home\"s]"),
                Some(TextMatcher::exact("Home", true))
            );
            assert_eq!(
                name_of("internal:role=link[name=\"Home\"]"),
                Some(TextMatcher::plain("Home"))
            );
            assert_eq!(
                name_of("internal:role=link[name=/ho+me/i]"),
                Some(TextMatcher::regex("ho+me", "i"))
            );
        }

        #[test]
        fn test_role_states_and_level() {
            let selector = map(
                "internal:role=checkbox[checked=\"mixed\"][disabled=false][include-hidden][expanded]",
            );
            let Some(Element::Role(role)) = selector.element else {
                panic!("expected role element");
            };
            assert_eq!(role.checked, Some(AriaState::Mixed));
            assert_eq!(role.disabled, Some(AriaState::False));
            assert_eq!(role.include_hidden, Some(true));
            assert_eq!(role.expanded, Some(AriaState::True));

            let selector = map("internal:role=heading[level=2]");
            let Some(Element::Role(role)) = selector.element else {
                panic!("expected role element");
            };
            assert_eq!(role.level, Some(2));
        }

        #[test]
        fn test_unknown_role_attribute_warns() {
            let (selector, sink) = map_with_sink("internal:role=button[foo=\"bar\"]");
            assert!(matches!(selector.element, Some(Element::Role(_))));
            assert_eq!(sink.warnings.len(), 1);
        }

        #[test]
        fn test_text_engines() {
            assert_eq!(
                map("internal:text=\"Sign in\"s").element,
                Some(Element::Text {
                    text: TextMatcher::exact("Sign in", true)
                })
            );
            assert_eq!(
                map("internal:placeholder=\"Search\"i").element,
                Some(Element::Placeholder {
                    placeholder: TextMatcher::regex("^Search$", "i")
                })
            );
        }

        #[test]
        fn test_css_and_xpath_verbatim() {
            assert_eq!(map("div > a.x").element, Some(Element::css("div > a.x")));
            assert_eq!(
                map("xpath=//div[@id='a']").element,
                Some(Element::xpath("//div[@id='a']"))
            );
        }

        #[test]
        fn test_attr_engine() {
            assert_eq!(
                map("internal:attr=[alt=\"Logo\"i]").element,
                Some(Element::Alt {
                    alt: TextMatcher::regex("^Logo$", "i")
                })
            );
            assert_eq!(
                map("internal:attr=[title=\"Close\"s]").element,
                Some(Element::Title {
                    title: TextMatcher::exact("Close", true)
                })
            );
        }

        #[test]
        fn test_attr_unknown_name_falls_back_to_whole_chain() {
            let (selector, sink) = map_with_sink("internal:attr=[data-x=\"1\"] >> nth=1");
            assert_eq!(
                selector.element,
                Some(Element::css("internal:attr=[data-x=\"1\"] >> nth=1"))
            );
            assert!(selector.nth.is_none());
            assert_eq!(sink.warnings.len(), 1);
        }

        #[test]
        fn test_unknown_engine_whole_chain_filters_not_repeated() {
            let (selector, sink) = map_with_sink("internal:control=enter-frame >> internal:has-text=\"x\"");
            assert_eq!(
                selector.element,
                Some(Element::css("internal:control=enter-frame >> internal:has-text=\"x\""))
            );
            assert!(selector.filters.is_none());
            assert!(sink.warnings[0].contains("control"));
        }

        #[test]
        fn test_nested_engine_as_base_falls_back() {
            let (selector, sink) = map_with_sink("internal:or=\"#a\" >> nth=1");
            assert_eq!(
                selector.element,
                Some(Element::css("internal:or=\"#a\" >> nth=1"))
            );
            assert_eq!(selector.nth, None);
            assert!(sink.warnings[0].contains("cannot name the target element"));
        }

        #[test]
        fn test_bad_attribute_body_falls_back() {
            let (selector, sink) = map_with_sink("internal:role=button[name=");
            assert_eq!(
                selector.element,
                Some(Element::css("internal:role=button[name="))
            );
            assert_eq!(sink.warnings.len(), 1);
        }
    }

    mod filter_tests {
        use super::*;

        #[test]
        fn test_visible_is_fail_open() {
            assert_eq!(map("a >> visible=true").filters.unwrap().visible, Some(true));
            assert_eq!(map("a >> visible=false").filters.unwrap().visible, Some(false));
            assert_eq!(map("a >> visible=nope").filters.unwrap().visible, Some(true));
        }

        #[test]
        fn test_has_not_text() {
            let filters = map("li >> internal:has-not-text=/sold out/i").filters.unwrap();
            assert_eq!(filters.has_not_text, Some(TextMatcher::regex("sold out", "i")));
        }

        #[test]
        fn test_nested_has() {
            let selector = map(r#"li >> internal:has="internal:role=button[name=\"Buy\"s] >> nth=0""#);
            let has = selector.filters.unwrap().has.unwrap();
            assert!(matches!(has.element, Some(Element::Role(_))));
            assert_eq!(has.nth, Some(0));
        }

        #[test]
        fn test_nested_equals_reparse_of_stringified() {
            let raw = r#"li >> internal:has-not="css=.badge >> internal:has-text=\"new\"""#;
            let parsed = parse_selector(raw).unwrap();
            let inner = parsed.parts[1].nested().unwrap();
            let from_text = map(&stringify_selector(inner));
            let has_not = map(raw).filters.unwrap().has_not.unwrap();
            assert_eq!(*has_not, from_text);
        }

        #[test]
        fn test_bad_nth_warns() {
            let (selector, sink) = map_with_sink("a >> nth=first");
            assert!(selector.nth.is_none());
            assert_eq!(sink.warnings.len(), 1);
        }

        #[test]
        fn test_last_nth() {
            assert_eq!(map("a >> nth=-1").nth, Some(-1));
        }
    }

    mod fallback_tests {
        use super::*;

        #[test]
        fn test_absent_and_unparseable() {
            assert_eq!(map_selector(None, None), None);
            let mut sink = DebugSink::default();
            assert_eq!(map_selector(Some("a >> "), Some(&mut sink)), None);
            assert_eq!(sink.warnings.len(), 1);
            assert_eq!(
                resolve_selector(Some("a >> "), None).element,
                Some(Element::css("a >> "))
            );
            assert_eq!(
                resolve_selector(None, None).element,
                Some(Element::css("UNKNOWN"))
            );
        }
    }

    proptest! {
        #[test]
        fn prop_resolve_never_panics(raw in ".{0,40}") {
            let selector = resolve_selector(Some(&raw), None);
            prop_assert!(selector.element.is_some());
        }

        #[test]
        fn prop_base_is_never_a_filter(raw in "(css=[a-z]{1,3}|nth=[0-9]|visible=true|internal:describe=\"x\")( >> (css=[a-z]{1,3}|nth=[0-9]|visible=true|internal:describe=\"x\")){0,4}") {
            let parsed = parse_selector(&raw).unwrap();
            if let Some(base) = resolve_base_index(&parsed) {
                prop_assert_eq!(parsed.parts[base].engine(), "css");
            }
        }
    }
}

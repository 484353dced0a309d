//! Recorded action → scenario [`Step`].

use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::frame::map_frame_path;
use super::selector::{resolve_selector, DebugSink};
use crate::normalize::decode_modifiers;
use crate::recorder::{
    Action, ActionInContext, FrameDescription, RecordedAction, Signal, DEFAULT_PAGE_ALIAS,
};
use crate::scenario::{Expectation, MouseButton, SelectOption, Step, StepKind};
use crate::selector::{Element, Selector};
use crate::text_matcher::TextMatcher;

/// Replacement text for masked secrets.
pub const MASK: &str = "***";

/// Element names that mark a field as secret (matched case-insensitively).
const SECRET_MARKERS: [&str; 3] = ["password", "pwd", "secret"];

/// URL schemes of pages that are never worth navigating to.
const TRIVIAL_SCHEMES: [&str; 11] = [
    "about:",
    "data:",
    "blob:",
    "chrome:",
    "chrome-extension:",
    "chrome-error:",
    "chrome-search:",
    "edge:",
    "devtools:",
    "moz-extension:",
    "view-source:",
];

/// Inputs to action mapping besides the action itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapOptions<'a> {
    /// Origin that same-origin URLs are made relative to
    pub base_url: Option<&'a str>,
    /// Attach the recorded action and mapping diagnostics to each step
    pub debug: bool,
}

#[derive(Serialize)]
struct StepDebug<'a> {
    action_in_context: &'a ActionInContext,
    warnings: &'a [String],
    base_index: Option<usize>,
}

/// Map one recorded action. `None` means the action produces no step.
#[must_use]
pub fn map_action(context: &ActionInContext, options: MapOptions<'_>) -> Option<Step> {
    let action = match &context.action {
        RecordedAction::Known(action) => action,
        RecordedAction::Unsupported { name, payload } => {
            let mut step = Step::new(StepKind::Unsupported(name.clone()));
            let mut payload = payload.clone();
            let selector = resolve_selector(payload.get("selector").and_then(Value::as_str), None);
            if is_secret(&selector) {
                redact_text(&mut payload);
            }
            step.debug = Some(payload);
            return Some(step);
        }
    };

    let mut sink = DebugSink::default();
    let mut step = map_known(action, &context.frame, options, &mut sink)?;
    step.expectations = expectations(action.signals());
    if options.debug {
        let masked = step.action == StepKind::Fill && step.text.as_deref() == Some(MASK);
        step.debug = serde_json::to_value(StepDebug {
            action_in_context: context,
            warnings: &sink.warnings,
            base_index: sink.base_index,
        })
        .ok()
        .map(|mut debug| {
            if masked {
                if let Some(action) = debug.get_mut("action_in_context").and_then(|c| c.get_mut("action")) {
                    redact_text(action);
                }
            }
            debug
        });
    }
    Some(step)
}

/// Replace a recorded `text` field with [`MASK`].
fn redact_text(payload: &mut Value) {
    if let Some(text) = payload.get_mut("text").filter(|text| text.is_string()) {
        *text = Value::String(MASK.to_string());
    }
}

fn map_known(
    action: &Action,
    frame: &FrameDescription,
    options: MapOptions<'_>,
    sink: &mut DebugSink,
) -> Option<Step> {
    let mut target = || element_selector(action.selector(), frame, &mut *sink);
    let step = match action {
        Action::Navigate { url, .. } | Action::OpenPage { url, .. } => {
            if is_trivial_url(url) {
                debug!(url = %url, "skipping trivial navigation");
                return None;
            }
            let mut step =
                Step::new(StepKind::Navigate).with_url(relativize_url(url, options.base_url));
            step.selector = page_selector(frame);
            step
        }
        Action::ClosePage { .. } => {
            let mut step = Step::new(StepKind::ClosePage);
            step.selector = page_selector(frame);
            step
        }
        Action::Click {
            button,
            modifiers,
            click_count,
            ..
        } => {
            let kind = if *click_count == 2 {
                StepKind::Dblclick
            } else {
                StepKind::Click
            };
            let mut step = Step::new(kind).with_selector(target());
            step.button = (*button != MouseButton::Left).then_some(*button);
            step.modifiers = decode_modifiers(Some(*modifiers));
            step.click_count = (*click_count != 1 && *click_count != 2).then_some(*click_count);
            step
        }
        Action::Fill { text, .. } => {
            let selector = target();
            let text = mask_secret(&selector, text);
            Step::new(StepKind::Fill).with_selector(selector).with_text(text)
        }
        Action::Press { key, modifiers, .. } => {
            let mut step = Step::new(StepKind::Press).with_selector(target());
            step.key = Some(key.clone());
            step.modifiers = decode_modifiers(Some(*modifiers));
            step
        }
        Action::Check { .. } => Step::new(StepKind::Check).with_selector(target()),
        Action::Uncheck { .. } => Step::new(StepKind::Uncheck).with_selector(target()),
        Action::Select { options, .. } => {
            let mut step = Step::new(StepKind::Select).with_selector(target());
            step.options = Some(
                options
                    .iter()
                    .map(|value| SelectOption {
                        value: value.clone(),
                    })
                    .collect(),
            );
            step
        }
        Action::AssertText {
            text, substring, ..
        } => {
            let mut step = Step::new(StepKind::AssertText)
                .with_selector(target())
                .with_text(text.as_str());
            step.substring = substring.then_some(true);
            step
        }
        Action::AssertValue { value, .. } => {
            let mut step = Step::new(StepKind::AssertValue).with_selector(target());
            step.value = Some(value.clone());
            step
        }
        Action::AssertChecked { checked, .. } => {
            let mut step = Step::new(StepKind::AssertChecked).with_selector(target());
            step.checked = Some(*checked);
            step
        }
        Action::AssertVisible { visible, .. } => {
            let mut step = Step::new(StepKind::AssertVisible).with_selector(target());
            step.visible = (*visible == Some(false)).then_some(false);
            step
        }
    };
    Some(step)
}

fn element_selector(raw: Option<&str>, frame: &FrameDescription, sink: &mut DebugSink) -> Selector {
    resolve_selector(raw, Some(sink))
        .with_page(page_alias(frame))
        .with_frame_path(map_frame_path(&frame.frame_path))
}

fn page_alias(frame: &FrameDescription) -> Option<String> {
    (frame.page_alias != DEFAULT_PAGE_ALIAS).then(|| frame.page_alias.clone())
}

fn page_selector(frame: &FrameDescription) -> Option<Selector> {
    page_alias(frame).map(|page| Selector::default().with_page(Some(page)))
}

/// Whether a URL points at a page no scenario should navigate to.
#[must_use]
pub fn is_trivial_url(url: &str) -> bool {
    let url = url.trim();
    url.is_empty()
        || TRIVIAL_SCHEMES.iter().any(|scheme| {
            url.get(..scheme.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
        })
}

/// Origin (`scheme://host[:port]`) of an absolute http(s) URL.
#[must_use]
pub fn infer_origin(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let origin = parsed.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

/// Rewrite a same-origin URL to path, query and fragment. Cross-origin and
/// unparseable URLs are returned unchanged.
#[must_use]
pub fn relativize_url(url: &str, base_url: Option<&str>) -> String {
    let Some(base) = base_url.and_then(|base| Url::parse(base).ok()) else {
        return url.to_string();
    };
    let Ok(target) = Url::parse(url) else {
        return url.to_string();
    };
    if target.origin() != base.origin() {
        return url.to_string();
    }
    let mut relative = target.path().to_string();
    if let Some(query) = target.query() {
        relative.push('?');
        relative.push_str(query);
    }
    if let Some(fragment) = target.fragment() {
        relative.push('#');
        relative.push_str(fragment);
    }
    relative
}

/// Text to record for a fill: [`MASK`] when the target looks like a secret
/// field, otherwise the text itself.
#[must_use]
pub fn mask_secret(selector: &Selector, text: &str) -> String {
    if is_secret(selector) {
        MASK.to_string()
    } else {
        text.to_string()
    }
}

/// Whether the selector's discriminating field names a secret.
fn is_secret(selector: &Selector) -> bool {
    selector
        .element
        .as_ref()
        .and_then(Element::discriminating_text)
        .is_some_and(|field| {
            SECRET_MARKERS
                .iter()
                .any(|marker| TextMatcher::plain(*marker).matches(field))
        })
}

/// Expectations for the signals an action produced; `None` without any.
#[must_use]
pub fn expectations(signals: &[Signal]) -> Option<Vec<Expectation>> {
    let expectations: Vec<_> = signals.iter().filter_map(expectation).collect();
    (!expectations.is_empty()).then_some(expectations)
}

fn expectation(signal: &Signal) -> Option<Expectation> {
    let expectation = match signal {
        Signal::Navigation { url } => match url {
            Some(url) if is_absolute_http(url) => Expectation::Navigation {
                url: Some(url.clone()),
                url_contains: None,
            },
            Some(url) => Expectation::Navigation {
                url: None,
                url_contains: Some(url.clone()),
            },
            None => Expectation::Navigation {
                url: None,
                url_contains: None,
            },
        },
        Signal::Popup { popup_alias } => Expectation::Popup {
            page_alias: popup_alias.clone(),
        },
        Signal::Download {} => Expectation::Download,
        Signal::Dialog {
            kind,
            message,
            accepted,
            ..
        } => Expectation::Dialog {
            kind: kind.clone(),
            message: message.clone(),
            accepted: *accepted,
        },
        Signal::Unknown => return None,
    };
    Some(expectation)
}

fn is_absolute_http(url: &str) -> bool {
    Url::parse(url).is_ok_and(|parsed| matches!(parsed.scheme(), "http" | "https"))
}

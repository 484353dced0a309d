//! Recorded frame selectors → [`FrameRef`] values.

use crate::grammar::{parse_attribute_selector, parse_selector, AttributeOp, AttributeValue};
use crate::selector::FrameRef;

/// Map every frame selector of a frame path, outermost first.
#[must_use]
pub fn map_frame_path(frame_path: &[String]) -> Vec<FrameRef> {
    frame_path.iter().map(|raw| map_frame(raw)).collect()
}

/// Map one frame selector such as `iframe[name="checkout"]` or
/// `iframe >> nth=1`. Anything else is kept raw.
#[must_use]
pub fn map_frame(raw: &str) -> FrameRef {
    recognize(raw).unwrap_or_else(|| FrameRef::Selector {
        selector: raw.to_string(),
    })
}

fn recognize(raw: &str) -> Option<FrameRef> {
    let parsed = parse_selector(raw).ok()?;
    let (base, nth) = match parsed.parts.as_slice() {
        [base] => (base, None),
        [base, last] if last.engine() == "nth" => (base, Some(last.source.trim())),
        _ => return None,
    };
    if base.name != "css" {
        return None;
    }
    let element = parse_attribute_selector(&base.source, true).ok()?;
    let kind = (!element.name.is_empty()).then(|| element.name.clone());

    if let Some(nth) = nth {
        if !element.attributes.is_empty() {
            return None;
        }
        let index = nth.parse().ok()?;
        return Some(FrameRef::Index { index, kind });
    }

    let [attr] = element.attributes.as_slice() else {
        return None;
    };
    let AttributeValue::Str(value) = &attr.value else {
        return None;
    };
    let value = value.clone();
    match (attr.name.as_str(), attr.op) {
        ("name", AttributeOp::Equals) => Some(FrameRef::Name { name: value, kind }),
        ("src", AttributeOp::Equals) => Some(FrameRef::Url { url: value, kind }),
        ("src", AttributeOp::Contains) => Some(FrameRef::UrlContains {
            url_contains: value,
            kind,
        }),
        _ => None,
    }
}

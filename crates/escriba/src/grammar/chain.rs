//! Chain parser and re-stringifier for `engine=body >> engine=body` selectors.

use std::fmt;

use super::SelectorParseError;

/// Engines whose body is a JSON-quoted sub-selector (optionally followed by a
/// distance for the layout engines).
pub const NESTED_ENGINES: [&str; 10] = [
    "internal:has",
    "internal:has-not",
    "internal:and",
    "internal:or",
    "internal:chain",
    "left-of",
    "right-of",
    "above",
    "below",
    "near",
];

/// A parsed selector chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSelector {
    /// Parts in chain order
    pub parts: Vec<SelectorPart>,
    /// Index of the part marked with `*`, if any
    pub capture: Option<usize>,
}

/// Body of a single chain part.
#[derive(Debug, Clone, PartialEq)]
pub enum PartBody {
    /// Plain engine body
    Text(String),
    /// Decoded nested selector
    Nested {
        /// The nested chain
        selector: Box<ParsedSelector>,
        /// Optional distance (layout engines only)
        distance: Option<f64>,
    },
}

/// One `engine=body` segment of a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorPart {
    /// Engine name as written, including any `internal:` prefix
    pub name: String,
    /// Parsed body
    pub body: PartBody,
    /// Body text exactly as it appeared in the chain
    pub source: String,
}

impl SelectorPart {
    /// Engine name without the `internal:` prefix.
    #[must_use]
    pub fn engine(&self) -> &str {
        self.name.strip_prefix("internal:").unwrap_or(&self.name)
    }

    /// Body text for non-nested parts.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            PartBody::Text(text) => Some(text),
            PartBody::Nested { .. } => None,
        }
    }

    /// Nested chain for `has`-style parts.
    #[must_use]
    pub fn nested(&self) -> Option<&ParsedSelector> {
        match &self.body {
            PartBody::Nested { selector, .. } => Some(selector),
            PartBody::Text(_) => None,
        }
    }
}

impl fmt::Display for ParsedSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&stringify_selector(self))
    }
}

/// Parse a selector chain.
///
/// # Errors
/// Returns an error for empty parts, more than one capture marker, or a nested
/// body that is not a JSON-quoted selector.
pub fn parse_selector(selector: &str) -> Result<ParsedSelector, SelectorParseError> {
    let split = split_chain(selector)?;
    let mut parts = Vec::with_capacity(split.parts.len());
    for (name, body) in split.parts {
        if NESTED_ENGINES.contains(&name.as_str()) {
            let (inner, distance) = decode_nested_body(&name, &body)?;
            let nested = parse_selector(&inner)?;
            parts.push(SelectorPart {
                name,
                source: body,
                body: PartBody::Nested {
                    selector: Box::new(nested),
                    distance,
                },
            });
        } else {
            parts.push(SelectorPart {
                name,
                source: body.clone(),
                body: PartBody::Text(body),
            });
        }
    }
    Ok(ParsedSelector {
        parts,
        capture: split.capture,
    })
}

/// Render a parsed chain back to its canonical text.
///
/// The `css` engine prefix and the `xpath` prefix of `//`/`..` expressions are
/// implied and therefore omitted, except on the captured part.
#[must_use]
pub fn stringify_selector(selector: &ParsedSelector) -> String {
    selector
        .parts
        .iter()
        .enumerate()
        .map(|(index, part)| {
            let captured = selector.capture == Some(index);
            let implied = !captured
                && (part.name == "css"
                    || (part.name == "xpath"
                        && (part.source.starts_with("//") || part.source.starts_with(".."))));
            let marker = if captured { "*" } else { "" };
            if implied {
                format!("{marker}{}", part.source)
            } else {
                format!("{marker}{}={}", part.name, part.source)
            }
        })
        .collect::<Vec<_>>()
        .join(" >> ")
}

#[derive(Debug, Default)]
struct ChainSplit {
    parts: Vec<(String, String)>,
    capture: Option<usize>,
}

impl ChainSplit {
    fn append(&mut self, selector: &str, segment: &str) -> Result<(), SelectorParseError> {
        let part = segment.trim();
        if part.is_empty() {
            return Err(SelectorParseError::Malformed {
                selector: selector.to_string(),
                message: "empty selector part".to_string(),
            });
        }

        let (mut name, body) = match part.find('=') {
            Some(eq) if is_engine_name(part[..eq].trim()) => {
                (part[..eq].trim().to_string(), part[eq + 1..].trim().to_string())
            }
            _ if is_quoted(part) => ("text".to_string(), part.to_string()),
            _ if is_xpath(part) => ("xpath".to_string(), part.to_string()),
            _ => ("css".to_string(), part.to_string()),
        };

        let captured = name.starts_with('*');
        if captured {
            name.remove(0);
        }
        self.parts.push((name, body));

        if captured {
            if self.capture.is_some() {
                return Err(SelectorParseError::MultipleCaptures {
                    selector: selector.to_string(),
                });
            }
            self.capture = Some(self.parts.len() - 1);
        }
        Ok(())
    }
}

fn split_chain(selector: &str) -> Result<ChainSplit, SelectorParseError> {
    let mut split = ChainSplit::default();
    if selector.trim().is_empty() {
        return Err(SelectorParseError::Empty);
    }
    if !selector.contains(">>") {
        split.append(selector, selector)?;
        return Ok(split);
    }

    // All delimiters are ASCII, so byte offsets taken here are char boundaries.
    let bytes = selector.as_bytes();
    let mut start = 0;
    let mut index = 0;
    let mut quote: Option<u8> = None;
    while index < bytes.len() {
        let c = bytes[index];
        if c == b'\\' && index + 1 < bytes.len() {
            index += 2;
        } else if quote == Some(c) {
            quote = None;
            index += 1;
        } else if quote.is_none()
            && matches!(c, b'"' | b'\'' | b'`')
            && !ignores_text_quote(&selector[start..index])
        {
            quote = Some(c);
            index += 1;
        } else if quote.is_none() && c == b'>' && bytes.get(index + 1) == Some(&b'>') {
            split.append(selector, &selector[start..index])?;
            index += 2;
            start = index;
        } else {
            index += 1;
        }
    }
    split.append(selector, &selector[start.min(bytes.len())..])?;
    Ok(split)
}

/// Legacy `text=` bodies are unquoted; quotes after the first body character
/// are literal text, not delimiters.
fn ignores_text_quote(prefix: &str) -> bool {
    prefix
        .trim_start()
        .strip_prefix("text")
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('='))
        .is_some_and(|body| !body.is_empty())
}

fn is_engine_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | ':' | '*'))
}

fn is_quoted(part: &str) -> bool {
    part.len() > 1
        && ((part.starts_with('"') && part.ends_with('"'))
            || (part.starts_with('\'') && part.ends_with('\'')))
}

fn is_xpath(part: &str) -> bool {
    part.trim_start_matches('(').starts_with("//") || part.starts_with("..")
}

fn decode_nested_body(
    engine: &str,
    body: &str,
) -> Result<(String, Option<f64>), SelectorParseError> {
    let nested_error = |message: &str| SelectorParseError::Nested {
        engine: engine.to_string(),
        message: message.to_string(),
    };

    let values: Vec<serde_json::Value> = serde_json::from_str(&format!("[{body}]"))
        .map_err(|e| nested_error(&e.to_string()))?;
    match values.as_slice() {
        [serde_json::Value::String(inner)] => Ok((inner.clone(), None)),
        [serde_json::Value::String(inner), serde_json::Value::Number(distance)] => {
            Ok((inner.clone(), distance.as_f64()))
        }
        _ => Err(nested_error(
            "expected a quoted selector optionally followed by a distance",
        )),
    }
}

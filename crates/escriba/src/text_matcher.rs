//! Text matchers: plain containment, exact string, or regular expression.
//!
//! Text specifiers come in four spellings, tried in order:
//!
//! | Input            | Matcher                                   |
//! |------------------|-------------------------------------------|
//! | `/sign ?in/i`    | regex `sign ?in`, flags `i`               |
//! | `"Sign in"s`     | exact, case-sensitive                     |
//! | `"Sign in"i`     | regex `^Sign in$`, flags `i`              |
//! | `"Sign in"`      | plain `Sign in`                           |
//! | anything else    | plain, verbatim                           |

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// How an element's text is matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextMatcher {
    /// Exact string comparison
    Exact {
        /// Expected text
        #[serde(rename = "exact")]
        value: String,
        /// Whether comparison is case-sensitive
        #[serde(rename = "caseSensitive")]
        case_sensitive: bool,
    },
    /// Regular expression
    Regex {
        /// Pattern body
        #[serde(rename = "regex")]
        pattern: String,
        /// Flag letters (`i`, `m`, `s`, `u`, `x`)
        #[serde(default, skip_serializing_if = "String::is_empty")]
        flags: String,
    },
    /// Case-insensitive substring
    Plain(String),
}

impl TextMatcher {
    /// Create a plain containment matcher
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    /// Create an exact matcher
    #[must_use]
    pub fn exact(text: impl Into<String>, case_sensitive: bool) -> Self {
        Self::Exact {
            value: text.into(),
            case_sensitive,
        }
    }

    /// Create a regex matcher
    #[must_use]
    pub fn regex(pattern: impl Into<String>, flags: impl Into<String>) -> Self {
        Self::Regex {
            pattern: pattern.into(),
            flags: flags.into(),
        }
    }

    /// Case-insensitive exact match, expressed as an anchored regex.
    #[must_use]
    pub fn exact_ignore_case(text: &str) -> Self {
        Self::regex(format!("^{}$", regex::escape(text)), "i")
    }

    /// The text this matcher discriminates on (plain text, exact value or
    /// regex pattern).
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::Exact { value, .. } => value,
            Self::Regex { pattern, .. } => pattern,
        }
    }

    /// Check a candidate string against this matcher.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Plain(text) => candidate.to_lowercase().contains(&text.to_lowercase()),
            Self::Exact {
                value,
                case_sensitive: true,
            } => candidate == value,
            Self::Exact {
                value,
                case_sensitive: false,
            } => candidate.to_lowercase() == value.to_lowercase(),
            Self::Regex { pattern, flags } => compile_regex(pattern, flags)
                .map(|re| re.is_match(candidate))
                .unwrap_or(false),
        }
    }
}

/// Compile a `/pattern/flags` pair with the `regex` crate.
///
/// `g` and `d` only affect iteration in other engines and are accepted as
/// no-ops; `u` is always on.
///
/// # Errors
/// Returns a message for unsupported flags or an invalid pattern.
pub fn compile_regex(pattern: &str, flags: &str) -> Result<Regex, String> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            'u' | 'g' | 'd' => {}
            other => return Err(format!("unsupported regex flag `{other}`")),
        }
    }
    builder.build().map_err(|e| e.to_string())
}

/// Parse a raw text specifier.
#[must_use]
pub fn parse_text_matcher(raw: Option<&str>) -> Option<TextMatcher> {
    let raw = raw?;
    Some(
        parse_regex_literal(raw)
            .or_else(|| parse_quoted_with_suffix(raw))
            .or_else(|| decode_quoted(raw).map(TextMatcher::Plain))
            .unwrap_or_else(|| TextMatcher::Plain(raw.to_string())),
    )
}

fn parse_regex_literal(raw: &str) -> Option<TextMatcher> {
    let rest = raw.strip_prefix('/')?;
    let end = rest.rfind('/')?;
    let (pattern, flags) = (&rest[..end], &rest[end + 1..]);
    if !flags.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    compile_regex(pattern, flags).ok()?;
    Some(TextMatcher::regex(pattern, flags))
}

fn parse_quoted_with_suffix(raw: &str) -> Option<TextMatcher> {
    if let Some(quoted) = raw.strip_suffix('s') {
        return decode_quoted(quoted).map(|text| TextMatcher::exact(text, true));
    }
    let quoted = raw.strip_suffix('i')?;
    decode_quoted(quoted).map(|text| TextMatcher::exact_ignore_case(&text))
}

fn decode_quoted(raw: &str) -> Option<String> {
    if !raw.starts_with('"') {
        return None;
    }
    serde_json::from_str::<String>(raw).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_absent_input() {
            assert_eq!(parse_text_matcher(None), None);
        }

        #[test]
        fn test_regex_literal() {
            assert_eq!(
                parse_text_matcher(Some("/sign ?in/i")),
                Some(TextMatcher::regex("sign ?in", "i"))
            );
            assert_eq!(
                parse_text_matcher(Some("/a/b/")),
                Some(TextMatcher::regex("a/b", ""))
            );
        }

        #[test]
        fn test_invalid_regex_falls_through_to_plain() {
            assert_eq!(
                parse_text_matcher(Some("/(/")),
                Some(TextMatcher::plain("/(/"))
            );
            assert_eq!(
                parse_text_matcher(Some("/abc/y")),
                Some(TextMatcher::plain("/abc/y"))
            );
        }

        #[test]
        fn test_case_sensitive_suffix() {
            assert_eq!(
                parse_text_matcher(Some("\"Sign in\"s")),
                Some(TextMatcher::exact("Sign in", true))
            );
        }

        #[test]
        fn test_case_insensitive_suffix_is_anchored_regex() {
            let matcher = parse_text_matcher(Some("\"a.b (c)\"i")).unwrap();
            assert_eq!(matcher, TextMatcher::regex(r"^a\.b \(c\)$", "i"));
            assert!(matcher.matches("A.B (C)"));
            assert!(!matcher.matches("aXb (c)"));
            assert!(!matcher.matches("a.b (c) more"));
        }

        #[test]
        fn test_plain_quoted() {
            assert_eq!(
                parse_text_matcher(Some("\"Go \\\"now\\\"\"")),
                Some(TextMatcher::plain("Go \"now\""))
            );
        }

        #[test]
        fn test_malformed_quoted_falls_back_verbatim() {
            assert_eq!(
                parse_text_matcher(Some("\"unterminated")),
                Some(TextMatcher::plain("\"unterminated"))
            );
            assert_eq!(
                parse_text_matcher(Some("\"bad\\q\"s")),
                Some(TextMatcher::plain("\"bad\\q\"s"))
            );
        }

        #[test]
        fn test_unquoted_verbatim() {
            assert_eq!(
                parse_text_matcher(Some("Sign in")),
                Some(TextMatcher::plain("Sign in"))
            );
            assert_eq!(parse_text_matcher(Some("yes")), Some(TextMatcher::plain("yes")));
        }
    }

    mod matching_tests {
        use super::*;

        #[test]
        fn test_plain_is_case_insensitive_containment() {
            assert!(TextMatcher::plain("sign").matches("Please SIGN in"));
            assert!(!TextMatcher::plain("logout").matches("Sign in"));
        }

        #[test]
        fn test_exact() {
            assert!(TextMatcher::exact("Go", true).matches("Go"));
            assert!(!TextMatcher::exact("Go", true).matches("go"));
            assert!(TextMatcher::exact("Go", false).matches("go"));
        }

        #[test]
        fn test_value() {
            assert_eq!(TextMatcher::regex("^x$", "i").value(), "^x$");
            assert_eq!(TextMatcher::exact("y", true).value(), "y");
        }
    }

    mod serde_tests {
        use super::*;

        #[test]
        fn test_plain_serializes_as_string() {
            let json = serde_json::to_string(&TextMatcher::plain("Go")).unwrap();
            assert_eq!(json, "\"Go\"");
        }

        #[test]
        fn test_exact_and_regex_shapes() {
            let json = serde_json::to_value(TextMatcher::exact("Go", true)).unwrap();
            assert_eq!(json, serde_json::json!({"exact": "Go", "caseSensitive": true}));

            let json = serde_json::to_value(TextMatcher::regex("^go$", "")).unwrap();
            assert_eq!(json, serde_json::json!({"regex": "^go$"}));
        }

        #[test]
        fn test_deserialize_each_shape() {
            let parsed: TextMatcher =
                serde_json::from_value(serde_json::json!({"regex": "a+", "flags": "i"})).unwrap();
            assert_eq!(parsed, TextMatcher::regex("a+", "i"));
            let parsed: TextMatcher = serde_json::from_value(serde_json::json!("x")).unwrap();
            assert_eq!(parsed, TextMatcher::plain("x"));
        }
    }

    proptest! {
        #[test]
        fn prop_parse_is_total(raw in ".*") {
            prop_assert!(parse_text_matcher(Some(&raw)).is_some());
        }

        #[test]
        fn prop_regex_matchers_always_compile(raw in "/.{0,12}/[a-z]{0,3}") {
            if let Some(TextMatcher::Regex { pattern, flags }) = parse_text_matcher(Some(&raw)) {
                prop_assert!(compile_regex(&pattern, &flags).is_ok());
            }
        }

        #[test]
        fn prop_ignore_case_suffix_matches_literal(text in "[ -~]{0,16}") {
            let quoted = format!("{}i", serde_json::to_string(&text).unwrap());
            let matcher = parse_text_matcher(Some(&quoted)).unwrap();
            prop_assert!(matcher.matches(&text));
            prop_assert!(matcher.matches(&text.to_uppercase()));
        }
    }
}

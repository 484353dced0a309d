//! Attribute-body parser for `name[attr op value]...` selector bodies.
//!
//! Used for `internal:role=button[name="Submit"i]`,
//! `internal:testid=[data-testid="login"s]` and `internal:attr=[alt="Logo"i]`.

use super::SelectorParseError;
use crate::text_matcher::compile_regex;

/// A parsed attribute body.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    /// Leading identifier (role name, tag name), possibly empty
    pub name: String,
    /// Bracketed attributes in order
    pub attributes: Vec<Attribute>,
}

/// Comparison operator of a bracketed attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOp {
    /// `[attr]` with no value
    Truthy,
    /// `=`
    Equals,
    /// `*=`
    Contains,
    /// `^=`
    Prefix,
    /// `$=`
    Suffix,
    /// `|=`
    DashMatch,
    /// `~=`
    Word,
}

impl AttributeOp {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "=" => Some(Self::Equals),
            "*=" => Some(Self::Contains),
            "^=" => Some(Self::Prefix),
            "$=" => Some(Self::Suffix),
            "|=" => Some(Self::DashMatch),
            "~=" => Some(Self::Word),
            _ => None,
        }
    }
}

/// Decoded attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// No value (`[attr]`)
    None,
    /// Quoted or unquoted string
    Str(String),
    /// Unquoted number
    Number(f64),
    /// `true` / `false`
    Bool(bool),
    /// `/pattern/flags`
    Regex {
        /// Pattern body
        pattern: String,
        /// Flag letters
        flags: String,
    },
}

impl AttributeValue {
    /// String form of scalar values, as a selector author would read it.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Regex { pattern, .. } => Some(pattern.clone()),
            Self::None => None,
        }
    }
}

/// One `[name op value]` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Dotted attribute name
    pub name: String,
    /// Name split into its property path
    pub json_path: Vec<String>,
    /// Comparison operator
    pub op: AttributeOp,
    /// Decoded value
    pub value: AttributeValue,
    /// Whether string comparison is case-sensitive
    pub case_sensitive: bool,
    /// Value text exactly as written, including quotes and any `i`/`s` suffix
    pub raw_value: String,
}

/// Parse an attribute body.
///
/// With `allow_unquoted_strings`, bare tokens other than `true`/`false` are kept
/// as strings; otherwise they must be numbers.
///
/// # Errors
/// Returns [`SelectorParseError::Attribute`] describing the first syntax error,
/// or [`SelectorParseError::Empty`] when the body has neither name nor attributes.
pub fn parse_attribute_selector(
    selector: &str,
    allow_unquoted_strings: bool,
) -> Result<AttributeSelector, SelectorParseError> {
    AttributeParser::new(selector, allow_unquoted_strings).parse()
}

struct AttributeParser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
    allow_unquoted: bool,
}

impl<'a> AttributeParser<'a> {
    fn new(source: &'a str, allow_unquoted: bool) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
            allow_unquoted,
        }
    }

    fn parse(mut self) -> Result<AttributeSelector, SelectorParseError> {
        let name = self.read_identifier();
        self.skip_spaces();

        let mut attributes = Vec::new();
        while self.peek() == Some('[') {
            attributes.push(self.read_attribute()?);
            self.skip_spaces();
        }
        if !self.eol() {
            return Err(self.error("unexpected trailing input"));
        }
        if name.is_empty() && attributes.is_empty() {
            return Err(SelectorParseError::Empty);
        }
        Ok(AttributeSelector { name, attributes })
    }

    fn eol(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_spaces(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn error(&self, message: &str) -> SelectorParseError {
        SelectorParseError::Attribute {
            selector: self.source.to_string(),
            position: self.pos,
            message: message.to_string(),
        }
    }

    fn read_identifier(&mut self) -> String {
        self.skip_spaces();
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '$' | '_') {
                ident.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        ident
    }

    fn read_quoted_string(&mut self, quote: char) -> Result<String, SelectorParseError> {
        if self.next() != Some(quote) {
            return Err(self.error("parsing quoted string"));
        }
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if c == quote {
                break;
            }
            if c == '\\' {
                self.pos += 1;
            }
            if let Some(c) = self.next() {
                value.push(c);
            }
        }
        if self.next() != Some(quote) {
            return Err(self.error("unterminated quoted string"));
        }
        Ok(value)
    }

    fn read_regular_expression(&mut self) -> Result<(String, String), SelectorParseError> {
        if self.next() != Some('/') {
            return Err(self.error("parsing regular expression"));
        }
        let mut pattern = String::new();
        let mut in_class = false;
        while let Some(c) = self.peek() {
            if c == '\\' {
                pattern.push(c);
                self.pos += 1;
                if self.eol() {
                    return Err(self.error("unterminated regular expression"));
                }
            } else if in_class && c == ']' {
                in_class = false;
            } else if !in_class && c == '[' {
                in_class = true;
            } else if !in_class && c == '/' {
                break;
            }
            if let Some(c) = self.next() {
                pattern.push(c);
            }
        }
        if self.next() != Some('/') {
            return Err(self.error("unterminated regular expression"));
        }
        let mut flags = String::new();
        while let Some(c) = self.peek() {
            if !"dgimsuy".contains(c) {
                break;
            }
            flags.push(c);
            self.pos += 1;
        }
        compile_regex(&pattern, &flags).map_err(|e| self.error(&e))?;
        Ok((pattern, flags))
    }

    fn read_attribute_token(&mut self) -> Result<String, SelectorParseError> {
        self.skip_spaces();
        let token = match self.peek() {
            Some(q @ ('\'' | '"')) => self.read_quoted_string(q)?,
            _ => self.read_identifier(),
        };
        if token.is_empty() {
            return Err(self.error("parsing property path"));
        }
        Ok(token)
    }

    fn read_operator(&mut self) -> Result<AttributeOp, SelectorParseError> {
        self.skip_spaces();
        let mut token = String::new();
        if let Some(c) = self.next() {
            token.push(c);
        }
        if token != "=" {
            if let Some(c) = self.next() {
                token.push(c);
            }
        }
        AttributeOp::from_token(&token).ok_or_else(|| self.error("parsing operator"))
    }

    fn read_attribute(&mut self) -> Result<Attribute, SelectorParseError> {
        // [
        self.pos += 1;
        let mut json_path = vec![self.read_attribute_token()?];
        self.skip_spaces();
        while self.peek() == Some('.') {
            self.pos += 1;
            json_path.push(self.read_attribute_token()?);
            self.skip_spaces();
        }
        let name = json_path.join(".");

        if self.peek() == Some(']') {
            self.pos += 1;
            return Ok(Attribute {
                name,
                json_path,
                op: AttributeOp::Truthy,
                value: AttributeValue::None,
                case_sensitive: false,
                raw_value: String::new(),
            });
        }

        let op = self.read_operator()?;
        self.skip_spaces();
        let value_start = self.pos;
        let mut case_sensitive = true;
        let value = match self.peek() {
            Some('/') => {
                if op != AttributeOp::Equals {
                    return Err(self.error("regular expressions are only supported with ="));
                }
                let (pattern, flags) = self.read_regular_expression()?;
                AttributeValue::Regex { pattern, flags }
            }
            Some(q @ ('\'' | '"')) => {
                let value = self.read_quoted_string(q)?;
                self.skip_spaces();
                match self.peek() {
                    Some('i' | 'I') => {
                        case_sensitive = false;
                        self.pos += 1;
                    }
                    Some('s' | 'S') => {
                        self.pos += 1;
                    }
                    _ => {}
                }
                AttributeValue::Str(value)
            }
            _ => self.read_unquoted_value()?,
        };
        let raw_value: String = self.chars[value_start..self.pos].iter().collect();

        self.skip_spaces();
        if self.peek() != Some(']') {
            return Err(self.error("parsing attribute value"));
        }
        self.pos += 1;

        if op != AttributeOp::Equals && !matches!(value, AttributeValue::Str(_)) {
            return Err(self.error("non-equality operators require a string value"));
        }

        Ok(Attribute {
            name,
            json_path,
            op,
            value,
            case_sensitive,
            raw_value: raw_value.trim().to_string(),
        })
    }

    fn read_unquoted_value(&mut self) -> Result<AttributeValue, SelectorParseError> {
        let mut token = String::new();
        while let Some(c) = self.peek() {
            if is_css_name_char(c) || matches!(c, '+' | '.') {
                token.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        match token.as_str() {
            "true" => Ok(AttributeValue::Bool(true)),
            "false" => Ok(AttributeValue::Bool(false)),
            _ if self.allow_unquoted => Ok(AttributeValue::Str(token)),
            _ => token
                .parse::<f64>()
                .map(AttributeValue::Number)
                .map_err(|_| self.error("parsing attribute value")),
        }
    }
}

fn is_css_name_char(c: char) -> bool {
    !c.is_ascii() || c.is_ascii_alphanumeric() || matches!(c, '_' | '-')
}

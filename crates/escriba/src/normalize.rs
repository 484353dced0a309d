//! Normalizers for attribute values and modifier bitmasks.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::grammar::{Attribute, AttributeOp, AttributeValue};

/// Boolean-ish ARIA state: `true`, `false` or `"mixed"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AriaState {
    /// State is on
    True,
    /// State is off
    False,
    /// Tri-state checkbox / pressed button in the mixed state
    Mixed,
}

impl AriaState {
    /// Convert to a plain boolean, if not mixed
    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Self::True => Some(true),
            Self::False => Some(false),
            Self::Mixed => None,
        }
    }
}

impl From<bool> for AriaState {
    fn from(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }
}

impl Serialize for AriaState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::True => serializer.serialize_bool(true),
            Self::False => serializer.serialize_bool(false),
            Self::Mixed => serializer.serialize_str("mixed"),
        }
    }
}

impl<'de> Deserialize<'de> for AriaState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Bool(value) => Ok(value.into()),
            Raw::Text(text) if text == "mixed" => Ok(Self::Mixed),
            Raw::Text(text) => Err(serde::de::Error::custom(format!(
                "expected true, false or \"mixed\", got {text:?}"
            ))),
        }
    }
}

/// Decode a boolean-ish attribute: a bare `[attr]` flag, `true`/`false`
/// tokens, or the string `mixed`.
#[must_use]
pub fn parse_aria_state(attribute: &Attribute) -> Option<AriaState> {
    if attribute.op == AttributeOp::Truthy {
        return Some(AriaState::True);
    }
    match &attribute.value {
        AttributeValue::Bool(value) => Some((*value).into()),
        AttributeValue::Str(text) => match text.as_str() {
            "true" => Some(AriaState::True),
            "false" => Some(AriaState::False),
            "mixed" => Some(AriaState::Mixed),
            _ => None,
        },
        _ => None,
    }
}

/// Decode a heading level (`[level=2]`).
#[must_use]
pub fn parse_level(value: &AttributeValue) -> Option<u32> {
    match value {
        AttributeValue::Str(text) => text.trim().parse().ok(),
        AttributeValue::Number(n) if n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX) => {
            Some(*n as u32)
        }
        _ => None,
    }
}

/// Keyboard modifier held during an input action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    /// Alt / Option
    Alt,
    /// Control
    Control,
    /// Meta / Command
    Meta,
    /// Shift
    Shift,
}

impl Modifier {
    /// All modifiers in bit order
    pub const ALL: [Self; 4] = [Self::Alt, Self::Control, Self::Meta, Self::Shift];

    /// Bit of this modifier in a recorded modifier mask
    #[must_use]
    pub const fn bit(self) -> u32 {
        match self {
            Self::Alt => 1,
            Self::Control => 2,
            Self::Meta => 4,
            Self::Shift => 8,
        }
    }
}

/// Decode a modifier bitmask. Zero or absent yields `None`.
#[must_use]
pub fn decode_modifiers(mask: Option<u32>) -> Option<Vec<Modifier>> {
    let mask = mask.filter(|m| *m != 0)?;
    let modifiers: Vec<_> = Modifier::ALL
        .into_iter()
        .filter(|m| mask & m.bit() != 0)
        .collect();
    (!modifiers.is_empty()).then_some(modifiers)
}

/// Encode modifiers back into a bitmask.
#[must_use]
pub fn encode_modifiers(modifiers: &[Modifier]) -> u32 {
    modifiers.iter().fold(0, |mask, m| mask | m.bit())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::grammar::parse_attribute_selector;
    use proptest::prelude::*;

    fn first_attribute(body: &str) -> Attribute {
        parse_attribute_selector(body, true)
            .unwrap()
            .attributes
            .remove(0)
    }

    #[test]
    fn test_aria_state_forms() {
        assert_eq!(parse_aria_state(&first_attribute("x[checked]")), Some(AriaState::True));
        assert_eq!(
            parse_aria_state(&first_attribute("x[checked=false]")),
            Some(AriaState::False)
        );
        assert_eq!(
            parse_aria_state(&first_attribute("x[checked=mixed]")),
            Some(AriaState::Mixed)
        );
        assert_eq!(
            parse_aria_state(&first_attribute(r#"x[checked="true"]"#)),
            Some(AriaState::True)
        );
        assert_eq!(parse_aria_state(&first_attribute("x[checked=maybe]")), None);
    }

    #[test]
    fn test_aria_state_serde() {
        assert_eq!(serde_json::to_string(&AriaState::Mixed).unwrap(), "\"mixed\"");
        assert_eq!(serde_json::to_string(&AriaState::False).unwrap(), "false");
        let state: AriaState = serde_json::from_str("true").unwrap();
        assert_eq!(state, AriaState::True);
        assert!(serde_json::from_str::<AriaState>("\"nope\"").is_err());
    }

    #[test]
    fn test_level() {
        assert_eq!(parse_level(&AttributeValue::Str("2".to_string())), Some(2));
        assert_eq!(parse_level(&AttributeValue::Number(3.0)), Some(3));
        assert_eq!(parse_level(&AttributeValue::Number(1.5)), None);
        assert_eq!(parse_level(&AttributeValue::Str("h2".to_string())), None);
    }

    #[test]
    fn test_modifier_decode() {
        assert_eq!(
            decode_modifiers(Some(1 | 8)),
            Some(vec![Modifier::Alt, Modifier::Shift])
        );
        assert_eq!(
            decode_modifiers(Some(2 | 4)),
            Some(vec![Modifier::Control, Modifier::Meta])
        );
        assert_eq!(decode_modifiers(Some(0)), None);
        assert_eq!(decode_modifiers(None), None);
        assert_eq!(decode_modifiers(Some(16)), None);
    }

    proptest! {
        #[test]
        fn prop_modifier_round_trip(mask in 0u32..16) {
            let decoded = decode_modifiers(Some(mask)).unwrap_or_default();
            prop_assert_eq!(encode_modifiers(&decoded), mask);
        }
    }
}

//! Values flowing into and out of a masking strategy.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;

/// The value handed to a strategy once the gate is open.
///
/// Marshaled attributes arrive as bytes, everything else as text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prepared {
    Text(String),
    Bytes(Vec<u8>),
}

impl Prepared {
    /// Stringifies a value: strings are used as-is, `null` becomes the empty
    /// string, and anything else uses its JSON text.
    pub fn stringify(value: &Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text.clone()),
            Value::Null => Self::Text(String::new()),
            other => Self::Text(other.to_string()),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }

    /// Returns the text, if the value was not marshaled.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Bytes(_) => None,
        }
    }
}

/// Output of a strategy: always storable, never null.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MaskedValue {
    Text(String),
    Bytes(Vec<u8>),
}

impl MaskedValue {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Bytes(_) => None,
        }
    }

    /// Base64-encodes the masked payload (standard alphabet, padded).
    #[must_use]
    pub fn encoded(&self) -> Self {
        Self::Text(STANDARD.encode(self.as_bytes()))
    }

    /// Converts into a storable JSON value. Bytes become an array of octets.
    pub fn into_value(self) -> Value {
        match self {
            Self::Text(text) => Value::String(text),
            Self::Bytes(bytes) => Value::Array(bytes.into_iter().map(Value::from).collect()),
        }
    }
}

impl From<String> for MaskedValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for MaskedValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<u8>> for MaskedValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl PartialEq<&str> for MaskedValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

/// Result of a masking call.
///
/// Masking is conditional: when the gate is closed the input comes back
/// untouched as [`Masking::Unchanged`].
#[derive(Clone, Debug, PartialEq)]
pub enum Masking {
    Masked(MaskedValue),
    Unchanged(Value),
}

impl Masking {
    pub fn is_masked(&self) -> bool {
        matches!(self, Self::Masked(_))
    }

    pub fn masked(&self) -> Option<&MaskedValue> {
        match self {
            Self::Masked(value) => Some(value),
            Self::Unchanged(_) => None,
        }
    }

    /// Converts into the value that would be persisted.
    pub fn into_value(self) -> Value {
        match self {
            Self::Masked(value) => value.into_value(),
            Self::Unchanged(value) => value,
        }
    }
}

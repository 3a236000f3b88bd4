//! Option values that may depend on the instance being masked.
//!
//! A [`Setting`] is declared once, at type-definition time, and resolved for
//! each instance by [`crate::evaluate()`]. Only the gates (`if` / `unless`) and
//! the open extras map carry settings; every other option is static.

use std::{fmt, sync::Arc};

use serde_json::Value;

use crate::subject::MaskSubject;

/// Signature of a callable setting: receives the instance, returns the value.
pub type Callable = Arc<dyn Fn(&dyn MaskSubject) -> Value + Send + Sync>;

/// A configuration value that is either fixed or computed per instance.
#[derive(Clone)]
pub enum Setting {
    /// A fixed value used as-is.
    Literal(Value),
    /// The name of a zero-argument method on the instance.
    Method(String),
    /// A function called with the instance as its only argument.
    Callable(Callable),
}

impl Setting {
    /// Wraps a literal value.
    #[must_use]
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// References a method exposed through [`MaskSubject::call_method`].
    #[must_use]
    pub fn method(name: impl Into<String>) -> Self {
        Self::Method(name.into())
    }

    /// Wraps a function of the instance.
    #[must_use]
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&dyn MaskSubject) -> Value + Send + Sync + 'static,
    {
        Self::Callable(Arc::new(f))
    }

    /// Returns the literal value, if this setting does not need an instance.
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Self::Literal(value) => Some(value),
            Self::Method(_) | Self::Callable(_) => None,
        }
    }

    pub(crate) fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

impl fmt::Debug for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Method(name) => f.debug_tuple("Method").field(name).finish(),
            Self::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

impl From<bool> for Setting {
    fn from(value: bool) -> Self {
        Self::Literal(Value::Bool(value))
    }
}

impl From<Value> for Setting {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<&str> for Setting {
    fn from(value: &str) -> Self {
        Self::Literal(Value::String(value.to_string()))
    }
}

impl From<String> for Setting {
    fn from(value: String) -> Self {
        Self::Literal(Value::String(value))
    }
}

/// Truthiness of a resolved value: only `null` and `false` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

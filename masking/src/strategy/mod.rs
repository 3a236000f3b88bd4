//! Pluggable masking strategies.
//!
//! A strategy is a pure function from a [`MaskContext`] to a [`MaskedValue`].
//! Strategies answer to one or more named operations; the attribute's
//! `mask_method` picks which one runs, so a strategy with differently named
//! operations can be substituted without touching the registry.

mod policy;

use std::{collections::BTreeMap, fmt, sync::Arc};

use serde_json::Value;

pub use policy::{KeepConfig, MaskConfig, TextMaskPolicy, MASK_CHAR, REDACTED};

use crate::masked::{MaskedValue, Prepared};

/// Operation invoked on a strategy unless configured otherwise.
pub const DEFAULT_MASK_METHOD: &str = "mask";

/// Everything a strategy may look at when producing a masked value.
#[derive(Clone, Copy, Debug)]
pub struct MaskContext<'a> {
    attribute: &'a str,
    value: &'a Prepared,
    original: &'a Value,
    options: &'a BTreeMap<String, Value>,
}

impl<'a> MaskContext<'a> {
    pub fn new(
        attribute: &'a str,
        value: &'a Prepared,
        original: &'a Value,
        options: &'a BTreeMap<String, Value>,
    ) -> Self {
        Self {
            attribute,
            value,
            original,
            options,
        }
    }

    /// Logical attribute being masked.
    pub fn attribute(&self) -> &'a str {
        self.attribute
    }

    /// The stringified or marshaled value.
    pub fn value(&self) -> &'a Prepared {
        self.value
    }

    /// The value as it was before stringifying or marshaling.
    pub fn original(&self) -> &'a Value {
        self.original
    }

    /// Resolved extra options, forwarded verbatim from the declaration.
    pub fn options(&self) -> &'a BTreeMap<String, Value> {
        self.options
    }

    pub fn option(&self, key: &str) -> Option<&'a Value> {
        self.options.get(key)
    }
}

/// A masking strategy.
pub trait Masker: Send + Sync {
    /// Human-readable name used in error messages.
    fn name(&self) -> &str;

    /// Operation names this strategy answers to.
    fn operations(&self) -> &[&str] {
        &[DEFAULT_MASK_METHOD]
    }

    /// Runs `operation` against `context`.
    ///
    /// Only called with names listed by [`Masker::operations`]; declarations
    /// naming anything else are rejected up front.
    fn mask(&self, operation: &str, context: &MaskContext<'_>) -> MaskedValue;

    fn provides(&self, operation: &str) -> bool {
        self.operations().iter().any(|name| *name == operation)
    }
}

/// Shared handle to a strategy, as stored in a configuration record.
pub type MaskerRef = Arc<dyn Masker>;

/// The built-in strategy: every input becomes [`REDACTED`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticMasker;

impl Masker for StaticMasker {
    fn name(&self) -> &str {
        "StaticMasker"
    }

    fn mask(&self, _operation: &str, _context: &MaskContext<'_>) -> MaskedValue {
        MaskedValue::Text(REDACTED.to_string())
    }
}

/// Adapts a closure into a strategy answering to a single operation.
pub struct FnMasker<F> {
    operation: [&'static str; 1],
    f: F,
}

impl<F> FnMasker<F>
where
    F: Fn(&MaskContext<'_>) -> MaskedValue + Send + Sync,
{
    /// Answers to [`DEFAULT_MASK_METHOD`].
    pub fn new(f: F) -> Self {
        Self::named(DEFAULT_MASK_METHOD, f)
    }

    pub fn named(operation: &'static str, f: F) -> Self {
        Self {
            operation: [operation],
            f,
        }
    }
}

impl<F> Masker for FnMasker<F>
where
    F: Fn(&MaskContext<'_>) -> MaskedValue + Send + Sync,
{
    fn name(&self) -> &str {
        "FnMasker"
    }

    fn operations(&self) -> &[&str] {
        &self.operation
    }

    fn mask(&self, _operation: &str, context: &MaskContext<'_>) -> MaskedValue {
        (self.f)(context)
    }
}

impl<F> fmt::Debug for FnMasker<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMasker")
            .field("operation", &self.operation[0])
            .finish_non_exhaustive()
    }
}

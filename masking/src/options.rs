//! Configuration records and the partial options layered onto them.
//!
//! [`MaskOptions`] is a partial record: every recognized key is optional and
//! unknown keys go to an explicit extras map. [`MaskRecord`] is the complete
//! record for one attribute; every recognized key has a concrete value.
//!
//! Layering always produces a new value. Stored records are never mutated.

use std::{collections::BTreeMap, fmt, sync::Arc};

use serde_json::Value;

use crate::{
    error::{MaskError, MaskResult},
    marshal::{JsonMarshaler, Marshaler, MarshalerRef, DEFAULT_DUMP_METHOD, DEFAULT_LOAD_METHOD},
    setting::{is_truthy, Setting},
    strategy::{Masker, MaskerRef, StaticMasker, DEFAULT_MASK_METHOD},
};

pub const DEFAULT_PREFIX: &str = "masker_";
pub const DEFAULT_SUFFIX: &str = "";

// =============================================================================
// MaskOptions - partial record
// =============================================================================

/// Options for one layer: base defaults, a declaration, or a single call.
#[derive(Clone, Default)]
pub struct MaskOptions {
    pub(crate) prefix: Option<String>,
    pub(crate) suffix: Option<String>,
    pub(crate) attribute: Option<String>,
    pub(crate) gate_if: Option<Setting>,
    pub(crate) gate_unless: Option<Setting>,
    pub(crate) encode: Option<bool>,
    pub(crate) marshal: Option<bool>,
    pub(crate) marshaler: Option<MarshalerRef>,
    pub(crate) dump_method: Option<String>,
    pub(crate) load_method: Option<String>,
    pub(crate) masker: Option<MaskerRef>,
    pub(crate) mask_method: Option<String>,
    pub(crate) column: Option<String>,
    pub(crate) extras: BTreeMap<String, Setting>,
}

impl MaskOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix of the generated virtual attribute name.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Suffix of the generated virtual attribute name.
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Explicit virtual attribute name, bypassing prefix and suffix.
    #[must_use]
    pub fn attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Masks only when this setting resolves truthy.
    #[must_use]
    pub fn gate_if(mut self, setting: impl Into<Setting>) -> Self {
        self.gate_if = Some(setting.into());
        self
    }

    /// Skips masking when this setting resolves truthy.
    #[must_use]
    pub fn gate_unless(mut self, setting: impl Into<Setting>) -> Self {
        self.gate_unless = Some(setting.into());
        self
    }

    /// Base64-encodes the masked output.
    #[must_use]
    pub fn encode(mut self, encode: bool) -> Self {
        self.encode = Some(encode);
        self
    }

    /// Marshals the value to bytes before masking instead of stringifying it.
    #[must_use]
    pub fn marshal(mut self, marshal: bool) -> Self {
        self.marshal = Some(marshal);
        self
    }

    #[must_use]
    pub fn marshaler(self, marshaler: impl Marshaler + 'static) -> Self {
        self.shared_marshaler(Arc::new(marshaler))
    }

    #[must_use]
    pub fn shared_marshaler(mut self, marshaler: MarshalerRef) -> Self {
        self.marshaler = Some(marshaler);
        self
    }

    #[must_use]
    pub fn dump_method(mut self, name: impl Into<String>) -> Self {
        self.dump_method = Some(name.into());
        self
    }

    #[must_use]
    pub fn load_method(mut self, name: impl Into<String>) -> Self {
        self.load_method = Some(name.into());
        self
    }

    #[must_use]
    pub fn masker(self, masker: impl Masker + 'static) -> Self {
        self.shared_masker(Arc::new(masker))
    }

    #[must_use]
    pub fn shared_masker(mut self, masker: MaskerRef) -> Self {
        self.masker = Some(masker);
        self
    }

    #[must_use]
    pub fn mask_method(mut self, name: impl Into<String>) -> Self {
        self.mask_method = Some(name.into());
        self
    }

    /// Storage column override for the bulk runner.
    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Strategy-specific option, forwarded verbatim to the masker.
    #[must_use]
    pub fn extra(mut self, key: impl Into<String>, setting: impl Into<Setting>) -> Self {
        self.extras.insert(key.into(), setting.into());
        self
    }

    /// Layers `over` on top of `self`, key by key. `over` wins.
    #[must_use]
    pub fn merge(&self, over: &MaskOptions) -> MaskOptions {
        fn pick<T: Clone>(over: &Option<T>, base: &Option<T>) -> Option<T> {
            over.as_ref().or(base.as_ref()).cloned()
        }

        let mut extras = self.extras.clone();
        extras.extend(over.extras.iter().map(|(k, v)| (k.clone(), v.clone())));

        MaskOptions {
            prefix: pick(&over.prefix, &self.prefix),
            suffix: pick(&over.suffix, &self.suffix),
            attribute: pick(&over.attribute, &self.attribute),
            gate_if: pick(&over.gate_if, &self.gate_if),
            gate_unless: pick(&over.gate_unless, &self.gate_unless),
            encode: pick(&over.encode, &self.encode),
            marshal: pick(&over.marshal, &self.marshal),
            marshaler: pick(&over.marshaler, &self.marshaler),
            dump_method: pick(&over.dump_method, &self.dump_method),
            load_method: pick(&over.load_method, &self.load_method),
            masker: pick(&over.masker, &self.masker),
            mask_method: pick(&over.mask_method, &self.mask_method),
            column: pick(&over.column, &self.column),
            extras,
        }
    }

    /// Virtual attribute name for `attribute` under these options.
    pub fn virtual_attribute_for(&self, attribute: &str) -> String {
        if let Some(explicit) = &self.attribute {
            return explicit.clone();
        }
        let prefix = self.prefix.as_deref().unwrap_or(DEFAULT_PREFIX);
        let suffix = self.suffix.as_deref().unwrap_or(DEFAULT_SUFFIX);
        format!("{prefix}{attribute}{suffix}")
    }
}

impl fmt::Debug for MaskOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskOptions")
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("attribute", &self.attribute)
            .field("gate_if", &self.gate_if)
            .field("gate_unless", &self.gate_unless)
            .field("encode", &self.encode)
            .field("marshal", &self.marshal)
            .field("marshaler", &self.marshaler.as_ref().map(|m| m.name().to_string()))
            .field("dump_method", &self.dump_method)
            .field("load_method", &self.load_method)
            .field("masker", &self.masker.as_ref().map(|m| m.name().to_string()))
            .field("mask_method", &self.mask_method)
            .field("column", &self.column)
            .field("extras", &self.extras)
            .finish()
    }
}

// =============================================================================
// MaskRecord - complete record
// =============================================================================

/// The effective configuration for one maskable attribute.
#[derive(Clone)]
pub struct MaskRecord {
    virtual_attribute: String,
    gate_if: Setting,
    gate_unless: Setting,
    encode: bool,
    marshal: bool,
    marshaler: MarshalerRef,
    dump_method: String,
    load_method: String,
    masker: MaskerRef,
    mask_method: String,
    column: Option<String>,
    extras: BTreeMap<String, Setting>,
}

impl MaskRecord {
    /// A record holding only the built-in defaults.
    pub fn new(virtual_attribute: impl Into<String>) -> Self {
        Self {
            virtual_attribute: virtual_attribute.into(),
            gate_if: Setting::from(true),
            gate_unless: Setting::from(false),
            encode: false,
            marshal: false,
            marshaler: Arc::new(JsonMarshaler),
            dump_method: DEFAULT_DUMP_METHOD.to_string(),
            load_method: DEFAULT_LOAD_METHOD.to_string(),
            masker: Arc::new(StaticMasker),
            mask_method: DEFAULT_MASK_METHOD.to_string(),
            column: None,
            extras: BTreeMap::new(),
        }
    }

    /// Returns a new record with `options` layered on top. `options` wins.
    ///
    /// `prefix` and `suffix` only matter when a record is first declared and
    /// are ignored here; an explicit `attribute` renames the virtual attribute.
    #[must_use]
    pub fn merge(&self, options: &MaskOptions) -> MaskRecord {
        let mut merged = self.clone();
        if let Some(attribute) = &options.attribute {
            merged.virtual_attribute.clone_from(attribute);
        }
        if let Some(setting) = &options.gate_if {
            merged.gate_if = setting.clone();
        }
        if let Some(setting) = &options.gate_unless {
            merged.gate_unless = setting.clone();
        }
        if let Some(encode) = options.encode {
            merged.encode = encode;
        }
        if let Some(marshal) = options.marshal {
            merged.marshal = marshal;
        }
        if let Some(marshaler) = &options.marshaler {
            merged.marshaler = Arc::clone(marshaler);
        }
        if let Some(name) = &options.dump_method {
            merged.dump_method.clone_from(name);
        }
        if let Some(name) = &options.load_method {
            merged.load_method.clone_from(name);
        }
        if let Some(masker) = &options.masker {
            merged.masker = Arc::clone(masker);
        }
        if let Some(name) = &options.mask_method {
            merged.mask_method.clone_from(name);
        }
        if options.column.is_some() {
            merged.column.clone_from(&options.column);
        }
        merged
            .extras
            .extend(options.extras.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    /// Checks that every named operation exists on its strategy.
    pub(crate) fn validate(&self) -> MaskResult<()> {
        let unknown = |strategy: &str, operation: &str| MaskError::UnknownOperation {
            strategy: strategy.to_string(),
            operation: operation.to_string(),
        };
        if !self.masker.provides(&self.mask_method) {
            return Err(unknown(self.masker.name(), &self.mask_method));
        }
        for operation in [&self.dump_method, &self.load_method] {
            if !self.marshaler.provides(operation) {
                return Err(unknown(self.marshaler.name(), operation));
            }
        }
        Ok(())
    }

    /// Whether the gate is open: `if` truthy and `unless` falsy.
    ///
    /// Both gates must already be resolved to literals.
    pub(crate) fn gate_open(&self, attribute: &str) -> MaskResult<bool> {
        let gate_if = literal(&self.gate_if, attribute, "if")?;
        let gate_unless = literal(&self.gate_unless, attribute, "unless")?;
        Ok(is_truthy(gate_if) && !is_truthy(gate_unless))
    }

    /// Extras as plain values. Every entry must already be a literal.
    pub(crate) fn resolved_extras(&self, attribute: &str) -> MaskResult<BTreeMap<String, Value>> {
        self.extras
            .iter()
            .map(|(key, setting)| Ok((key.clone(), literal(setting, attribute, key)?.clone())))
            .collect()
    }

    pub fn virtual_attribute(&self) -> &str {
        &self.virtual_attribute
    }

    pub fn gate_if(&self) -> &Setting {
        &self.gate_if
    }

    pub fn gate_unless(&self) -> &Setting {
        &self.gate_unless
    }

    pub fn encode(&self) -> bool {
        self.encode
    }

    pub fn marshal(&self) -> bool {
        self.marshal
    }

    pub fn marshaler(&self) -> &MarshalerRef {
        &self.marshaler
    }

    pub fn dump_method(&self) -> &str {
        &self.dump_method
    }

    pub fn load_method(&self) -> &str {
        &self.load_method
    }

    pub fn masker(&self) -> &MaskerRef {
        &self.masker
    }

    pub fn mask_method(&self) -> &str {
        &self.mask_method
    }

    /// Explicit storage column, if one was configured.
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Storage column: the explicit override, else the virtual attribute.
    pub fn column_name(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.virtual_attribute)
    }

    pub fn extras(&self) -> &BTreeMap<String, Setting> {
        &self.extras
    }
}

fn literal<'a>(setting: &'a Setting, attribute: &str, key: &str) -> MaskResult<&'a Value> {
    setting.as_literal().ok_or_else(|| MaskError::UnresolvedSetting {
        attribute: attribute.to_string(),
        key: key.to_string(),
    })
}

impl fmt::Debug for MaskRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskRecord")
            .field("virtual_attribute", &self.virtual_attribute)
            .field("gate_if", &self.gate_if)
            .field("gate_unless", &self.gate_unless)
            .field("encode", &self.encode)
            .field("marshal", &self.marshal)
            .field("marshaler", &self.marshaler.name())
            .field("dump_method", &self.dump_method)
            .field("load_method", &self.load_method)
            .field("masker", &self.masker.name())
            .field("mask_method", &self.mask_method)
            .field("column", &self.column)
            .field("extras", &self.extras)
            .finish()
    }
}

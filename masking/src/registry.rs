//! Per-type masking registry.
//!
//! A [`MaskRegistry`] is built once, when its type is defined, and is
//! read-only afterwards. Types that extend another type start from a copy of
//! the parent's registry via [`MaskRegistry::derive_from`].

use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    error::{MaskError, MaskResult},
    masked::{Masking, Prepared},
    options::{MaskOptions, MaskRecord},
    strategy::MaskContext,
};

/// Records keyed by logical attribute name.
#[derive(Clone, Debug, Default)]
pub struct OptionStore {
    records: BTreeMap<String, MaskRecord>,
}

impl OptionStore {
    pub fn get(&self, attribute: &str) -> Option<&MaskRecord> {
        self.records.get(attribute)
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.records.contains_key(attribute)
    }

    /// Stores `record`, replacing any previous record for `attribute`.
    pub fn insert(&mut self, attribute: String, record: MaskRecord) {
        self.records.insert(attribute, record);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MaskRecord)> {
        self.records.iter().map(|(name, record)| (name.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Maskable attributes of one type, plus the defaults for future declarations.
#[derive(Clone, Debug)]
pub struct MaskRegistry {
    type_name: String,
    defaults: MaskOptions,
    store: OptionStore,
}

impl MaskRegistry {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            defaults: MaskOptions::default(),
            store: OptionStore::default(),
        }
    }

    /// Starts a registry for a subtype from a copy of `parent`.
    ///
    /// Inherited records and base defaults can then be overridden locally;
    /// the parent is not affected.
    pub fn derive_from(parent: &MaskRegistry, type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            defaults: parent.defaults.clone(),
            store: parent.store.clone(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Base defaults applied to every future declaration on this type.
    pub fn defaults(&self) -> &MaskOptions {
        &self.defaults
    }

    /// Layers `options` onto the base defaults.
    ///
    /// Attributes already declared keep their records. A virtual attribute or
    /// column names one attribute only, so neither can be a default.
    pub fn set_defaults(&mut self, options: &MaskOptions) -> MaskResult<()> {
        if options.attribute.is_some() {
            return Err(self.invalid("a virtual attribute cannot be a default"));
        }
        if options.column.is_some() {
            return Err(self.invalid("a column cannot be a default"));
        }
        self.defaults = self.defaults.merge(options);
        Ok(())
    }

    /// Declares `attributes` as maskable with `options` layered over the base
    /// defaults.
    ///
    /// Redeclaring an attribute replaces its record. Nothing is stored unless
    /// every attribute in the call is valid, and no two attributes may share a
    /// virtual attribute or a column.
    pub fn declare<I, S>(&mut self, attributes: I, options: &MaskOptions) -> MaskResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let attributes: Vec<String> = attributes.into_iter().map(Into::into).collect();
        let layered = self.defaults.merge(options);
        if layered.attribute.is_some() && attributes.len() > 1 {
            return Err(self.invalid("an explicit virtual attribute needs exactly one attribute"));
        }

        let mut declared: Vec<(String, MaskRecord)> = Vec::with_capacity(attributes.len());
        for attribute in attributes {
            if attribute.is_empty() {
                return Err(self.invalid("attribute names cannot be empty"));
            }
            let record =
                MaskRecord::new(layered.virtual_attribute_for(&attribute)).merge(&layered);
            record.validate()?;
            declared.retain(|(name, _)| *name != attribute);
            declared.push((attribute, record));
        }

        for (attribute, record) in &declared {
            let others = self
                .store
                .iter()
                .filter(|(name, _)| declared.iter().all(|(new, _)| new.as_str() != *name))
                .chain(declared.iter().map(|(name, record)| (name.as_str(), record)))
                .filter(|(name, _)| *name != attribute.as_str());
            for (other, existing) in others {
                if existing.column_name() == record.column_name() {
                    return Err(self.invalid(&format!(
                        "`{attribute}` and `{other}` both write column `{}`",
                        record.column_name()
                    )));
                }
                if existing.virtual_attribute() == record.virtual_attribute() {
                    return Err(self.invalid(&format!(
                        "`{attribute}` and `{other}` share virtual attribute `{}`",
                        record.virtual_attribute()
                    )));
                }
            }
        }

        for (attribute, record) in declared {
            self.store.insert(attribute, record);
        }
        Ok(())
    }

    pub fn is_maskable(&self, attribute: &str) -> bool {
        self.store.contains(attribute)
    }

    /// The effective record for `attribute`.
    pub fn record(&self, attribute: &str) -> MaskResult<&MaskRecord> {
        self.store
            .get(attribute)
            .ok_or_else(|| MaskError::unconfigured(&self.type_name, attribute))
    }

    /// Declared attribute names, in name order.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.store.iter().map(|(name, _)| name)
    }

    pub fn store(&self) -> &OptionStore {
        &self.store
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Masks `value` as `attribute`, with `overrides` layered over the record.
    ///
    /// Returns [`Masking::Unchanged`] when the gate is closed. Overrides must
    /// already be resolved; see [`crate::evaluate()`].
    pub fn mask(
        &self,
        attribute: &str,
        value: &Value,
        overrides: &MaskOptions,
    ) -> MaskResult<Masking> {
        let record = self.record(attribute)?.merge(overrides);
        record.validate()?;
        if !record.gate_open(attribute)? {
            return Ok(Masking::Unchanged(value.clone()));
        }

        let prepared = if record.marshal() {
            Prepared::Bytes(record.marshaler().dump(record.dump_method(), value)?)
        } else {
            Prepared::stringify(value)
        };
        let options = record.resolved_extras(attribute)?;
        let context = MaskContext::new(attribute, &prepared, value, &options);
        let masked = record.masker().mask(record.mask_method(), &context);

        Ok(Masking::Masked(if record.encode() {
            masked.encoded()
        } else {
            masked
        }))
    }

    /// Decodes a payload produced by `attribute`'s marshaler.
    pub fn load(&self, attribute: &str, bytes: &[u8]) -> MaskResult<Value> {
        let record = self.record(attribute)?;
        record.marshaler().load(record.load_method(), bytes)
    }

    fn invalid(&self, reason: &str) -> MaskError {
        MaskError::InvalidDeclaration {
            type_name: self.type_name.clone(),
            reason: reason.to_string(),
        }
    }
}

//! Instance-level masking.
//!
//! [`Maskable`] is the opt-in: a type gains masking by implementing it and
//! pointing at its registry. Every call evaluates the attribute's record
//! against the instance first, then delegates to [`MaskRegistry::mask`].
//!
//! ```ignore
//! use std::sync::OnceLock;
//! use masking::{MaskOptions, MaskRegistry, MaskSubject, Maskable};
//!
//! #[derive(MaskSubject)]
//! struct User {
//!     #[mask_subject(id)]
//!     id: u64,
//!     ssn: String,
//! }
//!
//! impl Maskable for User {
//!     fn mask_registry() -> &'static MaskRegistry {
//!         static REGISTRY: OnceLock<MaskRegistry> = OnceLock::new();
//!         REGISTRY.get_or_init(|| {
//!             let mut registry = MaskRegistry::new("User");
//!             registry
//!                 .declare(["ssn"], &MaskOptions::new())
//!                 .expect("valid masking declaration");
//!             registry
//!         })
//!     }
//! }
//! ```

use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    error::{MaskError, MaskResult},
    evaluate::evaluate,
    masked::Masking,
    registry::MaskRegistry,
    subject::MaskSubject,
};

/// Column name to value, as written by a single record update.
pub type FieldMap = BTreeMap<String, Value>;

/// Masking on instances of a type with a [`MaskRegistry`].
pub trait Maskable: MaskSubject + Sized {
    /// The type's registry, built once and read-only afterwards.
    fn mask_registry() -> &'static MaskRegistry;

    /// Masks the current value of `attribute`.
    ///
    /// The instance is not modified.
    fn mask(&self, attribute: &str) -> MaskResult<Masking> {
        self.mask_with(attribute, None)
    }

    /// Masks `value` as if it were the value of `attribute`.
    fn mask_value(&self, attribute: &str, value: Value) -> MaskResult<Masking> {
        self.mask_with(attribute, Some(value))
    }

    /// Masks an explicit value, or the current one when `value` is `None`.
    fn mask_with(&self, attribute: &str, value: Option<Value>) -> MaskResult<Masking> {
        let registry = Self::mask_registry();
        let record = registry.record(attribute)?;
        let value = match value {
            Some(value) => value,
            None => self
                .attribute(attribute)?
                .ok_or_else(|| MaskError::missing_member(self.type_name(), attribute))?,
        };
        let overrides = evaluate(record, self)?;
        registry.mask(attribute, &value, &overrides)
    }

    /// Instance-level dispatch.
    ///
    /// `mask_<attribute>` names route to [`Maskable::mask_with`], with the
    /// first argument as the value. Any other name falls through to
    /// [`MaskSubject::call_method`]; a name nothing answers to is a
    /// [`MaskError::MissingMember`].
    fn dispatch(&self, name: &str, args: &[Value]) -> MaskResult<Value> {
        if let Some(attribute) = Self::mask_registry().route(name) {
            return Ok(self.mask_with(attribute, args.first().cloned())?.into_value());
        }
        self.call_method(name)?
            .ok_or_else(|| MaskError::missing_member(self.type_name(), name))
    }

    /// Masks every declared attribute, keyed by storage column.
    fn masked_fields(&self) -> MaskResult<FieldMap> {
        Self::mask_registry()
            .store()
            .iter()
            .map(|(attribute, record)| {
                let masked = self.mask(attribute)?;
                Ok((record.column_name().to_string(), masked.into_value()))
            })
            .collect()
    }

    /// Masks `attribute` and writes the result into its virtual attribute.
    ///
    /// This is the only operation that modifies the instance, and it only
    /// touches the virtual attribute's slot.
    fn mask_into_slot(&mut self, attribute: &str) -> MaskResult<Masking> {
        let masking = self.mask(attribute)?;
        let slot = Self::mask_registry().record(attribute)?.virtual_attribute();
        if self.assign(slot, masking.clone().into_value())? {
            Ok(masking)
        } else {
            Err(MaskError::Assign {
                slot: slot.to_string(),
                reason: format!("`{}` has no such slot", self.type_name()),
            })
        }
    }
}

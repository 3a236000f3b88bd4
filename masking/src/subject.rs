//! Reflection over the instances being masked.
//!
//! Settings refer to instance state by name (a method reference, an attribute
//! to read, a slot to write). [`MaskSubject`] is the narrow, object-safe view
//! that makes those lookups possible. It is normally generated with
//! `#[derive(MaskSubject)]`.

use serde_json::Value;

use crate::error::MaskResult;

/// Name-based access to an instance's attributes and zero-argument methods.
pub trait MaskSubject {
    /// Name of the concrete type, used in errors and reports.
    fn type_name(&self) -> &'static str;

    /// Current value of an attribute, or `None` if the type has no such
    /// attribute.
    ///
    /// A value that cannot be represented is an error, never `None`.
    fn attribute(&self, name: &str) -> MaskResult<Option<Value>>;

    /// Calls a zero-argument method, or returns `None` if there is no such
    /// method.
    fn call_method(&self, _name: &str) -> MaskResult<Option<Value>> {
        Ok(None)
    }

    /// Identity key used when persisting masked values.
    fn record_id(&self) -> Option<Value> {
        None
    }

    /// Writes `value` into a storage slot.
    ///
    /// Returns `Ok(false)` when the type has no slot with that name.
    fn assign(&mut self, _slot: &str, _value: Value) -> MaskResult<bool> {
        Ok(false)
    }
}

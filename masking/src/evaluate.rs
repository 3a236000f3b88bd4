//! Per-instance resolution of dynamic settings.
//!
//! Gates and extras may name a method or hold a callable. Resolution happens
//! on every masking call and is never cached: two instances of the same type
//! can resolve the same record differently (a per-row key, a per-row gate).

use serde_json::Value;

use crate::{
    error::{MaskError, MaskResult},
    options::{MaskOptions, MaskRecord},
    setting::Setting,
    subject::MaskSubject,
};

/// Resolves one setting against `subject`.
///
/// A method the subject does not answer to fails with
/// [`MaskError::MissingMember`].
pub fn resolve(setting: &Setting, subject: &dyn MaskSubject) -> MaskResult<Value> {
    match setting {
        Setting::Literal(value) => Ok(value.clone()),
        Setting::Method(name) => subject
            .call_method(name)?
            .ok_or_else(|| MaskError::missing_member(subject.type_name(), name)),
        Setting::Callable(f) => Ok(f(subject)),
    }
}

/// Resolves every dynamic entry of `record` against `subject`.
///
/// The result is a set of call overrides holding only literals, ready to be
/// layered onto the record by the registry.
pub fn evaluate(record: &MaskRecord, subject: &dyn MaskSubject) -> MaskResult<MaskOptions> {
    let mut overrides = MaskOptions::new();
    if !record.gate_if().is_literal() {
        overrides.gate_if = Some(Setting::Literal(resolve(record.gate_if(), subject)?));
    }
    if !record.gate_unless().is_literal() {
        overrides.gate_unless = Some(Setting::Literal(resolve(record.gate_unless(), subject)?));
    }
    for (key, setting) in record.extras() {
        if !setting.is_literal() {
            overrides
                .extras
                .insert(key.clone(), Setting::Literal(resolve(setting, subject)?));
        }
    }
    Ok(overrides)
}

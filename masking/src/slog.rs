//! `slog` support for masked values.
//!
//! Only [`MaskedValue`] implements `slog::Value`. [`crate::Masking`] does not,
//! since an unchanged value is the original data.

use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::masked::MaskedValue;

impl SlogValue for MaskedValue {
    fn serialize(
        &self,
        _record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        match self {
            MaskedValue::Text(text) => serializer.emit_str(key, text),
            MaskedValue::Bytes(bytes) => {
                serializer.emit_arguments(key, &format_args!("<{} bytes>", bytes.len()))
            }
        }
    }
}

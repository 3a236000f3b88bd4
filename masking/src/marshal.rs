//! Marshalers turn attribute values into bytes before masking.
//!
//! Like strategies, marshalers expose named operations. The per-attribute
//! `dump_method` / `load_method` settings select which ones run.

use std::sync::Arc;

use serde_json::Value;

use crate::error::MaskResult;

pub const DEFAULT_DUMP_METHOD: &str = "dump";
pub const DEFAULT_LOAD_METHOD: &str = "load";

/// A codec with named dump and load operations.
pub trait Marshaler: Send + Sync {
    fn name(&self) -> &str;

    /// Operation names this marshaler answers to, for either direction.
    fn operations(&self) -> &[&str] {
        &[DEFAULT_DUMP_METHOD, DEFAULT_LOAD_METHOD]
    }

    fn dump(&self, operation: &str, value: &Value) -> MaskResult<Vec<u8>>;

    fn load(&self, operation: &str, bytes: &[u8]) -> MaskResult<Value>;

    fn provides(&self, operation: &str) -> bool {
        self.operations().iter().any(|name| *name == operation)
    }
}

/// Shared handle to a marshaler, as stored in a configuration record.
pub type MarshalerRef = Arc<dyn Marshaler>;

/// The canonical marshaler: compact JSON.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonMarshaler;

impl Marshaler for JsonMarshaler {
    fn name(&self) -> &str {
        "JsonMarshaler"
    }

    fn dump(&self, _operation: &str, value: &Value) -> MaskResult<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    fn load(&self, _operation: &str, bytes: &[u8]) -> MaskResult<Value> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{JsonMarshaler, Marshaler};
    use crate::error::MaskError;

    #[test]
    fn load_reverses_dump() {
        for value in [
            json!(null),
            json!("123-45-6789"),
            json!(3.5),
            json!({"street": "Main", "no": [1, 2]}),
        ] {
            let bytes = JsonMarshaler.dump("dump", &value).unwrap();
            assert_eq!(JsonMarshaler.load("load", &bytes).unwrap(), value);
        }
    }

    #[test]
    fn load_rejects_garbage() {
        let result = JsonMarshaler.load("load", b"{not json");
        assert!(matches!(result, Err(MaskError::Marshal(_))));
    }

    #[test]
    fn default_operations() {
        assert!(JsonMarshaler.provides("dump"));
        assert!(JsonMarshaler.provides("load"));
        assert!(!JsonMarshaler.provides("serialize"));
    }
}

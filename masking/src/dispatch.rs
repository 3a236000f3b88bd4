//! Routing of `mask_<attribute>` names.
//!
//! Callers that only know a name (scripts, templates, generic tooling) can
//! address masking as `mask_email` instead of `mask("email", ...)`. The router
//! is an explicit registry lookup; a name it does not recognize is reported as
//! a missing member, never swallowed.

use serde_json::Value;

use crate::{
    error::{MaskError, MaskResult},
    masked::Masking,
    options::MaskOptions,
    registry::MaskRegistry,
};

/// Prefix of virtual masking names.
pub const MASK_CALL_PREFIX: &str = "mask_";

/// Extracts `<attribute>` from `mask_<attribute>`.
pub fn parse_virtual_call(name: &str) -> Option<&str> {
    name.strip_prefix(MASK_CALL_PREFIX)
        .filter(|attribute| !attribute.is_empty())
}

impl MaskRegistry {
    /// Attribute routed to by `name`, if it is a maskable `mask_<attribute>`.
    pub fn route<'n>(&self, name: &'n str) -> Option<&'n str> {
        parse_virtual_call(name).filter(|attribute| self.is_maskable(attribute))
    }

    pub fn responds_to(&self, name: &str) -> bool {
        self.route(name).is_some()
    }

    /// Class-level dispatch of a virtual name.
    ///
    /// The first argument is the raw value (`null` when absent). No instance
    /// is involved, so dynamic settings stay unresolved.
    pub fn dispatch(&self, name: &str, args: &[Value]) -> MaskResult<Masking> {
        let attribute = self
            .route(name)
            .ok_or_else(|| MaskError::missing_member(self.type_name(), name))?;
        let value = args.first().cloned().unwrap_or(Value::Null);
        self.mask(attribute, &value, &MaskOptions::new())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::parse_virtual_call;
    use crate::{error::MaskError, options::MaskOptions, registry::MaskRegistry};

    fn registry() -> MaskRegistry {
        let mut registry = MaskRegistry::new("User");
        registry.declare(["email"], &MaskOptions::new()).unwrap();
        registry
    }

    #[test]
    fn parses_virtual_names() {
        assert_eq!(parse_virtual_call("mask_email"), Some("email"));
        assert_eq!(parse_virtual_call("mask_home_address"), Some("home_address"));
        assert_eq!(parse_virtual_call("mask_"), None);
        assert_eq!(parse_virtual_call("email"), None);
        assert_eq!(parse_virtual_call("unmask_email"), None);
    }

    #[test]
    fn virtual_name_matches_canonical_call() {
        let registry = registry();
        let routed = registry.dispatch("mask_email", &[json!("a@b.c")]).unwrap();
        let direct = registry
            .mask("email", &json!("a@b.c"), &MaskOptions::new())
            .unwrap();
        assert_eq!(routed, direct);
        assert!(registry.responds_to("mask_email"));
    }

    #[test]
    fn unknown_names_are_missing_members() {
        let registry = registry();
        assert!(!registry.responds_to("mask_nonexistent"));
        let err = registry
            .dispatch("mask_nonexistent", &[json!("x")])
            .unwrap_err();
        assert!(matches!(
            err,
            MaskError::MissingMember { ref name, .. } if name == "mask_nonexistent"
        ));
        assert!(registry.dispatch("email", &[]).is_err());
    }
}

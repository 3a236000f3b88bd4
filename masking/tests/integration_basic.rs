//! End-to-end tests for the public masking API.
//!
//! These tests exercise the integration of:
//! - `MaskSubject` derive reflection,
//! - registry declaration, inheritance and option layering, and
//! - instance-level masking, gates and name-based dispatch.

use std::{collections::HashMap, sync::OnceLock};

use masking::{
    FnMasker, JsonMarshaler, MaskContext, MaskError, MaskOptions, MaskRegistry, MaskResult,
    MaskSubject, Maskable, MaskedValue, Masking, Setting, TextMaskPolicy, REDACTED,
};
use serde_json::{json, Value};

#[derive(MaskSubject)]
#[mask_subject(methods(opted_out, tenant))]
struct Customer {
    #[mask_subject(id)]
    id: u64,
    name: String,
    ssn: String,
    email: String,
    phone: String,
    marketing: bool,
    #[mask_subject(skip)]
    #[allow(dead_code)]
    password_hash: String,
    #[mask_subject(slot)]
    masker_ssn: Option<String>,
}

impl Customer {
    fn opted_out(&self) -> bool {
        !self.marketing
    }

    fn tenant(&self) -> &'static str {
        "acme"
    }
}

impl Maskable for Customer {
    fn mask_registry() -> &'static MaskRegistry {
        static REGISTRY: OnceLock<MaskRegistry> = OnceLock::new();
        REGISTRY.get_or_init(customer_registry)
    }
}

fn customer_registry() -> MaskRegistry {
    let mut registry = MaskRegistry::new("Customer");
    registry
        .declare(["ssn"], &MaskOptions::new())
        .expect("ssn declaration");
    registry
        .declare(
            ["email"],
            &MaskOptions::new()
                .gate_if(Setting::method("opted_out"))
                .column("email_masked"),
        )
        .expect("email declaration");
    registry
        .declare(
            ["phone"],
            &MaskOptions::new()
                .masker(TextMaskPolicy::keep_last(4))
                .encode(true),
        )
        .expect("phone declaration");
    registry
}

fn customer() -> Customer {
    Customer {
        id: 7,
        name: "Alice".to_string(),
        ssn: "123-45-6789".to_string(),
        email: "alice@example.com".to_string(),
        phone: "55512346789".to_string(),
        marketing: false,
        password_hash: "$argon2id$...".to_string(),
        masker_ssn: None,
    }
}

// ============================================================================
// Instance masking
// ============================================================================

#[test]
fn test_default_strategy_redacts_without_mutation() {
    let customer = customer();
    let masked = customer.mask("ssn").unwrap();
    assert_eq!(masked.into_value(), json!(REDACTED));
    assert_eq!(customer.ssn, "123-45-6789");
    assert_eq!(customer.masker_ssn, None);
}

#[test]
fn test_explicit_value_is_masked_instead_of_current() {
    let masked = customer()
        .mask_value("phone", json!("0000001234"))
        .unwrap();
    // "******1234", base64 encoded
    assert_eq!(masked.into_value(), json!("KioqKioqMTIzNA=="));
}

#[test]
fn test_encode_wraps_masked_output() {
    let masked = customer().mask("phone").unwrap();
    assert_eq!(masked.into_value(), json!("KioqKioqKjY3ODk="));
}

#[test]
fn test_gate_follows_instance_state() {
    let mut customer = customer();
    assert!(customer.mask("email").unwrap().is_masked());

    customer.marketing = true;
    assert_eq!(
        customer.mask("email").unwrap(),
        Masking::Unchanged(json!("alice@example.com"))
    );
}

#[test]
fn test_undeclared_attribute_is_rejected() {
    let err = customer().mask("name").unwrap_err();
    assert!(matches!(
        err,
        MaskError::UnconfiguredAttribute { ref attribute, .. } if attribute == "name"
    ));
}

#[test]
fn test_mask_into_slot_only_touches_virtual_attribute() {
    let mut customer = customer();
    customer.mask_into_slot("ssn").unwrap();
    assert_eq!(customer.masker_ssn.as_deref(), Some(REDACTED));
    assert_eq!(customer.ssn, "123-45-6789");
}

#[test]
fn test_masked_fields_are_keyed_by_column() {
    let fields = customer().masked_fields().unwrap();
    let columns: Vec<&str> = fields.keys().map(String::as_str).collect();
    assert_eq!(columns, ["email_masked", "masker_phone", "masker_ssn"]);
    assert_eq!(fields["masker_ssn"], json!(REDACTED));
}

// ============================================================================
// Derived reflection
// ============================================================================

#[test]
fn test_derive_exposes_fields_methods_and_id() {
    let customer = customer();
    assert_eq!(customer.type_name(), "Customer");
    assert_eq!(customer.attribute("name").unwrap(), Some(json!("Alice")));
    assert_eq!(customer.attribute("password_hash").unwrap(), None);
    assert_eq!(customer.call_method("opted_out").unwrap(), Some(json!(true)));
    assert_eq!(customer.call_method("tenant").unwrap(), Some(json!("acme")));
    assert_eq!(customer.call_method("ssn").unwrap(), None);
    assert_eq!(customer.record_id(), Some(json!(7)));
}

#[test]
fn test_derive_assign_rejects_mistyped_values() {
    let mut customer = customer();
    assert!(customer.assign("masker_ssn", json!("x")).unwrap());
    assert!(!customer.assign("ssn", json!("x")).unwrap());
    let err = customer.assign("masker_ssn", json!(42)).unwrap_err();
    assert!(matches!(err, MaskError::Assign { ref slot, .. } if slot == "masker_ssn"));
}

#[derive(MaskSubject)]
#[mask_subject(methods(exemptions))]
struct Claim {
    ssn: String,
}

impl Claim {
    // JSON objects need string keys, so this cannot be serialized.
    fn exemptions(&self) -> HashMap<(u8, u8), bool> {
        HashMap::from([((1, 2), true)])
    }
}

impl Maskable for Claim {
    fn mask_registry() -> &'static MaskRegistry {
        static REGISTRY: OnceLock<MaskRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let mut registry = MaskRegistry::new("Claim");
            registry
                .declare(
                    ["ssn"],
                    &MaskOptions::new().gate_if(Setting::method("exemptions")),
                )
                .expect("ssn declaration");
            registry
        })
    }
}

#[test]
fn test_unserializable_gate_is_an_error_not_plaintext() {
    let claim = Claim {
        ssn: "123-45-6789".to_string(),
    };
    assert!(claim.call_method("exemptions").is_err());

    let err = claim.mask("ssn").unwrap_err();
    assert!(matches!(err, MaskError::Marshal(_)));
    assert!(claim.masked_fields().is_err());
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn test_virtual_names_route_to_masking() {
    let customer = customer();
    assert_eq!(
        customer.dispatch("mask_ssn", &[]).unwrap(),
        customer.mask("ssn").unwrap().into_value()
    );
    assert_eq!(
        Customer::mask_registry()
            .dispatch("mask_ssn", &[json!("999-99-9999")])
            .unwrap()
            .into_value(),
        json!(REDACTED)
    );
}

#[test]
fn test_non_masking_names_fall_through_to_methods() {
    let customer = customer();
    assert_eq!(customer.dispatch("tenant", &[]).unwrap(), json!("acme"));
    let err = customer.dispatch("mask_name", &[]).unwrap_err();
    assert!(matches!(err, MaskError::MissingMember { ref name, .. } if name == "mask_name"));
}

#[test]
fn test_class_level_dispatch_cannot_resolve_method_gates() {
    let err = Customer::mask_registry()
        .dispatch("mask_email", &[json!("a@b.c")])
        .unwrap_err();
    assert!(matches!(err, MaskError::UnresolvedSetting { ref key, .. } if key == "if"));
}

// ============================================================================
// Inheritance
// ============================================================================

#[derive(MaskSubject)]
#[mask_subject(type_name = "VipCustomer", methods(opted_out))]
struct Vip {
    ssn: String,
    email: String,
    notes: String,
}

impl Vip {
    fn opted_out(&self) -> bool {
        false
    }
}

impl Maskable for Vip {
    fn mask_registry() -> &'static MaskRegistry {
        static REGISTRY: OnceLock<MaskRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let mut registry =
                MaskRegistry::derive_from(Customer::mask_registry(), "VipCustomer");
            registry
                .declare(
                    ["notes"],
                    &MaskOptions::new().masker(TextMaskPolicy::full_with("[vip]")),
                )
                .expect("notes declaration");
            registry
                .declare(
                    ["ssn"],
                    &MaskOptions::new().masker(TextMaskPolicy::mask_first(3)),
                )
                .expect("ssn override");
            registry
        })
    }
}

#[test]
fn test_child_inherits_and_extends_parent_declarations() {
    let vip = Vip {
        ssn: "123-45-6789".to_string(),
        email: "vip@example.com".to_string(),
        notes: "prefers phone".to_string(),
    };

    assert_eq!(vip.mask("ssn").unwrap().into_value(), json!("***-45-6789"));
    assert_eq!(vip.mask("notes").unwrap().into_value(), json!("[vip]"));
    // inherited, with the gate resolved against the child instance
    assert_eq!(
        vip.mask("email").unwrap(),
        Masking::Unchanged(json!("vip@example.com"))
    );

    assert!(!Customer::mask_registry().is_maskable("notes"));
    assert_eq!(customer().mask("ssn").unwrap().into_value(), json!(REDACTED));
}

// ============================================================================
// Strategies, marshaling and extras
// ============================================================================

struct Event {
    payload: Value,
}

impl MaskSubject for Event {
    fn type_name(&self) -> &'static str {
        "Event"
    }

    fn attribute(&self, name: &str) -> MaskResult<Option<Value>> {
        Ok((name == "payload").then(|| self.payload.clone()))
    }
}

impl Maskable for Event {
    fn mask_registry() -> &'static MaskRegistry {
        static REGISTRY: OnceLock<MaskRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let mut registry = MaskRegistry::new("Event");
            registry
                .declare(
                    ["payload"],
                    &MaskOptions::new()
                        .marshal(true)
                        .marshaler(JsonMarshaler)
                        .masker(FnMasker::new(|context: &MaskContext<'_>| {
                            let level = context
                                .option("level")
                                .and_then(Value::as_str)
                                .unwrap_or("?");
                            MaskedValue::from(format!(
                                "{level}:{} bytes",
                                context.value().as_bytes().len()
                            ))
                        }))
                        .extra(
                            "level",
                            Setting::callable(|subject| {
                                match subject.attribute("payload") {
                                    Ok(Some(_)) => json!("debug"),
                                    _ => Value::Null,
                                }
                            }),
                        ),
                )
                .expect("payload declaration");
            registry
        })
    }
}

#[test]
fn test_marshaled_payload_and_dynamic_extras_reach_the_strategy() {
    let event = Event {
        payload: json!({"user": "alice"}),
    };
    // {"user":"alice"} is 16 bytes of JSON
    assert_eq!(
        event.mask("payload").unwrap().into_value(),
        json!("debug:16 bytes")
    );

    let registry = Event::mask_registry();
    let bytes = serde_json::to_vec(&event.payload).unwrap();
    assert_eq!(registry.load("payload", &bytes).unwrap(), event.payload);
}

#[test]
fn test_unknown_strategy_operation_is_rejected_at_declaration() {
    let mut registry = MaskRegistry::new("Broken");
    let err = registry
        .declare(["ssn"], &MaskOptions::new().mask_method("scramble"))
        .unwrap_err();
    assert!(matches!(
        err,
        MaskError::UnknownOperation { ref operation, .. } if operation == "scramble"
    ));
    assert!(registry.is_empty());
}

#[test]
fn test_per_call_overrides_win() {
    let registry = Customer::mask_registry();
    let masked = registry
        .mask(
            "ssn",
            &json!("123-45-6789"),
            &MaskOptions::new().masker(TextMaskPolicy::keep_last(4)),
        )
        .unwrap();
    assert_eq!(masked.into_value(), json!("*******6789"));
}

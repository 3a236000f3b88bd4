use std::sync::OnceLock;

use masking::{MaskOptions, MaskRegistry, MaskSubject, Maskable, Setting, REDACTED};
use serde_json::json;

#[derive(MaskSubject)]
#[mask_subject(type_name = "Member", methods(is_admin))]
struct User {
    email: String,
    role: String,
    #[mask_subject(skip)]
    token: String,
}

impl User {
    fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

impl Maskable for User {
    fn mask_registry() -> &'static MaskRegistry {
        static REGISTRY: OnceLock<MaskRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let mut registry = MaskRegistry::new("Member");
            registry
                .declare(
                    ["email"],
                    &MaskOptions::new().gate_unless(Setting::method("is_admin")),
                )
                .unwrap();
            registry
        })
    }
}

fn main() {
    let user = User {
        email: "bob@example.com".to_string(),
        role: "member".to_string(),
        token: "t".to_string(),
    };
    assert_eq!(user.token, "t");
    assert_eq!(user.type_name(), "Member");
    assert_eq!(user.dispatch("mask_email", &[]).unwrap(), json!(REDACTED));
}

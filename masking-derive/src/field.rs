//! Parsing of `#[mask_subject(...)]` field attributes.

use proc_macro2::Span;
use syn::{spanned::Spanned, Attribute, Meta, Result};

/// How a field takes part in reflection.
///
/// | Attribute | Role | Readable | Written by `assign` |
/// |-----------|------|----------|---------------------|
/// | None | `Exposed` | yes | no |
/// | `#[mask_subject(skip)]` | `Skip` | no | no |
/// | `#[mask_subject(id)]` | `Id` | yes, and is the record id | no |
/// | `#[mask_subject(slot)]` | `Slot` | yes | yes |
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FieldRole {
    Exposed,
    Skip,
    Id,
    Slot,
}

impl FieldRole {
    pub(crate) fn is_readable(self) -> bool {
        !matches!(self, Self::Skip)
    }
}

fn set_role(target: &mut Option<FieldRole>, next: FieldRole, span: Span) -> Result<()> {
    if target.is_some() {
        return Err(syn::Error::new(
            span,
            "a field takes at most one of `skip`, `id` or `slot`",
        ));
    }
    *target = Some(next);
    Ok(())
}

pub(crate) fn parse_field_role(attrs: &[Attribute]) -> Result<FieldRole> {
    let mut role: Option<FieldRole> = None;
    for attr in attrs {
        if !attr.path().is_ident("mask_subject") {
            continue;
        }

        match &attr.meta {
            Meta::List(list) => {
                list.parse_nested_meta(|meta| {
                    let next = if meta.path.is_ident("skip") {
                        FieldRole::Skip
                    } else if meta.path.is_ident("id") {
                        FieldRole::Id
                    } else if meta.path.is_ident("slot") {
                        FieldRole::Slot
                    } else {
                        return Err(meta.error("expected `skip`, `id` or `slot`"));
                    };
                    set_role(&mut role, next, meta.path.span())
                })?;
            }
            Meta::Path(_) | Meta::NameValue(_) => {
                return Err(syn::Error::new(
                    attr.span(),
                    "expected #[mask_subject(skip)], #[mask_subject(id)] or #[mask_subject(slot)]",
                ));
            }
        }
    }

    Ok(role.unwrap_or(FieldRole::Exposed))
}

#[cfg(test)]
mod tests {
    use quote::quote;
    use syn::DeriveInput;

    use super::*;

    fn parse_attrs(tokens: proc_macro2::TokenStream) -> Vec<Attribute> {
        let input: DeriveInput = syn::parse2(quote! {
            #tokens
            struct Dummy;
        })
        .expect("should parse as DeriveInput");
        input.attrs
    }

    #[test]
    fn no_attribute_is_exposed() {
        let attrs = parse_attrs(quote! {});
        assert_eq!(parse_field_role(&attrs).unwrap(), FieldRole::Exposed);
    }

    #[test]
    fn roles_are_parsed() {
        for (tokens, role) in [
            (quote! { #[mask_subject(skip)] }, FieldRole::Skip),
            (quote! { #[mask_subject(id)] }, FieldRole::Id),
            (quote! { #[mask_subject(slot)] }, FieldRole::Slot),
        ] {
            let attrs = parse_attrs(tokens);
            assert_eq!(parse_field_role(&attrs).unwrap(), role);
        }
    }

    #[test]
    fn skip_is_not_readable() {
        assert!(!FieldRole::Skip.is_readable());
        assert!(FieldRole::Slot.is_readable());
    }

    #[test]
    fn multiple_roles_error() {
        let attrs = parse_attrs(quote! {
            #[mask_subject(id)]
            #[mask_subject(slot)]
        });
        let result = parse_field_role(&attrs);
        assert!(result.unwrap_err().to_string().contains("at most one"));
    }

    #[test]
    fn bare_attribute_errors() {
        let attrs = parse_attrs(quote! { #[mask_subject] });
        assert!(parse_field_role(&attrs).is_err());
    }

    #[test]
    fn unknown_role_errors() {
        let attrs = parse_attrs(quote! { #[mask_subject(secret)] });
        let result = parse_field_role(&attrs);
        assert!(result.unwrap_err().to_string().contains("expected `skip`"));
    }

    #[test]
    fn other_attributes_ignored() {
        let attrs = parse_attrs(quote! {
            #[serde(skip)]
        });
        assert_eq!(parse_field_role(&attrs).unwrap(), FieldRole::Exposed);
    }
}

//! Container-level attribute parsing for `#[derive(MaskSubject)]`.
//!
//! This module handles attributes on the struct itself, not on fields.

use syn::{Attribute, Ident, LitStr, Meta, Result};

/// Options parsed from container-level `#[mask_subject(...)]` attributes.
#[derive(Clone, Debug, Default)]
pub(crate) struct ContainerOptions {
    /// Overrides the reported type name.
    pub(crate) type_name: Option<LitStr>,
    /// Zero-argument methods reachable through `call_method`.
    pub(crate) methods: Vec<Ident>,
}

/// Parses container-level `#[mask_subject(...)]` attributes.
pub(crate) fn parse_container_options(attrs: &[Attribute]) -> Result<ContainerOptions> {
    let mut options = ContainerOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("mask_subject") {
            continue;
        }

        match &attr.meta {
            Meta::Path(_) => {}
            Meta::List(list) => {
                list.parse_nested_meta(|meta| {
                    if meta.path.is_ident("type_name") {
                        if options.type_name.is_some() {
                            return Err(meta.error("duplicate `type_name` option"));
                        }
                        options.type_name = Some(meta.value()?.parse()?);
                        Ok(())
                    } else if meta.path.is_ident("methods") {
                        meta.parse_nested_meta(|method| {
                            let ident = method
                                .path
                                .get_ident()
                                .ok_or_else(|| method.error("expected a method name"))?;
                            if options.methods.contains(ident) {
                                return Err(method.error(format!("method `{ident}` listed twice")));
                            }
                            options.methods.push(ident.clone());
                            Ok(())
                        })
                    } else {
                        Err(meta.error(format!(
                            "unknown container option `{}`; expected `type_name` or `methods`",
                            meta.path
                                .get_ident()
                                .map_or_else(|| "?".to_string(), ToString::to_string)
                        )))
                    }
                })?;
            }
            Meta::NameValue(nv) => {
                return Err(syn::Error::new_spanned(
                    nv,
                    "name-value syntax is not supported for container-level #[mask_subject]",
                ));
            }
        }
    }

    Ok(options)
}

//! Struct-specific `MaskSubject` derivation.
//!
//! Generates the name-based match arms for reading attributes, calling listed
//! methods, and writing slots, and collects the generics that need bounds.

use proc_macro2::{Ident, TokenStream};
use quote::{quote, quote_spanned};
use syn::{spanned::Spanned, DataStruct, Fields, Result};

use crate::{
    crate_root,
    field::{parse_field_role, FieldRole},
    generics::collect_generics_from_type,
};

pub(crate) struct StructDeriveOutput {
    pub(crate) attribute_arms: Vec<TokenStream>,
    pub(crate) assign_arms: Vec<TokenStream>,
    pub(crate) record_id: Option<TokenStream>,
    pub(crate) readable_generics: Vec<Ident>,
    pub(crate) slot_generics: Vec<Ident>,
}

pub(crate) fn derive_struct(
    name: &Ident,
    data: &DataStruct,
    generics: &syn::Generics,
) -> Result<StructDeriveOutput> {
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new(
            data.struct_token.span(),
            format!("`MaskSubject` on `{name}` requires named fields"),
        ));
    };

    let root = crate_root();
    let json = quote! { #root::__private::serde_json };
    let mut output = StructDeriveOutput {
        attribute_arms: Vec::new(),
        assign_arms: Vec::new(),
        record_id: None,
        readable_generics: Vec::new(),
        slot_generics: Vec::new(),
    };

    for field in &fields.named {
        let span = field.span();
        let role = parse_field_role(&field.attrs)?;
        let Some(ident) = &field.ident else {
            continue;
        };
        let key = ident.to_string();
        let ty = &field.ty;

        if role.is_readable() {
            collect_generics_from_type(ty, generics, &mut output.readable_generics);
            output.attribute_arms.push(quote_spanned! { span =>
                #key => #json::to_value(&self.#ident)
                    .map(::core::option::Option::Some)
                    .map_err(#root::MaskError::from),
            });
        }

        match role {
            FieldRole::Id => {
                if output.record_id.is_some() {
                    return Err(syn::Error::new(
                        span,
                        "only one field may be marked #[mask_subject(id)]",
                    ));
                }
                output.record_id = Some(quote_spanned! { span =>
                    #json::to_value(&self.#ident).ok()
                });
            }
            FieldRole::Slot => {
                collect_generics_from_type(ty, generics, &mut output.slot_generics);
                output.assign_arms.push(quote_spanned! { span =>
                    #key => {
                        self.#ident = #json::from_value(value).map_err(|err| {
                            #root::MaskError::Assign {
                                slot: ::std::string::ToString::to_string(slot),
                                reason: ::std::string::ToString::to_string(&err),
                            }
                        })?;
                        ::core::result::Result::Ok(true)
                    }
                });
            }
            FieldRole::Exposed | FieldRole::Skip => {}
        }
    }

    Ok(output)
}

//! Derive macros for `masking`.
//!
//! This crate generates the reflection behind `#[derive(MaskSubject)]`. It:
//! - reads `#[mask_subject(...)]` container and field attributes
//! - emits a `MaskSubject` implementation with name-based attribute reads,
//!   method calls, record identity and slot writes
//!
//! It does **not** declare maskable attributes or run strategies. Those live in
//! the main `masking` crate.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

#[allow(unused_extern_crates)]
extern crate proc_macro;

use proc_macro2::TokenStream;
use proc_macro_crate::{crate_name, FoundCrate};
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, Result};

mod container;
mod derive_struct;
mod field;
mod generics;
use container::{parse_container_options, ContainerOptions};
use derive_struct::{derive_struct, StructDeriveOutput};
use generics::{add_deserialize_bounds, add_serialize_bounds};

/// Derives `masking::MaskSubject` for structs with named fields.
///
/// # Container Attributes
///
/// - `#[mask_subject(type_name = "Name")]` - Reports `Name` instead of the
///   struct's identifier.
/// - `#[mask_subject(methods(a, b))]` - Makes the zero-argument methods `a` and
///   `b` reachable through `call_method`, so `if` / `unless` gates and extras can
///   refer to them. Their return types must implement `Serialize`.
///
/// # Field Attributes
///
/// - **No annotation**: the field is readable through `attribute`.
/// - `#[mask_subject(skip)]`: the field is invisible to reflection.
/// - `#[mask_subject(id)]`: the field is readable and is the record id used by
///   the bulk runner. At most one field may carry it.
/// - `#[mask_subject(slot)]`: the field is readable and writable through
///   `assign`. Use it for virtual attributes such as `masker_ssn`.
///
/// Readable fields must implement `Serialize`; slot fields must also implement
/// `DeserializeOwned`. Enums, unions, tuple structs and unit structs are
/// rejected at compile time.
#[proc_macro_derive(MaskSubject, attributes(mask_subject))]
pub fn derive_mask_subject(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Returns the token stream to reference the masking crate root.
///
/// Handles crate renaming (e.g., `my_masking = { package = "masking", ... }`)
/// and internal usage (when derive is used inside the masking crate itself).
pub(crate) fn crate_root() -> TokenStream {
    match crate_name("masking") {
        Ok(FoundCrate::Itself) => quote! { crate },
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            quote! { ::#ident }
        }
        Err(_) => quote! { ::masking },
    }
}

fn expand(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        attrs,
        ..
    } = input;

    let ContainerOptions { type_name, methods } = parse_container_options(&attrs)?;

    let StructDeriveOutput {
        attribute_arms,
        assign_arms,
        record_id,
        readable_generics,
        slot_generics,
    } = match &data {
        Data::Struct(data) => derive_struct(&ident, data, &generics)?,
        Data::Enum(data) => {
            return Err(syn::Error::new(
                data.enum_token.span(),
                "`MaskSubject` cannot be derived for enums",
            ));
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span(),
                "`MaskSubject` cannot be derived for unions",
            ));
        }
    };

    let crate_root = crate_root();
    let json = quote! { #crate_root::__private::serde_json };

    let bounded = add_serialize_bounds(generics, &readable_generics);
    let bounded = add_deserialize_bounds(bounded, &slot_generics);
    let (impl_generics, ty_generics, where_clause) = bounded.split_for_impl();

    let type_name = type_name.map_or_else(
        || {
            let name = ident.to_string();
            quote! { #name }
        },
        |name| quote! { #name },
    );

    let call_method = if methods.is_empty() {
        quote! {}
    } else {
        let keys = methods.iter().map(ToString::to_string);
        quote! {
            fn call_method(
                &self,
                name: &str,
            ) -> #crate_root::MaskResult<::core::option::Option<#json::Value>> {
                match name {
                    #(#keys => #json::to_value(&self.#methods())
                        .map(::core::option::Option::Some)
                        .map_err(#crate_root::MaskError::from),)*
                    _ => ::core::result::Result::Ok(::core::option::Option::None),
                }
            }
        }
    };

    let record_id = record_id.map_or_else(
        || quote! {},
        |body| {
            quote! {
                fn record_id(&self) -> ::core::option::Option<#json::Value> {
                    #body
                }
            }
        },
    );

    let assign = if assign_arms.is_empty() {
        quote! {}
    } else {
        quote! {
            fn assign(
                &mut self,
                slot: &str,
                value: #json::Value,
            ) -> #crate_root::MaskResult<bool> {
                match slot {
                    #(#assign_arms)*
                    _ => ::core::result::Result::Ok(false),
                }
            }
        }
    };

    Ok(quote! {
        impl #impl_generics #crate_root::MaskSubject for #ident #ty_generics #where_clause {
            fn type_name(&self) -> &'static str {
                #type_name
            }

            fn attribute(
                &self,
                name: &str,
            ) -> #crate_root::MaskResult<::core::option::Option<#json::Value>> {
                match name {
                    #(#attribute_arms)*
                    _ => ::core::result::Result::Ok(::core::option::Option::None),
                }
            }

            #call_method

            #record_id

            #assign
        }
    })
}

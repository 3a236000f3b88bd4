//! Generic type parameter handling and trait bound management.
//!
//! Bounds are added only for generics that appear in readable or slot fields.
//! `PhantomData<T>` is skipped, so marker parameters need no bounds.

use syn::{parse_quote, Ident};

use crate::crate_root;

pub(crate) fn collect_generics_from_type(
    ty: &syn::Type,
    generics: &syn::Generics,
    result: &mut Vec<Ident>,
) {
    match ty {
        syn::Type::Path(path) => {
            let Some(segment) = path.path.segments.last() else {
                return;
            };
            if segment.ident == "PhantomData" {
                return;
            }

            if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                for arg in &args.args {
                    if let syn::GenericArgument::Type(inner_ty) = arg {
                        collect_generics_from_type(inner_ty, generics, result);
                    }
                }
            }

            for param in generics.type_params() {
                if segment.ident == param.ident && !result.iter().any(|g| g == &param.ident) {
                    result.push(param.ident.clone());
                }
            }
        }
        syn::Type::Reference(reference) => {
            collect_generics_from_type(&reference.elem, generics, result);
        }
        syn::Type::Array(array) => collect_generics_from_type(&array.elem, generics, result),
        syn::Type::Slice(slice) => collect_generics_from_type(&slice.elem, generics, result),
        syn::Type::Tuple(tuple) => {
            for elem in &tuple.elems {
                collect_generics_from_type(elem, generics, result);
            }
        }
        _ => {}
    }
}

/// Adds `Serialize` bounds to generic parameters used in readable fields.
pub(crate) fn add_serialize_bounds(
    mut generics: syn::Generics,
    used_generics: &[Ident],
) -> syn::Generics {
    let root = crate_root();
    for param in generics.type_params_mut() {
        if used_generics.iter().any(|g| g == &param.ident) {
            param
                .bounds
                .push(parse_quote!(#root::__private::serde::Serialize));
        }
    }
    generics
}

/// Adds `DeserializeOwned` bounds to generic parameters used in slot fields.
pub(crate) fn add_deserialize_bounds(
    mut generics: syn::Generics,
    used_generics: &[Ident],
) -> syn::Generics {
    let root = crate_root();
    for param in generics.type_params_mut() {
        if used_generics.iter().any(|g| g == &param.ident) {
            param
                .bounds
                .push(parse_quote!(#root::__private::serde::de::DeserializeOwned));
        }
    }
    generics
}

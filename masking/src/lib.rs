//! Declarative field masking.
//!
//! A type declares which of its attributes are maskable, and how, once. Masking
//! is then available three ways:
//! - `mask(attribute)` on an instance, through [`Maskable`];
//! - `mask_<attribute>` names, through [`MaskRegistry::dispatch`] and
//!   [`Maskable::dispatch`];
//! - a destructive bulk pass over persisted records, through the `runner`
//!   feature's [`BulkMasker`].
//!
//! Key rules:
//! - Masking an attribute never modifies the instance. Only
//!   [`Maskable::mask_into_slot`] writes, and only to the virtual attribute.
//! - Options are layered: built-in defaults, then the type's defaults, then the
//!   declaration, then per-call overrides.
//! - `if` / `unless` gates and extra options may be dynamic ([`Setting`]) and
//!   are resolved against the instance on every call.
//! - A derived type copies its parent's registry; later changes on either side
//!   are not shared.
//!
//! What this crate does:
//! - keeps a per-type [`MaskRegistry`] of [`MaskRecord`]s
//! - evaluates dynamic options and runs [`Masker`] strategies, optionally through
//!   a [`Marshaler`] and base64 encoding
//! - guards the bulk runner against production environments
//!
//! What it does not do:
//! - connect to a database; the runner talks to a [`Repository`] you provide
//! - decide what masked data should look like beyond the built-in strategies
//!
//! The `MaskSubject` derive macro lives in `masking-derive` and is re-exported
//! here.

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
    clippy::missing_panics_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::result_large_err,
    clippy::option_if_let_else,
    clippy::return_self_not_must_use
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

pub use masking_derive::MaskSubject;

#[allow(unused_extern_crates)]
extern crate self as masking;

// Module declarations
mod dispatch;
mod error;
mod evaluate;
mod marshal;
mod maskable;
mod masked;
mod options;
mod registry;
#[cfg(feature = "runner")]
pub mod runner;
mod setting;
#[cfg(feature = "slog")]
mod slog;
mod strategy;
mod subject;

// Re-exports
pub use dispatch::{parse_virtual_call, MASK_CALL_PREFIX};
pub use error::{MaskError, MaskResult, StoreError};
pub use evaluate::{evaluate, resolve};
pub use marshal::{
    JsonMarshaler, Marshaler, MarshalerRef, DEFAULT_DUMP_METHOD, DEFAULT_LOAD_METHOD,
};
pub use maskable::{FieldMap, Maskable};
pub use masked::{MaskedValue, Masking, Prepared};
pub use options::{MaskOptions, MaskRecord, DEFAULT_PREFIX, DEFAULT_SUFFIX};
pub use registry::{MaskRegistry, OptionStore};
#[cfg(feature = "runner")]
pub use runner::{
    BulkMasker, Catalog, Environment, MaskTarget, Persistence, Repository, RunReport,
};
pub use setting::{is_truthy, Callable, Setting};
pub use strategy::{
    FnMasker, KeepConfig, MaskConfig, MaskContext, Masker, MaskerRef, StaticMasker,
    TextMaskPolicy, DEFAULT_MASK_METHOD, MASK_CHAR, REDACTED,
};
pub use subject::MaskSubject;

#[doc(hidden)]
pub mod __private {
    pub use serde;
    pub use serde_json;
}

//! See following macros:
//!
//! - [`Assemble`]
//! - [`AssembleEnum`]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static ASSEMBLE_ATTRIBUTE_NAME: &str = "assemble";

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod enumeration;
mod path;
mod structure;

// -----------------------------------------------------------------------------
// Macros

/// # Structure Derivation
///
/// `#[derive(Assemble)]` declares every named field of a struct as a member
/// and implements:
///
/// - `Structure`, the static descriptor set, built once on first use.
/// - `Assembler`, delegating to `ObjectAssembler`: the struct is written as
///   a nested struct under its name, or as one struct slot of an array.
/// - `MapKey`, with the default record form.
///
/// Members are declared in field order, which is also the order they are
/// written and read in. Every member type must implement `Assembler`.
///
/// ## Field attributes
///
/// ```rust, ignore
/// #[derive(Default, Assemble)]
/// struct Window {
///     // Written as `"window-title"` instead of `"title"`.
///     #[assemble(rename = "window-title")]
///     title: String,
///     // The members of `Geometry` are written directly into `Window`.
///     #[assemble(extend)]
///     geometry: Geometry,
///     // Not declared, neither written nor read.
///     #[assemble(skip)]
///     handle: u64,
/// }
/// ```
///
/// ## Manual descriptors
///
/// `#[assemble(Structure = false)]` only implements `Assembler` and `MapKey`,
/// the `Structure` impl must then be provided by hand.
///
/// ## Generics
///
/// Type parameters are supported and each instantiation gets its own
/// descriptor set. Lifetime parameters are rejected, assembled types are
/// `'static`.
#[proc_macro_derive(Assemble, attributes(assemble))]
pub fn derive_assemble(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    structure::impl_assemble(&ast)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// # Enumeration Derivation
///
/// `#[derive(AssembleEnum)]` maps the unit variants of an enum to symbolic
/// names and implements `Enumeration`, `Assembler` and `MapKey`.
///
/// The enum must implement `Clone` and `PartialEq`; an enumerator field
/// additionally needs `Default` to be read.
///
/// ```rust, ignore
/// #[derive(Default, Clone, PartialEq, AssembleEnum)]
/// enum Filter {
///     #[default]
///     Nearest,
///     #[assemble(rename = "bilinear")]
///     Linear,
/// }
/// ```
///
/// Variants carrying data and generic enums are rejected.
#[proc_macro_derive(AssembleEnum, attributes(assemble))]
pub fn derive_assemble_enum(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    enumeration::impl_assemble_enum(&ast)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

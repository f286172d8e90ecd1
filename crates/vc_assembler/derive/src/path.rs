//! This independent module is used to provide the required paths,
//! so as to minimize changes when the `vc_assembler` structure is modified.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the correct access path to the `vc_assembler` crate.
///
/// 1. For crates that depend on `vc_assembler`, `::vc_assembler` is returned.
/// 2. For crates that depend on `vc_assembly`, `::vc_assembly::assembler` is returned.
/// 3. For other situations, `::vc_assembler` is returned, but this may be incorrect.
///
/// The cost of this function is relatively high (reading the manifest, taking a lock),
/// so the path is obtained once per derive and passed around.
pub(crate) fn vc_assembler() -> syn::Path {
    vc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("vc_assembler"))
}

// -----------------------------------------------------------------------------
// Items

#[inline(always)]
pub(crate) fn assembler_(path: &syn::Path) -> TokenStream {
    quote! { #path::assembler::Assembler }
}

#[inline(always)]
pub(crate) fn map_key_(path: &syn::Path) -> TokenStream {
    quote! { #path::assembler::MapKey }
}

#[inline(always)]
pub(crate) fn structure_(path: &syn::Path) -> TokenStream {
    quote! { #path::assembler::Structure }
}

#[inline(always)]
pub(crate) fn object_assembler_(path: &syn::Path) -> TokenStream {
    quote! { #path::assembler::ObjectAssembler }
}

#[inline(always)]
pub(crate) fn descriptors_(path: &syn::Path) -> TokenStream {
    quote! { #path::assembler::Descriptors }
}

#[inline(always)]
pub(crate) fn descriptor_cell_(path: &syn::Path) -> TokenStream {
    quote! { #path::assembler::DescriptorCell }
}

#[inline(always)]
pub(crate) fn generic_descriptor_cell_(path: &syn::Path) -> TokenStream {
    quote! { #path::assembler::GenericDescriptorCell }
}

#[inline(always)]
pub(crate) fn field_id_(path: &syn::Path) -> TokenStream {
    quote! { #path::member::FieldId }
}

#[inline(always)]
pub(crate) fn enumeration_(path: &syn::Path) -> TokenStream {
    quote! { #path::enumeration }
}

#[inline(always)]
pub(crate) fn struct_serializer_(path: &syn::Path) -> TokenStream {
    quote! { #path::ser::StructSerializer }
}

#[inline(always)]
pub(crate) fn array_serializer_(path: &syn::Path) -> TokenStream {
    quote! { #path::ser::ArraySerializer }
}

#[inline(always)]
pub(crate) fn struct_deserializer_(path: &syn::Path) -> TokenStream {
    quote! { #path::de::StructDeserializer }
}

#[inline(always)]
pub(crate) fn array_deserializer_(path: &syn::Path) -> TokenStream {
    quote! { #path::de::ArrayDeserializer }
}

#[inline(always)]
pub(crate) fn graph_(path: &syn::Path) -> TokenStream {
    quote! { #path::graph::Graph }
}

#[inline(always)]
pub(crate) fn assemble_error_(path: &syn::Path) -> TokenStream {
    quote! { #path::error::AssembleError }
}

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr};

use crate::attributes::VariantAttributes;
use crate::path;

/// `#[derive(AssembleEnum)]`
pub(crate) fn impl_assemble_enum(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Enum(data) = &ast.data else {
        return Err(syn::Error::new(
            ast.ident.span(),
            "`AssembleEnum` can only be derived for fieldless enums, use `Assemble` for structs",
        ));
    };
    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &ast.generics,
            "`AssembleEnum` does not support generic enums",
        ));
    }
    if data.variants.is_empty() {
        return Err(syn::Error::new(
            ast.ident.span(),
            "`AssembleEnum` requires at least one variant",
        ));
    }

    let ident = &ast.ident;
    let mut entries = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                &variant.fields,
                "`AssembleEnum` variants cannot carry fields",
            ));
        }
        let attrs = VariantAttributes::parse_attrs(&variant.attrs)?;
        let variant_ident = &variant.ident;
        let name = attrs
            .rename
            .unwrap_or_else(|| LitStr::new(&variant_ident.to_string(), variant_ident.span()));
        entries.push(quote! {
            .value(#name, #ident::#variant_ident)
        });
    }

    let vc_assembler_path = path::vc_assembler();
    let assembler_ = path::assembler_(&vc_assembler_path);
    let map_key_ = path::map_key_(&vc_assembler_path);
    let enumeration_ = path::enumeration_(&vc_assembler_path);
    let descriptor_cell_ = path::descriptor_cell_(&vc_assembler_path);
    let struct_serializer_ = path::struct_serializer_(&vc_assembler_path);
    let array_serializer_ = path::array_serializer_(&vc_assembler_path);
    let struct_deserializer_ = path::struct_deserializer_(&vc_assembler_path);
    let array_deserializer_ = path::array_deserializer_(&vc_assembler_path);
    let graph_ = path::graph_(&vc_assembler_path);
    let assemble_error_ = path::assemble_error_(&vc_assembler_path);

    let type_name = LitStr::new(&ident.to_string(), ident.span());

    Ok(quote! {
        impl #enumeration_::Enumeration for #ident {
            fn table() -> ::core::result::Result<
                &'static #enumeration_::EnumTable<Self>,
                #assemble_error_,
            > {
                static CELL: #descriptor_cell_<#enumeration_::EnumTable<#ident>> =
                    #descriptor_cell_::new();
                CELL.get_or_build(|| {
                    #enumeration_::EnumTable::<Self>::builder()
                        #(#entries)*
                        .build()
                })
            }

            #[inline]
            fn type_name() -> &'static str {
                #type_name
            }
        }

        impl #assembler_ for #ident {
            #[inline]
            fn serialize_named(
                &self,
                sink: &mut dyn #struct_serializer_,
                name: &str,
            ) -> ::core::result::Result<(), #assemble_error_> {
                #enumeration_::serialize_named(self, sink, name)
            }

            #[inline]
            fn serialize_positional(
                &self,
                sink: &mut dyn #array_serializer_,
            ) -> ::core::result::Result<(), #assemble_error_> {
                #enumeration_::serialize_positional(self, sink)
            }

            #[inline]
            fn deserialize_named(
                &mut self,
                source: &mut dyn #struct_deserializer_,
                name: &str,
            ) -> ::core::result::Result<(), #assemble_error_> {
                #enumeration_::deserialize_named(self, source, name)
            }

            #[inline]
            fn deserialize_positional(
                &mut self,
                source: &mut dyn #array_deserializer_,
            ) -> ::core::result::Result<(), #assemble_error_> {
                #enumeration_::deserialize_positional(self, source)
            }

            #[inline]
            fn graph(
                graph: &mut #graph_,
                node: &str,
            ) -> ::core::result::Result<(), #assemble_error_> {
                #enumeration_::graph::<Self>(graph, node)
            }
        }

        impl #map_key_ for #ident {}
    })
}

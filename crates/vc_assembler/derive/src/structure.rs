use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, GenericParam, Ident, LitStr, Type, WhereClause};

use crate::attributes::{FieldAttributes, TypeAttributes};
use crate::path;

/// One declared field.
struct ActiveField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    name: LitStr,
    extend: bool,
}

fn collect_fields(ast: &DeriveInput) -> syn::Result<Vec<ActiveField<'_>>> {
    let fields = match &ast.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unnamed(_) | Fields::Unit => {
                return Err(syn::Error::new(
                    ast.ident.span(),
                    "`Assemble` requires a struct with named fields",
                ));
            }
        },
        Data::Enum(_) => {
            return Err(syn::Error::new(
                ast.ident.span(),
                "`Assemble` cannot be derived for enums, use `AssembleEnum` for fieldless enums",
            ));
        }
        Data::Union(_) => {
            return Err(syn::Error::new(
                ast.ident.span(),
                "`Assemble` cannot be derived for unions",
            ));
        }
    };

    let mut active = Vec::with_capacity(fields.len());
    for field in fields {
        let attrs = FieldAttributes::parse_attrs(&field.attrs)?;
        if attrs.skip.is_some() {
            continue;
        }
        // Named fields always carry an ident.
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let name = attrs.rename.unwrap_or_else(|| {
            let text = ident.to_string();
            let text = text.strip_prefix("r#").unwrap_or(&text);
            LitStr::new(text, ident.span())
        });
        active.push(ActiveField {
            ident,
            ty: &field.ty,
            name,
            extend: attrs.extend.is_some(),
        });
    }
    Ok(active)
}

fn reject_lifetimes(ast: &DeriveInput) -> syn::Result<()> {
    for param in &ast.generics.params {
        if let GenericParam::Lifetime(lifetime) = param {
            return Err(syn::Error::new(
                lifetime.span(),
                "assembled types must be `'static`, lifetime parameters are not supported",
            ));
        }
    }
    Ok(())
}

/// `#[derive(Assemble)]`
pub(crate) fn impl_assemble(ast: &DeriveInput) -> syn::Result<TokenStream> {
    reject_lifetimes(ast)?;
    let attrs = TypeAttributes::parse_attrs(&ast.attrs)?;
    let fields = collect_fields(ast)?;

    let vc_assembler_path = path::vc_assembler();

    let structure_impl = if attrs.impl_structure {
        impl_structure(ast, &fields, &vc_assembler_path)
    } else {
        TokenStream::new()
    };
    let assembler_impl = impl_assembler(ast, &vc_assembler_path);

    Ok(quote! {
        #structure_impl
        #assembler_impl
    })
}

/// Bounds every type parameter with `'static`.
fn static_params(ast: &DeriveInput) -> WhereClause {
    let mut generics = ast.generics.clone();
    let where_clause = generics.make_where_clause();
    for param in &ast.generics.params {
        if let GenericParam::Type(ty) = param {
            let ident = &ty.ident;
            where_clause.predicates.push(syn::parse_quote!(#ident: 'static));
        }
    }
    where_clause.clone()
}

fn impl_structure(
    ast: &DeriveInput,
    fields: &[ActiveField<'_>],
    vc_assembler_path: &syn::Path,
) -> TokenStream {
    let assembler_ = path::assembler_(vc_assembler_path);
    let structure_ = path::structure_(vc_assembler_path);
    let descriptors_ = path::descriptors_(vc_assembler_path);
    let field_id_ = path::field_id_(vc_assembler_path);
    let assemble_error_ = path::assemble_error_(vc_assembler_path);

    let ident = &ast.ident;
    let type_name = LitStr::new(&ident.to_string(), ident.span());
    let (impl_generics, ty_generics, _) = ast.generics.split_for_impl();
    let is_generic = !ast.generics.params.is_empty();

    let mut where_clause = static_params(ast);
    if is_generic {
        // Concrete field types are checked where they are used.
        for field in fields {
            let ty = field.ty;
            where_clause.predicates.push(if field.extend {
                syn::parse_quote!(#ty: #structure_)
            } else {
                syn::parse_quote!(#ty: #assembler_ + 'static)
            });
        }
    }

    let declarations = fields.iter().map(|field| {
        let field_ident = field.ident;
        let name = &field.name;
        let method = if field.extend {
            quote_spanned!(field_ident.span() => extend)
        } else {
            quote_spanned!(field_ident.span() => field)
        };
        quote! {
            .#method(
                #name,
                #field_id_::<Self>::of(
                    ::core::mem::offset_of!(Self, #field_ident),
                    ::core::stringify!(#field_ident),
                    |owner: &Self| &owner.#field_ident,
                ),
                |owner: &Self| &owner.#field_ident,
                |owner: &mut Self| &mut owner.#field_ident,
            )
        }
    });

    let build = quote! {
        || #descriptors_::<Self>::builder()
            #(#declarations)*
            .build()
    };

    let body = if is_generic {
        let generic_descriptor_cell_ = path::generic_descriptor_cell_(vc_assembler_path);
        quote! {
            static CELL: #generic_descriptor_cell_ = #generic_descriptor_cell_::new();
            CELL.get_or_build::<#descriptors_<Self>, _>(#build)
        }
    } else {
        let descriptor_cell_ = path::descriptor_cell_(vc_assembler_path);
        quote! {
            static CELL: #descriptor_cell_<#descriptors_<#ident>> = #descriptor_cell_::new();
            CELL.get_or_build(#build)
        }
    };

    quote! {
        impl #impl_generics #structure_ for #ident #ty_generics #where_clause {
            fn descriptors() -> ::core::result::Result<
                &'static #descriptors_<Self>,
                #assemble_error_,
            > {
                #body
            }

            #[inline]
            fn type_name() -> &'static str {
                #type_name
            }
        }
    }
}

fn impl_assembler(ast: &DeriveInput, vc_assembler_path: &syn::Path) -> TokenStream {
    let assembler_ = path::assembler_(vc_assembler_path);
    let map_key_ = path::map_key_(vc_assembler_path);
    let structure_ = path::structure_(vc_assembler_path);
    let object_assembler_ = path::object_assembler_(vc_assembler_path);
    let struct_serializer_ = path::struct_serializer_(vc_assembler_path);
    let array_serializer_ = path::array_serializer_(vc_assembler_path);
    let struct_deserializer_ = path::struct_deserializer_(vc_assembler_path);
    let array_deserializer_ = path::array_deserializer_(vc_assembler_path);
    let graph_ = path::graph_(vc_assembler_path);
    let assemble_error_ = path::assemble_error_(vc_assembler_path);

    let ident = &ast.ident;
    let (impl_generics, ty_generics, _) = ast.generics.split_for_impl();

    let mut where_clause = static_params(ast);
    if !ast.generics.params.is_empty() {
        // Holds whether `Structure` is derived or written by hand.
        where_clause
            .predicates
            .push(syn::parse_quote!(#ident #ty_generics: #structure_));
    }

    quote! {
        impl #impl_generics #assembler_ for #ident #ty_generics #where_clause {
            #[inline]
            fn serialize_named(
                &self,
                sink: &mut dyn #struct_serializer_,
                name: &str,
            ) -> ::core::result::Result<(), #assemble_error_> {
                #object_assembler_::<Self>::serialize_named(sink, name, self)
            }

            #[inline]
            fn serialize_positional(
                &self,
                sink: &mut dyn #array_serializer_,
            ) -> ::core::result::Result<(), #assemble_error_> {
                #object_assembler_::<Self>::serialize_positional(sink, self)
            }

            #[inline]
            fn deserialize_named(
                &mut self,
                source: &mut dyn #struct_deserializer_,
                name: &str,
            ) -> ::core::result::Result<(), #assemble_error_> {
                #object_assembler_::<Self>::deserialize_named(source, name, self)
            }

            #[inline]
            fn deserialize_positional(
                &mut self,
                source: &mut dyn #array_deserializer_,
            ) -> ::core::result::Result<(), #assemble_error_> {
                #object_assembler_::<Self>::deserialize_positional(source, self)
            }

            #[inline]
            fn graph(
                graph: &mut #graph_,
                node: &str,
            ) -> ::core::result::Result<(), #assemble_error_> {
                #object_assembler_::<Self>::graph_into(graph, node)
            }
        }

        impl #impl_generics #map_key_ for #ident #ty_generics #where_clause {}
    }
}

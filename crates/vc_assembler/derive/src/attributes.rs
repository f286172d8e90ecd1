//! Parsing of `#[assemble(...)]` attributes.
//!
//! Every other attribute (`#[default]`, docs, other derives' helpers) is
//! ignored.

use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, LitBool, LitStr};

use crate::ASSEMBLE_ATTRIBUTE_NAME;

fn parse_assemble_attrs(
    attrs: &[Attribute],
    mut logic: impl FnMut(ParseNestedMeta) -> syn::Result<()>,
) -> syn::Result<()> {
    for attr in attrs {
        if attr.path().is_ident(ASSEMBLE_ATTRIBUTE_NAME) {
            attr.parse_nested_meta(&mut logic)?;
        }
    }
    Ok(())
}

fn parse_rename(meta: &ParseNestedMeta, slot: &mut Option<LitStr>) -> syn::Result<()> {
    if slot.is_some() {
        return Err(meta.error("duplicate `rename`"));
    }
    let name: LitStr = meta.value()?.parse()?;
    if name.value().is_empty() {
        return Err(syn::Error::new(name.span(), "`rename` cannot be empty"));
    }
    *slot = Some(name);
    Ok(())
}

// -----------------------------------------------------------------------------
// Type level

/// Type-level switches.
#[derive(Debug)]
pub(crate) struct TypeAttributes {
    /// Default is `true`, use `#[assemble(Structure = false)]` to disable it.
    /// Then users must implement `Structure` themselves.
    pub impl_structure: bool,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut impl_structure = true;
        parse_assemble_attrs(attrs, |meta| {
            if meta.path.is_ident("Structure") {
                let value: LitBool = meta.value()?.parse()?;
                if value.value() {
                    return Err(syn::Error::new(
                        value.span(),
                        "Explicit `true` is invalid, it's the default value.",
                    ));
                }
                impl_structure = false;
                Ok(())
            } else {
                Err(meta.error("unknown type attribute, expected `Structure = false`"))
            }
        })?;
        Ok(Self { impl_structure })
    }
}

// -----------------------------------------------------------------------------
// Field level

/// Field-level options.
#[derive(Debug, Default)]
pub(crate) struct FieldAttributes {
    /// Serialization name, the field name by default.
    pub rename: Option<LitStr>,
    /// The field is an embedded structure flattened into its owner.
    pub extend: Option<Span>,
    /// The field is not declared at all.
    pub skip: Option<Span>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        parse_assemble_attrs(attrs, |meta| {
            if meta.path.is_ident("rename") {
                parse_rename(&meta, &mut this.rename)
            } else if meta.path.is_ident("extend") {
                this.extend = Some(meta.path.span());
                Ok(())
            } else if meta.path.is_ident("skip") {
                this.skip = Some(meta.path.span());
                Ok(())
            } else {
                Err(meta.error("unknown field attribute, expected `rename`, `extend` or `skip`"))
            }
        })?;

        if let (Some(span), true) = (this.skip, this.rename.is_some() || this.extend.is_some()) {
            return Err(syn::Error::new(
                span,
                "`skip` cannot be combined with other field attributes",
            ));
        }
        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// Variant level

/// Enumerator options.
#[derive(Debug, Default)]
pub(crate) struct VariantAttributes {
    /// Enumerator name, the variant name by default.
    pub rename: Option<LitStr>,
}

impl VariantAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        parse_assemble_attrs(attrs, |meta| {
            if meta.path.is_ident("rename") {
                parse_rename(&meta, &mut this.rename)
            } else {
                Err(meta.error("unknown variant attribute, expected `rename`"))
            }
        })?;
        Ok(this)
    }
}

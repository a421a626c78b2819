//! Attribute parsing for `#[envconfig(...)]` annotations.
//!
//! This module extracts and validates binding attributes from struct fields
//! during macro expansion.

use syn::{Expr, ExprLit, ExprUnary, Field, Lit, UnOp};

/// Parsed `#[envconfig(...)]` attributes from a struct field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Alternate lookup name.
    ///
    /// Replaces the field name in the prefixed key and adds an unprefixed
    /// fallback key.
    pub name: Option<String>,

    /// Default literal, kept as the source text the binder will convert.
    pub default: Option<String>,

    /// Fail binding when the field resolves to nothing.
    pub required: bool,

    /// Leave the field out of the generated field table.
    pub skip: bool,
}

impl FieldAttrs {
    /// Extract and parse `#[envconfig(...)]` attributes from a struct field.
    ///
    /// Attributes other than `envconfig` are ignored; unknown keys inside
    /// `envconfig(...)` are an error.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut attrs = Self::default();

        for attr in &field.attrs {
            if !attr.path().is_ident("envconfig") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                // name = "..."
                if meta.path.is_ident("name") {
                    match meta.value()?.parse::<Lit>()? {
                        Lit::Str(s) => attrs.name = Some(s.value()),
                        other => return Err(syn::Error::new_spanned(other, "name must be a string literal")),
                    }
                    return Ok(());
                }

                // default = "value" | 8080 | -1 | 0.5 | true
                if meta.path.is_ident("default") {
                    let expr: Expr = meta.value()?.parse()?;
                    attrs.default = Some(default_literal(&expr)?);
                    return Ok(());
                }

                // required | required = "true" | required = true
                if meta.path.is_ident("required") {
                    attrs.required = if meta.input.peek(syn::Token![=]) {
                        match meta.value()?.parse::<Lit>()? {
                            Lit::Str(s) => s.value() == "true",
                            Lit::Bool(b) => b.value,
                            other => {
                                return Err(syn::Error::new_spanned(
                                    other,
                                    "required must be a bool or string literal",
                                ))
                            }
                        }
                    } else {
                        true
                    };
                    return Ok(());
                }

                // skip
                if meta.path.is_ident("skip") {
                    attrs.skip = true;
                    return Ok(());
                }

                Err(meta.error("unsupported envconfig attribute"))
            })?;
        }

        Ok(attrs)
    }
}

/// Source text of a default: string contents, or the spelling of a number or bool.
fn default_literal(expr: &Expr) -> syn::Result<String> {
    match expr {
        Expr::Lit(ExprLit { lit, .. }) => match lit {
            Lit::Str(s) => Ok(s.value()),
            Lit::Int(i) => Ok(i.base10_digits().to_string()),
            Lit::Float(f) => Ok(f.base10_digits().to_string()),
            Lit::Bool(b) => Ok(b.value.to_string()),
            other => Err(syn::Error::new_spanned(other, "unsupported default literal")),
        },
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr: inner,
            ..
        }) => match inner.as_ref() {
            Expr::Lit(ExprLit {
                lit: Lit::Int(_) | Lit::Float(_),
                ..
            }) => Ok(format!("-{}", default_literal(inner)?)),
            other => Err(syn::Error::new_spanned(other, "default must be a literal")),
        },
        other => Err(syn::Error::new_spanned(other, "default must be a literal")),
    }
}

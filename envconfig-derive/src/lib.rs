//! Derive macro implementation for envconfig

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Type, Visibility};

mod attrs;

use attrs::FieldAttrs;

/// Type names the binder converts. Anything else gets `Slot::Unsupported`.
const SUPPORTED_TYPES: &[&str] = &[
    "String", "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64", "usize", "bool",
    "f32", "f64", "Duration",
];

/// Whether the last path segment of `ty` names a type the binder converts.
fn is_supported(ty: &Type) -> bool {
    let Type::Path(type_path) = ty else {
        return false;
    };
    if type_path.qself.is_some() {
        return false;
    }
    type_path.path.segments.last().is_some_and(|seg| {
        seg.arguments.is_none() && SUPPORTED_TYPES.iter().any(|name| seg.ident == name)
    })
}

/// `Envconfig` derive macro
///
/// Implements `envconfig::Specification` for a struct with named fields,
/// listing every `pub` field that is not marked `skip`.
///
/// # Supported Attributes
///
/// **Field-level**:
/// - `#[envconfig(name = "ALT")]`: Alternate lookup name, also read unprefixed
/// - `#[envconfig(default = "value")]`: Used when no variable is set
/// - `#[envconfig(required)]`: Fail when no variable is set and there is no default
/// - `#[envconfig(skip)]`: Never bind this field
///
/// # Example
///
/// See the `envconfig` crate documentation for usage examples.
#[proc_macro_derive(Envconfig, attributes(envconfig))]
pub fn derive_envconfig(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Envconfig only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Envconfig only supports structs",
            ));
        }
    };

    let mut entries = Vec::new();
    for field in fields {
        let attrs = FieldAttrs::from_field(field)?;

        // Private fields are not settable from the environment
        if attrs.skip || matches!(field.vis, Visibility::Inherited) {
            continue;
        }
        let Some(ident) = &field.ident else {
            continue;
        };
        let field_type = &field.ty;
        let name = ident.unraw().to_string();

        let alt = match &attrs.name {
            Some(alt) => quote!(::core::option::Option::Some(#alt)),
            None => quote!(::core::option::Option::None),
        };
        let default = match &attrs.default {
            Some(default) => quote!(::core::option::Option::Some(#default)),
            None => quote!(::core::option::Option::None),
        };
        let required = attrs.required;

        let slot = if is_supported(field_type) {
            quote!(::envconfig::Slot::from(&mut self.#ident))
        } else {
            quote!(::envconfig::Slot::Unsupported)
        };

        entries.push(quote! {
            ::envconfig::Field::new(
                ::envconfig::FieldDescriptor {
                    name: #name,
                    type_name: ::core::any::type_name::<#field_type>(),
                    alt: #alt,
                    default: #default,
                    required: #required,
                },
                #slot,
            )
        });
    }

    Ok(quote! {
        impl #impl_generics ::envconfig::Specification for #struct_name #ty_generics #where_clause {
            fn shape(&mut self) -> ::envconfig::Shape<'_> {
                ::envconfig::Shape::Record(::std::vec![#(#entries),*])
            }
        }
    })
}

//! Derive macros that generate refract metadata tables.
//!
//! - `#[derive(Visitable)]` on a struct with named fields produces its
//!   `Reflect` impl and a `Visitable` impl whose `record_meta()` lists every
//!   field in declaration order.
//! - `#[derive(Enumerated)]` on a fieldless enum produces its `Reflect` impl
//!   and an `Enumerated` impl carrying the enumerator table.
//!
//! # Field attributes
//!
//! ```ignore
//! #[derive(Visitable, Default)]
//! struct Child {
//!     child_field: i32,
//!     #[visit(rename = "label")]
//!     name: String,
//!     #[visit(skip)]
//!     cache: Vec<u8>,
//!     #[visit(base)]
//!     base: Base,
//! }
//! ```
//!
//! A `#[visit(base)]` field is not a field of the record: it becomes a base
//! link, and the base's own fields are visited after the record's fields.
//!
//! Every field type must implement `Reflect`. A `Vec<T>` field also needs
//! `T: Default`, since sequences grow with default elements when assigned
//! from a longer document; an enum stored in a `Vec` must derive `Default`.
//!
//! The generated code refers to `::refract`, so these derives are meant to be
//! used through the `refract` facade crate.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input, parse_quote};

/// Derive `Reflect` and `Visitable` for a struct with named fields.
///
/// Field types must implement `Reflect`; `Vec<T>` fields additionally require
/// `T: Default`.
#[proc_macro_derive(Visitable, attributes(visit))]
pub fn derive_visitable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_visitable(input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// Derive `Reflect` and `Enumerated` for a fieldless enum.
///
/// The enum must also implement `Copy` and `PartialEq`.
#[proc_macro_derive(Enumerated)]
pub fn derive_enumerated(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_enumerated(input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

// ============================================================================
// Attribute Parsing
// ============================================================================

#[derive(Default)]
struct FieldOptions {
    base: bool,
    skip: bool,
    rename: Option<String>,
}

fn field_options(field: &syn::Field) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("visit") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("base") {
                options.base = true;
                Ok(())
            } else if meta.path.is_ident("skip") {
                options.skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let name: LitStr = meta.value()?.parse()?;
                options.rename = Some(name.value());
                Ok(())
            } else {
                Err(meta.error("expected `base`, `skip` or `rename = \"...\"`"))
            }
        })?;
    }

    if options.base && (options.skip || options.rename.is_some()) {
        return Err(syn::Error::new_spanned(
            field,
            "`#[visit(base)]` cannot be combined with `skip` or `rename`",
        ));
    }
    Ok(options)
}

// ============================================================================
// Shared Codegen
// ============================================================================

/// `Reflect` impl shared by both derives. `shape` names the matching
/// `TypeDescriptor` and `ReflectRef` variant (`Record` or `Enum`).
fn reflect_impl(input: &DeriveInput, shape: TokenStream2) -> TokenStream2 {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    quote! {
        impl #impl_generics ::refract::Reflect for #name #ty_generics #where_clause {
            fn type_descriptor() -> ::refract::TypeDescriptor {
                ::refract::TypeDescriptor::#shape(::refract::TypeTag::of::<Self>())
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }

            fn reflect_ref(&self) -> ::refract::ReflectRef<'_> {
                ::refract::ReflectRef::#shape(self)
            }

            fn reflect_mut(&mut self) -> ::refract::ReflectMut<'_> {
                ::refract::ReflectMut::#shape(self)
            }
        }
    }
}

// ============================================================================
// Visitable
// ============================================================================

fn expand_visitable(mut input: DeriveInput) -> syn::Result<TokenStream2> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields.named.clone(),
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Visitable can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Visitable can only be derived for structs",
            ));
        }
    };

    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "Visitable types must be 'static; lifetime parameters are not supported",
        ));
    }

    // Every type parameter has to be reflectable for the field accessors.
    let params: Vec<_> = input
        .generics
        .type_params()
        .map(|param| param.ident.clone())
        .collect();
    let where_clause = input.generics.make_where_clause();
    for param in &params {
        where_clause
            .predicates
            .push(parse_quote!(#param: ::refract::Reflect));
    }

    let name = &input.ident;
    let name_str = name.unraw().to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut entries = Vec::new();
    for field in &fields {
        let options = field_options(field)?;
        if options.skip {
            continue;
        }
        let Some(ident) = &field.ident else {
            continue;
        };
        let ty = &field.ty;

        if options.base {
            entries.push(quote! {
                .with_base(::refract::BaseLink {
                    ty: ::refract::TypeTag::of::<#ty>(),
                    upcast: |instance| {
                        instance
                            .downcast_ref::<Self>()
                            .map(|this| &this.#ident as &dyn ::core::any::Any)
                    },
                    upcast_mut: |instance| {
                        instance
                            .downcast_mut::<Self>()
                            .map(|this| &mut this.#ident as &mut dyn ::core::any::Any)
                    },
                })
            });
        } else {
            let field_name = options.rename.unwrap_or_else(|| ident.unraw().to_string());
            entries.push(quote! {
                .with_field(::refract::FieldDescriptor::new::<#ty>(
                    #field_name,
                    |instance| {
                        instance
                            .downcast_ref::<Self>()
                            .map(|this| &this.#ident as &dyn ::refract::Reflect)
                    },
                    |instance| {
                        instance
                            .downcast_mut::<Self>()
                            .map(|this| &mut this.#ident as &mut dyn ::refract::Reflect)
                    },
                ))
            });
        }
    }

    let visitable = quote! {
        impl #impl_generics ::refract::Visitable for #name #ty_generics #where_clause {
            fn record_meta() -> ::refract::RecordMeta {
                ::refract::RecordMeta::new::<Self>(#name_str)
                    #(#entries)*
            }
        }
    };
    let reflect = reflect_impl(&input, quote!(Record));

    Ok(quote! {
        #reflect
        #visitable
    })
}

// ============================================================================
// Enumerated
// ============================================================================

fn expand_enumerated(input: DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Enumerated can only be derived for enums",
        ));
    };

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Enumerated enums cannot be generic",
        ));
    }

    let mut rows = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "Enumerated can only be derived for enums without variant data",
            ));
        }
        let ident = &variant.ident;
        let variant_name = ident.unraw().to_string();
        rows.push(quote! {
            ::refract::Enumerator {
                enumerator: Self::#ident,
                name: #variant_name,
                value: Self::#ident as i64,
            }
        });
    }

    let name = &input.ident;
    let name_str = name.unraw().to_string();
    let reflect = reflect_impl(&input, quote!(Enum));

    Ok(quote! {
        #reflect

        impl ::refract::Enumerated for #name {
            const NAME: &'static str = #name_str;
            const ENUMERATORS: &'static [::refract::Enumerator<Self>] = &[
                #(#rows),*
            ];
        }
    })
}

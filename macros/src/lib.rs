//! Derive macros for the B2B state container
//!
//! This crate provides procedural macros to reduce boilerplate when building
//! action vocabularies and selector outputs.
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates the string tag of every action variant
//! - `#[derive(ShallowEq)]` - Generates field-wise identity comparison
//!
//! # Example
//!
//! ```ignore
//! use b2b_state_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! #[action(prefix = "CART")]
//! enum CartAction {
//!     AddItem { product_id: String, quantity: u32 },
//!     #[action(rename = "CART_RESET")]
//!     Reset,
//! }
//!
//! assert_eq!(CartAction::Reset.action_type(), "CART_RESET");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Index, LitStr};

/// Derive macro for Action enums
///
/// Implements `b2b_state_core::action::Action` with an `action_type()` that
/// returns a `&'static str` tag per variant, and adds an inherent
/// `ACTION_TYPES` constant listing every tag in declaration order.
///
/// Tags are the variant name in `SCREAMING_SNAKE_CASE`, joined to an
/// optional enum-level prefix with `_`.
///
/// # Attributes
///
/// - `#[action(prefix = "CART")]` on the enum - prefix for every tag
/// - `#[action(rename = "TAG")]` on a variant - full tag override
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - An `#[action(..)]` attribute contains an unknown key
/// - Two variants end up with the same tag
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let prefix = match action_attribute(&input.attrs, "prefix") {
        Ok(prefix) => prefix,
        Err(error) => return error.to_compile_error().into(),
    };

    let mut tags: Vec<String> = Vec::new();
    let mut arms = Vec::new();

    for variant in &data_enum.variants {
        let variant_name = &variant.ident;
        let rename = match action_attribute(&variant.attrs, "rename") {
            Ok(rename) => rename,
            Err(error) => return error.to_compile_error().into(),
        };

        let tag = rename.unwrap_or_else(|| {
            let base = screaming_snake_case(&variant_name.to_string());
            match &prefix {
                Some(prefix) => format!("{prefix}_{base}"),
                None => base,
            }
        });

        if tags.contains(&tag) {
            return syn::Error::new_spanned(variant, format!("duplicate action tag `{tag}`"))
                .to_compile_error()
                .into();
        }

        let pattern = match &variant.fields {
            Fields::Named(_) => quote! { Self::#variant_name { .. } },
            Fields::Unnamed(_) => quote! { Self::#variant_name(..) },
            Fields::Unit => quote! { Self::#variant_name },
        };
        arms.push(quote! { #pattern => #tag, });
        tags.push(tag);
    }

    let expanded = quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            /// Every action tag of this enum, in declaration order
            pub const ACTION_TYPES: &'static [&'static str] = &[#(#tags),*];
        }

        impl #impl_generics ::b2b_state_core::action::Action for #name #ty_generics #where_clause {
            fn action_type(&self) -> &'static str {
                match self {
                    #(#arms)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Derive macro for shallow equality
///
/// Implements `b2b_state_core::identity::ShallowEq` by comparing every
/// field with `b2b_state_core::identity::Identical`.
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-struct type
///
/// # Example
///
/// ```ignore
/// #[derive(ShallowEq, Clone, Debug)]
/// struct CheckoutSummary {
///     items: Arc<Vec<B2BCartItem>>,
///     can_checkout: bool,
/// }
/// ```
#[proc_macro_derive(ShallowEq)]
pub fn derive_shallow_eq(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(ShallowEq)] can only be used on structs")
            .to_compile_error()
            .into();
    };

    let comparisons = data_struct.fields.iter().enumerate().map(|(index, field)| {
        let accessor = field.ident.as_ref().map_or_else(
            || {
                let index = Index::from(index);
                quote! { #index }
            },
            |ident| quote! { #ident },
        );
        quote! {
            && ::b2b_state_core::identity::Identical::identical(&self.#accessor, &other.#accessor)
        }
    });

    let expanded = quote! {
        impl #impl_generics ::b2b_state_core::identity::ShallowEq for #name #ty_generics #where_clause {
            fn shallow_eq(&self, other: &Self) -> bool {
                true #(#comparisons)*
            }
        }
    };

    TokenStream::from(expanded)
}

/// Reads `key = "value"` from the `#[action(..)]` attributes in `attrs`.
fn action_attribute(attrs: &[Attribute], key: &str) -> syn::Result<Option<String>> {
    let mut found = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("action")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("prefix") || meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                if meta.path.is_ident(key) {
                    found = Some(value.value());
                }
                Ok(())
            } else {
                Err(meta.error("expected `prefix` or `rename`"))
            }
        })?;
    }
    Ok(found)
}

/// `FetchListSuccess` → `FETCH_LIST_SUCCESS`
fn screaming_snake_case(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                out.push('_');
            }
        }
        out.extend(c.to_uppercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::screaming_snake_case;

    #[test]
    fn converts_variant_names() {
        assert_eq!(screaming_snake_case("AddItem"), "ADD_ITEM");
        assert_eq!(screaming_snake_case("FetchListSuccess"), "FETCH_LIST_SUCCESS");
        assert_eq!(screaming_snake_case("Reset"), "RESET");
        assert_eq!(screaming_snake_case("SetPONumber"), "SET_PO_NUMBER");
    }
}

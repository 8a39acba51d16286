//! Rust implementation of a bundle trait.
//!
//! The generated `{Name}Impl<L>` answers every message method by asking a
//! lookup (any type implementing the configured lookup trait) for the
//! method's key in the bundle's catalog, then converting the result into the
//! declared return type with `From`. The lookup trait is expected to look
//! like this:
//!
//! ```ignore
//! pub trait MessageLookup {
//!     fn message(&self, base_name: &str, key: &str, args: &[&dyn std::fmt::Display]) -> String;
//! }
//! ```

use std::path::PathBuf;

use convert_case::{Case, Casing};
use proc_macro2::{Ident, TokenStream};
use quote::quote;

use crate::core::{CatalogDescriptor, MessageMethodDescriptor, ProcessError, TypeDescriptor};

/// Path of the generated source, relative to the source directory.
///
/// `crate::messages::Greetings` ends up in `messages/greetings_impl.rs`.
pub fn implementation_path(bundle: &TypeDescriptor<MessageMethodDescriptor>) -> PathBuf {
    let mut path: PathBuf = bundle
        .package_name
        .split("::")
        .filter(|segment| !matches!(*segment, "" | "crate" | "self" | "super"))
        .collect();
    path.push(format!("{}_impl.rs", bundle.simple_name.to_case(Case::Snake)));
    path
}

pub fn render_implementation(
    descriptor: &CatalogDescriptor,
    locales: &[&str],
    lookup_trait: &str,
) -> Result<String, ProcessError> {
    let bundle = &descriptor.bundle;
    let struct_name = ident(&format!("{}Impl", bundle.simple_name))?;
    let trait_path: syn::Path = parse(&bundle.qualified_name, "path")?;
    let lookup_path: syn::Path = parse(lookup_trait, "path")?;
    let base_name = &descriptor.base_name;
    let base_path = &descriptor.base_path;

    let methods = implemented_methods(bundle.methods())
        .into_iter()
        .map(render_method)
        .collect::<Result<Vec<_>, _>>()?;

    let tokens = quote! {
        pub struct #struct_name<L> {
            lookup: L,
        }

        impl<L> #struct_name<L> {
            pub const BASE_NAME: &'static str = #base_name;
            pub const BASE_PATH: &'static str = #base_path;
            pub const LOCALES: &'static [&'static str] = &[#(#locales),*];

            pub const fn new(lookup: L) -> Self {
                Self { lookup }
            }
        }

        impl<L: #lookup_path> #trait_path for #struct_name<L> {
            #(#methods)*
        }
    };

    Ok(format!(
        "// @generated by msgbundle from {}. Do not edit.\n\n{}\n",
        bundle.qualified_name, tokens
    ))
}

/// One descriptor per method, in declaration order. Methods with a provided
/// body keep it.
fn implemented_methods(methods: &[MessageMethodDescriptor]) -> Vec<&MessageMethodDescriptor> {
    let mut seen = Vec::new();
    let mut implemented = Vec::new();
    for descriptor in methods {
        let method = descriptor.method();
        if method.has_default || seen.contains(&method.name.as_str()) {
            continue;
        }
        seen.push(method.name.as_str());
        implemented.push(descriptor);
    }
    implemented
}

fn render_method(descriptor: &MessageMethodDescriptor) -> Result<TokenStream, ProcessError> {
    let method = descriptor.method();
    let name = ident(&method.name)?;
    let key = descriptor.key();

    let mut params = Vec::with_capacity(method.parameters.len());
    let mut types = Vec::with_capacity(method.parameters.len());
    for param in &method.parameters {
        let param_name = param.name.to_case(Case::Snake);
        if params.iter().any(|p: &Ident| *p == param_name || *p == format!("r#{param_name}")) {
            return Err(ProcessError::InvalidRust {
                what: "parameter list",
                value: method
                    .parameters
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        params.push(ident(&param_name)?);
        types.push(parse::<syn::Type>(&param.ty.name, "type")?);
    }
    let returns: syn::Type = parse(&method.return_type.name, "type")?;

    Ok(quote! {
        fn #name(&self, #(#params: #types),*) -> #returns {
            let message = self.lookup.message(
                Self::BASE_NAME,
                #key,
                &[#(&#params as &dyn ::core::fmt::Display),*],
            );
            ::core::convert::From::from(message)
        }
    })
}

/// Keywords become raw identifiers (`r#type`).
fn ident(name: &str) -> Result<Ident, ProcessError> {
    syn::parse_str::<Ident>(name)
        .or_else(|_| syn::parse_str::<Ident>(&format!("r#{name}")))
        .map_err(|_| ProcessError::InvalidRust {
            what: "identifier",
            value: name.to_string(),
        })
}

fn parse<T: syn::parse::Parse>(text: &str, what: &'static str) -> Result<T, ProcessError> {
    syn::parse_str(text).map_err(|_| ProcessError::InvalidRust {
        what,
        value: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::MethodDescriptor;
    use crate::model::{MethodElement, TypeElement, TypeKind, TypeRef};

    fn catalog(package: &str, methods: Vec<(MethodElement, &str)>) -> CatalogDescriptor {
        let mut ty = TypeElement::new(package, "Greetings", TypeKind::Trait);
        for (method, _) in &methods {
            ty = ty.method(method.clone());
        }
        let descriptors = methods
            .iter()
            .map(|(method, locale)| {
                MessageMethodDescriptor::new(
                    MethodDescriptor::new(&ty, method, "Message"),
                    method.name.clone(),
                    locale.to_string(),
                    "text".to_string(),
                )
            })
            .collect();
        CatalogDescriptor {
            bundle: TypeDescriptor::new(&ty, "MessageBundle", descriptors),
            base_name: "Greetings".to_string(),
            base_path: "i18n".to_string(),
            required_locales: Vec::new(),
        }
    }

    fn impl_items(code: &str) -> Vec<String> {
        let file = syn::parse_file(code).expect("generated code parses");
        let trait_impl = file
            .items
            .iter()
            .find_map(|item| match item {
                syn::Item::Impl(item) if item.trait_.is_some() => Some(item),
                _ => None,
            })
            .expect("trait impl is generated");
        trait_impl
            .items
            .iter()
            .filter_map(|item| match item {
                syn::ImplItem::Fn(f) => Some(f.sig.ident.to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_implementation_path() {
        let descriptor = catalog("crate::messages::ui", Vec::new());
        assert_eq!(
            implementation_path(&descriptor.bundle),
            PathBuf::from("messages/ui/greetings_impl.rs")
        );

        let descriptor = catalog("", Vec::new());
        assert_eq!(
            implementation_path(&descriptor.bundle),
            PathBuf::from("greetings_impl.rs")
        );
    }

    #[test]
    fn test_render_implementation_parses() {
        let m1 = MethodElement::new("m1", TypeRef::new("String")).param("pZero", TypeRef::new("u32"));
        let descriptor = catalog("crate::messages", vec![(m1.clone(), "en-US"), (m1, "pt-BR")]);

        let code = render_implementation(&descriptor, &["en-US", "pt-BR"], "crate::i18n::MessageLookup")
            .expect("renders");

        assert!(code.starts_with("// @generated by msgbundle from crate::messages::Greetings."));
        assert!(code.contains("GreetingsImpl"));
        assert!(code.contains("p_zero"));
        assert_eq!(impl_items(&code), vec!["m1"]);
    }

    #[test]
    fn test_default_methods_are_not_overridden() {
        let mut provided = MethodElement::new("help", TypeRef::new("String"));
        provided.has_default = true;
        let m1 = MethodElement::new("m1", TypeRef::new("Cow<'static, str>"));
        let descriptor = catalog("crate", vec![(m1, "en-US"), (provided, "en-US")]);

        let code = render_implementation(&descriptor, &["en-US"], "MessageLookup").expect("renders");

        assert_eq!(impl_items(&code), vec!["m1"]);
    }

    #[test]
    fn test_keyword_names_become_raw_identifiers() {
        let method = MethodElement::new("m1", TypeRef::new("String")).param("type", TypeRef::new("String"));
        let descriptor = catalog("crate", vec![(method, "en-US")]);

        let code = render_implementation(&descriptor, &["en-US"], "MessageLookup").expect("renders");

        assert!(code.contains("r#type"));
    }

    #[test]
    fn test_invalid_type_is_rejected() {
        let method = MethodElement::new("m1", TypeRef::new("not a type!"));
        let descriptor = catalog("crate", vec![(method, "en-US")]);

        let err = render_implementation(&descriptor, &["en-US"], "MessageLookup").unwrap_err();

        assert!(matches!(err, ProcessError::InvalidRust { what: "type", .. }));
    }

    #[test]
    fn test_non_identifier_method_name_is_rejected() {
        let method = MethodElement::new("a\u{00B2}", TypeRef::new("String"));
        let descriptor = catalog("crate", vec![(method, "en-US")]);

        let err = render_implementation(&descriptor, &["en-US"], "MessageLookup").unwrap_err();

        assert!(matches!(
            err,
            ProcessError::InvalidRust { what: "identifier", ref value } if value == "a\u{00B2}"
        ));
    }

    #[test]
    fn test_reserved_names_are_rejected() {
        for name in ["self", "crate", "_", "1abc", "a b"] {
            let method = MethodElement::new(name, TypeRef::new("String"));
            let descriptor = catalog("crate", vec![(method, "en-US")]);

            let err = render_implementation(&descriptor, &["en-US"], "MessageLookup").unwrap_err();

            assert!(
                matches!(err, ProcessError::InvalidRust { what: "identifier", .. }),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_colliding_parameter_names_are_rejected() {
        let method = MethodElement::new("m1", TypeRef::new("String"))
            .param("aB", TypeRef::new("String"))
            .param("a_b", TypeRef::new("String"));
        let descriptor = catalog("crate", vec![(method, "en-US")]);

        let err = render_implementation(&descriptor, &["en-US"], "MessageLookup").unwrap_err();

        assert!(matches!(
            err,
            ProcessError::InvalidRust { what: "parameter list", ref value } if value == "aB, a_b"
        ));
    }
}

//! Message bundle handler: the `MessageBundle` / `Message` / `Messages` trio.

use std::path::Path;

use super::{
    Artifact, CatalogDescriptor, ChildAnnotation, Filer, HierarchyHandler, MessageMethodDescriptor,
    MethodDescriptor, ProcessError, ProcessorOptions, ReturnTypeRules, TypeDescriptor,
    generate::generate_bundle,
    validate::{check_placeholder_arity, check_return_type, out_of_range_placeholders},
};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::model::{
    AnnotationDecl, AnnotationValue, AnnotationValues, ElementDecl, TypeElement, TypeKind,
};

pub const DEFAULT_ROOT_ANNOTATION: &str = "MessageBundle";
pub const DEFAULT_MESSAGE_ANNOTATION: &str = "Message";
pub const DEFAULT_CONTAINER_ANNOTATION: &str = "Messages";

pub const DEFAULT_LOCALE: &str = "en-US";
pub const DEFAULT_CATALOG_BASE_PATH: &str = "i18n";
pub const DEFAULT_LOOKUP_TRAIT: &str = "crate::i18n::MessageLookup";

pub const CATALOG_BASE_NAME_OPTION: &str = "catalogBaseName";
pub const CATALOG_BASE_PATH_OPTION: &str = "catalogBasePath";

pub fn default_textual_types() -> Vec<String> {
    ["String", "Box<str>", "Rc<str>", "Arc<str>", "Cow<'static, str>"]
        .map(String::from)
        .to_vec()
}

pub fn default_error_types() -> Vec<String> {
    ["std::error::Error", "core::error::Error"]
        .map(String::from)
        .to_vec()
}

/// Everything the handler needs to know besides the round itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleSettings {
    /// `None` leaves the processor without a root annotation.
    pub root_annotation: Option<String>,
    pub message_annotation: String,
    pub container_annotation: Option<String>,
    pub default_locale: String,
    pub return_types: ReturnTypeRules,
    /// Trait the generated implementation delegates lookups to.
    pub lookup_trait: String,
}

impl Default for BundleSettings {
    fn default() -> Self {
        Self {
            root_annotation: Some(DEFAULT_ROOT_ANNOTATION.to_string()),
            message_annotation: DEFAULT_MESSAGE_ANNOTATION.to_string(),
            container_annotation: Some(DEFAULT_CONTAINER_ANNOTATION.to_string()),
            default_locale: DEFAULT_LOCALE.to_string(),
            return_types: ReturnTypeRules {
                textual: default_textual_types(),
                error_like: default_error_types(),
            },
            lookup_trait: DEFAULT_LOOKUP_TRAIT.to_string(),
        }
    }
}

pub struct MessageBundleHandler {
    settings: BundleSettings,
    root: Option<AnnotationDecl>,
    children: Vec<ChildAnnotation>,
}

impl MessageBundleHandler {
    pub fn new(settings: BundleSettings) -> Self {
        let root = settings.root_annotation.as_ref().map(|name| {
            AnnotationDecl::new(
                name.clone(),
                vec![
                    ElementDecl::with_default("locale", ""),
                    ElementDecl::with_default("baseName", ""),
                    ElementDecl::with_default("base", ""),
                    ElementDecl::with_default("locales", AnnotationValue::Array(Vec::new())),
                ],
            )
        });
        let children = vec![ChildAnnotation {
            annotation: AnnotationDecl::new(
                settings.message_annotation.clone(),
                vec![
                    ElementDecl::with_default("key", ""),
                    ElementDecl::required("value"),
                    ElementDecl::with_default("locale", ""),
                ],
            ),
            container: settings.container_annotation.clone(),
        }];

        Self {
            settings,
            root,
            children,
        }
    }

    /// Locale of a message without an explicit one: the bundle's, then the configured default.
    fn fallback_locale<'a>(&'a self, owner: &'a TypeElement) -> &'a str {
        self.root
            .as_ref()
            .and_then(|root| owner.annotation(&root.name))
            .and_then(|bundle| bundle.values.get("locale"))
            .and_then(AnnotationValue::as_str)
            .filter(|locale| !locale.is_empty())
            .unwrap_or(self.settings.default_locale.as_str())
    }
}

impl Default for MessageBundleHandler {
    fn default() -> Self {
        Self::new(BundleSettings::default())
    }
}

fn string_element<'v>(
    values: &'v AnnotationValues,
    element: &str,
    method: &MethodDescriptor,
) -> Result<&'v str, ProcessError> {
    match values.get(element) {
        Some(AnnotationValue::String(s)) => Ok(s),
        Some(other) => Err(ProcessError::InvalidElementType {
            annotation: method.annotation_name.clone(),
            method: method.name.clone(),
            element: element.to_string(),
            expected: "a string".to_string(),
            found: other.kind().to_string(),
        }),
        None => Err(ProcessError::MissingElement {
            annotation: method.annotation_name.clone(),
            method: method.name.clone(),
            element: element.to_string(),
        }),
    }
}

/// Relative path without parent or root components.
fn is_contained_path(path: &str) -> bool {
    !Path::new(path).has_root()
        && !path.starts_with(['/', '\\'])
        && path.split(['/', '\\']).all(|segment| segment != "..")
}

fn is_valid_base_name(name: &str) -> bool {
    !matches!(name, "." | "..") && !name.contains(['/', '\\'])
}

fn is_valid_locale(locale: &str) -> bool {
    !locale.is_empty()
        && locale
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl HierarchyHandler for MessageBundleHandler {
    type Method = MessageMethodDescriptor;
    type Descriptor = CatalogDescriptor;

    fn root_annotation(&self) -> Option<&AnnotationDecl> {
        self.root.as_ref()
    }

    fn child_annotations(&self) -> &[ChildAnnotation] {
        &self.children
    }

    fn allowed_type_kinds(&self) -> &[TypeKind] {
        &[TypeKind::Trait]
    }

    fn supported_options(&self) -> &[&'static str] {
        &[CATALOG_BASE_NAME_OPTION, CATALOG_BASE_PATH_OPTION]
    }

    fn create_method_descriptor(
        &self,
        method: MethodDescriptor,
        values: &AnnotationValues,
        owner: &TypeElement,
    ) -> Result<MessageMethodDescriptor, ProcessError> {
        let message = string_element(values, "value", &method)?.trim();
        if message.is_empty() {
            return Err(ProcessError::EmptyValue {
                annotation: method.annotation_name.clone(),
                method: method.name.clone(),
                field: "message",
            });
        }

        let key = match string_element(values, "key", &method)?.trim() {
            "" => method.name.as_str(),
            key => key,
        };

        let locale = match string_element(values, "locale", &method)?.trim() {
            "" => self.fallback_locale(owner),
            locale => locale,
        };
        if !is_valid_locale(locale) {
            return Err(ProcessError::InvalidLocale {
                annotation: method.annotation_name.clone(),
                method: method.name.clone(),
                locale: locale.to_string(),
            });
        }

        let (key, locale, message) = (key.to_string(), locale.to_string(), message.to_string());
        Ok(MessageMethodDescriptor::new(method, key, locale, message))
    }

    fn validate_method(
        &self,
        descriptor: &MessageMethodDescriptor,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), ProcessError> {
        let method = descriptor.method();
        check_placeholder_arity(method, descriptor.message())?;
        check_return_type(method, &self.settings.return_types)?;

        let out_of_range = out_of_range_placeholders(descriptor.message(), method.parameter_count());
        if !out_of_range.is_empty() {
            let indices: Vec<String> = out_of_range.iter().map(|i| format!("{{{i}}}")).collect();
            sink.emit(
                Diagnostic::warning(format!(
                    "message for locale '{}' uses {} but '{}' only has {} parameter(s)",
                    descriptor.locale(),
                    indices.join(", "),
                    method.name,
                    method.parameter_count()
                ))
                .at(method.element.clone()),
            );
        }
        Ok(())
    }

    fn create_type_descriptor(
        &self,
        bundle: TypeDescriptor<MessageMethodDescriptor>,
        root: &AnnotationValues,
        options: &ProcessorOptions,
    ) -> Result<CatalogDescriptor, ProcessError> {
        let option = |name: &str| {
            options
                .get(name)
                .map(String::as_str)
                .filter(|value| !value.is_empty())
        };

        let base_name = root
            .non_empty_str("baseName")
            .or_else(|| option(CATALOG_BASE_NAME_OPTION))
            .unwrap_or(bundle.simple_name.as_str())
            .to_string();
        let base_path = root
            .non_empty_str("base")
            .or_else(|| option(CATALOG_BASE_PATH_OPTION))
            .unwrap_or(DEFAULT_CATALOG_BASE_PATH)
            .to_string();
        let required_locales = root.str_array("locales");

        let invalid = |what, value: &str| ProcessError::InvalidCatalogLocation {
            bundle: bundle.qualified_name.clone(),
            what,
            value: value.to_string(),
        };
        if !is_valid_base_name(&base_name) {
            return Err(invalid("base name", &base_name));
        }
        if !is_contained_path(&base_path) {
            return Err(invalid("base path", &base_path));
        }

        Ok(CatalogDescriptor {
            bundle,
            base_name,
            base_path,
            required_locales,
        })
    }

    fn generate(
        &self,
        descriptor: &CatalogDescriptor,
        filer: &mut dyn Filer,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Vec<Artifact>, ProcessError> {
        generate_bundle(descriptor, &self.settings.lookup_trait, filer, sink)
    }
}

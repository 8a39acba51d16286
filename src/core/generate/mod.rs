//! Artifact generation for one message bundle.
//!
//! Catalogs are written first, one per locale, then the implementation.
//! Everything that can be checked without touching the filer is checked
//! before the first write.

mod catalog;
mod implementation;

use std::{collections::BTreeMap, path::PathBuf};

pub use catalog::{read_catalog, render_catalog};
pub use implementation::{implementation_path, render_implementation};

use super::{Artifact, ArtifactKind, CatalogDescriptor, Filer, MessageMethodDescriptor, ProcessError};
use crate::diagnostics::{Diagnostic, DiagnosticSink};

/// Descriptors sharing a locale, in discovery order.
#[derive(Debug)]
pub struct LocaleGroup<'a> {
    pub locale: &'a str,
    pub methods: Vec<&'a MessageMethodDescriptor>,
}

impl<'a> LocaleGroup<'a> {
    pub fn entries(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.methods.iter().copied().map(|m| (m.key(), m.message()))
    }
}

/// Groups are sorted by locale.
pub fn group_by_locale(methods: &[MessageMethodDescriptor]) -> Vec<LocaleGroup<'_>> {
    let mut groups: BTreeMap<&str, Vec<&MessageMethodDescriptor>> = BTreeMap::new();
    for method in methods {
        groups.entry(method.locale()).or_default().push(method);
    }
    groups
        .into_iter()
        .map(|(locale, methods)| LocaleGroup { locale, methods })
        .collect()
}

/// `{base_path}/{base_name}_{locale}.catalog`, relative to the resource directory.
pub fn catalog_path(base_path: &str, base_name: &str, locale: &str) -> PathBuf {
    let file_name = format!("{base_name}_{locale}.catalog");
    match base_path.trim_matches('/') {
        "" => PathBuf::from(file_name),
        dir => PathBuf::from(dir).join(file_name),
    }
}

pub fn check_duplicate_keys(groups: &[LocaleGroup<'_>]) -> Result<(), ProcessError> {
    for group in groups {
        let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
        for method in &group.methods {
            let name = method.method().name.as_str();
            if let Some(first) = seen.insert(method.key(), name) {
                return Err(ProcessError::DuplicateKey {
                    key: method.key().to_string(),
                    locale: group.locale.to_string(),
                    first: first.to_string(),
                    second: name.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Write the catalogs and the implementation of `descriptor`.
pub fn generate_bundle(
    descriptor: &CatalogDescriptor,
    lookup_trait: &str,
    filer: &mut dyn Filer,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<Artifact>, ProcessError> {
    let groups = group_by_locale(descriptor.methods());
    check_duplicate_keys(&groups)?;
    report_missing_locales(descriptor, &groups, sink);
    report_inconsistent_keys(descriptor, sink);

    let locales: Vec<&str> = groups.iter().map(|g| g.locale).collect();
    let implementation = render_implementation(descriptor, &locales, lookup_trait)?;

    let mut artifacts = Vec::with_capacity(groups.len() + 1);
    for group in &groups {
        let relative = catalog_path(&descriptor.base_path, &descriptor.base_name, group.locale);
        let contents = render_catalog(&descriptor.bundle.qualified_name, group.entries());
        let path = filer
            .write(ArtifactKind::Resource, &relative, &contents)
            .map_err(|source| ProcessError::CatalogWrite {
                path: relative.clone(),
                source,
            })?;
        sink.emit(
            Diagnostic::note(format!(
                "catalog for locale '{}' written to '{}'",
                group.locale,
                path.display()
            ))
            .at(descriptor.bundle.target.clone()),
        );
        artifacts.push(Artifact {
            kind: ArtifactKind::Resource,
            path,
        });
    }

    let relative = implementation_path(&descriptor.bundle);
    let path = filer
        .write(ArtifactKind::Source, &relative, &implementation)
        .map_err(|source| ProcessError::ImplementationWrite {
            path: relative.clone(),
            source,
        })?;
    sink.emit(
        Diagnostic::note(format!("implementation written to '{}'", path.display()))
            .at(descriptor.bundle.target.clone()),
    );
    artifacts.push(Artifact {
        kind: ArtifactKind::Source,
        path,
    });

    Ok(artifacts)
}

fn report_missing_locales(
    descriptor: &CatalogDescriptor,
    groups: &[LocaleGroup<'_>],
    sink: &mut dyn DiagnosticSink,
) {
    for locale in &descriptor.required_locales {
        let group = groups.iter().find(|g| g.locale == locale.as_str());
        let mut reported = Vec::new();
        for method in descriptor.methods() {
            let name = method.method().name.as_str();
            let covered = group.is_some_and(|g| g.methods.iter().any(|m| m.method().name == name));
            if covered || reported.contains(&name) {
                continue;
            }
            reported.push(name);
            sink.emit(
                Diagnostic::warning(format!(
                    "method '{name}' has no message for required locale '{locale}'"
                ))
                .at(method.method().element.clone()),
            );
        }
    }
}

/// The implementation looks up the key of the first descriptor of a method.
fn report_inconsistent_keys(descriptor: &CatalogDescriptor, sink: &mut dyn DiagnosticSink) {
    use std::collections::btree_map::Entry;

    let mut first_keys: BTreeMap<&str, &MessageMethodDescriptor> = BTreeMap::new();
    for method in descriptor.methods() {
        let name = method.method().name.as_str();
        let first = match first_keys.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(method);
                continue;
            }
            Entry::Occupied(slot) => *slot.get(),
        };
        if first.key() != method.key() {
            sink.emit(
                Diagnostic::warning(format!(
                    "method '{name}' uses key '{}' for locale '{}' but '{}' for locale '{}'; lookups use '{}'",
                    first.key(),
                    first.locale(),
                    method.key(),
                    method.locale(),
                    first.key()
                ))
                .at(method.method().element.clone()),
            );
        }
    }
}

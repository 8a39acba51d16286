use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};

use super::TypeElement;

/// File name suffix of bundle definition files.
pub const BUNDLE_FILE_SUFFIX: &str = ".bundle.json";

/// Contents of one bundle definition file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct BundleFile {
    #[serde(default)]
    pub types: Vec<TypeElement>,
}

impl BundleFile {
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let mut file: BundleFile = serde_json::from_str(content)
            .with_context(|| format!("Failed to parse bundle file: {}", path.display()))?;
        for ty in &mut file.types {
            ty.source = Some(path.to_path_buf());
        }
        Ok(file)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read bundle file: {}", path.display()))?;
        Self::parse(&content, path)
    }
}

/// JSON Schema of the bundle definition format, pretty printed.
pub fn bundle_file_schema() -> Result<String> {
    serde_json::to_string_pretty(&schema_for!(BundleFile))
        .context("Failed to serialize bundle file schema.")
}

/// All type elements visible to one processing round.
#[derive(Debug, Clone, Default)]
pub struct RoundEnvironment {
    types: Vec<TypeElement>,
}

impl RoundEnvironment {
    pub fn new(types: Vec<TypeElement>) -> Self {
        Self { types }
    }

    /// Load every bundle file into a single round, keeping file order.
    pub fn load(paths: &[PathBuf]) -> Result<Self> {
        let mut round = Self::default();
        for path in paths {
            let file = BundleFile::load(path)?;
            round.types.extend(file.types);
        }
        Ok(round)
    }

    pub fn types(&self) -> &[TypeElement] {
        &self.types
    }

    /// Types carrying the root annotation, in discovery order.
    pub fn root_elements<'a>(&'a self, annotation: &'a str) -> impl Iterator<Item = &'a TypeElement> {
        self.types
            .iter()
            .filter(move |ty| ty.is_annotated_with(annotation))
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::model::TypeKind;

    const GREETINGS: &str = r#"{
        "types": [
            {
                "package": "crate::messages",
                "name": "Greetings",
                "kind": "trait",
                "annotations": [{ "name": "MessageBundle" }],
                "methods": [
                    {
                        "name": "m1",
                        "params": [{ "name": "name", "type": { "name": "String" } }],
                        "returns": { "name": "String" },
                        "annotations": [{ "name": "Message", "values": { "value": "worked {0} !" } }]
                    }
                ]
            },
            { "package": "crate::other", "name": "Plain", "kind": "struct" }
        ]
    }"#;

    #[test]
    fn test_load_sets_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("greetings.bundle.json");
        fs::write(&path, GREETINGS).unwrap();

        let round = RoundEnvironment::load(std::slice::from_ref(&path)).unwrap();

        assert_eq!(round.types().len(), 2);
        assert!(round.types().iter().all(|t| t.source.as_ref() == Some(&path)));
    }

    #[test]
    fn test_root_elements() {
        let file = BundleFile::parse(GREETINGS, Path::new("g.bundle.json")).unwrap();
        let round = RoundEnvironment::new(file.types);

        let roots: Vec<_> = round.root_elements("MessageBundle").collect();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].name, "Greetings");
        assert_eq!(roots[0].kind, TypeKind::Trait);
        assert_eq!(round.root_elements("Other").count(), 0);
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = BundleFile::parse("{ not json", Path::new("broken.bundle.json")).unwrap_err();
        assert!(err.to_string().contains("broken.bundle.json"));
    }

    #[test]
    fn test_schema_mentions_types() {
        let schema = bundle_file_schema().unwrap();
        assert!(schema.contains("\"types\""));
        assert!(schema.contains("TypeElement"));
    }
}

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{
    BundleSettings, ReturnTypeRules,
    bundle::{
        DEFAULT_CONTAINER_ANNOTATION, DEFAULT_LOCALE, DEFAULT_LOOKUP_TRAIT,
        DEFAULT_MESSAGE_ANNOTATION, DEFAULT_ROOT_ANNOTATION, default_error_types,
        default_textual_types,
    },
};

pub const CONFIG_FILE_NAME: &str = ".msgbundlerc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_resource_dir")]
    pub resource_dir: String,
    #[serde(default = "default_source_dir")]
    pub source_dir: String,
    #[serde(default = "default_locale")]
    pub default_locale: String,
    #[serde(default = "default_process_all_types")]
    pub process_all_types: bool,
    #[serde(default = "default_textual_types")]
    pub textual_types: Vec<String>,
    #[serde(default = "default_error_types")]
    pub error_types: Vec<String>,
    #[serde(default = "default_lookup_trait")]
    pub lookup_trait: String,
    #[serde(default)]
    pub annotations: AnnotationNames,
    /// Processor options, overridden by `-O key=value`.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

/// Names the annotations are written with in bundle files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationNames {
    /// `null` leaves the processor without a root annotation.
    #[serde(default = "default_root_annotation")]
    pub root: Option<String>,
    #[serde(default = "default_message_annotation")]
    pub message: String,
    #[serde(default = "default_container_annotation")]
    pub container: Option<String>,
}

fn default_includes() -> Vec<String> {
    vec![".".to_string()]
}

fn default_resource_dir() -> String {
    "./generated/resources".to_string()
}

fn default_source_dir() -> String {
    "./generated/src".to_string()
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_process_all_types() -> bool {
    true
}

fn default_lookup_trait() -> String {
    DEFAULT_LOOKUP_TRAIT.to_string()
}

fn default_root_annotation() -> Option<String> {
    Some(DEFAULT_ROOT_ANNOTATION.to_string())
}

fn default_message_annotation() -> String {
    DEFAULT_MESSAGE_ANNOTATION.to_string()
}

fn default_container_annotation() -> Option<String> {
    Some(DEFAULT_CONTAINER_ANNOTATION.to_string())
}

impl Default for AnnotationNames {
    fn default() -> Self {
        Self {
            root: default_root_annotation(),
            message: default_message_annotation(),
            container: default_container_annotation(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            includes: default_includes(),
            ignores: Vec::new(),
            resource_dir: default_resource_dir(),
            source_dir: default_source_dir(),
            default_locale: default_locale(),
            process_all_types: default_process_all_types(),
            textual_types: default_textual_types(),
            error_types: default_error_types(),
            lookup_trait: default_lookup_trait(),
            annotations: AnnotationNames::default(),
            options: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern in `ignores` or `includes` is
    /// invalid, or if the default locale is empty.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Includes without wildcards are literal directories.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        if self.default_locale.trim().is_empty() {
            bail!("'defaultLocale' must not be empty");
        }

        Ok(())
    }

    pub fn bundle_settings(&self) -> BundleSettings {
        BundleSettings {
            root_annotation: self.annotations.root.clone(),
            message_annotation: self.annotations.message.clone(),
            container_annotation: self.annotations.container.clone(),
            default_locale: self.default_locale.trim().to_string(),
            return_types: ReturnTypeRules {
                textual: self.textual_types.clone(),
                error_like: self.error_types.clone(),
            },
            lookup_trait: self.lookup_trait.clone(),
        }
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Directory relative paths of the config are resolved against.
    pub base_dir: PathBuf,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            let base_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start_dir.to_path_buf());
            Ok(ConfigLoadResult {
                config,
                base_dir,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            base_dir: start_dir.to_path_buf(),
            from_file: false,
        }),
    }
}

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use colored::Colorize;

use super::super::args::CommonArgs;
use super::RoundSummary;
use crate::config::{CONFIG_FILE_NAME, Config, load_config};
use crate::core::{
    Filer, HierarchyProcessor, MessageBundleHandler, ProcessorOptions, TypeSelection,
};
use crate::diagnostics::Diagnostics;
use crate::model::{RoundEnvironment, ScanResult, scan_bundle_files};

/// Everything `generate` and `check` need to run one round.
///
/// Built from command line arguments:
/// 1. Loads configuration (CLI args > config file > defaults)
/// 2. Resolves output directories against the config file location
/// 3. Discovers bundle files (explicit paths or configured includes)
pub struct RunContext {
    pub config: Config,
    pub files: Vec<PathBuf>,
    pub options: ProcessorOptions,
    pub resource_dir: PathBuf,
    pub source_dir: PathBuf,
    pub verbose: bool,
}

impl RunContext {
    pub fn new(args: &CommonArgs) -> Result<Self> {
        let verbose = args.verbose;

        let config_result = load_config(Path::new("."))?;
        if verbose && !config_result.from_file {
            eprintln!("Note: No {} found, using default configuration", CONFIG_FILE_NAME);
        }

        let base_dir = config_result.base_dir;
        let mut config = config_result.config;

        // CLI > config file > defaults
        if let Some(ref locale) = args.default_locale {
            config.default_locale = locale.clone();
        }
        if args.single_type {
            config.process_all_types = false;
        }
        config.validate()?;

        let mut options = config.options.clone();
        options.extend(args.options.iter().cloned());

        let resource_dir = args
            .resource_dir
            .clone()
            .unwrap_or_else(|| resolve(&base_dir, &config.resource_dir));
        let source_dir = args
            .source_dir
            .clone()
            .unwrap_or_else(|| resolve(&base_dir, &config.source_dir));

        let scan = discover(args, &config, &base_dir)?;
        if scan.skipped_count > 0 {
            eprintln!(
                "{} {} path(s) skipped due to access errors{}",
                "warning:".bold().yellow(),
                scan.skipped_count,
                if verbose { "" } else { " (use -v for details)" }
            );
        }

        Ok(Self {
            config,
            files: scan.files,
            options,
            resource_dir,
            source_dir,
            verbose,
        })
    }

    pub fn selection(&self) -> TypeSelection {
        if self.config.process_all_types {
            TypeSelection::All
        } else {
            TypeSelection::First
        }
    }

    /// Load the round and run the message bundle processor over it.
    pub fn process(&self, filer: &mut dyn Filer) -> Result<(RoundSummary, Diagnostics)> {
        let round = RoundEnvironment::load(&self.files)?;

        let mut diagnostics = Diagnostics::new();
        let handler = MessageBundleHandler::new(self.config.bundle_settings());
        let mut processor = HierarchyProcessor::new(handler).with_selection(self.selection());
        processor.init(self.options.clone(), &mut diagnostics);

        let outcome = processor.process(&round, filer, &mut diagnostics);

        Ok((RoundSummary::new(self.files.len(), &outcome), diagnostics))
    }
}

fn resolve(base_dir: &Path, configured: &str) -> PathBuf {
    let path = Path::new(configured);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let relative = path.strip_prefix(".").unwrap_or(path);
    base_dir.join(relative)
}

/// Explicit paths bypass the configured includes. Directories are walked,
/// files are taken as they are.
fn discover(args: &CommonArgs, config: &Config, base_dir: &Path) -> Result<ScanResult> {
    if args.paths.is_empty() {
        return Ok(scan_bundle_files(
            base_dir,
            &config.includes,
            &config.ignores,
            args.verbose,
        ));
    }

    let mut files = Vec::new();
    let mut skipped_count = 0;
    for path in &args.paths {
        if path.is_dir() {
            let scan = scan_bundle_files(path, &[], &config.ignores, args.verbose);
            files.extend(scan.files);
            skipped_count += scan.skipped_count;
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            bail!("Path not found: {}", path.display());
        }
    }
    files.sort();
    files.dedup();

    Ok(ScanResult {
        files,
        skipped_count,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_resolve_relative_to_config_dir() {
        assert_eq!(
            resolve(Path::new("/project"), "./generated/resources"),
            PathBuf::from("/project/generated/resources")
        );
        assert_eq!(
            resolve(Path::new("/project"), "out"),
            PathBuf::from("/project/out")
        );
        assert_eq!(
            resolve(Path::new("/project"), "/tmp/out"),
            PathBuf::from("/tmp/out")
        );
    }
}

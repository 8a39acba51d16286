use std::path::{Path, PathBuf};

use colored::Colorize;
use glob::{Pattern, glob};
use walkdir::WalkDir;

use super::BUNDLE_FILE_SUFFIX;

fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning for bundle files.
pub struct ScanResult {
    /// Bundle files, sorted for a reproducible round.
    pub files: Vec<PathBuf>,
    pub skipped_count: usize,
}

/// Ignore patterns: literal entries are path prefixes, the rest are globs
/// matched against the path relative to the base directory. Invalid globs
/// were already rejected by config validation and are dropped here.
struct Ignores<'a> {
    base_dir: &'a Path,
    prefixes: Vec<PathBuf>,
    globs: Vec<Pattern>,
}

impl<'a> Ignores<'a> {
    fn new(base_dir: &'a Path, patterns: &[String]) -> Self {
        let (globs, literals): (Vec<&String>, Vec<&String>) =
            patterns.iter().partition(|p| is_glob_pattern(p));
        Self {
            base_dir,
            prefixes: literals.into_iter().map(|p| base_dir.join(p)).collect(),
            globs: globs.into_iter().filter_map(|p| Pattern::new(p).ok()).collect(),
        }
    }

    fn matches(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(self.base_dir).unwrap_or(path);
        self.prefixes.iter().any(|prefix| path.starts_with(prefix))
            || self.globs.iter().any(|g| g.matches_path(relative))
    }
}

/// Directories or files named by `includes`, or the base directory itself.
fn include_roots(base_dir: &Path, includes: &[String], verbose: bool) -> Vec<PathBuf> {
    if includes.is_empty() {
        return vec![base_dir.to_path_buf()];
    }

    let mut roots = Vec::new();
    for include in includes {
        let path = base_dir.join(include);
        if is_glob_pattern(include) {
            if let Ok(entries) = glob(&path.to_string_lossy()) {
                roots.extend(entries.flatten());
            }
        } else if path.exists() {
            roots.push(path);
        } else if verbose {
            eprintln!(
                "{} Include path does not exist: {}",
                "warning:".bold().yellow(),
                path.display()
            );
        }
    }
    roots
}

pub fn scan_bundle_files(
    base_dir: &Path,
    includes: &[String],
    ignore_patterns: &[String],
    verbose: bool,
) -> ScanResult {
    let ignores = Ignores::new(base_dir, ignore_patterns);
    let mut files = Vec::new();
    let mut skipped_count = 0;

    for root in include_roots(base_dir, includes, verbose) {
        // Ignored directories are pruned, not descended into.
        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry| !ignores.matches(entry.path()));
        for entry in walker {
            match entry {
                Ok(entry) if entry.path().is_file() && is_bundle_file(entry.path()) => {
                    files.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => {
                    skipped_count += 1;
                    if verbose {
                        eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                    }
                }
            }
        }
    }

    files.sort();
    files.dedup();

    ScanResult {
        files,
        skipped_count,
    }
}

fn is_bundle_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(BUNDLE_FILE_SUFFIX))
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_scan_bundle_files() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        File::create(dir_path.join("greetings.bundle.json")).unwrap();
        File::create(dir_path.join("config.json")).unwrap();
        File::create(dir_path.join("notes.txt")).unwrap();

        let result = scan_bundle_files(dir_path, &[], &[], false);

        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].ends_with("greetings.bundle.json"));
        assert_eq!(result.skipped_count, 0);
    }

    #[test]
    fn test_scan_respects_includes_and_ignores() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        fs::create_dir_all(dir_path.join("bundles/vendor")).unwrap();
        fs::create_dir_all(dir_path.join("other")).unwrap();
        File::create(dir_path.join("bundles/a.bundle.json")).unwrap();
        File::create(dir_path.join("bundles/vendor/b.bundle.json")).unwrap();
        File::create(dir_path.join("other/c.bundle.json")).unwrap();

        let result = scan_bundle_files(
            dir_path,
            &["bundles".to_string()],
            &["bundles/vendor".to_string()],
            false,
        );

        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].ends_with("a.bundle.json"));
    }

    #[test]
    fn test_scan_glob_ignore() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        fs::create_dir_all(dir_path.join("generated")).unwrap();
        File::create(dir_path.join("a.bundle.json")).unwrap();
        File::create(dir_path.join("generated/b.bundle.json")).unwrap();

        let result = scan_bundle_files(dir_path, &[], &["generated/**".to_string()], false);

        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].ends_with("a.bundle.json"));
    }

    #[test]
    fn test_scan_ignored_file_glob() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        File::create(dir_path.join("a.bundle.json")).unwrap();
        File::create(dir_path.join("draft.bundle.json")).unwrap();

        let result = scan_bundle_files(dir_path, &[], &["draft.*".to_string()], false);

        assert_eq!(result.files, vec![dir_path.join("a.bundle.json")]);
    }

    #[test]
    fn test_scan_sorted() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        File::create(dir_path.join("z.bundle.json")).unwrap();
        File::create(dir_path.join("a.bundle.json")).unwrap();

        let result = scan_bundle_files(dir_path, &[], &[], false);

        assert_eq!(result.files.len(), 2);
        assert!(result.files[0].ends_with("a.bundle.json"));
        assert!(result.files[1].ends_with("z.bundle.json"));
    }
}

//! Persistence of generated artifacts.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

/// What an artifact is, which decides where it is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    /// A message catalog.
    Resource,
    /// Generated Rust source.
    Source,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Resource => write!(f, "catalog"),
            ArtifactKind::Source => write!(f, "implementation"),
        }
    }
}

/// An artifact that was written, with the path the filer reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
}

/// Writes artifacts. Each call opens, writes and releases one artifact.
pub trait Filer {
    fn write(&mut self, kind: ArtifactKind, relative: &Path, contents: &str) -> io::Result<PathBuf>;
}

/// Writes catalogs under `resource_dir` and sources under `source_dir`.
#[derive(Debug, Clone)]
pub struct FsFiler {
    resource_dir: PathBuf,
    source_dir: PathBuf,
}

impl FsFiler {
    pub fn new(resource_dir: impl Into<PathBuf>, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            resource_dir: resource_dir.into(),
            source_dir: source_dir.into(),
        }
    }

    fn root(&self, kind: ArtifactKind) -> &Path {
        match kind {
            ArtifactKind::Resource => &self.resource_dir,
            ArtifactKind::Source => &self.source_dir,
        }
    }
}

impl Filer for FsFiler {
    fn write(&mut self, kind: ArtifactKind, relative: &Path, contents: &str) -> io::Result<PathBuf> {
        let path = self.root(kind).join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = File::create(&path)?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;

        Ok(path)
    }
}

/// Keeps artifacts in memory. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryFiler {
    files: BTreeMap<(ArtifactKind, PathBuf), String>,
    failing: BTreeSet<PathBuf>,
}

impl MemoryFiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write to `relative` fail with a permission error.
    pub fn fail_on(mut self, relative: impl Into<PathBuf>) -> Self {
        self.failing.insert(relative.into());
        self
    }

    pub fn get(&self, kind: ArtifactKind, relative: impl AsRef<Path>) -> Option<&str> {
        self.files
            .get(&(kind, relative.as_ref().to_path_buf()))
            .map(String::as_str)
    }

    pub fn paths(&self, kind: ArtifactKind) -> Vec<&Path> {
        self.files
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, path)| path.as_path())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Filer for MemoryFiler {
    fn write(&mut self, kind: ArtifactKind, relative: &Path, contents: &str) -> io::Result<PathBuf> {
        if self.failing.contains(relative) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is not writable", relative.display()),
            ));
        }
        self.files
            .insert((kind, relative.to_path_buf()), contents.to_string());
        Ok(relative.to_path_buf())
    }
}

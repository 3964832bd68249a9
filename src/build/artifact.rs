//! Writing build artifacts.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use parking_lot::Mutex;

/// Sink for build artifacts.
pub trait ArtifactWriter {
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()>;
}

/// Writes to disk, creating parent directories on demand.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsWriter;

impl ArtifactWriter for FsWriter {
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Keeps artifacts in memory.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    files: Mutex<Vec<(PathBuf, Vec<u8>)>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of `path` as text, if written.
    pub fn read(&self, path: &Path) -> Option<String> {
        self.files
            .lock()
            .iter()
            .rev()
            .find(|(p, _)| p == path)
            .map(|(_, bytes)| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.lock().iter().map(|(p, _)| p.clone()).collect()
    }
}

impl ArtifactWriter for MemoryWriter {
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.files.lock().push((path.to_path_buf(), bytes.to_vec()));
        Ok(())
    }
}

/// Paths written by one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifacts {
    pub combined: PathBuf,
    pub combined_map: PathBuf,
    pub minified: Option<PathBuf>,
    pub minified_map: Option<PathBuf>,
}

impl Artifacts {
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        [Some(&self.combined), Some(&self.combined_map)]
            .into_iter()
            .chain([self.minified.as_ref(), self.minified_map.as_ref()])
            .flatten()
            .map(PathBuf::as_path)
    }
}

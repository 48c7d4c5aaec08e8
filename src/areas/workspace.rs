//! Working-tree collaborator.
//!
//! All paths are repository-relative strings with `/` separators; the
//! `.grit` directory itself is never listed.

use crate::artifacts::errors::Result;
use anyhow::Context;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [".grit", ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a working file, `None` when it does not exist.
    pub fn read_file(&self, file_path: &str) -> Result<Option<Bytes>> {
        let file_path = self.path.join(file_path);
        if !file_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read(&file_path)
            .with_context(|| format!("unable to read working file {}", file_path.display()))?;
        Ok(Some(content.into()))
    }

    pub fn write_file(&self, file_path: &str, content: &[u8]) -> Result<()> {
        let file_path = self.path.join(file_path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("unable to create directory {}", parent.display())
            })?;
        }

        std::fs::write(&file_path, content)
            .with_context(|| format!("unable to write working file {}", file_path.display()))?;
        Ok(())
    }

    /// Delete a working file; deleting an absent file is a no-op.
    pub fn delete_file(&self, file_path: &str) -> Result<()> {
        let file_path = self.path.join(file_path);
        if file_path.is_file() {
            std::fs::remove_file(&file_path).with_context(|| {
                format!("unable to delete working file {}", file_path.display())
            })?;
        }
        Ok(())
    }

    pub fn contains(&self, file_path: &str) -> bool {
        self.path.join(file_path).is_file()
    }

    /// Every file in the working tree, sorted by relative path.
    pub fn list_files(&self) -> Result<Vec<String>> {
        let mut files = WalkDir::new(self.path.as_ref())
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.path()))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| self.relative_path(entry.path()))
            .collect::<Vec<_>>();

        files.sort();
        Ok(files)
    }

    fn is_ignored(path: &Path) -> bool {
        path.file_name()
            .map(|name| IGNORED_PATHS.contains(&name.to_string_lossy().as_ref()))
            .unwrap_or(false)
    }

    fn relative_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(self.path.as_ref()).ok()?;
        let rendered = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        (!rendered.is_empty()).then_some(rendered)
    }
}

//! Branch table: named, movable pointers into the commit graph.
//!
//! ## File format
//!
//! - `HEAD` holds `ref: refs/heads/<branch>` naming the current branch.
//! - `refs/heads/<branch>` holds the 40-character tip commit id.
//!
//! The current branch always keys an existing entry; updates take an
//! exclusive file lock for the duration of the write.

use crate::artifacts::errors::{Error, Result};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const SYMREF_PREFIX: &str = "ref: refs/heads/";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository metadata directory (`.grit`).
    path: Box<Path>,
}

impl Refs {
    /// The branch `HEAD` points at.
    pub fn current_branch(&self) -> Result<String> {
        let content = std::fs::read_to_string(self.head_path())
            .context("unable to read HEAD reference")?;

        content
            .trim()
            .strip_prefix(SYMREF_PREFIX)
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("HEAD is not a symbolic reference").into())
    }

    /// Repoint `HEAD` at an existing branch.
    pub fn set_current_branch(&self, name: &str) -> Result<()> {
        if !self.branch_path(name).exists() {
            return Err(Error::NoSuchBranch);
        }
        self.write_ref_file(self.head_path(), &format!("{}{}", SYMREF_PREFIX, name))
    }

    pub fn read_branch(&self, name: &str) -> Result<Option<ObjectId>> {
        let branch_path = self.branch_path(name);
        if !branch_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("unable to read branch file {}", branch_path.display()))?;
        Ok(Some(ObjectId::try_parse(content.trim().to_string())?))
    }

    /// Move an existing branch tip to a new commit.
    pub fn update_branch(&self, name: &str, oid: &ObjectId) -> Result<()> {
        self.write_ref_file(self.branch_path(name), oid.as_ref())
    }

    /// Create a new branch pointing at the given commit.
    pub fn create_branch(&self, name: &str, oid: &ObjectId) -> Result<()> {
        if self.branch_path(name).exists() {
            return Err(Error::BranchExists);
        }
        self.write_ref_file(self.branch_path(name), oid.as_ref())
    }

    pub fn delete_branch(&self, name: &str) -> Result<()> {
        let branch_path = self.branch_path(name);
        if !branch_path.exists() {
            return Err(Error::BranchNotFound);
        }
        if name == self.current_branch()? {
            return Err(Error::CannotRemoveCurrentBranch);
        }

        std::fs::remove_file(&branch_path)
            .with_context(|| format!("unable to delete branch file {}", branch_path.display()))?;
        Ok(())
    }

    /// All branch names, lexicographically sorted.
    pub fn list_branches(&self) -> Result<Vec<String>> {
        let heads_path = self.heads_path();
        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&heads_path).ok()?;
                Some(relative.to_string_lossy().replace('\\', "/"))
            })
            .collect::<Vec<_>>();

        branches.sort();
        Ok(branches)
    }

    fn write_ref_file(&self, path: PathBuf, raw_ref: &str) -> Result<()> {
        let parent = path
            .parent()
            .context("ref file path has no parent directory")?;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("unable to create ref directory {}", parent.display()))?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("unable to open ref file {}", path.display()))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)
            .with_context(|| format!("unable to lock ref file {}", path.display()))?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    pub fn head_path(&self) -> PathBuf {
        self.path.join("HEAD")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.path.join("refs").join("heads")
    }

    fn branch_path(&self, name: &str) -> PathBuf {
        self.heads_path().join(name)
    }
}

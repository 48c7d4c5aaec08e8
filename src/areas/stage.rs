//! Staging index: the pending-change buffer between the working tree and
//! the next commit.
//!
//! Holds the staged addition and removal maps plus the baseline snapshot
//! (the tip snapshot as of the last commit/checkout/reset/merge). Additions
//! and removals are kept disjoint per path at all times. Working-tree
//! status is never stored here; it is derived on demand by the status
//! inspector.
//!
//! ## File format
//!
//! One line per entry in `.grit/index`:
//!
//! ```text
//! base <blob-id> <path>
//! add <blob-id> <path>
//! rm <blob-id> <path>
//! ```

use crate::artifacts::errors::Result;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::snapshot::Snapshot;
use anyhow::Context;
use file_guard::Lock;
use std::collections::BTreeMap;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stage {
    additions: BTreeMap<String, ObjectId>,
    removals: BTreeMap<String, ObjectId>,
    baseline: Snapshot,
}

/// A point-in-time copy of the staging index, used to roll back an aborted
/// merge without leaving partial mutations behind.
pub type StageSnapshot = Stage;

#[derive(Debug)]
pub struct StageFile {
    path: Box<Path>,
    stage: Stage,
}

impl StageFile {
    pub fn new(path: Box<Path>) -> Self {
        StageFile {
            path,
            stage: Stage::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    /// Reload the staging index record from disk, replacing in-memory state.
    pub fn rehydrate(&mut self) -> Result<()> {
        self.stage = Stage::default();

        if !self.path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("unable to read index file {}", self.path.display()))?;

        for line in content.lines().filter(|line| !line.is_empty()) {
            let mut parts = line.splitn(3, ' ');
            let (tag, oid, path) = (parts.next(), parts.next(), parts.next());
            let (tag, oid, path) = match (tag, oid, path) {
                (Some(tag), Some(oid), Some(path)) => (tag, oid, path),
                _ => return Err(anyhow::anyhow!("malformed index line {:?}", line).into()),
            };
            let oid = ObjectId::try_parse(oid.to_string())?;

            match tag {
                "base" => self.stage.baseline.insert(path.to_string(), oid),
                "add" => {
                    self.stage.additions.insert(path.to_string(), oid);
                }
                "rm" => {
                    self.stage.removals.insert(path.to_string(), oid);
                }
                other => {
                    return Err(anyhow::anyhow!("unknown index entry tag {:?}", other).into())
                }
            }
        }

        Ok(())
    }

    /// Persist the staging index record under an exclusive file lock.
    pub fn write_updates(&self) -> Result<()> {
        let mut lines = Vec::new();
        for (path, oid) in self.stage.baseline.iter() {
            lines.push(format!("base {} {}", oid, path));
        }
        for (path, oid) in &self.stage.additions {
            lines.push(format!("add {} {}", oid, path));
        }
        for (path, oid) in &self.stage.removals {
            lines.push(format!("rm {} {}", oid, path));
        }

        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("unable to open index file {}", self.path.display()))?;
        let mut lock = file_guard::lock(&mut index_file, Lock::Exclusive, 0, 1)
            .with_context(|| format!("unable to lock index file {}", self.path.display()))?;
        lock.deref_mut().write_all(lines.join("\n").as_bytes())?;

        Ok(())
    }
}

impl Stage {
    pub fn additions(&self) -> &BTreeMap<String, ObjectId> {
        &self.additions
    }

    pub fn removals(&self) -> &BTreeMap<String, ObjectId> {
        &self.removals
    }

    pub fn baseline(&self) -> &Snapshot {
        &self.baseline
    }

    /// True when nothing is pending for the next commit.
    pub fn is_clean(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    /// Record a pending addition, clearing any pending removal for the path
    /// so that the two maps stay disjoint.
    pub fn stage_addition(&mut self, path: String, oid: ObjectId) {
        self.removals.remove(&path);
        self.additions.insert(path, oid);
    }

    /// Record a pending removal, clearing any pending addition for the path.
    pub fn stage_removal(&mut self, path: String, oid: ObjectId) {
        self.additions.remove(&path);
        self.removals.insert(path, oid);
    }

    pub fn unstage_addition(&mut self, path: &str) {
        self.additions.remove(path);
    }

    pub fn unstage_removal(&mut self, path: &str) {
        self.removals.remove(path);
    }

    /// Empty both pending maps; the baseline is untouched.
    pub fn clear(&mut self) {
        self.additions.clear();
        self.removals.clear();
    }

    /// Replace the baseline after a commit, checkout, reset or merge.
    pub fn set_baseline(&mut self, snapshot: Snapshot) {
        self.baseline = snapshot;
    }

    /// Copy the whole index for later rollback.
    pub fn capture(&self) -> StageSnapshot {
        self.clone()
    }

    /// Restore a previously captured index exactly.
    pub fn restore(&mut self, snapshot: StageSnapshot) {
        *self = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(tag: &str) -> ObjectId {
        ObjectId::digest([tag.as_bytes()])
    }

    #[test]
    fn additions_and_removals_stay_disjoint() {
        let mut stage = Stage::default();
        stage.stage_addition("f.txt".to_string(), oid("a"));
        stage.stage_removal("f.txt".to_string(), oid("b"));
        assert!(!stage.additions().contains_key("f.txt"));
        assert!(stage.removals().contains_key("f.txt"));

        stage.stage_addition("f.txt".to_string(), oid("c"));
        assert!(stage.additions().contains_key("f.txt"));
        assert!(!stage.removals().contains_key("f.txt"));
    }

    #[test]
    fn clear_keeps_baseline() {
        let mut stage = Stage::default();
        let baseline: Snapshot = [("f.txt".to_string(), oid("base"))].into_iter().collect();
        stage.set_baseline(baseline.clone());
        stage.stage_addition("g.txt".to_string(), oid("g"));

        stage.clear();
        assert!(stage.is_clean());
        assert_eq!(stage.baseline(), &baseline);
    }

    #[test]
    fn capture_and_restore_round_trip() {
        let mut stage = Stage::default();
        stage.stage_addition("f.txt".to_string(), oid("a"));
        let snapshot = stage.capture();

        stage.stage_removal("g.txt".to_string(), oid("g"));
        stage.clear();
        stage.restore(snapshot);

        assert!(stage.additions().contains_key("f.txt"));
        assert!(stage.removals().is_empty());
    }

    #[test]
    fn record_round_trips_through_disk() {
        let dir = assert_fs::TempDir::new().unwrap();
        let mut stage_file = StageFile::new(dir.path().join("index").into_boxed_path());

        stage_file
            .stage_mut()
            .set_baseline([("a.txt".to_string(), oid("a"))].into_iter().collect());
        stage_file
            .stage_mut()
            .stage_addition("b.txt".to_string(), oid("b"));
        stage_file
            .stage_mut()
            .stage_removal("a.txt".to_string(), oid("a"));
        let expected = stage_file.stage().clone();

        stage_file.write_updates().unwrap();
        stage_file.rehydrate().unwrap();

        assert_eq!(stage_file.stage(), &expected);
    }
}

//! Commit graph operations: building commits, ancestry queries, and the
//! split-point (merge-base) computation.
//!
//! ## Split point
//!
//! The split point of two tips is found in two phases:
//!
//! 1. collect the full ancestor set of the first tip, following both
//!    parent links;
//! 2. walk the second tip's ancestor graph breadth-first, again over both
//!    parent links, and return the first commit already in that set.
//!
//! Breadth-first order visits commits in non-decreasing distance from the
//! second tip, so the first hit is a nearest common ancestor. Walking both
//! parent links is what keeps the answer correct once either branch
//! contains earlier merge commits; a first-parent-only walk would
//! under-approximate ancestry there.

use crate::areas::database::{Database, StoreKind};
use crate::artifacts::errors::{Error, Result};
use crate::artifacts::graph::history::History;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::snapshot::Snapshot;
use derive_new::new;
use std::collections::{BTreeMap, HashSet, VecDeque};

#[derive(Debug, new)]
pub struct CommitGraph<'d> {
    database: &'d Database,
}

impl<'d> CommitGraph<'d> {
    /// Build (but do not persist) a commit from a parent and the staged
    /// addition/removal maps: the parent snapshot is cloned, additions
    /// overwrite, removals delete.
    pub fn build(
        &self,
        parent: Option<ObjectId>,
        second_parent: Option<ObjectId>,
        message: String,
        additions: &BTreeMap<String, ObjectId>,
        removals: &BTreeMap<String, ObjectId>,
    ) -> Result<Commit> {
        if additions.is_empty() && removals.is_empty() {
            return Err(Error::NothingToCommit);
        }

        let (mut snapshot, timestamp) = match &parent {
            Some(parent_oid) => {
                let parent_commit = self.database.load_commit(parent_oid)?;
                (
                    parent_commit.snapshot().clone(),
                    Commit::current_timestamp(),
                )
            }
            None => (Snapshot::new(), Commit::epoch_timestamp()),
        };

        for (path, oid) in additions {
            snapshot.insert(path.clone(), oid.clone());
        }
        for path in removals.keys() {
            snapshot.remove(path);
        }

        Ok(Commit::new(
            parent,
            second_parent,
            message,
            timestamp,
            snapshot,
        ))
    }

    /// Lazy first-parent walk from `tip` down to the root.
    pub fn history(&self, tip: ObjectId) -> History<'d> {
        History::new(self.database, Some(tip))
    }

    /// Every commit reachable from `tip`, following both parent links.
    /// Includes `tip` itself.
    pub fn ancestors(&self, tip: &ObjectId) -> Result<HashSet<ObjectId>> {
        let mut reachable = HashSet::from([tip.clone()]);
        let mut pending = vec![tip.clone()];

        while let Some(oid) = pending.pop() {
            let commit = self.database.load_commit(&oid)?;
            for parent in commit.parents() {
                if reachable.insert(parent.clone()) {
                    pending.push(parent.clone());
                }
            }
        }

        Ok(reachable)
    }

    /// Ids of all commits whose message equals `text` exactly.
    pub fn find_by_message(&self, text: &str) -> Result<Vec<ObjectId>> {
        let mut matches = Vec::new();
        for oid in self.database.list(StoreKind::Commits)? {
            if self.database.load_commit(&oid)?.message() == text {
                matches.push(oid);
            }
        }
        Ok(matches)
    }

    /// Resolve an abbreviated commit id. When several commits share the
    /// prefix the lexicographically first one wins; disambiguation is a
    /// known limitation.
    pub fn resolve_prefix(&self, prefix: &str) -> Result<ObjectId> {
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::CommitNotFound);
        }

        self.database
            .find_commits_by_prefix(&prefix.to_lowercase())?
            .into_iter()
            .next()
            .ok_or(Error::CommitNotFound)
    }

    /// Nearest common ancestor of two tips over the full DAG.
    pub fn split_point(&self, tip_a: &ObjectId, tip_b: &ObjectId) -> Result<ObjectId> {
        let reachable_from_a = self.ancestors(tip_a)?;

        let mut queue = VecDeque::from([tip_b.clone()]);
        let mut enqueued = HashSet::from([tip_b.clone()]);

        while let Some(oid) = queue.pop_front() {
            if reachable_from_a.contains(&oid) {
                return Ok(oid);
            }
            let commit = self.database.load_commit(&oid)?;
            for parent in commit.parents() {
                if enqueued.insert(parent.clone()) {
                    queue.push_back(parent.clone());
                }
            }
        }

        // every repository has a single root, so two tips always share it
        Err(anyhow::anyhow!("no common ancestor of {} and {}", tip_a, tip_b).into())
    }
}

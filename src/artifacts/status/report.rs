//! Working-tree status derivation and rendering.
//!
//! Status is never persisted: every query rebuilds it from the staging
//! index (baseline plus the two pending maps) and a live listing of the
//! working tree. The working tree is viewed as a path-to-blob-id map; blob
//! ids are content-addressed per path, so comparing ids at the same path is
//! exactly comparing content.
//!
//! The four report categories are pairwise disjoint. Each path is decided
//! by the first matching rule:
//!
//! 1. staged for removal → removed;
//! 2. staged for addition → deleted when the working file is gone,
//!    untracked when the working content diverged from the staged blob,
//!    staged otherwise;
//! 3. in the baseline → deleted when the working file is gone, modified
//!    when the content diverged, clean otherwise;
//! 4. only in the working tree → untracked.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::snapshot::Snapshot;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Modified,
    Deleted,
}

impl ChangeKind {
    fn annotation(&self) -> &'static str {
        match self {
            ChangeKind::Modified => "(modified)",
            ChangeKind::Deleted => "(deleted)",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub branches: Vec<String>,
    pub current_branch: String,
    pub staged: Vec<String>,
    pub removed: Vec<String>,
    pub modifications: Vec<(String, ChangeKind)>,
    pub untracked: Vec<String>,
}

impl StatusReport {
    /// Derive the four file categories. `worktree` maps every working-tree
    /// path to the blob id its current content would hash to.
    pub fn classify(
        baseline: &Snapshot,
        additions: &BTreeMap<String, ObjectId>,
        removals: &BTreeMap<String, ObjectId>,
        worktree: &BTreeMap<String, ObjectId>,
    ) -> Self {
        let mut report = StatusReport::default();

        let mut paths = BTreeSet::new();
        paths.extend(baseline.paths().cloned());
        paths.extend(additions.keys().cloned());
        paths.extend(removals.keys().cloned());
        paths.extend(worktree.keys().cloned());

        for path in paths {
            if removals.contains_key(&path) {
                report.removed.push(path);
            } else if let Some(staged_oid) = additions.get(&path) {
                match worktree.get(&path) {
                    None => report.modifications.push((path, ChangeKind::Deleted)),
                    Some(oid) if oid != staged_oid => report.untracked.push(path),
                    Some(_) => report.staged.push(path),
                }
            } else if let Some(baseline_oid) = baseline.get(&path) {
                match worktree.get(&path) {
                    None => report.modifications.push((path, ChangeKind::Deleted)),
                    Some(oid) if oid != baseline_oid => {
                        report.modifications.push((path, ChangeKind::Modified))
                    }
                    Some(_) => {}
                }
            } else {
                report.untracked.push(path);
            }
        }

        report
    }
}

impl Display for StatusReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Branches ===")?;
        for branch in &self.branches {
            if branch == &self.current_branch {
                writeln!(f, "*{}", branch)?;
            } else {
                writeln!(f, "{}", branch)?;
            }
        }
        writeln!(f)?;

        writeln!(f, "=== Staged Files ===")?;
        for path in &self.staged {
            writeln!(f, "{}", path)?;
        }
        writeln!(f)?;

        writeln!(f, "=== Removed Files ===")?;
        for path in &self.removed {
            writeln!(f, "{}", path)?;
        }
        writeln!(f)?;

        writeln!(f, "=== Modifications Not Staged For Commit ===")?;
        for (path, kind) in &self.modifications {
            writeln!(f, "{} {}", path, kind.annotation())?;
        }
        writeln!(f)?;

        writeln!(f, "=== Untracked Files ===")?;
        for path in &self.untracked {
            writeln!(f, "{}", path)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(tag: &str) -> ObjectId {
        ObjectId::digest([tag.as_bytes()])
    }

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, ObjectId> {
        entries
            .iter()
            .map(|(path, tag)| (path.to_string(), oid(tag)))
            .collect()
    }

    #[test]
    fn clean_tracked_files_appear_nowhere() {
        let baseline: Snapshot = map(&[("a.txt", "a")]).into_iter().collect();
        let report = StatusReport::classify(
            &baseline,
            &BTreeMap::new(),
            &BTreeMap::new(),
            &map(&[("a.txt", "a")]),
        );
        assert_eq!(report, StatusReport::default());
    }

    #[test]
    fn categories_are_disjoint_and_sorted() {
        let baseline: Snapshot = map(&[("tracked.txt", "v1"), ("gone.txt", "v1")])
            .into_iter()
            .collect();
        let additions = map(&[("staged.txt", "s1")]);
        let removals = map(&[("gone.txt", "v1")]);
        let worktree = map(&[
            ("tracked.txt", "v2"),
            ("staged.txt", "s1"),
            ("b-new.txt", "n"),
            ("a-new.txt", "n"),
        ]);

        let report = StatusReport::classify(&baseline, &additions, &removals, &worktree);

        assert_eq!(report.staged, vec!["staged.txt"]);
        assert_eq!(report.removed, vec!["gone.txt"]);
        assert_eq!(
            report.modifications,
            vec![("tracked.txt".to_string(), ChangeKind::Modified)]
        );
        assert_eq!(report.untracked, vec!["a-new.txt", "b-new.txt"]);
    }

    #[test]
    fn diverged_staged_addition_is_untracked_not_staged() {
        let additions = map(&[("f.txt", "staged")]);
        let worktree = map(&[("f.txt", "rewritten")]);

        let report = StatusReport::classify(
            &Snapshot::new(),
            &additions,
            &BTreeMap::new(),
            &worktree,
        );

        assert!(report.staged.is_empty());
        assert_eq!(report.untracked, vec!["f.txt"]);
    }

    #[test]
    fn missing_files_are_reported_deleted() {
        let baseline: Snapshot = map(&[("tracked.txt", "v1")]).into_iter().collect();
        let additions = map(&[("staged.txt", "s1")]);

        let report = StatusReport::classify(
            &baseline,
            &additions,
            &BTreeMap::new(),
            &BTreeMap::new(),
        );

        assert_eq!(
            report.modifications,
            vec![
                ("staged.txt".to_string(), ChangeKind::Deleted),
                ("tracked.txt".to_string(), ChangeKind::Deleted),
            ]
        );
    }

    #[test]
    fn recreated_staged_removal_stays_in_removed_only() {
        let baseline: Snapshot = map(&[("f.txt", "v1")]).into_iter().collect();
        let removals = map(&[("f.txt", "v1")]);
        let worktree = map(&[("f.txt", "v2")]);

        let report =
            StatusReport::classify(&baseline, &BTreeMap::new(), &removals, &worktree);

        assert_eq!(report.removed, vec!["f.txt"]);
        assert!(report.untracked.is_empty());
        assert!(report.modifications.is_empty());
    }

    #[test]
    fn rendering_emits_the_five_sections_with_current_branch_starred() {
        let report = StatusReport {
            branches: vec!["master".to_string(), "other".to_string()],
            current_branch: "master".to_string(),
            staged: vec!["staged.txt".to_string()],
            removed: vec![],
            modifications: vec![("mod.txt".to_string(), ChangeKind::Modified)],
            untracked: vec!["new.txt".to_string()],
        };

        let rendered = report.to_string();
        assert_eq!(
            rendered,
            "=== Branches ===\n\
             *master\n\
             other\n\
             \n\
             === Staged Files ===\n\
             staged.txt\n\
             \n\
             === Removed Files ===\n\
             \n\
             === Modifications Not Staged For Commit ===\n\
             mod.txt (modified)\n\
             \n\
             === Untracked Files ===\n\
             new.txt\n\n"
        );
    }
}

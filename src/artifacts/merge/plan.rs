//! Three-way merge classification.
//!
//! Pure over snapshots: given the current tip, the given tip and their
//! split point, every path in the union is resolved to an addition, a
//! removal, a conflict, or nothing. Blob ids are content-addressed per
//! path, so id comparison at one path is content comparison.
//!
//! The rules reduce to one comparison chain per path (absent entries
//! compare as a distinct value):
//!
//! - both sides agree → nothing to do;
//! - current side unchanged since the split → the given side wins;
//! - given side unchanged since the split → the current side stays;
//! - both sides changed, differently → conflict.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::snapshot::Snapshot;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};

/// The computed effect of a merge, before anything touches the working
/// tree or the staging index.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergePlan {
    /// Paths to check out from the given branch and stage as additions.
    pub additions: BTreeMap<String, ObjectId>,
    /// Paths to delete from the working tree and stage as removals, keyed
    /// to the current snapshot's blob id.
    pub removals: BTreeMap<String, ObjectId>,
    /// Paths where both sides changed since the split, incompatibly.
    pub conflicts: BTreeSet<String>,
}

impl MergePlan {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Every path the plan writes or deletes; used for the untracked-file
    /// safety check before any mutation is applied.
    pub fn touched_paths(&self) -> impl Iterator<Item = &String> {
        self.additions.keys().chain(self.removals.keys())
    }
}

/// Classify every path in `current ∪ given ∪ split`.
pub fn classify(current: &Snapshot, given: &Snapshot, split: &Snapshot) -> MergePlan {
    let mut paths = BTreeSet::new();
    paths.extend(current.paths());
    paths.extend(given.paths());
    paths.extend(split.paths());

    let mut plan = MergePlan::default();

    for path in paths {
        let at_split = split.get(path);
        let at_current = current.get(path);
        let at_given = given.get(path);

        if at_current == at_given || at_given == at_split {
            continue;
        }

        if at_current == at_split {
            match at_given {
                Some(oid) => {
                    plan.additions.insert(path.clone(), oid.clone());
                }
                None => {
                    // at_current is present here: were it absent it would
                    // have equalled at_given above
                    if let Some(oid) = at_current {
                        plan.removals.insert(path.clone(), oid.clone());
                    }
                }
            }
        } else {
            plan.conflicts.insert(path.clone());
        }
    }

    plan
}

/// The literal bytes written to a conflicting working file; an absent side
/// contributes empty content.
pub fn conflict_text(current: Option<&Bytes>, given: Option<&Bytes>) -> Bytes {
    let mut text = Vec::new();
    text.extend_from_slice(b"<<<<<<< HEAD\n");
    if let Some(content) = current {
        text.extend_from_slice(content);
    }
    text.extend_from_slice(b"=======\n");
    if let Some(content) = given {
        text.extend_from_slice(content);
    }
    text.extend_from_slice(b">>>>>>>\n");
    text.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(tag: &str) -> ObjectId {
        ObjectId::digest([tag.as_bytes()])
    }

    fn snapshot(entries: &[(&str, &str)]) -> Snapshot {
        entries
            .iter()
            .map(|(path, tag)| (path.to_string(), oid(tag)))
            .collect()
    }

    #[test]
    fn unchanged_in_current_absent_from_given_is_removed() {
        let split = snapshot(&[("f.txt", "v1")]);
        let current = snapshot(&[("f.txt", "v1")]);
        let given = snapshot(&[]);

        let plan = classify(&current, &given, &split);
        assert_eq!(plan.removals.get("f.txt"), Some(&oid("v1")));
        assert!(plan.additions.is_empty());
        assert!(plan.conflicts.is_empty());
    }

    #[test]
    fn unchanged_in_given_absent_from_current_stays_absent() {
        let split = snapshot(&[("f.txt", "v1")]);
        let current = snapshot(&[]);
        let given = snapshot(&[("f.txt", "v1")]);

        assert_eq!(classify(&current, &given, &split), MergePlan::default());
    }

    #[test]
    fn addition_only_in_current_is_kept() {
        let split = snapshot(&[]);
        let current = snapshot(&[("f.txt", "v1")]);
        let given = snapshot(&[]);

        assert_eq!(classify(&current, &given, &split), MergePlan::default());
    }

    #[test]
    fn addition_only_in_given_is_checked_out() {
        let split = snapshot(&[]);
        let current = snapshot(&[]);
        let given = snapshot(&[("f.txt", "v1")]);

        let plan = classify(&current, &given, &split);
        assert_eq!(plan.additions.get("f.txt"), Some(&oid("v1")));
        assert!(plan.removals.is_empty());
    }

    #[test]
    fn given_edit_over_unchanged_current_wins() {
        let split = snapshot(&[("f.txt", "v1")]);
        let current = snapshot(&[("f.txt", "v1")]);
        let given = snapshot(&[("f.txt", "v2")]);

        let plan = classify(&current, &given, &split);
        assert_eq!(plan.additions.get("f.txt"), Some(&oid("v2")));
    }

    #[test]
    fn current_edit_over_unchanged_given_is_kept() {
        let split = snapshot(&[("f.txt", "v1")]);
        let current = snapshot(&[("f.txt", "v2")]);
        let given = snapshot(&[("f.txt", "v1")]);

        assert_eq!(classify(&current, &given, &split), MergePlan::default());
    }

    #[test]
    fn same_edit_on_both_sides_is_a_noop() {
        let split = snapshot(&[("f.txt", "v1")]);
        let current = snapshot(&[("f.txt", "v2")]);
        let given = snapshot(&[("f.txt", "v2")]);

        assert_eq!(classify(&current, &given, &split), MergePlan::default());
    }

    #[test]
    fn divergent_edits_conflict() {
        let split = snapshot(&[("f.txt", "v1")]);
        let current = snapshot(&[("f.txt", "v2")]);
        let given = snapshot(&[("f.txt", "v3")]);

        let plan = classify(&current, &given, &split);
        assert!(plan.conflicts.contains("f.txt"));
    }

    #[test]
    fn edit_against_deletion_conflicts() {
        let split = snapshot(&[("f.txt", "v1")]);
        let current = snapshot(&[("f.txt", "v2")]);
        let given = snapshot(&[]);

        let plan = classify(&current, &given, &split);
        assert!(plan.conflicts.contains("f.txt"));

        let plan = classify(&given, &current, &split);
        assert!(plan.conflicts.contains("f.txt"));
    }

    #[test]
    fn both_added_differently_conflicts() {
        let split = snapshot(&[]);
        let current = snapshot(&[("f.txt", "v1")]);
        let given = snapshot(&[("f.txt", "v2")]);

        let plan = classify(&current, &given, &split);
        assert!(plan.conflicts.contains("f.txt"));
    }

    #[test]
    fn conflict_text_uses_the_exact_marker_bytes() {
        let current = Bytes::from_static(b"ours\n");
        let given = Bytes::from_static(b"theirs\n");

        assert_eq!(
            conflict_text(Some(&current), Some(&given)),
            Bytes::from_static(b"<<<<<<< HEAD\nours\n=======\ntheirs\n>>>>>>>\n")
        );
        assert_eq!(
            conflict_text(Some(&current), None),
            Bytes::from_static(b"<<<<<<< HEAD\nours\n=======\n>>>>>>>\n")
        );
    }
}

//! Complete path-to-blob mapping carried by every commit.
//!
//! A snapshot is cloned wholesale each time a child commit is built, so the
//! map lives behind an `Arc`: cloning is O(1) and two commits share the same
//! allocation until one of them is mutated, at which point `Arc::make_mut`
//! copies the map once. Iteration order is the sorted path order, which
//! keeps commit hashing and log output deterministic.

use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot(Arc<BTreeMap<String, ObjectId>>);

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&ObjectId> {
        self.0.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn insert(&mut self, path: String, oid: ObjectId) {
        Arc::make_mut(&mut self.0).insert(path, oid);
    }

    pub fn remove(&mut self, path: &str) {
        Arc::make_mut(&mut self.0).remove(path);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ObjectId)> {
        self.0.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

impl FromIterator<(String, ObjectId)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, ObjectId)>>(iter: I) -> Self {
        Snapshot(Arc::new(iter.into_iter().collect()))
    }
}

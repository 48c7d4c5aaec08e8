//! Commit object
//!
//! A commit is an immutable node of the history DAG. It owns a complete
//! path-to-blob snapshot (not a diff), up to two parent references, a
//! message and a preformatted timestamp. The root commit has no parent and
//! a fixed epoch timestamp.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! parent <parent-id>        (absent for the root commit)
//! merge <second-parent-id>  (merge commits only)
//! date <timestamp>
//! entry <blob-id> <path>    (one per snapshot entry, path-sorted)
//!
//! <message>
//! ```
//!
//! The identity hash covers the snapshot keys, both parent links, the
//! message and the timestamp. Hashing the second parent too means two merge
//! commits that differ only in their merged-in tip get distinct ids.

use crate::artifacts::errors::Result;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::snapshot::Snapshot;
use anyhow::Context;
use bytes::Bytes;
use std::io::{BufRead, Write};

const TIMESTAMP_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    id: ObjectId,
    parent: Option<ObjectId>,
    second_parent: Option<ObjectId>,
    message: String,
    timestamp: String,
    snapshot: Snapshot,
}

impl Commit {
    pub fn new(
        parent: Option<ObjectId>,
        second_parent: Option<ObjectId>,
        message: String,
        timestamp: String,
        snapshot: Snapshot,
    ) -> Self {
        let id = Self::compute_id(&parent, &second_parent, &message, &timestamp, &snapshot);
        Commit {
            id,
            parent,
            second_parent,
            message,
            timestamp,
            snapshot,
        }
    }

    fn compute_id(
        parent: &Option<ObjectId>,
        second_parent: &Option<ObjectId>,
        message: &str,
        timestamp: &str,
        snapshot: &Snapshot,
    ) -> ObjectId {
        let mut chunks: Vec<&[u8]> = vec![b"commit"];
        for path in snapshot.paths() {
            chunks.push(path.as_bytes());
        }
        if let Some(parent) = parent {
            chunks.push(parent.as_ref().as_bytes());
        }
        if let Some(second_parent) = second_parent {
            chunks.push(second_parent.as_ref().as_bytes());
        }
        chunks.push(message.as_bytes());
        chunks.push(timestamp.as_bytes());

        ObjectId::digest(chunks)
    }

    /// Wall-clock timestamp for a freshly built commit.
    pub fn current_timestamp() -> String {
        chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
    }

    /// The fixed timestamp carried by the root commit.
    pub fn epoch_timestamp() -> String {
        chrono::DateTime::UNIX_EPOCH
            .with_timezone(&chrono::Local)
            .format(TIMESTAMP_FORMAT)
            .to_string()
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn second_parent(&self) -> Option<&ObjectId> {
        self.second_parent.as_ref()
    }

    /// Both parent links, first parent first.
    pub fn parents(&self) -> impl Iterator<Item = &ObjectId> {
        self.parent.iter().chain(self.second_parent.iter())
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Render this commit the way `log` and `global-log` print it.
    pub fn log_entry(&self) -> String {
        let mut lines = vec!["===".to_string(), format!("commit {}", self.id)];
        if let (Some(parent), Some(second_parent)) = (&self.parent, &self.second_parent) {
            lines.push(format!(
                "Merge: {} {}",
                parent.to_short_oid(),
                second_parent.to_short_oid()
            ));
        }
        lines.push(format!("Date: {}", self.timestamp));
        lines.push(self.message.clone());
        lines.push(String::new());
        lines.join("\n")
    }
}

impl Packable for Commit {
    fn serialize(&self) -> Result<Bytes> {
        let mut body = vec![];

        if let Some(parent) = &self.parent {
            body.push(format!("parent {}", parent));
        }
        if let Some(second_parent) = &self.second_parent {
            body.push(format!("merge {}", second_parent));
        }
        body.push(format!("date {}", self.timestamp));
        for (path, oid) in self.snapshot.iter() {
            body.push(format!("entry {} {}", oid, path));
        }
        body.push(String::new());
        body.push(self.message.clone());

        let body = body.join("\n");

        let mut commit_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), body.len());
        commit_bytes.write_all(header.as_bytes())?;
        commit_bytes.write_all(body.as_bytes())?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> Result<Self> {
        let content = reader
            .bytes()
            .collect::<std::result::Result<Vec<u8>, std::io::Error>>()?;
        let content = String::from_utf8(content)
            .context("invalid commit object: body is not valid UTF-8")?;

        let mut parent = None;
        let mut second_parent = None;
        let mut timestamp = None;
        let mut snapshot = Snapshot::new();

        let mut lines = content.lines();
        for line in lines.by_ref() {
            if line.is_empty() {
                break;
            }
            if let Some(oid) = line.strip_prefix("parent ") {
                parent = Some(ObjectId::try_parse(oid.to_string())?);
            } else if let Some(oid) = line.strip_prefix("merge ") {
                second_parent = Some(ObjectId::try_parse(oid.to_string())?);
            } else if let Some(date) = line.strip_prefix("date ") {
                timestamp = Some(date.to_string());
            } else if let Some(entry) = line.strip_prefix("entry ") {
                let (oid, path) = entry
                    .split_once(' ')
                    .context("invalid commit object: malformed entry line")?;
                snapshot.insert(path.to_string(), ObjectId::try_parse(oid.to_string())?);
            } else {
                return Err(
                    anyhow::anyhow!("invalid commit object: unexpected line {:?}", line).into(),
                );
            }
        }

        let timestamp = timestamp.context("invalid commit object: missing date line")?;
        let message = lines.collect::<Vec<&str>>().join("\n");

        Ok(Self::new(
            parent,
            second_parent,
            message,
            timestamp,
            snapshot,
        ))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn object_id(&self) -> &ObjectId {
        &self.id
    }
}

//! Content-addressed object store.
//!
//! Three stores live under `.grit/objects`: permanent blobs, commits, and
//! a staging blob substore. Writes are idempotent (re-storing identical
//! content is a no-op) and atomic (temp file + rename); content is zlib
//! compressed at rest. Nothing is ever deleted except staged blobs, which
//! are promoted into the permanent blob store when the commit referencing
//! them is persisted.

use crate::artifacts::errors::{Error, Result};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

/// Which of the three object stores an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Blobs,
    Commits,
    Staged,
}

impl StoreKind {
    fn dir_name(&self) -> &'static str {
        match self {
            StoreKind::Blobs => "blobs",
            StoreKind::Commits => "commits",
            StoreKind::Staged => "staged",
        }
    }
}

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn store_path(&self, kind: StoreKind) -> PathBuf {
        self.path.join(kind.dir_name())
    }

    /// Persist an object into the given store. Re-storing content that is
    /// already present leaves the store untouched.
    pub fn store(&self, kind: StoreKind, object: &impl Object) -> Result<()> {
        let object_path = self.store_path(kind).join(object.object_id().to_path());

        if !object_path.exists() {
            let parent = object_path
                .parent()
                .context("object path has no parent directory")?;
            std::fs::create_dir_all(parent).with_context(|| {
                format!("unable to create object directory {}", parent.display())
            })?;

            self.write_object(object_path, object.serialize()?)?;
        }

        Ok(())
    }

    pub fn contains(&self, kind: StoreKind, oid: &ObjectId) -> bool {
        self.store_path(kind).join(oid.to_path()).exists()
    }

    /// Load a blob by id, looking in the permanent store first and falling
    /// back to the staging substore. Blobs are content-addressed, so a hit
    /// in either store carries identical bytes.
    pub fn load_blob(&self, oid: &ObjectId) -> Result<Blob> {
        for kind in [StoreKind::Blobs, StoreKind::Staged] {
            if self.contains(kind, oid) {
                return self.parse_blob(kind, oid);
            }
        }
        Err(Error::Internal(anyhow::anyhow!("blob {} not found", oid)))
    }

    pub fn load_commit(&self, oid: &ObjectId) -> Result<Commit> {
        if !self.contains(StoreKind::Commits, oid) {
            return Err(Error::CommitNotFound);
        }

        let object_path = self.store_path(StoreKind::Commits).join(oid.to_path());
        let mut reader = Cursor::new(self.read_object(object_path)?);

        match ObjectType::parse_object_type(&mut reader)? {
            ObjectType::Commit => Commit::deserialize(reader),
            other => Err(anyhow::anyhow!("object {} is a {}, expected commit", oid, other).into()),
        }
    }

    fn parse_blob(&self, kind: StoreKind, oid: &ObjectId) -> Result<Blob> {
        let object_path = self.store_path(kind).join(oid.to_path());
        let mut reader = Cursor::new(self.read_object(object_path)?);

        match ObjectType::parse_object_type(&mut reader)? {
            ObjectType::Blob => Blob::deserialize(reader),
            other => Err(anyhow::anyhow!("object {} is a {}, expected blob", oid, other).into()),
        }
    }

    /// Every object id present in the given store.
    pub fn list(&self, kind: StoreKind) -> Result<Vec<ObjectId>> {
        let store_path = self.store_path(kind);
        let mut oids = Vec::new();

        if !store_path.exists() {
            return Ok(oids);
        }

        for fanout in std::fs::read_dir(&store_path)? {
            let fanout = fanout?;
            if !fanout.path().is_dir() {
                continue;
            }
            let dir_name = fanout.file_name().to_string_lossy().to_string();
            for entry in std::fs::read_dir(fanout.path())? {
                let entry = entry?;
                let file_name = entry.file_name().to_string_lossy().to_string();
                oids.push(ObjectId::try_parse(format!("{}{}", dir_name, file_name))?);
            }
        }

        oids.sort();
        Ok(oids)
    }

    /// Copy every staged blob into the permanent blob store, then empty the
    /// staging substore. Called exactly when a commit referencing the
    /// staged blobs is persisted.
    pub fn promote_staged(&self) -> Result<()> {
        for oid in self.list(StoreKind::Staged)? {
            let blob = self.parse_blob(StoreKind::Staged, &oid)?;
            self.store(StoreKind::Blobs, &blob)?;

            let staged_path = self.store_path(StoreKind::Staged).join(oid.to_path());
            std::fs::remove_file(&staged_path).with_context(|| {
                format!("unable to remove staged blob {}", staged_path.display())
            })?;
        }

        Ok(())
    }

    /// Find all commits whose id starts with the given prefix.
    ///
    /// For prefixes of 2+ characters only the matching fan-out directory is
    /// scanned; shorter prefixes fall back to a full store listing.
    pub fn find_commits_by_prefix(&self, prefix: &str) -> Result<Vec<ObjectId>> {
        if prefix.len() < 2 {
            return Ok(self
                .list(StoreKind::Commits)?
                .into_iter()
                .filter(|oid| oid.as_ref().starts_with(prefix))
                .collect());
        }

        let (dir_name, file_prefix) = prefix.split_at(2);
        let dir_path = self.store_path(StoreKind::Commits).join(dir_name);
        let mut matches = Vec::new();

        if dir_path.is_dir() {
            for entry in std::fs::read_dir(&dir_path)? {
                let entry = entry?;
                let file_name = entry.file_name().to_string_lossy().to_string();
                if file_name.starts_with(file_prefix) {
                    matches.push(ObjectId::try_parse(format!("{}{}", dir_name, file_name))?);
                }
            }
        }

        matches.sort();
        Ok(matches)
    }

    fn read_object(&self, object_path: PathBuf) -> Result<Bytes> {
        let object_content = std::fs::read(&object_path).with_context(|| {
            format!("unable to read object file {}", object_path.display())
        })?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> Result<()> {
        let object_dir = object_path
            .parent()
            .context("object path has no parent directory")?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .with_context(|| {
                format!("unable to open object file {}", temp_object_path.display())
            })?;
        file.write_all(&object_content).with_context(|| {
            format!("unable to write object file {}", temp_object_path.display())
        })?;

        // rename the temp file onto the object file to make the write atomic
        std::fs::rename(&temp_object_path, &object_path).with_context(|| {
            format!("unable to rename object file to {}", object_path.display())
        })?;

        Ok(())
    }

    fn compress(data: Bytes) -> Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("unable to compress object content")?;

        Ok(encoder
            .finish()
            .context("unable to finish compressing object content")?
            .into())
    }

    fn decompress(data: Bytes) -> Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn temp_database() -> (assert_fs::TempDir, Database) {
        let dir = assert_fs::TempDir::new().expect("failed to create temp dir");
        let database = Database::new(dir.path().join("objects").into_boxed_path());
        (dir, database)
    }

    #[test]
    fn store_and_load_round_trips_a_blob() {
        let (_dir, database) = temp_database();
        let blob = Blob::new("f.txt".to_string(), Bytes::from_static(b"hello"));

        database.store(StoreKind::Blobs, &blob).unwrap();
        let loaded = database.load_blob(blob.object_id()).unwrap();

        assert_eq!(loaded, blob);
    }

    #[test]
    fn store_is_idempotent() {
        let (_dir, database) = temp_database();
        let blob = Blob::new("f.txt".to_string(), Bytes::from_static(b"hello"));

        database.store(StoreKind::Blobs, &blob).unwrap();
        database.store(StoreKind::Blobs, &blob).unwrap();

        assert_eq!(database.list(StoreKind::Blobs).unwrap().len(), 1);
    }

    #[test]
    fn missing_blob_reports_not_found() {
        let (_dir, database) = temp_database();
        let blob = Blob::new("f.txt".to_string(), Bytes::from_static(b"hello"));

        assert!(database.load_blob(blob.object_id()).is_err());
    }

    #[test]
    fn promote_staged_moves_blobs_to_permanent_store() {
        let (_dir, database) = temp_database();
        let blob = Blob::new("f.txt".to_string(), Bytes::from_static(b"hello"));

        database.store(StoreKind::Staged, &blob).unwrap();
        database.promote_staged().unwrap();

        assert!(database.contains(StoreKind::Blobs, blob.object_id()));
        assert!(database.list(StoreKind::Staged).unwrap().is_empty());
    }

    #[test]
    fn prefix_search_matches_commit_ids() {
        use crate::artifacts::objects::commit::Commit;
        use crate::artifacts::objects::snapshot::Snapshot;

        let (_dir, database) = temp_database();
        let commit = Commit::new(
            None,
            None,
            "initial commit".to_string(),
            Commit::epoch_timestamp(),
            Snapshot::new(),
        );
        database.store(StoreKind::Commits, &commit).unwrap();

        let prefix = &commit.object_id().as_ref()[..6];
        let matches = database.find_commits_by_prefix(prefix).unwrap();
        assert_eq!(matches, vec![commit.object_id().clone()]);
    }
}

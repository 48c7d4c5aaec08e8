//! Blob object
//!
//! A blob is the immutable snapshot of one file's content at one path.
//! The path label participates in the identity hash, so identical bytes
//! under two different paths produce two distinct blobs. That buys
//! per-path history at the cost of storing duplicated content twice.
//!
//! ## Format
//!
//! On disk: `blob <size>\0path <path_label>\n<content>`

use crate::artifacts::errors::Result;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    path_label: String,
    content: Bytes,
    id: ObjectId,
}

impl Blob {
    /// Create a blob for `content` as it appears at `path_label`,
    /// computing its content-addressed id.
    pub fn new(path_label: String, content: Bytes) -> Self {
        let id = ObjectId::digest([b"Blob".as_slice(), path_label.as_bytes(), &content]);
        Blob {
            path_label,
            content,
            id,
        }
    }

    pub fn path_label(&self) -> &str {
        &self.path_label
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> Result<Bytes> {
        let mut body = Vec::new();
        writeln!(body, "path {}", self.path_label)?;
        body.write_all(&self.content)?;

        let mut blob_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), body.len());
        blob_bytes.write_all(header.as_bytes())?;
        blob_bytes.write_all(&body)?;

        Ok(Bytes::from(blob_bytes))
    }
}

impl Unpackable for Blob {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        // the envelope header has already been consumed
        let mut path_line = String::new();
        reader
            .read_line(&mut path_line)
            .context("unable to read blob path line")?;
        let path_label = path_line
            .trim_end_matches('\n')
            .strip_prefix("path ")
            .context("invalid blob object: missing path line")?
            .to_string();

        let mut content = Vec::new();
        reader
            .read_to_end(&mut content)
            .context("unable to read blob content")?;

        Ok(Self::new(path_label, Bytes::from(content)))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn object_id(&self) -> &ObjectId {
        &self.id
    }
}

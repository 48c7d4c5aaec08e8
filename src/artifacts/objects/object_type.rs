use crate::artifacts::errors::Result;
use anyhow::Context;
use std::io::BufRead;

/// The two object kinds that live in the content-addressed stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Commit => "commit",
        }
    }

    /// Consume the `<type> <size>\0` header and return the declared type.
    pub fn parse_object_type(reader: &mut impl BufRead) -> Result<Self> {
        let mut header = Vec::new();
        reader
            .read_until(b'\0', &mut header)
            .context("unable to read object header")?;

        let header = std::str::from_utf8(&header)
            .context("object header is not valid UTF-8")?
            .trim_end_matches('\0');
        let type_name = header
            .split(' ')
            .next()
            .context("object header is missing a type")?;

        match type_name {
            "blob" => Ok(ObjectType::Blob),
            "commit" => Ok(ObjectType::Commit),
            other => Err(anyhow::anyhow!("unknown object type {}", other).into()),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

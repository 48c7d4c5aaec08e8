use crate::artifacts::errors::Result;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use std::io::BufRead;

/// Serialization into the on-disk `<type> <size>\0<body>` envelope.
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

/// Deserialization from an object body, the envelope header already consumed.
pub trait Unpackable: Sized {
    fn deserialize(reader: impl BufRead) -> Result<Self>;
}

/// A storable, content-addressed object.
pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    /// The identity of the object, derived from its content.
    fn object_id(&self) -> &ObjectId;
}

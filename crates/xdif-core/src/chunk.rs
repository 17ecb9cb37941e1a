//! Chunk model — one node of an XDIF tree.
//!
//! A chunk is either a leaf holding opaque bytes or a container holding an
//! ordered list of child chunks. Trees have value semantics: a container
//! owns its children outright, and cloning a chunk deep-copies the subtree.

use bytes::{Bytes, BytesMut};

use crate::codec::{self, Decoder};
use crate::error::{Result, XdifError};
use crate::registry::Registry;
use crate::wire::{TypeCode, HEADER_LEN};

/// The two shapes a chunk can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Opaque payload, preserved byte-for-byte through encode and decode.
    Leaf(Bytes),
    /// Child chunks. Insertion order is serialization order.
    Container(Vec<Chunk>),
}

/// A chunk's own payload, before the record header is attached.
///
/// For a leaf, `data` is the raw payload. For a container, `data` is the
/// back-to-back encoding of every child and `has_children` is set iff
/// there is at least one child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerialisedPayload {
    pub has_children: bool,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    type_code: TypeCode,
    body: Body,
}

impl Chunk {
    pub fn leaf(type_code: TypeCode, payload: impl Into<Bytes>) -> Self {
        Self {
            type_code,
            body: Body::Leaf(payload.into()),
        }
    }

    /// An empty container.
    pub fn container(type_code: TypeCode) -> Self {
        Self {
            type_code,
            body: Body::Container(Vec::new()),
        }
    }

    pub fn type_code(&self) -> TypeCode {
        self.type_code
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn is_container(&self) -> bool {
        matches!(self.body, Body::Container(_))
    }

    /// Leaf payload. `None` for containers.
    pub fn payload(&self) -> Option<&Bytes> {
        match &self.body {
            Body::Leaf(data) => Some(data),
            Body::Container(_) => None,
        }
    }

    /// Replace a leaf's payload.
    pub fn set_payload(&mut self, payload: impl Into<Bytes>) -> Result<()> {
        match &mut self.body {
            Body::Leaf(data) => {
                *data = payload.into();
                Ok(())
            }
            Body::Container(_) => Err(XdifError::PayloadError {
                code: self.type_code,
                reason: "container payload is derived from its children",
            }),
        }
    }

    // ── Container operations ──────────────────────────────────────────────────

    fn children_mut(&mut self) -> Result<&mut Vec<Chunk>> {
        match &mut self.body {
            Body::Container(children) => Ok(children),
            Body::Leaf(_) => Err(XdifError::NotAContainer(self.type_code)),
        }
    }

    /// Append a deep copy of `child`. The caller keeps its own copy.
    pub fn add_child(&mut self, child: &Chunk) -> Result<()> {
        self.push_child(child.clone())
    }

    /// Append `child`, taking ownership of it.
    pub fn push_child(&mut self, child: Chunk) -> Result<()> {
        self.children_mut()?.push(child);
        Ok(())
    }

    /// Remove and drop the child at `index`.
    pub fn erase_child(&mut self, index: usize) -> Result<()> {
        let children = self.children_mut()?;
        if index >= children.len() {
            return Err(XdifError::IndexOutOfRange {
                index,
                len: children.len(),
            });
        }
        children.remove(index);
        Ok(())
    }

    pub fn clear_children(&mut self) -> Result<()> {
        self.children_mut()?.clear();
        Ok(())
    }

    /// Number of direct children. Always 0 for a leaf.
    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    /// Direct children in order. Empty for a leaf.
    pub fn children(&self) -> &[Chunk] {
        match &self.body {
            Body::Container(children) => children,
            Body::Leaf(_) => &[],
        }
    }

    pub fn child(&self, index: usize) -> Option<&Chunk> {
        self.children().get(index)
    }

    // ── Serialization ─────────────────────────────────────────────────────────

    /// Serialise only this chunk's payload, without its own header.
    pub fn serialise_payload(&self) -> Result<SerialisedPayload> {
        match &self.body {
            Body::Leaf(data) => Ok(SerialisedPayload {
                has_children: false,
                data: data.clone(),
            }),
            Body::Container(children) => {
                let mut data = BytesMut::with_capacity(self.encoded_len() - HEADER_LEN);
                // depth-first, left to right
                for child in children {
                    codec::encode_into(child, &mut data, 1)?;
                }
                Ok(SerialisedPayload {
                    has_children: !children.is_empty(),
                    data: data.freeze(),
                })
            }
        }
    }

    /// Size of this chunk's full record, header included.
    pub fn encoded_len(&self) -> usize {
        let payload_len = match &self.body {
            Body::Leaf(data) => data.len(),
            Body::Container(children) => children.iter().map(Chunk::encoded_len).sum(),
        };
        HEADER_LEN + payload_len
    }

    /// Encode this chunk and its whole subtree as one record.
    pub fn serialise(&self) -> Result<Bytes> {
        codec::encode(self)
    }

    /// Decode exactly one record, instantiating kinds through `registry`.
    pub fn deserialise(registry: &Registry, data: impl Into<Bytes>) -> Result<Chunk> {
        Decoder::new(registry).decode(data)
    }
}

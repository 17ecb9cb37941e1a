//! Chunk kind registry — maps a type code to the kind of chunk it names.
//!
//! The decoder only ever sees four bytes of type code; the registry tells
//! it whether to build a leaf or a container. Populate one registry during
//! startup, then share it read-only (e.g. behind `Arc`) with every decode.

use std::collections::HashMap;

use bytes::Bytes;

use crate::chunk::{Chunk, SerialisedPayload};
use crate::codec::Decoder;
use crate::error::{Result, XdifError};
use crate::wire::TypeCode;

/// XDIF file root chunk.
pub const XDIF: TypeCode = TypeCode::from_static(*b"XDIF");

/// Free-form metadata leaf.
pub const META: TypeCode = TypeCode::from_static(*b"META");

/// What a registered type code decodes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Leaf,
    Container,
}

impl Shape {
    /// A fresh, empty chunk of this shape.
    pub fn instantiate(self, type_code: TypeCode) -> Chunk {
        match self {
            Self::Leaf => Chunk::leaf(type_code, Bytes::new()),
            Self::Container => Chunk::container(type_code),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Leaf => "leaf",
            Self::Container => "container",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    kinds: HashMap<TypeCode, Shape>,
}

impl Registry {
    /// An empty registry. Nothing decodes until kinds are registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the kinds every XDIF file uses.
    pub fn with_builtin_kinds() -> Self {
        let mut registry = Self::new();
        registry.register_container(XDIF);
        registry.register_leaf(META);
        registry
    }

    /// Register a kind. The first registration for a code wins; later ones
    /// are ignored. Returns whether this call inserted the entry.
    pub fn register(&mut self, type_code: TypeCode, shape: Shape) -> bool {
        if let Some(existing) = self.kinds.get(&type_code) {
            tracing::debug!(
                type_code = %type_code,
                kept = existing.name(),
                ignored = shape.name(),
                "chunk kind already registered"
            );
            return false;
        }
        tracing::debug!(type_code = %type_code, shape = shape.name(), "chunk kind registered");
        self.kinds.insert(type_code, shape);
        true
    }

    pub fn register_leaf(&mut self, type_code: TypeCode) -> bool {
        self.register(type_code, Shape::Leaf)
    }

    pub fn register_container(&mut self, type_code: TypeCode) -> bool {
        self.register(type_code, Shape::Container)
    }

    pub fn shape(&self, type_code: &TypeCode) -> Option<Shape> {
        self.kinds.get(type_code).copied()
    }

    pub fn contains(&self, type_code: &TypeCode) -> bool {
        self.kinds.contains_key(type_code)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// All registered kinds, sorted by type code.
    pub fn kinds(&self) -> Vec<(TypeCode, Shape)> {
        let mut kinds: Vec<_> = self.kinds.iter().map(|(c, s)| (*c, *s)).collect();
        kinds.sort_by_key(|(code, _)| *code);
        kinds
    }

    /// A fresh, empty instance of the kind registered for `type_code`.
    pub fn create(&self, type_code: TypeCode) -> Result<Chunk> {
        self.shape(&type_code)
            .map(|shape| shape.instantiate(type_code))
            .ok_or(XdifError::UnknownChunkType(type_code))
    }

    /// A new instance of the kind registered for `type_code`, with `payload`
    /// decoded into it. Uses default decode limits.
    pub fn create_with_payload(
        &self,
        type_code: TypeCode,
        payload: SerialisedPayload,
    ) -> Result<Chunk> {
        Decoder::new(self).decode_payload(type_code, payload)
    }
}

//! xdif-core — chunk model, registry, and wire codec for the XDIF
//! tree-structured binary container format.
//!
//! Build a tree with [`Chunk`], encode it with [`Chunk::serialise`], and
//! rebuild it with [`Chunk::deserialise`] against a [`Registry`] that knows
//! which type codes are leaves and which are containers.

pub mod chunk;
pub mod codec;
pub mod config;
pub mod error;
pub mod registry;
pub mod wire;

pub use chunk::{Body, Chunk, SerialisedPayload};
pub use codec::{encode, DecodeLimits, Decoder};
pub use config::XdifConfig;
pub use error::{Result, XdifError};
pub use registry::{Registry, Shape, META, XDIF};
pub use wire::{ChunkHeader, TypeCode, HEADER_LEN};

//! Errors raised while building, encoding, or decoding chunk trees.
//!
//! Every failure aborts the whole encode/decode call. No partially-built
//! tree is ever returned alongside an error.

use crate::wire::TypeCode;

/// Errors that can arise when handling XDIF chunks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XdifError {
    /// A type code that is not exactly four printable ASCII bytes.
    #[error("invalid chunk type: {0}")]
    BadChunkType(String),

    /// A well-formed record whose type code has no registry entry.
    #[error("unknown chunk type: {0}")]
    UnknownChunkType(TypeCode),

    /// The has-children flag contradicts the payload contents.
    #[error("payload error in {code}: {reason}")]
    PayloadError { code: TypeCode, reason: &'static str },

    /// A declared length runs past the end of the available bytes.
    #[error("truncated input: need {needed} bytes, {available} available")]
    Truncation { needed: usize, available: usize },

    #[error("child index {index} out of range (child count {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{0} is a leaf chunk and cannot hold children")]
    NotAContainer(TypeCode),

    #[error("payload length {len} exceeds maximum {max}")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("nesting depth exceeds maximum {0}")]
    DepthExceeded(usize),

    #[error("{0} trailing bytes after top-level chunk")]
    TrailingData(usize),
}

impl XdifError {
    /// True for both flavours of bad type code: malformed, or unregistered
    /// at decode time.
    pub fn is_bad_chunk_type(&self) -> bool {
        matches!(self, Self::BadChunkType(_) | Self::UnknownChunkType(_))
    }
}

pub type Result<T, E = XdifError> = std::result::Result<T, E>;

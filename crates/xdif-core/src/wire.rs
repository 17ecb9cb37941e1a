//! XDIF wire format — the on-wire record header and chunk type codes.
//!
//! Every chunk record is a 12-byte header followed by its payload. Every
//! field and every reserved byte here is part of the format; changing any
//! of them breaks every file written so far.
//!
//! ```text
//! offset  size  field
//! 0       4     type code (ASCII, not NUL-terminated)
//! 4       1     flags (bit 7 = has children; bits 0-6 reserved)
//! 5       3     reserved
//! 8       4     payload length, unsigned big-endian
//! 12      N     payload bytes
//! ```
//!
//! The header is #[repr(C, packed)] with zerocopy derives. There is no
//! unsafe code in this module.

use std::fmt;
use std::str::FromStr;

use static_assertions::assert_eq_size;
use zerocopy::{AsBytes, FromBytes, FromZeroes};

use crate::error::{Result, XdifError};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Size of a record header in bytes.
pub const HEADER_LEN: usize = 12;

/// Flag bit set when the payload is a sequence of nested records.
pub const FLAG_HAS_CHILDREN: u8 = 0x80;

/// Largest payload a record can describe.
pub const MAX_PAYLOAD: usize = u32::MAX as usize;

// ── Type Code ─────────────────────────────────────────────────────────────────

/// Four-byte identifier naming a chunk's kind.
///
/// Codes built by callers are always four printable ASCII bytes. Codes read
/// off the wire are taken verbatim and only used as registry lookup keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeCode([u8; 4]);

const fn is_printable(b: u8) -> bool {
    b >= 0x20 && b < 0x7f
}

impl TypeCode {
    /// Validate and wrap four bytes.
    pub fn new(bytes: [u8; 4]) -> Result<Self> {
        if bytes.iter().all(|&b| is_printable(b)) {
            Ok(Self(bytes))
        } else {
            Err(XdifError::BadChunkType(format!(
                "0x{} contains non-printable bytes",
                hex::encode(bytes)
            )))
        }
    }

    /// Compile-time constructor for well-known codes. Fails const evaluation
    /// if a byte is not printable ASCII.
    pub const fn from_static(bytes: [u8; 4]) -> Self {
        let mut i = 0;
        while i < 4 {
            assert!(is_printable(bytes[i]), "type code must be printable ASCII");
            i += 1;
        }
        Self(bytes)
    }

    /// Wrap a code read from the wire without validating it.
    pub(crate) fn from_wire(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// The code as text, if every byte is printable.
    pub fn as_str(&self) -> Option<&str> {
        if self.0.iter().all(|&b| is_printable(b)) {
            std::str::from_utf8(&self.0).ok()
        } else {
            None
        }
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => f.write_str(s),
            None => write!(f, "0x{}", hex::encode(self.0)),
        }
    }
}

impl fmt::Debug for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeCode({self})")
    }
}

impl TryFrom<&[u8]> for TypeCode {
    type Error = XdifError;

    fn try_from(value: &[u8]) -> Result<Self> {
        let bytes: [u8; 4] = value.try_into().map_err(|_| {
            XdifError::BadChunkType(format!("expected 4 bytes, got {}", value.len()))
        })?;
        Self::new(bytes)
    }
}

impl TryFrom<&str> for TypeCode {
    type Error = XdifError;

    fn try_from(value: &str) -> Result<Self> {
        Self::try_from(value.as_bytes())
    }
}

impl FromStr for TypeCode {
    type Err = XdifError;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_from(s)
    }
}

// ── Record Header ─────────────────────────────────────────────────────────────

/// Header preceding every chunk payload.
///
/// Wire size: 12 bytes.
#[derive(Debug, Clone, AsBytes, FromBytes, FromZeroes)]
#[repr(C, packed)]
pub struct ChunkHeader {
    /// Chunk kind. Not validated on decode.
    pub type_code: [u8; 4],

    /// Bit flags:
    ///   bit    7: payload is a sequence of child records
    ///   bits 0-6: reserved, written as zero, ignored on read
    pub flags: u8,

    /// Reserved, written as zero, ignored on read.
    pub reserved: [u8; 3],

    /// Payload length in bytes, big-endian, not including this header.
    pub length: [u8; 4],
}

// Compile-time size guard. If this fails, the wire format has silently changed.
assert_eq_size!(ChunkHeader, [u8; 12]);

impl ChunkHeader {
    pub fn new(type_code: TypeCode, has_children: bool, length: u32) -> Self {
        Self {
            type_code: type_code.0,
            flags: if has_children { FLAG_HAS_CHILDREN } else { 0 },
            reserved: [0u8; 3],
            length: length.to_be_bytes(),
        }
    }

    pub fn type_code(&self) -> TypeCode {
        TypeCode::from_wire(self.type_code)
    }

    pub fn has_children(&self) -> bool {
        self.flags & FLAG_HAS_CHILDREN != 0
    }

    pub fn length(&self) -> u32 {
        u32::from_be_bytes(self.length)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

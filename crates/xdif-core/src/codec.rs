//! Record encoding and decoding.
//!
//! Encoding walks the tree depth-first, left to right, and writes one
//! header + payload per chunk. Decoding reads records through a bounds
//! checked cursor, asks the registry what each type code is, and recurses
//! into container payloads. A container payload must be tiled exactly by
//! its child records: no gaps, no overlap, no leftover bytes.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use zerocopy::{AsBytes, FromBytes};

use crate::chunk::{Body, Chunk, SerialisedPayload};
use crate::error::{Result, XdifError};
use crate::registry::{Registry, Shape};
use crate::wire::{ChunkHeader, TypeCode, HEADER_LEN, MAX_PAYLOAD};

/// Deepest nesting the encoder will write and the default decoder will
/// read. The top-level record is depth 0.
pub const DEFAULT_MAX_DEPTH: usize = 256;

// ── Encoding ──────────────────────────────────────────────────────────────────

/// Encode `chunk` and its subtree as a single record.
pub fn encode(chunk: &Chunk) -> Result<Bytes> {
    let mut out = BytesMut::with_capacity(chunk.encoded_len());
    encode_into(chunk, &mut out, 0)?;
    Ok(out.freeze())
}

/// Append the full record for `chunk`, sitting at `depth`, to `out`.
///
/// The header goes in first with a zero length, which is patched once the
/// payload has been written, so every byte is copied exactly once.
pub(crate) fn encode_into(chunk: &Chunk, out: &mut BytesMut, depth: usize) -> Result<()> {
    if depth > DEFAULT_MAX_DEPTH {
        return Err(XdifError::DepthExceeded(DEFAULT_MAX_DEPTH));
    }

    let start = out.len();
    let has_children = chunk.child_count() > 0;
    out.put_slice(ChunkHeader::new(chunk.type_code(), has_children, 0).as_bytes());

    match chunk.body() {
        Body::Leaf(data) => out.put_slice(data),
        Body::Container(children) => {
            for child in children {
                encode_into(child, out, depth + 1)?;
            }
        }
    }

    let written = out.len() - start - HEADER_LEN;
    let length = u32::try_from(written).map_err(|_| XdifError::PayloadTooLarge {
        len: written,
        max: MAX_PAYLOAD,
    })?;
    out[start + 8..start + HEADER_LEN].copy_from_slice(&length.to_be_bytes());
    Ok(())
}

// ── Cursor ────────────────────────────────────────────────────────────────────

/// Read position over a byte buffer. Every read is checked against the
/// bytes that remain, so a lying length field surfaces as `Truncation`.
#[derive(Debug, Clone)]
struct Cursor {
    buf: Bytes,
}

impl Cursor {
    fn new(buf: Bytes) -> Self {
        Self { buf }
    }

    fn remaining(&self) -> usize {
        self.buf.len()
    }

    fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn read_header(&mut self) -> Result<ChunkHeader> {
        let header = ChunkHeader::read_from_prefix(&self.buf[..]).ok_or(XdifError::Truncation {
            needed: HEADER_LEN,
            available: self.remaining(),
        })?;
        self.buf.advance(HEADER_LEN);
        Ok(header)
    }

    /// Split off the next `len` bytes without copying.
    fn take(&mut self, len: usize) -> Result<Bytes> {
        if len > self.remaining() {
            return Err(XdifError::Truncation {
                needed: len,
                available: self.remaining(),
            });
        }
        Ok(self.buf.split_to(len))
    }
}

// ── Decoding ──────────────────────────────────────────────────────────────────

/// Bounds applied while decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Deepest nesting accepted. The top-level record is depth 0.
    pub max_depth: usize,
    /// Largest declared payload length accepted for any record.
    pub max_payload_bytes: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_payload_bytes: MAX_PAYLOAD,
        }
    }
}

/// Rebuilds chunk trees from bytes using a registry.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'r> {
    registry: &'r Registry,
    limits: DecodeLimits,
}

impl<'r> Decoder<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_limits(registry, DecodeLimits::default())
    }

    pub fn with_limits(registry: &'r Registry, limits: DecodeLimits) -> Self {
        Self { registry, limits }
    }

    pub fn limits(&self) -> DecodeLimits {
        self.limits
    }

    /// Decode a buffer holding exactly one record.
    pub fn decode(&self, data: impl Into<Bytes>) -> Result<Chunk> {
        let data = data.into();
        let total = data.len();
        let (chunk, consumed) = self.decode_prefix(data)?;
        if consumed != total {
            return Err(XdifError::TrailingData(total - consumed));
        }
        Ok(chunk)
    }

    /// Decode the first record in `data`. Returns the chunk and the number
    /// of bytes it occupied; anything after that is left alone.
    pub fn decode_prefix(&self, data: impl Into<Bytes>) -> Result<(Chunk, usize)> {
        let data = data.into();
        let total = data.len();
        let mut cursor = Cursor::new(data);
        let chunk = self.decode_record(&mut cursor, 0)?;
        Ok((chunk, total - cursor.remaining()))
    }

    /// Instantiate the registered kind for `type_code` and decode `payload`
    /// into it.
    pub fn decode_payload(&self, type_code: TypeCode, payload: SerialisedPayload) -> Result<Chunk> {
        self.decode_payload_at(type_code, payload, 0)
    }

    fn decode_record(&self, cursor: &mut Cursor, depth: usize) -> Result<Chunk> {
        if depth > self.limits.max_depth {
            return Err(XdifError::DepthExceeded(self.limits.max_depth));
        }

        let header = cursor.read_header()?;
        let type_code = header.type_code();
        let length = header.length() as usize;
        tracing::trace!(
            type_code = %type_code,
            has_children = header.has_children(),
            length,
            depth,
            "chunk record"
        );

        if length > self.limits.max_payload_bytes {
            return Err(XdifError::PayloadTooLarge {
                len: length,
                max: self.limits.max_payload_bytes,
            });
        }
        let data = cursor.take(length)?;

        let payload = SerialisedPayload {
            has_children: header.has_children(),
            data,
        };
        self.decode_payload_at(type_code, payload, depth)
    }

    fn decode_payload_at(
        &self,
        type_code: TypeCode,
        payload: SerialisedPayload,
        depth: usize,
    ) -> Result<Chunk> {
        match self.registry.shape(&type_code) {
            Some(Shape::Leaf) => decode_leaf(type_code, payload),
            Some(Shape::Container) => self.decode_container(type_code, payload, depth),
            None => Err(XdifError::UnknownChunkType(type_code)),
        }
    }

    fn decode_container(
        &self,
        type_code: TypeCode,
        payload: SerialisedPayload,
        depth: usize,
    ) -> Result<Chunk> {
        let mut chunk = Chunk::container(type_code);

        match (payload.has_children, payload.data.is_empty()) {
            (false, true) => return Ok(chunk),
            (false, false) => {
                return Err(XdifError::PayloadError {
                    code: type_code,
                    reason: "payload present but has-children flag is clear",
                })
            }
            (true, true) => {
                return Err(XdifError::PayloadError {
                    code: type_code,
                    reason: "has-children flag set but payload is empty",
                })
            }
            (true, false) => {}
        }

        let mut cursor = Cursor::new(payload.data);
        while !cursor.is_empty() {
            let child = self.decode_record(&mut cursor, depth + 1)?;
            chunk.push_child(child)?;
        }
        Ok(chunk)
    }
}

fn decode_leaf(type_code: TypeCode, payload: SerialisedPayload) -> Result<Chunk> {
    if payload.has_children {
        return Err(XdifError::PayloadError {
            code: type_code,
            reason: "leaf record has the has-children flag set",
        });
    }
    Ok(Chunk::leaf(type_code, payload.data))
}

//! XDIF integration tests.
//!
//! These exercise the public API only: build trees through `Chunk`,
//! encode with `serialise`, decode with `deserialise` against a registry.
//!
//!   cargo test --test integration

use xdif_core::{Chunk, Registry, TypeCode, META, XDIF};

mod failures;
mod roundtrip;

// ── Harness ───────────────────────────────────────────────────────────────────

pub const LIST: TypeCode = TypeCode::from_static(*b"LIST");
pub const NAME: TypeCode = TypeCode::from_static(*b"NAME");
pub const DATA: TypeCode = TypeCode::from_static(*b"DATA");

/// Built-in kinds plus a few application kinds.
pub fn registry() -> Registry {
    let mut registry = Registry::with_builtin_kinds();
    registry.register_container(LIST);
    registry.register_leaf(NAME);
    registry.register_leaf(DATA);
    registry
}

/// Build a header + payload record by hand.
pub fn record(code: &[u8; 4], flags: u8, length: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = code.to_vec();
    out.extend_from_slice(&[flags, 0, 0, 0]);
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(payload);
    out
}

pub fn sample_tree() -> Chunk {
    let mut root = Chunk::container(XDIF);
    root.push_child(Chunk::leaf(META, &b"foobar"[..])).unwrap();
    root
}

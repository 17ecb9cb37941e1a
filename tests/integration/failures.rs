use xdif_core::{Chunk, Decoder, DecodeLimits, Registry, TypeCode, XdifError, META, XDIF};

use crate::*;

#[test]
fn unknown_type_is_rejected() {
    let bytes = record(b"ZZZZ", 0, 3, b"abc");
    let err = Chunk::deserialise(&registry(), bytes).unwrap_err();
    assert_eq!(err, XdifError::UnknownChunkType(TypeCode::from_static(*b"ZZZZ")));
    assert!(err.is_bad_chunk_type());
}

#[test]
fn unknown_child_fails_whole_tree() {
    let mut child_bytes = record(b"META", 0, 1, b"a");
    child_bytes.extend(record(b"ZZZZ", 0, 0, b""));
    let bytes = record(b"XDIF", 0x80, child_bytes.len() as u32, &child_bytes);

    let err = Chunk::deserialise(&registry(), bytes).unwrap_err();
    assert!(err.is_bad_chunk_type());
}

#[test]
fn unregistered_kind_with_empty_registry() {
    let bytes = sample_tree().serialise().unwrap();
    let err = Chunk::deserialise(&Registry::new(), bytes).unwrap_err();
    assert_eq!(err, XdifError::UnknownChunkType(XDIF));
}

#[test]
fn bad_type_codes_cannot_be_built() {
    assert!(matches!("ABC".parse::<TypeCode>(), Err(XdifError::BadChunkType(_))));
    assert!(matches!("ABCDE".parse::<TypeCode>(), Err(XdifError::BadChunkType(_))));
    assert!(TypeCode::new([b'A', b'B', b'C', 0x80]).is_err());
}

#[test]
fn declared_length_beyond_buffer_is_truncation() {
    let bytes = record(b"META", 0, 1000, b"only a few bytes");
    let err = Chunk::deserialise(&registry(), bytes).unwrap_err();
    assert_eq!(
        err,
        XdifError::Truncation {
            needed: 1000,
            available: 16
        }
    );
}

#[test]
fn every_strict_prefix_is_rejected() {
    let bytes = sample_tree().serialise().unwrap();
    let registry = registry();
    for len in 0..bytes.len() {
        let result = Chunk::deserialise(&registry, bytes.slice(..len));
        assert!(
            matches!(result, Err(XdifError::Truncation { .. })),
            "prefix of {len} bytes decoded as {result:?}"
        );
    }
}

#[test]
fn container_without_flag_but_with_payload() {
    let child = record(b"META", 0, 1, b"a");
    let bytes = record(b"XDIF", 0, child.len() as u32, &child);
    assert!(matches!(
        Chunk::deserialise(&registry(), bytes),
        Err(XdifError::PayloadError { .. })
    ));
}

#[test]
fn container_with_flag_but_no_payload() {
    let bytes = record(b"LIST", 0x80, 0, b"");
    assert!(matches!(
        Chunk::deserialise(&registry(), bytes),
        Err(XdifError::PayloadError { .. })
    ));
}

#[test]
fn trailing_bytes_after_root() {
    let mut bytes = sample_tree().serialise().unwrap().to_vec();
    bytes.push(0);
    assert_eq!(
        Chunk::deserialise(&registry(), bytes),
        Err(XdifError::TrailingData(1))
    );
}

#[test]
fn concatenated_records_decode_one_at_a_time() {
    let mut bytes = sample_tree().serialise().unwrap().to_vec();
    bytes.extend_from_slice(&Chunk::leaf(META, &b"second"[..]).serialise().unwrap());
    let bytes = bytes::Bytes::from(bytes);

    let registry = registry();
    let decoder = Decoder::new(&registry);
    let (first, used) = decoder.decode_prefix(bytes.clone()).unwrap();
    let second = decoder.decode(bytes.slice(used..)).unwrap();

    assert_eq!(first, sample_tree());
    assert_eq!(second.payload().unwrap(), &b"second"[..]);
}

#[test]
fn erase_out_of_range() {
    let mut root = sample_tree();
    assert_eq!(
        root.erase_child(5),
        Err(XdifError::IndexOutOfRange { index: 5, len: 1 })
    );
}

#[test]
fn deep_nesting_is_bounded() {
    let mut tree = Chunk::container(LIST);
    for _ in 0..10 {
        let mut parent = Chunk::container(LIST);
        parent.push_child(tree).unwrap();
        tree = parent;
    }
    let bytes = tree.serialise().unwrap();
    let registry = registry();

    let tight = DecodeLimits {
        max_depth: 5,
        ..DecodeLimits::default()
    };
    assert_eq!(
        Decoder::with_limits(&registry, tight).decode(bytes.clone()),
        Err(XdifError::DepthExceeded(5))
    );
    assert_eq!(Decoder::new(&registry).decode(bytes), Ok(tree));
}

use anyhow::Result;
use xdif_core::{Chunk, Registry, META, XDIF};

use crate::*;

#[test]
fn sample_tree_round_trips() -> Result<()> {
    let bytes = sample_tree().serialise()?;
    let tree = Chunk::deserialise(&Registry::with_builtin_kinds(), bytes)?;

    assert_eq!(tree.type_code(), XDIF);
    assert_eq!(tree.child_count(), 1);
    let meta = tree.child(0).unwrap();
    assert_eq!(meta.type_code(), META);
    assert_eq!(meta.payload().unwrap(), &b"foobar"[..]);
    Ok(())
}

#[test]
fn sample_tree_wire_bytes() -> Result<()> {
    let bytes = sample_tree().serialise()?;
    let mut expected = Vec::new();
    expected.extend_from_slice(b"XDIF\x80\0\0\0\0\0\0\x12");
    expected.extend_from_slice(b"META\0\0\0\0\0\0\0\x06foobar");
    assert_eq!(&bytes[..], &expected[..]);
    Ok(())
}

#[test]
fn empty_container_round_trips() -> Result<()> {
    let bytes = Chunk::container(LIST).serialise()?;
    assert_eq!(&bytes[..], &record(b"LIST", 0, 0, b"")[..]);

    let tree = Chunk::deserialise(&registry(), bytes)?;
    assert_eq!(tree.type_code(), LIST);
    assert!(tree.is_container());
    assert_eq!(tree.child_count(), 0);
    Ok(())
}

#[test]
fn sibling_order_is_preserved() -> Result<()> {
    let mut root = Chunk::container(XDIF);
    for name in ["A", "B", "C"] {
        root.add_child(&Chunk::leaf(NAME, name.as_bytes().to_vec()))?;
    }

    let tree = Chunk::deserialise(&registry(), root.serialise()?)?;
    let names: Vec<_> = tree
        .children()
        .iter()
        .map(|c| c.payload().unwrap().clone())
        .collect();
    assert_eq!(names, vec![&b"A"[..], &b"B"[..], &b"C"[..]]);
    Ok(())
}

#[test]
fn nested_containers_round_trip() -> Result<()> {
    let mut inner = Chunk::container(LIST);
    inner.push_child(Chunk::leaf(NAME, &b"first"[..]))?;
    inner.push_child(Chunk::container(LIST))?;
    inner.push_child(Chunk::leaf(DATA, vec![0u8, 1, 2, 0xff]))?;

    let mut root = Chunk::container(XDIF);
    root.push_child(Chunk::leaf(META, &b"header"[..]))?;
    root.push_child(inner)?;
    root.push_child(Chunk::leaf(META, Vec::<u8>::new()))?;

    let bytes = root.serialise()?;
    assert_eq!(bytes.len(), root.encoded_len());

    let tree = Chunk::deserialise(&registry(), bytes)?;
    assert_eq!(tree, root);

    let inner = tree.child(1).unwrap();
    assert_eq!(inner.type_code(), LIST);
    assert_eq!(inner.child_count(), 3);
    assert_eq!(inner.child(1).unwrap().child_count(), 0);
    assert_eq!(inner.child(2).unwrap().payload().unwrap(), &[0u8, 1, 2, 0xff][..]);
    Ok(())
}

#[test]
fn binary_payload_is_verbatim() -> Result<()> {
    let payload: Vec<u8> = (0..=255u8).collect();
    let leaf = Chunk::leaf(DATA, payload.clone());
    let tree = Chunk::deserialise(&registry(), leaf.serialise()?)?;
    assert_eq!(tree.payload().unwrap(), &payload[..]);
    Ok(())
}

#[test]
fn encoding_is_deterministic() -> Result<()> {
    let tree = sample_tree();
    let decoded = Chunk::deserialise(&Registry::with_builtin_kinds(), tree.serialise()?)?;
    assert_eq!(tree.serialise()?, decoded.serialise()?);
    Ok(())
}

#[test]
fn duplicate_registration_keeps_first_kind() -> Result<()> {
    let mut registry = registry();
    // META stays a leaf even if someone later claims it is a container
    assert!(!registry.register_container(META));

    let tree = Chunk::deserialise(&registry, sample_tree().serialise()?)?;
    assert_eq!(tree.child(0).unwrap().payload().unwrap(), &b"foobar"[..]);
    Ok(())
}

#[test]
fn registry_can_be_shared_across_threads() -> Result<()> {
    let registry = std::sync::Arc::new(registry());
    let bytes = sample_tree().serialise()?;

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = registry.clone();
            let bytes = bytes.clone();
            std::thread::spawn(move || Chunk::deserialise(&registry, bytes))
        })
        .collect();

    for handle in handles {
        let tree = handle.join().expect("decode thread panicked")?;
        assert_eq!(tree, sample_tree());
    }
    Ok(())
}

#[test]
fn deeply_nested_tree_round_trips_with_defaults() -> Result<()> {
    let mut tree = Chunk::leaf(META, &b"bottom"[..]);
    for _ in 0..70 {
        let mut parent = Chunk::container(XDIF);
        parent.push_child(tree)?;
        tree = parent;
    }

    let bytes = tree.serialise()?;
    assert_eq!(bytes.len(), tree.encoded_len());
    let decoded = Chunk::deserialise(&Registry::with_builtin_kinds(), bytes)?;
    assert_eq!(decoded, tree);
    Ok(())
}

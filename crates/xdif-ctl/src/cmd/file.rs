//! Commands that read or write encoded XDIF files.

use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;
use xdif_core::{Chunk, Decoder, Registry, XdifConfig, HEADER_LEN, META, XDIF};

/// Longest leaf payload shown inline by `dump`.
const PREVIEW_LEN: usize = 32;

/// The tree every XDIF tool ships as its example: a root holding one
/// metadata leaf.
pub fn sample_tree() -> Result<Chunk> {
    let mut root = Chunk::container(XDIF);
    let meta = Chunk::leaf(META, &b"foobar"[..]);
    root.add_child(&meta)?;
    Ok(root)
}

pub fn sample(out: &str) -> Result<()> {
    let data = sample_tree()?.serialise()?;
    std::fs::write(out, &data).with_context(|| format!("failed to write {out}"))?;
    tracing::info!(path = out, bytes = data.len(), "sample tree written");
    println!("Wrote {} bytes to {}", data.len(), out);
    Ok(())
}

fn read_tree(registry: &Registry, config: &XdifConfig, path: &Path) -> Result<(Bytes, Chunk)> {
    let data = Bytes::from(
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?,
    );
    let tree = Decoder::with_limits(registry, config.decode_limits())
        .decode(data.clone())
        .with_context(|| format!("failed to decode {}", path.display()))?;
    Ok((data, tree))
}

pub fn dump(registry: &Registry, config: &XdifConfig, path: &str) -> Result<()> {
    let (data, tree) = read_tree(registry, config, Path::new(path))?;
    tracing::debug!(path, bytes = data.len(), "decoded");
    print_tree(&tree, 0);
    Ok(())
}

fn print_tree(chunk: &Chunk, depth: usize) {
    let indent = "  ".repeat(depth + 1);
    match chunk.payload() {
        Some(payload) => println!(
            "{indent}{}  leaf  {} bytes  {}",
            chunk.type_code(),
            payload.len(),
            preview(payload)
        ),
        None => {
            let n = chunk.child_count();
            println!(
                "{indent}{}  container  {} {}",
                chunk.type_code(),
                n,
                if n == 1 { "child" } else { "children" }
            );
            for child in chunk.children() {
                print_tree(child, depth + 1);
            }
        }
    }
}

fn preview(payload: &[u8]) -> String {
    let shown = &payload[..payload.len().min(PREVIEW_LEN)];
    let ellipsis = if payload.len() > PREVIEW_LEN { "…" } else { "" };
    if shown.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        format!("{:?}{ellipsis}", String::from_utf8_lossy(shown))
    } else {
        format!("0x{}{ellipsis}", hex::encode(shown))
    }
}

/// Print every record header with its offset in the file.
pub fn hex_dump(registry: &Registry, config: &XdifConfig, path: &str) -> Result<()> {
    let (data, tree) = read_tree(registry, config, Path::new(path))?;
    println!("  offset    header                    type  length");
    print_headers(&data, &tree, 0, 0);
    Ok(())
}

fn print_headers(data: &[u8], chunk: &Chunk, offset: usize, depth: usize) {
    let header = &data[offset..offset + HEADER_LEN];
    println!(
        "  {offset:08x}  {}  {}{}  {}",
        hex::encode(header),
        "  ".repeat(depth),
        chunk.type_code(),
        chunk.encoded_len() - HEADER_LEN
    );
    let mut child_offset = offset + HEADER_LEN;
    for child in chunk.children() {
        print_headers(data, child, child_offset, depth + 1);
        child_offset += child.encoded_len();
    }
}

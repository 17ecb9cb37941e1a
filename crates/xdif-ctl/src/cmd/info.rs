//! Registry and config inspection commands.

use std::path::Path;

use anyhow::Result;
use xdif_core::{Registry, XdifConfig};

pub fn kinds(registry: &Registry) -> Result<()> {
    println!("═══════════════════════════════════════");
    println!("  Registered Chunk Kinds ({})", registry.len());
    println!("═══════════════════════════════════════");
    for (code, shape) in registry.kinds() {
        println!("  {}  {}", code, shape.name());
    }
    Ok(())
}

/// `path` is the file the config was actually resolved from.
pub fn config(config: &XdifConfig, path: &Path) -> Result<()> {
    print!("{}", render_config(config, path)?);
    Ok(())
}

fn render_config(config: &XdifConfig, path: &Path) -> Result<String> {
    Ok(format!("# {}\n{}", path.display(), config.to_toml()?))
}

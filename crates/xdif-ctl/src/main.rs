//! xdif-ctl — command-line tool for XDIF files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use xdif_core::{Registry, XdifConfig};

mod cmd;

fn print_usage() {
    println!("Usage: xdif-ctl [--config <path>] <command>");
    println!();
    println!("Commands:");
    println!("  sample <out>    Write the sample XDIF tree to <out>");
    println!("  dump <file>     Decode <file> and print its chunk tree");
    println!("  hex <file>      Print every record header in <file> with its offset");
    println!("  kinds           List registered chunk kinds");
    println!("  config          Print the effective configuration");
    println!();
    println!("Options:");
    println!("  --config <path>   Config file (default: {})", XdifConfig::file_path().display());
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    // Parse --config option
    let mut config_path: Option<PathBuf> = None;
    let mut remaining: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--config" {
            i += 1;
            config_path = Some(
                args.get(i)
                    .context("--config requires a value")?
                    .into(),
            );
        } else {
            remaining.push(&args[i]);
        }
        i += 1;
    }

    let config_path = config_path.unwrap_or_else(XdifConfig::file_path);
    let config = XdifConfig::load_from(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let registry = Registry::with_builtin_kinds();

    match remaining.as_slice() {
        ["sample", out]                     => cmd::file::sample(out),
        ["dump", path]                      => cmd::file::dump(&registry, &config, path),
        ["hex", path]                       => cmd::file::hex_dump(&registry, &config, path),
        ["kinds"]                           => cmd::info::kinds(&registry),
        ["config"]                          => cmd::info::config(&config, &config_path),
        ["help"] | ["--help"] | ["-h"] | [] => { print_usage(); Ok(()) }
        other => {
            eprintln!("Unknown command: {}", other.join(" "));
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

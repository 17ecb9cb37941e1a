//! CLI command modules.

pub mod file;
pub mod info;

//! Configuration for XDIF tools.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $XDIF_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/xdif/config.toml
//!   3. ~/.config/xdif/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::codec::{DecodeLimits, DEFAULT_MAX_DEPTH};
use crate::wire::MAX_PAYLOAD;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XdifConfig {
    pub limits: LimitsConfig,
}

/// Decoder bounds for untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Deepest chunk nesting accepted. The root is depth 0.
    pub max_depth: u32,
    /// Largest declared payload length accepted for a single chunk.
    pub max_payload_bytes: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH as u32,
            max_payload_bytes: MAX_PAYLOAD as u64,
        }
    }
}

impl From<&LimitsConfig> for DecodeLimits {
    fn from(cfg: &LimitsConfig) -> Self {
        Self {
            max_depth: cfg.max_depth as usize,
            max_payload_bytes: usize::try_from(cfg.max_payload_bytes)
                .unwrap_or(usize::MAX)
                .min(MAX_PAYLOAD),
        }
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_or_home().join(".config"))
        .join("xdif")
}

fn dirs_or_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    SerializeFailed(toml::ser::Error),
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl XdifConfig {
    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::file_path())
    }

    /// Load from an explicit path, falling back to defaults if it does not
    /// exist. Env overrides still apply.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// File → defaults, with no env overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(XdifConfig::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFailed(path.to_path_buf(), e))?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.to_path_buf(), e))
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("XDIF_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    /// Write default config if none exists. Returns the path.
    pub fn write_default_if_missing() -> Result<PathBuf, ConfigError> {
        let path = Self::file_path();
        Self::write_default_to(&path)?;
        Ok(path)
    }

    fn write_default_to(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::WriteFailed(path.to_path_buf(), e))?;
            }
            let text = XdifConfig::default().to_toml()?;
            std::fs::write(path, text)
                .map_err(|e| ConfigError::WriteFailed(path.to_path_buf(), e))?;
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::SerializeFailed)
    }

    /// Decoder limits described by this config.
    pub fn decode_limits(&self) -> DecodeLimits {
        DecodeLimits::from(&self.limits)
    }

    /// Apply XDIF_* env var overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("XDIF_LIMITS__MAX_DEPTH") {
            if let Ok(d) = v.parse() {
                self.limits.max_depth = d;
            }
        }
        if let Ok(v) = std::env::var("XDIF_LIMITS__MAX_PAYLOAD_BYTES") {
            if let Ok(n) = v.parse() {
                self.limits.max_payload_bytes = n;
            }
        }
    }
}

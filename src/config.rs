//! Scan policy configuration.
//!
//! The scanner's behavior on duplicate bindings is deployment policy, not
//! code, so it can be loaded from a TOML file alongside the rest of a
//! service's configuration.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Policy file could not be read.
    #[error("failed to read policy file: {0}")]
    Io(#[from] std::io::Error),
    /// Policy file is not valid TOML.
    #[error("failed to parse policy file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Policy applied when two handlers bind the same (request type, kind).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Fail the scan with
    /// [`ScanError::DuplicateBinding`](crate::error::ScanError::DuplicateBinding).
    #[default]
    Reject,
    /// Keep the binding scanned last and log a warning naming the shadowed
    /// handler.
    LastWins,
}

/// Scanner configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ScanPolicy {
    /// How duplicate bindings are treated.
    #[serde(default)]
    pub on_duplicate: DuplicatePolicy,
}

impl ScanPolicy {
    /// Load the policy from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let policy: ScanPolicy = toml::from_str(&content)?;
        Ok(policy)
    }
}

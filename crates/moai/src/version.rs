//! Version information for the moai CLI

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,

    /// Short git SHA, when set at build time via `GIT_SHA`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,

    pub os: String,
    pub arch: String,
}

impl VersionInfo {
    /// Version info for the running binary
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit: option_env!("GIT_SHA").map(String::from),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "moai {} ({}-{})", self.version, self.os, self.arch)
    }
}

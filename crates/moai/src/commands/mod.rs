//! CLI command implementations

pub mod analyze;
pub mod config;
pub mod generate;
pub mod version;

use anyhow::{Context, Result};
use camino::Utf8Path;
use moai_core::types::MoaiConfig;
use moai_core::ConfigLoader;

/// Load configuration from the default location or an explicit path
pub(crate) fn load_config(path: Option<&Utf8Path>) -> Result<MoaiConfig> {
    let loader = ConfigLoader::new().context("Failed to create config loader")?;
    loader.load(path).context("Failed to load configuration")
}

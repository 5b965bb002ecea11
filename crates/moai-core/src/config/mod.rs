//! Configuration loading
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. YAML file (`~/.moai/config.yaml`, or an explicit path)
//! 3. Environment variables (`MOAI_*`, plus `GEMINI_API_KEY`)
//! 4. CLI flags (handled by caller)

mod loader;

pub use loader::{ConfigLoader, CONFIG_FILE_NAME, ENV_VARS};

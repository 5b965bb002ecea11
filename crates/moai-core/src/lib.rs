//! # moai-core
//!
//! Core library for the Moai tools providing:
//! - Bounded retry execution engine with exponential backoff
//! - Retry policy types
//! - Layered configuration loading (defaults, YAML file, environment)

pub mod config;
pub mod error;
pub mod retry;
pub mod types;
pub mod utils;

pub use config::ConfigLoader;
pub use error::{Error, Result};
pub use utils::get_home_dir;

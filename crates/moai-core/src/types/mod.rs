//! Type definitions shared across Moai crates

mod runtime_config;

pub use runtime_config::*;

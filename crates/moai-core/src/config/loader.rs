//! Layered configuration loader

use crate::error::{Error, Result};
use crate::types::MoaiConfig;
use crate::utils::get_home_dir;
use camino::{Utf8Path, Utf8PathBuf};
use std::env;
use std::fmt::Display;
use std::fs;
use std::str::FromStr;

/// Configuration file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

const ENV_API_KEY: &str = "MOAI_GEMINI_API_KEY";
const ENV_API_KEY_FALLBACK: &str = "GEMINI_API_KEY";
const ENV_BASE_URL: &str = "MOAI_GEMINI_BASE_URL";
const ENV_IMAGE_MODEL: &str = "MOAI_IMAGE_MODEL";
const ENV_TEXT_MODEL: &str = "MOAI_TEXT_MODEL";
const ENV_HTTP_TIMEOUT: &str = "MOAI_HTTP_TIMEOUT_SECS";
const ENV_MAX_RETRIES: &str = "MOAI_RETRY_MAX_RETRIES";
const ENV_BASE_DELAY: &str = "MOAI_RETRY_BASE_DELAY_MS";
const ENV_BACKOFF_FACTOR: &str = "MOAI_RETRY_BACKOFF_FACTOR";

/// Every environment variable the loader reads
pub const ENV_VARS: &[&str] = &[
    ENV_API_KEY,
    ENV_API_KEY_FALLBACK,
    ENV_BASE_URL,
    ENV_IMAGE_MODEL,
    ENV_TEXT_MODEL,
    ENV_HTTP_TIMEOUT,
    ENV_MAX_RETRIES,
    ENV_BASE_DELAY,
    ENV_BACKOFF_FACTOR,
];

/// Configuration loader with precedence
pub struct ConfigLoader {
    /// Base directory for configuration files
    config_dir: Utf8PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the standard config directory (~/.moai)
    pub fn new() -> Result<Self> {
        let home = get_home_dir().map_err(|e| Error::invalid_config(e.to_string()))?;
        let home = Utf8PathBuf::from_path_buf(home).map_err(|p| {
            Error::invalid_config(format!("Home directory is not UTF-8: {}", p.display()))
        })?;

        Ok(Self {
            config_dir: home.join(".moai"),
        })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// The directory searched for `config.yaml`
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Path of the default configuration file
    pub fn default_config_path(&self) -> Utf8PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Load configuration from defaults, file and process environment
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(&self, path: Option<&Utf8Path>) -> Result<MoaiConfig> {
        self.load_with_env(path, |name| env::var(name).ok())
    }

    /// Load configuration using `lookup` instead of the process environment
    pub fn load_with_env<F>(&self, path: Option<&Utf8Path>, lookup: F) -> Result<MoaiConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = match path {
            Some(p) => Self::load_yaml_file(p)?,
            None => {
                let default_path = self.default_config_path();
                if default_path.exists() {
                    Self::load_yaml_file(&default_path)?
                } else {
                    tracing::debug!(path = %default_path, "no config file, using defaults");
                    MoaiConfig::default()
                }
            }
        };

        Self::apply_env_overrides(config, lookup)
    }

    /// Load a YAML file and parse it
    fn load_yaml_file(path: &Utf8Path) -> Result<MoaiConfig> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config_not_found(path.as_str())
            } else {
                Error::Io(e)
            }
        })?;

        if content.trim().is_empty() {
            return Ok(MoaiConfig::default());
        }

        let config: MoaiConfig = serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))?;

        tracing::debug!(path = %path, "loaded config file");
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides<F>(mut config: MoaiConfig, lookup: F) -> Result<MoaiConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(ENV_API_KEY).or_else(|| non_empty(ENV_API_KEY_FALLBACK)) {
            config.gemini.api_key = Some(key);
        }
        if let Some(url) = non_empty(ENV_BASE_URL) {
            config.gemini.base_url = url;
        }
        if let Some(model) = non_empty(ENV_IMAGE_MODEL) {
            config.gemini.image_model = model;
        }
        if let Some(model) = non_empty(ENV_TEXT_MODEL) {
            config.gemini.text_model = model;
        }
        if let Some(secs) = parse_var(ENV_HTTP_TIMEOUT, non_empty(ENV_HTTP_TIMEOUT))? {
            config.network.http_timeout_secs = secs;
        }

        // Retry variables win over the file for every operation, not just the default
        let max_retries: Option<u32> = parse_var(ENV_MAX_RETRIES, non_empty(ENV_MAX_RETRIES))?;
        let base_delay_ms: Option<u64> = parse_var(ENV_BASE_DELAY, non_empty(ENV_BASE_DELAY))?;
        let backoff_factor: Option<f64> =
            parse_var(ENV_BACKOFF_FACTOR, non_empty(ENV_BACKOFF_FACTOR))?;

        let retry = &mut config.retry;
        for policy in std::iter::once(&mut retry.default).chain(retry.operations.values_mut()) {
            if let Some(retries) = max_retries {
                policy.max_retries = retries;
            }
            if let Some(delay) = base_delay_ms {
                policy.base_delay_ms = delay;
            }
            if let Some(factor) = backoff_factor {
                policy.backoff_factor = factor;
            }
        }

        Ok(config)
    }
}

fn parse_var<T>(name: &str, value: Option<String>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| Error::invalid_env(name, raw.as_str(), e))
        })
        .transpose()
}

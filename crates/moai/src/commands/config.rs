//! Config commands

use anyhow::Result;
use camino::Utf8Path;
use moai_core::types::MoaiConfig;

use super::load_config;
use crate::cli::{ConfigCommands, ConfigShowArgs};

pub fn run(cmd: ConfigCommands, config_path: Option<&Utf8Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => show(args, config_path),
    }
}

fn show(args: ConfigShowArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = load_config(config_path)?;
    println!("{}", render(&config, args.json)?);
    Ok(())
}

/// Render the configuration with the API key redacted
fn render(config: &MoaiConfig, json: bool) -> Result<String> {
    let redacted = config.redacted();
    if json {
        Ok(serde_json::to_string_pretty(&redacted)?)
    } else {
        Ok(serde_yaml_ng::to_string(&redacted)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key() -> MoaiConfig {
        let mut config = MoaiConfig::default();
        config.gemini.api_key = Some("super-secret".to_string());
        config
    }

    #[test]
    fn test_render_yaml_redacts_key() {
        let yaml = render(&config_with_key(), false).unwrap();
        assert!(!yaml.contains("super-secret"));
        assert!(yaml.contains("api-key"));
        assert!(yaml.contains("max-retries: 3"));
    }

    #[test]
    fn test_render_json_redacts_key() {
        let json = render(&config_with_key(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["gemini"]["api-key"], "********");
        assert_eq!(value["retry"]["default"]["base-delay-ms"], 800);
    }
}

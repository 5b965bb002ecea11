//! Analyze command

use anyhow::{Context, Result};
use camino::Utf8Path;
use moai_core::types::JSON_OPERATION;
use moai_gemini::{read_file_as_data_url, CallOptions, DataUrl, GeminiClient, Part};

use super::load_config;
use crate::cli::AnalyzeArgs;
use crate::output;

pub async fn run(args: AnalyzeArgs, config_path: Option<&Utf8Path>, quiet: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let client = GeminiClient::from_config(&config).context("Failed to create API client")?;

    let mut options = CallOptions::new();
    options.model = args.model.clone();
    options.policy = args.retry.apply(config.retry.policy_for(JSON_OPERATION));

    let mut extra_parts = Vec::new();
    if let Some(path) = &args.image {
        let data_url =
            read_file_as_data_url(path).with_context(|| format!("Failed to read {}", path))?;
        let image = DataUrl::parse(&data_url)?;
        extra_parts.push(Part::inline(image.mime_type, image.data));
    }

    let spinner = output::spinner("Analyzing", quiet);
    let result = client.generate_json(&args.prompt, extra_parts, options).await;
    spinner.finish_and_clear();

    let response = result.context("Analysis failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let text = response.text();
    if text.trim().is_empty() {
        output::warning("The model returned no text");
        return Ok(());
    }

    println!("{}", render_text(&text));
    Ok(())
}

/// Pretty-print `text` when it is JSON, otherwise return it unchanged
fn render_text(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text_pretty_prints_json() {
        assert_eq!(render_text(r#"{"a":1}"#), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_render_text_keeps_plain_text() {
        assert_eq!(render_text("not json"), "not json");
    }
}

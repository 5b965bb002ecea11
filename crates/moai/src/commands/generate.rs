//! Generate command

use anyhow::{Context, Result};
use camino::Utf8Path;
use moai_core::types::IMAGE_OPERATION;
use moai_gemini::{read_file_as_data_url, CallOptions, GeminiClient, GenerateRequest};
use std::fs;

use super::load_config;
use crate::cli::GenerateArgs;
use crate::output;

pub async fn run(args: GenerateArgs, config_path: Option<&Utf8Path>, quiet: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let client = GeminiClient::from_config(&config).context("Failed to create API client")?;

    let mut options = CallOptions::new();
    options.model = args.model.clone();
    options.policy = args.retry.apply(config.retry.policy_for(IMAGE_OPERATION));

    let input = args
        .image
        .as_deref()
        .map(|path| {
            read_file_as_data_url(path).with_context(|| format!("Failed to read {}", path))
        })
        .transpose()?;

    let spinner = output::spinner("Generating image", quiet);
    let result = match &input {
        Some(data_url) => {
            client
                .generate_image_from_data_url(&args.prompt, data_url, options)
                .await
        }
        None => {
            client
                .generate_image(&GenerateRequest::text(&args.prompt), options)
                .await
        }
    };
    spinner.finish_and_clear();

    let image = result.context("Image generation failed")?;
    let bytes = image.decode().context("API returned an undecodable image")?;

    if !mime_matches_extension(&image.mime_type, &args.output) {
        output::warning(&format!(
            "Model returned {}; writing it unchanged to {}",
            image.mime_type, args.output
        ));
    }

    fs::write(&args.output, &bytes)
        .with_context(|| format!("Failed to write {}", args.output))?;

    output::success(&format!("Image written to {}", args.output));
    output::kv("Type", &image.mime_type);
    output::kv("Size", &output::human_size(bytes.len()));

    Ok(())
}

/// Whether `path`'s extension fits `mime_type`; paths without one always fit
fn mime_matches_extension(mime_type: &str, path: &Utf8Path) -> bool {
    let Some(ext) = path.extension() else {
        return true;
    };
    let ext = ext.to_ascii_lowercase();

    match mime_type {
        "image/png" => ext == "png",
        "image/jpeg" => ext == "jpg" || ext == "jpeg",
        "image/webp" => ext == "webp",
        "image/gif" => ext == "gif",
        _ => true,
    }
}

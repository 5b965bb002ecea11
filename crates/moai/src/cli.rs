//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use moai_core::types::RetryPolicy;

/// Default file the generated image is written to
pub const DEFAULT_OUTPUT: &str = "moai-output.png";

/// Moai - generate and analyze images with a generative model
#[derive(Parser, Debug)]
#[command(name = "moai")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a config file (default: ~/.moai/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an image from a prompt, optionally editing an input image
    Generate(GenerateArgs),

    /// Ask the text model for a JSON analysis
    Analyze(AnalyzeArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Show version information
    Version(VersionArgs),
}

/// Retry flags shared by the API commands
#[derive(Args, Debug, Clone, Default)]
pub struct RetryArgs {
    /// Retries after the first failed attempt
    #[arg(long)]
    pub retries: Option<u32>,

    /// Delay before the first retry, in milliseconds
    #[arg(long, value_name = "MS")]
    pub min_timeout: Option<u64>,

    /// Multiplier applied to the delay after each failure
    #[arg(long)]
    pub factor: Option<f64>,
}

impl RetryArgs {
    /// Apply the flags to `base`, or `None` when no flag was given
    pub fn apply(&self, base: &RetryPolicy) -> Option<RetryPolicy> {
        if self.retries.is_none() && self.min_timeout.is_none() && self.factor.is_none() {
            return None;
        }

        let mut policy = base.clone();
        if let Some(retries) = self.retries {
            policy.max_retries = retries;
        }
        if let Some(ms) = self.min_timeout {
            policy.base_delay_ms = ms;
        }
        if let Some(factor) = self.factor {
            policy.backoff_factor = factor;
        }
        Some(policy)
    }
}

// Generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Prompt describing the image
    #[arg(short, long)]
    pub prompt: String,

    /// Input image to edit
    #[arg(short, long)]
    pub image: Option<Utf8PathBuf>,

    /// Model to use instead of the configured image model
    #[arg(short, long)]
    pub model: Option<String>,

    /// Where to write the generated image
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: Utf8PathBuf,

    #[command(flatten)]
    pub retry: RetryArgs,
}

// Analyze command
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Prompt for the text model
    #[arg(short, long)]
    pub prompt: String,

    /// Image to include with the prompt
    #[arg(short, long)]
    pub image: Option<Utf8PathBuf>,

    /// Model to use instead of the configured text model
    #[arg(short, long)]
    pub model: Option<String>,

    /// Print the full API response as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub retry: RetryArgs,
}

// Config commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the resolved configuration (API key redacted)
    Show(ConfigShowArgs),
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

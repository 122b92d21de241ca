//! # `flavor-extractor` CLI Library
//!
//! Argument definitions and command handlers for the `flavor-extractor`
//! binary. Each command performs at most one extraction request.

pub mod render;
pub mod shell;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use flavor_extractor::{
    config::{DEFAULT_API_BASE, DEFAULT_MODEL, DOWNLOAD_FILE_NAME},
    image::{load_image_file, load_image_url},
    prompts::{build_system_prompt, build_user_prompt},
    response::to_download_json,
    ExtractError, ExtractorConfig, FlavorExtractor, ParsedOutput, SessionState,
};
use serde_json::Value;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

// --- CLI Argument Structs ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub api: ApiArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct ApiArgs {
    /// The OpenAI API key.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,
    /// The base URL of the OpenAI API.
    #[arg(long, env = "OPENAI_API_BASE", default_value = DEFAULT_API_BASE, global = true)]
    pub api_base: String,
    /// The model used for extraction.
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL, global = true)]
    pub model: String,
}

impl ApiArgs {
    pub fn config(&self) -> ExtractorConfig {
        ExtractorConfig {
            api_base: self.api_base.clone(),
            model: self.model.clone(),
            ..Default::default()
        }
    }

    pub fn api_key(&self) -> &str {
        self.api_key.as_deref().map(str::trim).unwrap_or_default()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether the API key is accepted
    CheckKey,
    /// Extract package text features from one image
    Extract(ExtractArgs),
    /// Print the system and user prompts sent with every image
    Prompt,
    /// Start an interactive session
    Shell,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ImageSourceArgs {
    /// Path to an image file (png, jpg, jpeg, webp, gif).
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// URL of an image. Google Drive share links are accepted.
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub source: ImageSourceArgs,
    /// Write the decoded JSON to this file.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
    /// Skip the advisory API key check before extracting.
    #[arg(long)]
    pub skip_key_check: bool,
}

// --- Public Entrypoint ---

/// The main entry point for the CLI library.
pub async fn run(cli: Cli) -> Result<()> {
    let mut out = io::stdout();
    let mut err = io::stderr();
    match cli.command {
        Commands::CheckKey => handle_check_key(&cli.api, &mut err).await,
        Commands::Extract(args) => handle_extract(&cli.api, &args, &mut out, &mut err).await,
        Commands::Prompt => handle_prompt(&mut out),
        Commands::Shell => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            shell::run_shell(cli.api.clone(), stdin, &mut out, &mut err).await
        }
    }
}

// --- Command Handlers ---

pub async fn handle_check_key<E: Write>(api: &ApiArgs, err: &mut E) -> Result<()> {
    let extractor = build_extractor(api)?;
    let mut session = SessionState::new();
    let status = extractor.check_api_key(&mut session).await;
    render::render_key_status(err, &status)?;
    if !status.ok {
        bail!("API key check failed: {}", status.message);
    }
    Ok(())
}

pub async fn handle_extract<O: Write, E: Write>(
    api: &ApiArgs,
    args: &ExtractArgs,
    out: &mut O,
    err: &mut E,
) -> Result<()> {
    info!("Starting 'extract' command with args: {:?}", args);
    let extractor = build_extractor(api)?;
    let mut session = SessionState::new();

    if !args.skip_key_check {
        let status = extractor.check_api_key(&mut session).await;
        render::render_key_status(err, &status)?;
    }

    let image = match (&args.source.file, &args.source.url) {
        (Some(path), _) => load_image_file(path).await?,
        (None, Some(url)) => Some(
            load_image_url(&reqwest::Client::new(), url, api.config().timeouts.image_fetch)
                .await
                .context("Image preview failed")?,
        ),
        (None, None) => None,
    };
    let Some(image) = image else {
        bail!(ExtractError::MissingImage);
    };

    writeln!(err, "⏳ Calling OpenAI...")?;
    let parsed = extractor
        .run_extraction(&mut session, Some(&image))
        .await
        .context("API call failed")?;
    render::render_output(out, err, &parsed, &session)?;

    match (&args.output, &parsed) {
        (Some(path), ParsedOutput::Json { value, .. }) => {
            let written = save_download(value, path).await?;
            writeln!(err, "💾 Saved {}", written.display())?;
        }
        (Some(path), _) => {
            writeln!(err, "Nothing saved to {}: the output is not JSON.", path.display())?;
        }
        (None, _) => {}
    }
    Ok(())
}

pub fn handle_prompt<O: Write>(out: &mut O) -> Result<()> {
    writeln!(out, "# System prompt\n\n{}", build_system_prompt())?;
    writeln!(out, "# User prompt\n\n{}", build_user_prompt())?;
    Ok(())
}

// --- Helpers ---

pub fn build_extractor(api: &ApiArgs) -> Result<FlavorExtractor> {
    Ok(FlavorExtractor::builder()
        .config(api.config())
        .api_key(api.api_key())
        .build()?)
}

/// Writes the download document for `value`, defaulting to `extraction.json`.
pub async fn save_download(value: &Value, path: &Path) -> Result<PathBuf> {
    let path = if path.as_os_str().is_empty() {
        PathBuf::from(DOWNLOAD_FILE_NAME)
    } else {
        path.to_path_buf()
    };
    let document = to_download_json(value)?;
    tokio::fs::write(&path, document)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

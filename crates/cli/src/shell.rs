//! # Interactive Session
//!
//! A line-oriented session mirroring the single-page workflow: set a key, stage
//! one image, run, then redisplay or save the latest result. The session keeps
//! one `SessionState`; every run overwrites it.

use crate::{build_extractor, render, save_download, ApiArgs};
use anyhow::Result;
use flavor_extractor::{
    config::DOWNLOAD_FILE_NAME,
    image::{load_image_file, load_image_url},
    last_output, ApiKeyStatus, ExtractError, ImageData, ParsedOutput, SessionState,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

const HELP: &str = "\
Commands:
  key <api-key>   set the API key and check it
  file <path>     stage an image file
  url <url>       stage an image URL (Google Drive share links accepted)
  run             run extraction on the staged image
  show            show the latest result again
  save [path]     save the latest JSON result (default: extraction.json)
  status          show key and image status
  help            show this help
  quit            leave the session";

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Key(String),
    File(String),
    Url(String),
    Run,
    Show,
    Save(Option<String>),
    Status,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl ShellCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        match (verb.to_ascii_lowercase().as_str(), rest) {
            ("", _) => ShellCommand::Empty,
            ("key", _) => ShellCommand::Key(rest.to_string()),
            ("file", path) if !path.is_empty() => ShellCommand::File(path.to_string()),
            ("url", url) if !url.is_empty() => ShellCommand::Url(url.to_string()),
            ("run", "") => ShellCommand::Run,
            ("show", "") => ShellCommand::Show,
            ("save", "") => ShellCommand::Save(None),
            ("save", path) => ShellCommand::Save(Some(path.to_string())),
            ("status", "") => ShellCommand::Status,
            ("help" | "?", _) => ShellCommand::Help,
            ("quit" | "exit", _) => ShellCommand::Quit,
            _ => ShellCommand::Unknown(line.to_string()),
        }
    }
}

/// State held for the lifetime of an interactive session.
struct Shell {
    api: ApiArgs,
    image: Option<ImageData>,
    session: SessionState,
}

impl Shell {
    async fn handle<O: Write, E: Write>(
        &mut self,
        command: ShellCommand,
        out: &mut O,
        err: &mut E,
    ) -> Result<bool> {
        match command {
            ShellCommand::Empty => {}
            ShellCommand::Help => writeln!(out, "{HELP}")?,
            ShellCommand::Quit => return Ok(false),
            ShellCommand::Unknown(line) => {
                writeln!(err, "Unknown command: {line}. Type `help` for commands.")?
            }
            ShellCommand::Key(key) => {
                self.api.api_key = Some(key);
                match build_extractor(&self.api) {
                    Ok(extractor) => {
                        let status = extractor.check_api_key(&mut self.session).await;
                        render::render_key_status(err, &status)?;
                    }
                    Err(e) => {
                        warn!("Key not usable: {e}");
                        let status = ApiKeyStatus::invalid("Missing API key");
                        render::render_key_status(err, &status)?;
                        self.session.set_api_key_status(status);
                    }
                }
            }
            ShellCommand::File(path) => {
                self.image = None;
                let loaded = load_image_file(Path::new(&path)).await;
                self.stage_image(loaded, err)?;
            }
            ShellCommand::Url(url) => {
                self.image = None;
                let loaded = load_image_url(
                    &reqwest::Client::new(),
                    &url,
                    self.api.config().timeouts.image_fetch,
                )
                .await
                .map(Some);
                self.stage_image(loaded, err)?;
            }
            ShellCommand::Run => self.run(out, err).await?,
            ShellCommand::Show => match last_output(&self.session) {
                Some(parsed) => render::render_output(out, err, &parsed, &self.session)?,
                None => writeln!(err, "No result yet. Stage an image and `run`.")?,
            },
            ShellCommand::Save(path) => self.save(path, err).await?,
            ShellCommand::Status => self.status(out)?,
        }
        Ok(true)
    }

    fn stage_image<E: Write>(
        &mut self,
        loaded: Result<Option<ImageData>, ExtractError>,
        err: &mut E,
    ) -> Result<()> {
        match loaded {
            Ok(Some(image)) => {
                writeln!(
                    err,
                    "🖼️  Image ready ({}, {} bytes)",
                    image.mime(),
                    image.byte_len()
                )?;
                self.image = Some(image);
            }
            Ok(None) => writeln!(err, "❌ Please provide a valid image.")?,
            Err(e) => {
                warn!("Image load failed: {e}");
                writeln!(err, "❌ Image preview failed: {e}")?;
            }
        }
        Ok(())
    }

    async fn run<O: Write, E: Write>(&mut self, out: &mut O, err: &mut E) -> Result<()> {
        let extractor = match build_extractor(&self.api) {
            Ok(extractor) => extractor,
            Err(e) => {
                writeln!(err, "❌ {e}")?;
                return Ok(());
            }
        };
        if self.image.is_none() {
            writeln!(err, "❌ Please provide a valid image before running.")?;
            return Ok(());
        }

        writeln!(err, "⏳ Calling OpenAI...")?;
        match extractor
            .run_extraction(&mut self.session, self.image.as_ref())
            .await
        {
            Ok(parsed) => render::render_output(out, err, &parsed, &self.session)?,
            Err(e) => writeln!(err, "❌ API call failed: {e}")?,
        }
        Ok(())
    }

    async fn save<E: Write>(&self, path: Option<String>, err: &mut E) -> Result<()> {
        match last_output(&self.session) {
            Some(ParsedOutput::Json { value, .. }) => {
                let target = PathBuf::from(path.unwrap_or_else(|| DOWNLOAD_FILE_NAME.to_string()));
                let written = save_download(&value, &target).await?;
                info!("Saved result to {}", written.display());
                writeln!(err, "💾 Saved {}", written.display())?;
            }
            Some(_) => writeln!(err, "Nothing to save: the latest output is not JSON.")?,
            None => writeln!(err, "Nothing to save yet.")?,
        }
        Ok(())
    }

    fn status<O: Write>(&self, out: &mut O) -> Result<()> {
        let key = match self.session.api_key_status() {
            Some(status) if status.ok => format!("valid ({})", status.message),
            Some(status) => format!("invalid ({})", status.message),
            None if self.api.api_key().is_empty() => "not set".to_string(),
            None => "set, not checked".to_string(),
        };
        let image = match &self.image {
            Some(image) => format!("{} ({} bytes)", image.mime(), image.byte_len()),
            None => "none".to_string(),
        };
        writeln!(out, "API key: {key}")?;
        writeln!(out, "Image:   {image}")?;
        writeln!(
            out,
            "Result:  {}",
            if self.session.has_result() { "available" } else { "none" }
        )?;
        Ok(())
    }
}

/// Runs the interactive session until `quit` or end of input.
pub async fn run_shell<R, O, E>(api: ApiArgs, input: R, out: &mut O, err: &mut E) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    O: Write,
    E: Write,
{
    let mut shell = Shell {
        api,
        image: None,
        session: SessionState::new(),
    };
    writeln!(err, "Flavor Extractor. Type `help` for commands.")?;

    let mut lines = input.lines();
    loop {
        write!(err, "flavor> ")?;
        err.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if !shell.handle(ShellCommand::parse(&line), out, err).await? {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ShellCommand::parse("  run "), ShellCommand::Run);
        assert_eq!(
            ShellCommand::parse("KEY sk-123"),
            ShellCommand::Key("sk-123".to_string())
        );
        assert_eq!(
            ShellCommand::parse("file ./my pack.png"),
            ShellCommand::File("./my pack.png".to_string())
        );
        assert_eq!(ShellCommand::parse("save"), ShellCommand::Save(None));
        assert_eq!(
            ShellCommand::parse("save out.json"),
            ShellCommand::Save(Some("out.json".to_string()))
        );
        assert_eq!(ShellCommand::parse(""), ShellCommand::Empty);
        assert_eq!(ShellCommand::parse("exit"), ShellCommand::Quit);
    }

    #[test]
    fn test_parse_rejects_missing_arguments() {
        assert_eq!(
            ShellCommand::parse("file"),
            ShellCommand::Unknown("file".to_string())
        );
        assert_eq!(
            ShellCommand::parse("run now"),
            ShellCommand::Unknown("run now".to_string())
        );
    }
}

//! Extractor backends and the fallback chain over them.
//!
//! Each backend turns a prepared photo into menu labels. The chain tries
//! them in order and returns the first non-empty result; only when every
//! backend fails does the caller see an error, listing each failure.

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use log::{debug, info, warn};
use thiserror::Error;

use super::image_prep::ImagePayload;
use super::ocr::{clean_ocr_lines, parse_model_reply};

/// Placeholder in a command template replaced by the temp image path
pub const IMAGE_PLACEHOLDER: &str = "{image}";

/// Default OCR command: tesseract with Japanese and English models
pub const DEFAULT_OCR_COMMAND: &str = "tesseract {image} - -l jpn+eng";

/// Something that can read menu items off a photo
pub trait MenuExtractor: Send + Sync {
    fn name(&self) -> &str;
    fn extract(&self, image: &ImagePayload) -> Result<Vec<String>>;
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no extractor configured")]
    NoExtractors,
    #[error("all extractors failed: {}", format_failures(.0))]
    AllFailed(Vec<(String, String)>),
}

fn format_failures(failures: &[(String, String)]) -> String {
    failures
        .iter()
        .map(|(name, err)| format!("{}: {}", name, err))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Ordered list of extractors tried one after another
#[derive(Default)]
pub struct ExtractorChain {
    extractors: Vec<Box<dyn MenuExtractor>>,
}

impl ExtractorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, extractor: impl MenuExtractor + 'static) -> Self {
        self.push(Box::new(extractor));
        self
    }

    pub fn push(&mut self, extractor: Box<dyn MenuExtractor>) {
        self.extractors.push(extractor);
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// First backend producing at least one label wins.
    ///
    /// An empty result counts as a failure so the next backend gets a go.
    pub fn extract(&self, image: &ImagePayload) -> Result<Vec<String>, ExtractError> {
        if self.extractors.is_empty() {
            return Err(ExtractError::NoExtractors);
        }
        let mut failures = Vec::new();
        for extractor in &self.extractors {
            match extractor.extract(image) {
                Ok(labels) if !labels.is_empty() => {
                    info!("{} extracted {} items", extractor.name(), labels.len());
                    return Ok(labels);
                }
                Ok(_) => {
                    debug!("{} found no items", extractor.name());
                    failures.push((extractor.name().to_string(), "no items found".to_string()));
                }
                Err(e) => {
                    warn!("{} failed: {:#}", extractor.name(), e);
                    failures.push((extractor.name().to_string(), format!("{:#}", e)));
                }
            }
        }
        Err(ExtractError::AllFailed(failures))
    }
}

/// Split a command template into program and arguments.
///
/// Arguments are separated by whitespace. Single or double quotes keep
/// spaces inside one argument, so `"/opt/My OCR/ocr" {image}` works.
pub fn split_command(template: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quote: Option<char> = None;

    for c in template.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_arg = true;
            }
            None if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            None => {
                current.push(c);
                in_arg = true;
            }
        }
    }
    if let Some(q) = quote {
        bail!("Unclosed {} in command: {}", q, template);
    }
    if in_arg {
        args.push(current);
    }
    Ok(args)
}

/// Run `template` on the photo and return its stdout.
///
/// `{image}` becomes the path of a temporary JPEG holding the photo, which
/// lives until the program exits. `stdin` is fed from its own thread so a
/// chatty program cannot deadlock against us.
fn run_template(template: &str, image: &ImagePayload, stdin: Option<String>) -> Result<String> {
    let mut parts = split_command(template)?.into_iter();
    let Some(program) = parts.next() else {
        bail!("Command is empty");
    };

    let mut file = tempfile::Builder::new()
        .prefix("menu-roulette-")
        .suffix(".jpg")
        .tempfile()
        .context("Failed to create temp image")?;
    file.write_all(&image.jpeg).context("Failed to write temp image")?;
    file.flush()?;
    let image_path = file.path().to_string_lossy().into_owned();

    let args: Vec<String> = parts.map(|a| a.replace(IMAGE_PLACEHOLDER, &image_path)).collect();
    debug!("Running {} {:?}", program, args);
    let mut child = Command::new(&program)
        .args(&args)
        .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to run {}", program))?;

    let writer = match (stdin, child.stdin.take()) {
        (Some(data), Some(mut pipe)) => Some(std::thread::spawn(move || {
            // Programs that only read `{image}` may exit without touching stdin
            if let Err(e) = pipe.write_all(data.as_bytes())
                && e.kind() != ErrorKind::BrokenPipe
            {
                warn!("Failed to write command input: {}", e);
            }
        })),
        _ => None,
    };

    let output = child
        .wait_with_output()
        .with_context(|| format!("Failed to wait for {}", program))?;
    if let Some(writer) = writer {
        let _ = writer.join();
    }

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("{} exited with {}: {}", program, output.status, stderr.trim());
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Runs an external OCR program on the image and cleans its stdout.
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    template: String,
}

impl CommandExtractor {
    pub fn new(template: impl Into<String>) -> Self {
        Self { template: template.into() }
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

impl Default for CommandExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_OCR_COMMAND)
    }
}

impl MenuExtractor for CommandExtractor {
    fn name(&self) -> &str {
        "ocr-command"
    }

    fn extract(&self, image: &ImagePayload) -> Result<Vec<String>> {
        let text = run_template(&self.template, image, None)?;
        Ok(clean_ocr_lines(&text))
    }
}

/// Asks a vision model, through a user-supplied command, for the dishes.
///
/// The photo is written to stdin as a `data:image/jpeg;base64,...` URL (and
/// is also available as `{image}`). Stdout is the model's reply, which
/// should hold a JSON array of dish names; plain lines are accepted too.
#[derive(Debug, Clone)]
pub struct ModelCommandExtractor {
    template: String,
}

impl ModelCommandExtractor {
    pub fn new(template: impl Into<String>) -> Self {
        Self { template: template.into() }
    }
}

impl MenuExtractor for ModelCommandExtractor {
    fn name(&self) -> &str {
        "model-command"
    }

    fn extract(&self, image: &ImagePayload) -> Result<Vec<String>> {
        let reply = run_template(&self.template, image, Some(image.data_url()))?;
        Ok(parse_model_reply(&reply))
    }
}

impl ExtractorChain {
    /// Chain for the configured commands: the model first, OCR as fallback.
    ///
    /// A blank command leaves its extractor out.
    pub fn from_commands(model_command: &str, ocr_command: &str) -> Self {
        let mut chain = Self::new();
        if !model_command.trim().is_empty() {
            chain.push(Box::new(ModelCommandExtractor::new(model_command)));
        }
        if !ocr_command.trim().is_empty() {
            chain.push(Box::new(CommandExtractor::new(ocr_command)));
        }
        chain
    }
}

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by input-source providers
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read input file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input source produced no text")]
    Empty,
}

/// A pluggable provider of free-text input for the recommendation form.
///
/// The original UI fed the form from typed text, uploaded files, and
/// speech-to-text. Each of those is a provider behind this trait, so
/// sources can be substituted or tested independently of the form. PDF and
/// speech extraction are environment capabilities and have no provider
/// here.
pub trait InputSource {
    fn extract_text(&self) -> Result<String, SourceError>;
}

/// Text supplied directly on the command line.
pub struct InlineTextSource {
    text: String,
}

impl InlineTextSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl InputSource for InlineTextSource {
    fn extract_text(&self) -> Result<String, SourceError> {
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(trimmed.to_string())
    }
}

/// Plain-text file read in full.
pub struct TextFileSource {
    path: PathBuf,
}

impl TextFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl InputSource for TextFileSource {
    fn extract_text(&self) -> Result<String, SourceError> {
        let text = std::fs::read_to_string(&self.path)?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(trimmed.to_string())
    }
}

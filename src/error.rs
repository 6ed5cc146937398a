//! Error types shared by the card engine, the sheet driver and the CLI.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NameplateError {
    #[error("Unknown function '{value}' for {person}")]
    UnknownFunction { person: String, value: String },
    #[error("{person} has no vehicle instructions")]
    EmptyInstructions { person: String },
    #[error("{person} has {count} vehicle instructions, too many to fit the card")]
    TooManyInstructions { person: String, count: usize },
    #[error("Qualifications block must be square, got {width}x{height}")]
    NonSquareBlock { width: f32, height: f32 },
    #[error("Missing asset {}: {reason}", path.display())]
    MissingAsset { path: PathBuf, reason: String },
    #[error("Failed to fetch image {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("Layout error: {0}")]
    Layout(String),
    #[error("Failed to generate QR code: {0}")]
    QrError(String),
    #[error("Failed to create PDF: {0}")]
    PdfError(String),
    #[error("Failed to render preview: {0}")]
    PreviewError(String),
    #[error("Invalid input: {0}")]
    InputError(String),
    #[error("Invalid config: {0}")]
    ConfigError(String),
    #[error("Card for {person} failed: {source}")]
    CardFailed {
        person: String,
        #[source]
        source: Box<NameplateError>,
    },
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl NameplateError {
    /// Attach the person a card was being built for.
    pub fn for_person(self, person: impl Into<String>) -> Self {
        match self {
            already @ NameplateError::CardFailed { .. } => already,
            other => NameplateError::CardFailed {
                person: person.into(),
                source: Box::new(other),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, NameplateError>;

//! Loads activity events exported by the project tracker.

mod parser;

use std::io::Read;
use std::path::Path;

use crate::xp::RawEvent;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read event export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid event CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid event JSON data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("event {index}: {column} value '{value}' is not understood")]
    InvalidCell {
        index: usize,
        column: &'static str,
        value: String,
    },
    #[error("unsupported event export '{0}', expected .json or .csv")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFormat {
    Json,
    Csv,
}

impl EventFormat {
    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            _ => Err(ImportError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

pub fn load_events<P: AsRef<Path>>(path: P) -> Result<Vec<RawEvent>, ImportError> {
    let path = path.as_ref();
    let format = EventFormat::from_path(path)?;
    let file = std::fs::File::open(path)?;
    events_from_reader(file, format)
}

pub fn events_from_reader<R: Read>(
    reader: R,
    format: EventFormat,
) -> Result<Vec<RawEvent>, ImportError> {
    match format {
        EventFormat::Json => events_from_json_reader(reader),
        EventFormat::Csv => parser::parse_csv_events(reader),
    }
}

pub fn events_from_json_reader<R: Read>(reader: R) -> Result<Vec<RawEvent>, ImportError> {
    Ok(serde_json::from_reader(reader)?)
}

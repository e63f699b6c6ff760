use std::path::PathBuf;

use chrono::{DateTime, Utc};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid GPX: {0}")]
    InvalidGpx(String),
    #[error("No track points found in file")]
    EmptyFile,
}

#[derive(Debug, thiserror::Error)]
pub enum TimeFormatError {
    #[error("Unrecognized time format: {0:?}")]
    Unrecognized(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid target pace: {0:?}")]
    InvalidPace(String),
    #[error("Invalid {field} range: {low} > {high}")]
    InvertedRange {
        field: &'static str,
        low: f64,
        high: f64,
    },
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    #[error("Activity of {total_s:.0} s starting at {base} runs past the supported time range")]
    OutOfRange { base: DateTime<Utc>, total_s: f64 },
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("TCX generation failed: {0}")]
    Xml(String),
}

impl From<quick_xml::Error> for RenderError {
    fn from(e: quick_xml::Error) -> Self {
        RenderError::Xml(e.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Timeline(#[from] TimelineError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Write(#[from] WriteError),
}

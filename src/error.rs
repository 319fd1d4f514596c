use std::path::PathBuf;
use thiserror::Error;

use crate::invoice::SUPPORTED_LOCALES;
use crate::pdf::RenderError;

#[derive(Error, Debug)]
pub enum InvoiceError {
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse invoice file {path}: {reason}")]
    InputParse { path: PathBuf, reason: String },

    #[error("Invalid invoice {number}: {reason}")]
    InvalidDocument { number: String, reason: String },

    #[error("Unknown locale '{0}'. Supported: {list}", list = SUPPORTED_LOCALES.join(", "))]
    UnknownLocale(String),

    #[error("Unknown page size '{0}'. Use 'a4' or 'letter'.")]
    UnknownPageSize(String),

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("No document produced: {0}")]
    Render(#[from] RenderError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InvoiceError>;

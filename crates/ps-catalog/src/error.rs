//! Error types for catalog construction and loading.

use ps_core::PsError;
use std::path::PathBuf;
use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Curve has {got} point(s); at least 2 are required")]
    TooFewPoints { got: usize },

    #[error("Curve column '{field}' has {got} values but flow has {expected}")]
    MismatchedLengths {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Non-finite {field} value at point {index}")]
    NonFinite { field: &'static str, index: usize },

    #[error("Duplicate flow value {flow} m3/h on one curve")]
    DuplicateFlow { flow: f64 },

    #[error("Invalid {what}: {value}")]
    InvalidValue { what: &'static str, value: f64 },

    #[error("Duplicate pump code: {0}")]
    DuplicatePumpCode(String),

    #[error("Unsupported catalog file extension: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Failed to read catalog file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] PsError),
}

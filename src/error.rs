use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors: setup problems that stop a run before any record is
/// classified, and file I/O around the batch.
#[derive(Debug, Error)]
pub enum JobsiftError {
    #[error("{0} not set")]
    MissingCredential(&'static str),

    #[error("{} not found", .0.display())]
    InputNotFound(PathBuf),

    #[error("missing columns in {}: {}", path.display(), missing.join(", "))]
    InputMalformed { path: PathBuf, missing: Vec<String> },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

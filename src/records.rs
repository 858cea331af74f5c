//! CSV persistence for [`JobRecord`]s.
//!
//! Both the fetched listing and the filtered result use the same four
//! columns. Writing an empty set is skipped outright, so a missing output
//! file means "no results" rather than an error.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::JobsiftError;

pub const COLUMNS: [&str; 4] = ["Title", "Company", "Location", "Apply URL"];

/// One job posting. Records are never modified, only kept or dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Apply URL")]
    pub apply_url: String,
}

/// What [`save_records`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Written(usize),
    /// Nothing to save; no file was created or touched.
    Skipped,
}

/// Reads every record from `path`, failing if the file is absent or lacks a required column.
pub fn load_records(path: &Path) -> Result<Vec<JobRecord>, JobsiftError> {
    info!(path = %path.display(), "loading jobs");
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => JobsiftError::InputNotFound(path.to_path_buf()),
        _ => JobsiftError::Io(e),
    })?;

    let mut reader = csv::Reader::from_reader(file);
    let headers = reader.headers()?.clone();
    let missing: Vec<String> = COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(JobsiftError::InputMalformed {
            path: path.to_path_buf(),
            missing,
        });
    }

    let records = reader
        .deserialize::<JobRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    info!(count = records.len(), "loaded jobs");
    Ok(records)
}

/// Writes `records` to `path` with a header row, unless there are none.
pub fn save_records(path: &Path, records: &[JobRecord]) -> Result<SaveOutcome, JobsiftError> {
    if records.is_empty() {
        warn!(path = %path.display(), "no jobs to save, skipping write");
        return Ok(SaveOutcome::Skipped);
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!(path = %path.display(), count = records.len(), "saved jobs");
    Ok(SaveOutcome::Written(records.len()))
}

//! Input record loading for `run`

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tokio::fs;
use tracing::debug;

use crate::domain::input::{BinaryEntry, InputRecord, Parameters};
use crate::domain::transcription::MediaType;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read input file {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Invalid input record {index} in {path}: {message}")]
    Parse {
        path: PathBuf,
        index: usize,
        message: String,
    },

    #[error("Audio file not found: {0}")]
    MissingFile(PathBuf),
}

/// Build the records for a run.
///
/// Records from `input` come first, then one record per audio file. With
/// neither, a single record carries the command-line parameters alone. Every
/// record's parameters are layered over `defaults`.
pub async fn load_records(
    input: Option<&Path>,
    files: &[PathBuf],
    defaults: &Parameters,
) -> Result<Vec<InputRecord>, InputError> {
    let mut records = match input {
        Some(path) => read_input_file(path).await?,
        None => Vec::new(),
    };

    let property = defaults.binary_property_or_default().to_string();
    for path in files {
        let entry = file_entry(path).await?;
        records.push(InputRecord::default().with_binary(property.clone(), entry));
    }

    if records.is_empty() {
        records.push(InputRecord::default());
    }

    Ok(records
        .into_iter()
        .map(|record| InputRecord {
            parameters: defaults.clone().merge(record.parameters),
            binary: record.binary,
        })
        .collect())
}

async fn read_input_file(path: &Path) -> Result<Vec<InputRecord>, InputError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| InputError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let records = parse_records(&content).map_err(|(index, message)| InputError::Parse {
        path: path.to_path_buf(),
        index,
        message,
    })?;
    debug!(path = %path.display(), count = records.len(), "Loaded input records");
    Ok(records)
}

/// Parse a JSON array, a single JSON object, or newline-delimited JSON
fn parse_records(content: &str) -> Result<Vec<InputRecord>, (usize, String)> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        let values: Vec<Value> = serde_json::from_str(trimmed).map_err(|e| (0, e.to_string()))?;
        return values
            .into_iter()
            .enumerate()
            .map(|(index, value)| record_from(index, value))
            .collect();
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return record_from(0, value).map(|record| vec![record]);
    }

    trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, line)| {
            let value = serde_json::from_str(line).map_err(|e| (index, e.to_string()))?;
            record_from(index, value)
        })
        .collect()
}

fn record_from(index: usize, value: Value) -> Result<InputRecord, (usize, String)> {
    serde_json::from_value(value).map_err(|e| (index, e.to_string()))
}

async fn file_entry(path: &Path) -> Result<BinaryEntry, InputError> {
    let metadata = fs::metadata(path)
        .await
        .map_err(|_| InputError::MissingFile(path.to_path_buf()))?;
    if !metadata.is_file() {
        return Err(InputError::MissingFile(path.to_path_buf()));
    }

    let media = MediaType::from_path(path);
    Ok(BinaryEntry {
        id: Some(path.to_string_lossy().into_owned()),
        data: None,
        mime_type: media.map(|m| m.as_str().to_string()),
        file_name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned()),
        file_extension: path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase()),
        file_size: Some(metadata.len()),
    })
}

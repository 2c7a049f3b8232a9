//! Input and output records

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::parameters::{non_blank, Parameters};
use crate::domain::error::ValidationError;
use crate::domain::transcription::{is_media_mime, MediaType};

/// Metadata for a binary payload supplied by the host.
///
/// `id` is a handle the binary store can stream from; `data` is an inline
/// base64 payload. At least one of them must be set for the payload to be
/// readable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BinaryEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_extension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl BinaryEntry {
    /// Reject payloads whose declared MIME type is neither audio nor video.
    /// An undeclared type is let through for the API to judge.
    pub fn ensure_media(&self) -> Result<(), ValidationError> {
        match non_blank(self.mime_type.as_deref()) {
            Some(mime) if !is_media_mime(mime) => Err(ValidationError::UnsupportedMimeType {
                mime_type: mime.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Extension for a synthesized file name: declared extension, else one
    /// guessed from the MIME type
    pub fn guessed_extension(&self) -> Option<String> {
        non_blank(self.file_extension.as_deref())
            .map(|e| e.trim_start_matches('.').to_string())
            .or_else(|| {
                non_blank(self.mime_type.as_deref())
                    .and_then(MediaType::from_mime)
                    .map(|m| m.extension().to_string())
            })
    }

    pub fn content_type(&self) -> &str {
        non_blank(self.mime_type.as_deref()).unwrap_or("application/octet-stream")
    }
}

/// One unit of work for the execution loop
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InputRecord {
    pub parameters: Parameters,
    pub binary: BTreeMap<String, BinaryEntry>,
}

impl InputRecord {
    pub fn new(parameters: Parameters) -> Self {
        Self {
            parameters,
            binary: BTreeMap::new(),
        }
    }

    pub fn with_binary(mut self, property: impl Into<String>, entry: BinaryEntry) -> Self {
        self.binary.insert(property.into(), entry);
        self
    }

    /// Look up a binary property, checking its MIME class
    pub fn media_entry(&self, property: &str) -> Result<&BinaryEntry, ValidationError> {
        if self.binary.is_empty() {
            return Err(ValidationError::NoBinaryData {
                property: property.to_string(),
            });
        }

        let entry = self
            .binary
            .get(property)
            .ok_or_else(|| ValidationError::MissingBinaryProperty {
                property: property.to_string(),
                available: self.binary.keys().cloned().collect::<Vec<_>>().join(", "),
            })?;

        entry.ensure_media()?;
        Ok(entry)
    }
}

/// One result row, tagged with the input record it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    pub index: usize,
    pub json: Value,
    /// Set only for records produced by [`OutputRecord::error`]
    #[serde(skip)]
    failed: bool,
}

impl OutputRecord {
    pub fn new(index: usize, json: Value) -> Self {
        Self {
            index,
            json,
            failed: false,
        }
    }

    /// Record standing in for a failed input under continue-on-failure
    pub fn error(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            json: json!({ "error": message.into() }),
            failed: true,
        }
    }

    pub fn is_error(&self) -> bool {
        self.failed
    }
}

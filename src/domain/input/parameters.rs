//! Per-record operation parameters
//!
//! Field names follow the camelCase spelling used by input files. Every
//! field is optional so that record parameters can be layered over defaults
//! supplied on the command line.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default binary property holding the audio payload
pub const DEFAULT_BINARY_PROPERTY: &str = "data";

/// Default page size for single-page listings
pub const DEFAULT_LIST_LIMIT: u32 = 50;

/// Largest page the API serves in one request
pub const MAX_LIST_LIMIT: u32 = 100;

/// Accepted `checkInterval` range, in seconds
pub const MIN_CHECK_INTERVAL_SECS: u64 = 1;
pub const MAX_CHECK_INTERVAL_SECS: u64 = 60;

/// Accepted `maxWaitTime` range, in seconds
pub const MIN_MAX_WAIT_SECS: u64 = 10;
pub const MAX_MAX_WAIT_SECS: u64 = 1800;

/// Where a `transcribe` operation takes its audio from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Binary,
    Url,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Parameters {
    pub source: Option<SourceKind>,
    pub binary_property_name: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_id: Option<String>,
    pub transcription_id: Option<String>,
    pub model: Option<String>,
    pub return_all: Option<bool>,
    pub limit: Option<u32>,
    pub additional_fields: AdditionalFields,
    pub options: WaitOptions,
}

/// Optional request fields, in their raw input form.
///
/// Keys not recognized here land in `extra` and are passed through to the
/// transcription request body after audio-source keys are stripped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdditionalFields {
    /// Comma-separated language codes
    pub language_hints: Option<String>,
    pub language_hints_strict: Option<bool>,
    /// JSON array of `{key, value}` objects
    pub context_general: Option<String>,
    pub context_text: Option<String>,
    /// Comma-separated terms
    pub context_terms: Option<String>,
    /// JSON array of `{source, target}` objects
    pub context_translation_terms: Option<String>,
    /// `one_way` or `two_way`
    pub translation_type: Option<String>,
    pub target_language: Option<String>,
    pub language_a: Option<String>,
    pub language_b: Option<String>,
    pub enable_speaker_diarization: Option<bool>,
    pub enable_language_identification: Option<bool>,
    pub webhook_url: Option<String>,
    pub webhook_auth_header_name: Option<String>,
    pub webhook_auth_header_value: Option<String>,
    pub client_reference_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Polling and cleanup options for orchestrated operations
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WaitOptions {
    /// Seconds, clamped to `MIN_MAX_WAIT_SECS..=MAX_MAX_WAIT_SECS`
    pub max_wait_time: Option<u64>,
    /// Seconds, clamped to `MIN_CHECK_INTERVAL_SECS..=MAX_CHECK_INTERVAL_SECS`
    pub check_interval: Option<u64>,
    pub delete_audio_file: Option<bool>,
    pub delete_transcription: Option<bool>,
    pub include_tokens: Option<bool>,
}

impl Parameters {
    /// Merge with another set, where `other` takes precedence.
    pub fn merge(self, other: Self) -> Self {
        Self {
            source: other.source.or(self.source),
            binary_property_name: other.binary_property_name.or(self.binary_property_name),
            file_url: other.file_url.or(self.file_url),
            file_name: other.file_name.or(self.file_name),
            file_id: other.file_id.or(self.file_id),
            transcription_id: other.transcription_id.or(self.transcription_id),
            model: other.model.or(self.model),
            return_all: other.return_all.or(self.return_all),
            limit: other.limit.or(self.limit),
            additional_fields: self.additional_fields.merge(other.additional_fields),
            options: self.options.merge(other.options),
        }
    }

    pub fn source_or_default(&self) -> SourceKind {
        self.source.unwrap_or_default()
    }

    pub fn binary_property_or_default(&self) -> &str {
        self.binary_property_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BINARY_PROPERTY)
    }

    pub fn return_all_or_default(&self) -> bool {
        self.return_all.unwrap_or(false)
    }

    /// Page size for a single-page listing, clamped to `1..=MAX_LIST_LIMIT`
    pub fn limit_or_default(&self) -> u32 {
        self.limit
            .filter(|l| *l > 0)
            .map_or(DEFAULT_LIST_LIMIT, |l| l.min(MAX_LIST_LIMIT))
    }

    /// Explicit upload file name, if a non-blank one was given
    pub fn file_name(&self) -> Option<&str> {
        non_blank(self.file_name.as_deref())
    }
}

impl AdditionalFields {
    pub fn merge(self, other: Self) -> Self {
        let mut extra = self.extra;
        extra.extend(other.extra);

        Self {
            language_hints: other.language_hints.or(self.language_hints),
            language_hints_strict: other.language_hints_strict.or(self.language_hints_strict),
            context_general: other.context_general.or(self.context_general),
            context_text: other.context_text.or(self.context_text),
            context_terms: other.context_terms.or(self.context_terms),
            context_translation_terms: other
                .context_translation_terms
                .or(self.context_translation_terms),
            translation_type: other.translation_type.or(self.translation_type),
            target_language: other.target_language.or(self.target_language),
            language_a: other.language_a.or(self.language_a),
            language_b: other.language_b.or(self.language_b),
            enable_speaker_diarization: other
                .enable_speaker_diarization
                .or(self.enable_speaker_diarization),
            enable_language_identification: other
                .enable_language_identification
                .or(self.enable_language_identification),
            webhook_url: other.webhook_url.or(self.webhook_url),
            webhook_auth_header_name: other
                .webhook_auth_header_name
                .or(self.webhook_auth_header_name),
            webhook_auth_header_value: other
                .webhook_auth_header_value
                .or(self.webhook_auth_header_value),
            client_reference_id: other.client_reference_id.or(self.client_reference_id),
            extra,
        }
    }
}

impl WaitOptions {
    pub fn merge(self, other: Self) -> Self {
        Self {
            max_wait_time: other.max_wait_time.or(self.max_wait_time),
            check_interval: other.check_interval.or(self.check_interval),
            delete_audio_file: other.delete_audio_file.or(self.delete_audio_file),
            delete_transcription: other.delete_transcription.or(self.delete_transcription),
            include_tokens: other.include_tokens.or(self.include_tokens),
        }
    }

    /// Uploaded audio is removed after a successful transcription unless disabled
    pub fn delete_audio_file_or_default(&self) -> bool {
        self.delete_audio_file.unwrap_or(true)
    }

    pub fn delete_transcription_or_default(&self) -> bool {
        self.delete_transcription.unwrap_or(false)
    }

    pub fn include_tokens_or_default(&self) -> bool {
        self.include_tokens.unwrap_or(false)
    }
}

/// Trimmed value, or `None` when absent or blank
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

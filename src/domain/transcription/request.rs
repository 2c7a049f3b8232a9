//! Transcription request body

use serde::Serialize;
use serde_json::{Map, Value};

use super::context::{split_list, ContextBlock};
use super::file_id::FileId;
use crate::domain::error::ValidationError;
use crate::domain::input::{non_blank, AdditionalFields};

/// Keys naming an audio source. They are never taken from the extra-fields bag.
pub const AUDIO_SOURCE_KEYS: &[&str] = &["audio_url", "audioUrl", "file_id", "fileId"];

/// Where the submitted job reads its audio from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AudioHandle {
    #[serde(rename = "file_id")]
    FileId(FileId),
    #[serde(rename = "audio_url")]
    AudioUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TranslationSpec {
    OneWay {
        target_language: String,
    },
    TwoWay {
        language_a: String,
        language_b: String,
    },
}

impl TranslationSpec {
    /// Built only when the selected type has all of its languages
    pub fn from_fields(fields: &AdditionalFields) -> Option<Self> {
        let kind = non_blank(fields.translation_type.as_deref())?.to_lowercase();
        match kind.as_str() {
            "one_way" => Some(Self::OneWay {
                target_language: non_blank(fields.target_language.as_deref())?.to_string(),
            }),
            "two_way" => Some(Self::TwoWay {
                language_a: non_blank(fields.language_a.as_deref())?.to_string(),
                language_b: non_blank(fields.language_b.as_deref())?.to_string(),
            }),
            _ => None,
        }
    }
}

/// Completion callback; serialized flat into the request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookSpec {
    #[serde(rename = "webhook_url")]
    pub url: String,
    #[serde(
        rename = "webhook_auth_header_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub auth_header_name: Option<String>,
    #[serde(
        rename = "webhook_auth_header_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub auth_header_value: Option<String>,
}

impl WebhookSpec {
    pub fn from_fields(fields: &AdditionalFields) -> Option<Self> {
        Some(Self {
            url: non_blank(fields.webhook_url.as_deref())?.to_string(),
            auth_header_name: non_blank(fields.webhook_auth_header_name.as_deref())
                .map(str::to_string),
            auth_header_value: non_blank(fields.webhook_auth_header_value.as_deref())
                .map(str::to_string),
        })
    }
}

/// Body of `POST /transcriptions`.
///
/// The audio handle is a single enum value, so a request always names
/// exactly one of `file_id`/`audio_url`; [`TranscriptionRequest::to_body`]
/// checks the serialized form again before it leaves the process.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptionRequest {
    model: String,
    #[serde(flatten)]
    audio: AudioHandle,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_hints: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_hints_strict: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<ContextBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    translation: Option<TranslationSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    enable_speaker_diarization: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    enable_language_identification: Option<bool>,
    #[serde(flatten)]
    webhook: Option<WebhookSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_reference_id: Option<String>,
    #[serde(skip)]
    extra: Map<String, Value>,
}

impl TranscriptionRequest {
    pub fn build(
        model: Option<&str>,
        audio: AudioHandle,
        fields: &AdditionalFields,
    ) -> Result<Self, ValidationError> {
        let model = non_blank(model).ok_or(ValidationError::MissingModel)?;

        let audio = match audio {
            AudioHandle::AudioUrl(url) => match non_blank(Some(&url)) {
                Some(url) => AudioHandle::AudioUrl(url.to_string()),
                None => return Err(ValidationError::MissingField("Audio URL")),
            },
            handle => handle,
        };

        let hints = split_list(fields.language_hints.as_deref());

        Ok(Self {
            model: model.to_string(),
            audio,
            language_hints: (!hints.is_empty()).then_some(hints),
            language_hints_strict: fields.language_hints_strict.filter(|b| *b),
            context: ContextBlock::from_fields(fields),
            translation: TranslationSpec::from_fields(fields),
            enable_speaker_diarization: fields.enable_speaker_diarization.filter(|b| *b),
            enable_language_identification: fields.enable_language_identification.filter(|b| *b),
            webhook: WebhookSpec::from_fields(fields),
            client_reference_id: non_blank(fields.client_reference_id.as_deref())
                .map(str::to_string),
            extra: strip_audio_keys(&fields.extra),
        })
    }

    /// Serialize to the wire body. Typed fields win over extra fields, and
    /// the body must name exactly one audio source.
    pub fn to_body(&self) -> Result<Value, ValidationError> {
        let Value::Object(mut body) = serde_json::to_value(self)
            .map_err(|e| ValidationError::RequestBody(e.to_string()))?
        else {
            return Err(ValidationError::RequestBody(
                "request did not serialize to an object".to_string(),
            ));
        };

        for (key, value) in &self.extra {
            body.entry(key.clone()).or_insert_with(|| value.clone());
        }

        match (body.contains_key("file_id"), body.contains_key("audio_url")) {
            (true, false) | (false, true) => Ok(Value::Object(body)),
            (false, false) => Err(ValidationError::MissingAudioSource),
            (true, true) => Err(ValidationError::ConflictingAudioSource),
        }
    }
}

fn strip_audio_keys(extra: &Map<String, Value>) -> Map<String, Value> {
    extra
        .iter()
        .filter(|(key, _)| !AUDIO_SOURCE_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

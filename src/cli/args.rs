//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::input::{AdditionalFields, Parameters, SourceKind, WaitOptions};
use crate::domain::operation::Resource;

/// soniox-batch - batch speech-to-text against the Soniox async API
#[derive(Parser, Debug)]
#[command(name = "soniox-batch")]
#[command(version)]
#[command(about = "Batch speech-to-text with the Soniox async transcription API")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an operation over input records
    Run(Box<RunArgs>),
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Resource argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ResourceArg {
    File,
    Transcription,
    Model,
}

impl From<ResourceArg> for Resource {
    fn from(arg: ResourceArg) -> Self {
        match arg {
            ResourceArg::File => Resource::File,
            ResourceArg::Transcription => Resource::Transcription,
            ResourceArg::Model => Resource::Model,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    Binary,
    Url,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Binary => SourceKind::Binary,
            SourceArg::Url => SourceKind::Url,
        }
    }
}

/// Arguments of `run`
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Resource to operate on
    #[arg(short = 'r', long, value_enum)]
    pub resource: ResourceArg,

    /// Operation name (e.g. upload, list, transcribe, getByFile)
    #[arg(short = 'o', long)]
    pub operation: String,

    /// Input records: a JSON array or newline-delimited JSON
    #[arg(short = 'i', long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Local audio file; adds one record per file
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Emit an error record and keep going when a record fails
    #[arg(long)]
    pub continue_on_fail: bool,

    /// API key (overrides SONIOX_API_KEY and the config file)
    #[arg(long)]
    pub api_key: Option<String>,

    /// API base URL
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Transcription model
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Audio source for transcribe
    #[arg(long, value_enum)]
    pub source: Option<SourceArg>,

    /// Public audio URL (with --source url)
    #[arg(long, value_name = "URL")]
    pub file_url: Option<String>,

    #[arg(long)]
    pub file_id: Option<String>,

    #[arg(long)]
    pub transcription_id: Option<String>,

    /// Name to upload the audio under
    #[arg(long)]
    pub file_name: Option<String>,

    /// Binary property holding the audio
    #[arg(long, value_name = "NAME")]
    pub binary_property: Option<String>,

    /// Fetch every page of a listing
    #[arg(long)]
    pub return_all: bool,

    /// Page size for a single-page listing
    #[arg(long)]
    pub limit: Option<u32>,

    /// Comma-separated language codes
    #[arg(long, value_name = "CODES")]
    pub language_hints: Option<String>,

    #[arg(long)]
    pub language_hints_strict: bool,

    /// Free-text context for the model
    #[arg(long, value_name = "TEXT")]
    pub context_text: Option<String>,

    /// Comma-separated domain terms
    #[arg(long, value_name = "TERMS")]
    pub context_terms: Option<String>,

    /// JSON array of {key, value} objects
    #[arg(long, value_name = "JSON")]
    pub context_general: Option<String>,

    /// JSON array of {source, target} objects
    #[arg(long, value_name = "JSON")]
    pub context_translation_terms: Option<String>,

    /// one_way or two_way
    #[arg(long, value_name = "TYPE")]
    pub translation_type: Option<String>,

    #[arg(long, value_name = "LANG")]
    pub target_language: Option<String>,

    #[arg(long, value_name = "LANG")]
    pub language_a: Option<String>,

    #[arg(long, value_name = "LANG")]
    pub language_b: Option<String>,

    #[arg(long)]
    pub diarization: bool,

    #[arg(long)]
    pub language_identification: bool,

    #[arg(long, value_name = "URL")]
    pub webhook_url: Option<String>,

    #[arg(long, value_name = "NAME")]
    pub webhook_auth_header_name: Option<String>,

    #[arg(long, value_name = "VALUE")]
    pub webhook_auth_header_value: Option<String>,

    #[arg(long, value_name = "ID")]
    pub client_reference_id: Option<String>,

    /// Polling budget (e.g. 90s, 5m)
    #[arg(long, value_name = "TIME")]
    pub max_wait: Option<String>,

    /// Interval between status polls
    #[arg(long, value_name = "TIME")]
    pub check_interval: Option<String>,

    /// Keep the uploaded audio after transcribing
    #[arg(long)]
    pub keep_audio: bool,

    /// Delete the transcription after fetching its result
    #[arg(long)]
    pub delete_transcription: bool,

    /// Include per-token details in the result
    #[arg(long)]
    pub include_tokens: bool,
}

impl RunArgs {
    /// Parameters given on the command line, used as defaults under every
    /// record's own parameters. Polling durations come from the merged config.
    pub fn parameters(&self) -> Parameters {
        Parameters {
            source: self.source.map(SourceKind::from),
            binary_property_name: self.binary_property.clone(),
            file_url: self.file_url.clone(),
            file_name: self.file_name.clone(),
            file_id: self.file_id.clone(),
            transcription_id: self.transcription_id.clone(),
            model: self.model.clone(),
            return_all: flag(self.return_all),
            limit: self.limit,
            additional_fields: AdditionalFields {
                language_hints: self.language_hints.clone(),
                language_hints_strict: flag(self.language_hints_strict),
                context_general: self.context_general.clone(),
                context_text: self.context_text.clone(),
                context_terms: self.context_terms.clone(),
                context_translation_terms: self.context_translation_terms.clone(),
                translation_type: self.translation_type.clone(),
                target_language: self.target_language.clone(),
                language_a: self.language_a.clone(),
                language_b: self.language_b.clone(),
                enable_speaker_diarization: flag(self.diarization),
                enable_language_identification: flag(self.language_identification),
                webhook_url: self.webhook_url.clone(),
                webhook_auth_header_name: self.webhook_auth_header_name.clone(),
                webhook_auth_header_value: self.webhook_auth_header_value.clone(),
                client_reference_id: self.client_reference_id.clone(),
                extra: Default::default(),
            },
            options: WaitOptions {
                delete_audio_file: self.keep_audio.then_some(false),
                delete_transcription: flag(self.delete_transcription),
                include_tokens: flag(self.include_tokens),
                ..Default::default()
            },
        }
    }
}

/// An unset boolean flag leaves the record's value alone
fn flag(set: bool) -> Option<bool> {
    set.then_some(true)
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api_key",
    "api_url",
    "model",
    "check_interval",
    "max_wait",
    "request_timeout",
    "upload_timeout",
    "max_retries",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn run_args(args: &[&str]) -> RunArgs {
        let mut argv = vec!["soniox-batch", "run"];
        argv.extend_from_slice(args);
        match Cli::parse_from(argv).command {
            Commands::Run(args) => *args,
            other => panic!("Expected Run command, got {other:?}"),
        }
    }

    #[test]
    fn cli_parses_run() {
        let args = run_args(&["-r", "transcription", "-o", "transcribe", "-f", "a.mp3"]);
        assert_eq!(args.resource, ResourceArg::Transcription);
        assert_eq!(args.operation, "transcribe");
        assert_eq!(args.files, vec![PathBuf::from("a.mp3")]);
        assert!(!args.continue_on_fail);
    }

    #[test]
    fn cli_parses_repeated_files() {
        let args = run_args(&[
            "--resource", "file", "--operation", "upload", "--file", "a.wav", "--file", "b.wav",
        ]);
        assert_eq!(args.files.len(), 2);
    }

    #[test]
    fn unset_flags_leave_parameters_empty() {
        let params = run_args(&["-r", "model", "-o", "list"]).parameters();
        assert!(params.model.is_none());
        assert!(params.return_all.is_none());
        assert!(params.options.delete_audio_file.is_none());
        assert!(params.additional_fields.enable_speaker_diarization.is_none());
    }

    #[test]
    fn flags_map_to_parameters() {
        let params = run_args(&[
            "-r",
            "transcription",
            "-o",
            "transcribe",
            "--source",
            "url",
            "--file-url",
            "https://example.com/a.mp3",
            "--language-hints",
            "en,de",
            "--diarization",
            "--keep-audio",
            "--include-tokens",
            "--return-all",
        ])
        .parameters();

        assert_eq!(params.source, Some(SourceKind::Url));
        assert_eq!(params.file_url.as_deref(), Some("https://example.com/a.mp3"));
        assert_eq!(params.additional_fields.language_hints.as_deref(), Some("en,de"));
        assert_eq!(params.additional_fields.enable_speaker_diarization, Some(true));
        assert_eq!(params.options.delete_audio_file, Some(false));
        assert_eq!(params.options.include_tokens, Some(true));
        assert_eq!(params.return_all, Some(true));
    }

    #[test]
    fn cli_rejects_unknown_resource() {
        let result = Cli::try_parse_from(["soniox-batch", "run", "-r", "audio", "-o", "list"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["soniox-batch", "config", "set", "model", "stt-async-v3"]);
        if let Commands::Config {
            action: ConfigAction::Set { key, value },
        } = cli.command
        {
            assert_eq!(key, "model");
            assert_eq!(value, "stt-async-v3");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn resource_arg_converts() {
        assert_eq!(Resource::from(ResourceArg::File), Resource::File);
        assert_eq!(Resource::from(ResourceArg::Model), Resource::Model);
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("api_key"));
        assert!(is_valid_config_key("max_wait"));
        assert!(is_valid_config_key("max_retries"));
        assert!(!is_valid_config_key("duration"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}

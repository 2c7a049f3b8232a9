//! soniox-batch - orchestration client for the Soniox async speech-to-text API
//!
//! Uploads audio, creates transcription jobs, polls them to completion and
//! fetches the results, with retries, pagination and best-effort cleanup of
//! server-side resources.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, request shaping, response normalization and errors
//! - **Application**: Use cases, resource handlers and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (HTTP client, file store, config)
//! - **CLI**: Command-line interface, argument parsing and input loading

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

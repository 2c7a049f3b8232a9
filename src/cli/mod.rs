//! CLI layer - Command-line interface
//!
//! Contains argument parsing, input loading, output formatting and the
//! subcommand runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod input;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{run_batch, EXIT_ERROR, EXIT_INTERRUPTED, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, RunArgs};
pub use presenter::Presenter;

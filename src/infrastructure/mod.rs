//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces: the HTTP
//! client for the speech-to-text API, the filesystem binary store and the
//! XDG config store.

pub mod binary;
pub mod config;
pub mod http;

// Re-export adapters
pub use binary::FsBinaryStore;
pub use config::XdgConfigStore;
pub use http::SonioxClient;

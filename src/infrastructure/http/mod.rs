//! HTTP adapters

mod client;

pub use client::SonioxClient;

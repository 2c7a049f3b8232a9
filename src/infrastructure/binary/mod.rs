//! Binary payload adapters

mod fs_store;

pub use fs_store::FsBinaryStore;

//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, JSON file natively)
//! - Canvas 2D presentation and input polling (web only)

pub mod storage;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, StorageError};

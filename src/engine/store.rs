//! Durable persistence of the current preset and the saved preset list.
//!
//! A store exposes two well-known slots: the single "current" record and the
//! "list" collection. Backends serialise access per slot so a read never
//! observes a half-written record.

mod file;
mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::engine::core::Preset;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// On-disk format version written into every envelope
pub const STORE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Current,
    List,
}

impl Slot {
    pub fn key(self) -> &'static str {
        match self {
            Slot::Current => "current",
            Slot::List => "list",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No record stored in slot '{0}'")]
    NotFound(Slot),

    #[error("I/O error on slot '{slot}'")]
    Io {
        slot: Slot,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode or decode slot '{slot}'")]
    Serialize {
        slot: Slot,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Wrapper written around every stored record
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Envelope<T> {
    pub version: u32,
    pub saved_at: String,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn wrap(data: T) -> Self {
        Self {
            version: STORE_FORMAT_VERSION,
            saved_at: chrono::Utc::now().to_rfc3339(),
            data,
        }
    }
}

/// Async key-record store for presets.
///
/// `load_current` reports an absent record as [`StoreError::NotFound`];
/// `load_all` reports an absent list as an empty one and always returns
/// presets sorted by name.
#[async_trait]
pub trait PresetStore: Send + Sync {
    async fn load_current(&self) -> Result<Preset, StoreError>;

    async fn load_all(&self) -> Result<Vec<Preset>, StoreError>;

    async fn save_current(&self, preset: &Preset) -> Result<(), StoreError>;

    /// Replace the whole list. Readers see either the old or the new list.
    async fn save_all(&self, presets: &[Preset]) -> Result<(), StoreError>;
}

pub(crate) fn sort_by_name(presets: &mut [Preset]) {
    presets.sort_by(|a, b| a.name.cmp(&b.name));
}

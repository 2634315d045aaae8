//! In-process backend. Records pass through `serde_json::Value`, so the same
//! serde surface as the file backend is exercised.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

use super::{PresetStore, Slot, StoreError, sort_by_name};
use crate::engine::core::Preset;

#[derive(Default)]
pub struct MemoryStore {
    current: Mutex<Option<Value>>,
    list: Mutex<Option<Value>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a current record and a saved list
    pub fn seeded(current: Option<&Preset>, presets: &[Preset]) -> Result<Self, StoreError> {
        let current = current
            .map(|p| encode(Slot::Current, p))
            .transpose()?;
        let list = encode(Slot::List, presets)?;

        Ok(Self {
            current: Mutex::new(current),
            list: Mutex::new(Some(list)),
            ..Self::default()
        })
    }

    /// Make every subsequent write fail with an I/O error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes across both slots
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn slot(&self, slot: Slot) -> &Mutex<Option<Value>> {
        match slot {
            Slot::Current => &self.current,
            Slot::List => &self.list,
        }
    }

    async fn write(&self, slot: Slot, value: Value) -> Result<(), StoreError> {
        let mut guard = self.slot(slot).lock().await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io {
                slot,
                source: std::io::Error::other("write rejected by memory store"),
            });
        }
        *guard = Some(value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn encode<T: serde::Serialize + ?Sized>(slot: Slot, data: &T) -> Result<Value, StoreError> {
    serde_json::to_value(data).map_err(|source| StoreError::Serialize { slot, source })
}

fn decode<T: serde::de::DeserializeOwned>(slot: Slot, value: Value) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|source| StoreError::Serialize { slot, source })
}

#[async_trait]
impl PresetStore for MemoryStore {
    async fn load_current(&self) -> Result<Preset, StoreError> {
        let value = self.current.lock().await.clone();
        match value {
            Some(value) => decode(Slot::Current, value),
            None => Err(StoreError::NotFound(Slot::Current)),
        }
    }

    async fn load_all(&self) -> Result<Vec<Preset>, StoreError> {
        let value = self.list.lock().await.clone();
        let mut presets: Vec<Preset> = match value {
            Some(value) => decode(Slot::List, value)?,
            None => Vec::new(),
        };
        sort_by_name(&mut presets);
        Ok(presets)
    }

    async fn save_current(&self, preset: &Preset) -> Result<(), StoreError> {
        let value = encode(Slot::Current, preset)?;
        self.write(Slot::Current, value).await
    }

    async fn save_all(&self, presets: &[Preset]) -> Result<(), StoreError> {
        let value = encode(Slot::List, presets)?;
        self.write(Slot::List, value).await
    }
}

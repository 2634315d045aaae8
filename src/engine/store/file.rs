//! JSON file backend: one pretty-printed document per slot.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use super::{Envelope, PresetStore, Slot, StoreError, sort_by_name};
use crate::engine::core::Preset;

/// Stores `current.json` and `presets.json` in one directory.
///
/// Each write lands in a temporary file next to its target and is renamed
/// over it, so readers only ever see complete documents. Reads and writes of
/// the same slot are serialised by a per-slot lock.
pub struct JsonFileStore {
    dir: PathBuf,
    current_lock: Mutex<()>,
    list_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            current_lock: Mutex::new(()),
            list_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the document backing a slot
    pub fn slot_path(&self, slot: Slot) -> PathBuf {
        let filename = match slot {
            Slot::Current => "current.json",
            Slot::List => "presets.json",
        };
        self.dir.join(filename)
    }

    fn lock(&self, slot: Slot) -> &Mutex<()> {
        match slot {
            Slot::Current => &self.current_lock,
            Slot::List => &self.list_lock,
        }
    }

    async fn read_slot<T: DeserializeOwned>(&self, slot: Slot) -> Result<Option<T>, StoreError> {
        let _guard = self.lock(slot).lock().await;
        let path = self.slot_path(slot);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(slot = %slot, path = %path.display(), "Slot file not present");
                return Ok(None);
            }
            Err(source) => return Err(StoreError::Io { slot, source }),
        };

        let envelope: Envelope<T> = serde_json::from_slice(&bytes)
            .map_err(|source| StoreError::Serialize { slot, source })?;
        Ok(Some(envelope.data))
    }

    async fn write_slot<T>(&self, slot: Slot, data: &T) -> Result<(), StoreError>
    where
        T: Serialize + Sync + ?Sized,
    {
        let json = serde_json::to_vec_pretty(&Envelope::wrap(data))
            .map_err(|source| StoreError::Serialize { slot, source })?;

        let _guard = self.lock(slot).lock().await;
        let path = self.slot_path(slot);
        let tmp_path = self
            .dir
            .join(format!(".{}.{}.tmp", slot.key(), Uuid::new_v4()));

        let io_err = |source: io::Error| StoreError::Io { slot, source };

        tokio::fs::create_dir_all(&self.dir).await.map_err(io_err)?;
        replace_file(&tmp_path, &path, &json).await.map_err(io_err)?;

        debug!(slot = %slot, path = %path.display(), bytes = json.len(), "Wrote slot");
        Ok(())
    }
}

/// Write `bytes` to `tmp_path`, then rename it over `target`. The temporary
/// file is removed if either step fails.
async fn replace_file(tmp_path: &Path, target: &Path, bytes: &[u8]) -> io::Result<()> {
    let result = match tokio::fs::write(tmp_path, bytes).await {
        Ok(()) => tokio::fs::rename(tmp_path, target).await,
        Err(e) => Err(e),
    };

    if result.is_err() {
        let _ = tokio::fs::remove_file(tmp_path).await;
    }
    result
}

#[async_trait]
impl PresetStore for JsonFileStore {
    async fn load_current(&self) -> Result<Preset, StoreError> {
        self.read_slot::<Preset>(Slot::Current)
            .await?
            .ok_or(StoreError::NotFound(Slot::Current))
    }

    async fn load_all(&self) -> Result<Vec<Preset>, StoreError> {
        let mut presets = self
            .read_slot::<Vec<Preset>>(Slot::List)
            .await?
            .unwrap_or_default();
        sort_by_name(&mut presets);
        info!(count = presets.len(), dir = %self.dir.display(), "Loaded saved presets");
        Ok(presets)
    }

    async fn save_current(&self, preset: &Preset) -> Result<(), StoreError> {
        self.write_slot(Slot::Current, preset).await
    }

    async fn save_all(&self, presets: &[Preset]) -> Result<(), StoreError> {
        self.write_slot(Slot::List, presets).await?;
        info!(count = presets.len(), dir = %self.dir.display(), "Saved preset list");
        Ok(())
    }
}

#![allow(dead_code)]

use presetctl::engine::{
    ColorDepth, D3DMode, EncodeMode, Encoder, FieldChange, MemoryStore, Preset, SessionManager,
};
use tempfile::TempDir;

/// Default preset with the given name
pub fn preset(name: &str) -> Preset {
    Preset::named(name)
}

/// Compliant preset that differs from the defaults in several places
pub fn tuned_preset(name: &str) -> Preset {
    let mut p = Preset::named(name);
    p.encoder = Encoder::Nvenc;
    p.encode_mode = EncodeMode::Cqp;
    p.color_depth = ColorDepth::C10Bit;
    p.rate.quality = 19;
    p.audio.bitrate_kbps = 256;
    p
}

/// QSV preset using QSV-only options, so switching encoder triggers corrections
pub fn qsv_lookahead_preset(name: &str) -> Preset {
    let mut p = Preset::named(name);
    p.encoder = Encoder::Qsv;
    p.encode_mode = EncodeMode::La;
    p.d3d_mode = D3DMode::D3D11;
    p
}

/// Parse `key=value` pairs, panicking on bad input
pub fn changes(pairs: &[&str]) -> Vec<FieldChange> {
    pairs
        .iter()
        .map(|s| s.parse().unwrap_or_else(|e| panic!("bad change {s}: {e}")))
        .collect()
}

/// Session over an in-memory store seeded with `current` and `saved`
pub async fn memory_session(current: Option<&Preset>, saved: &[Preset]) -> SessionManager<MemoryStore> {
    let store = MemoryStore::seeded(current, saved).unwrap();
    SessionManager::initialize(store).await.unwrap()
}

pub fn temp_store_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Names of the saved presets, in list order
pub fn names(presets: &[Preset]) -> Vec<String> {
    presets.iter().map(|p| p.name.clone()).collect()
}

// Preset engine - independent of any UI

pub mod core;
pub mod session;
pub mod store;

pub use core::*;
pub use session::{
    PresetContext, PresetEntry, SessionError, SessionManager, SessionView, differs_from_saved,
};
pub use store::{JsonFileStore, MemoryStore, PresetStore, Slot, StoreError};

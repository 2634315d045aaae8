//! Preset session: the single current preset, the saved list, and the
//! edited flag, with every change funnelled through one owner.
//!
//! Operations apply their in-memory effect first and persist afterwards. If
//! persistence fails the in-memory state is kept and the error is returned,
//! so the caller can report it and retry with `save`.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::engine::core::{Correction, FieldChange, Preset, enforce};
use crate::engine::store::{PresetStore, StoreError};

#[derive(Debug, Error)]
pub enum SessionError {
    /// The current preset has unsaved edits and the caller did not confirm
    /// discarding them. Nothing was changed.
    #[error("The current preset has unsaved changes")]
    UnsavedChanges,

    /// The in-memory change was applied but could not be persisted.
    #[error("Failed to persist preset state")]
    Persistence(#[from] StoreError),
}

/// In-memory session state
#[derive(Debug, Clone, PartialEq)]
pub struct PresetContext {
    pub current: Preset,
    /// Saved presets, sorted by name, names unique
    pub presets: Vec<Preset>,
    /// True unless `current` equals the saved entry with the same name
    pub is_edited: bool,
}

impl PresetContext {
    pub fn new(current: Preset, presets: Vec<Preset>) -> Self {
        let is_edited = differs_from_saved(&current, &presets);
        Self {
            current,
            presets,
            is_edited,
        }
    }

    fn position(&self, name: &str) -> Result<usize, usize> {
        self.presets.binary_search_by(|p| p.name.as_str().cmp(name))
    }
}

/// Whether `current` has no structurally equal saved entry under its name
pub fn differs_from_saved(current: &Preset, presets: &[Preset]) -> bool {
    presets
        .iter()
        .find(|p| p.name == current.name)
        .is_none_or(|saved| saved != current)
}

/// What the UI renders after each operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionView<'a> {
    pub current: &'a Preset,
    pub is_edited: bool,
    pub presets: &'a [Preset],
}

/// One row of the preset menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetEntry {
    pub name: String,
    /// The current preset carries this name
    pub selected: bool,
}

pub struct SessionManager<S: PresetStore> {
    store: S,
    ctx: PresetContext,
    last_corrections: Vec<Correction>,
}

impl<S: PresetStore> SessionManager<S> {
    /// Load the current preset and the saved list from the store.
    ///
    /// A missing current record falls back to a default preset. The loaded
    /// preset is passed through the enforcer, and written back if anything
    /// had to be corrected.
    pub async fn initialize(store: S) -> Result<Self, SessionError> {
        let mut current = match store.load_current().await {
            Ok(preset) => preset,
            Err(StoreError::NotFound(_)) => {
                warn!("No current preset stored, starting from defaults");
                Preset::default()
            }
            Err(e) => return Err(e.into()),
        };
        let presets = dedup_sorted(store.load_all().await?);

        let corrections = enforce(&mut current);
        if !corrections.is_empty() {
            warn!(
                preset = %current.name,
                count = corrections.len(),
                "Stored current preset broke field rules and was corrected"
            );
            store.save_current(&current).await?;
        }

        let ctx = PresetContext::new(current, presets);
        info!(
            current = %ctx.current.name,
            saved = ctx.presets.len(),
            edited = ctx.is_edited,
            "Preset session initialized"
        );

        Ok(Self {
            store,
            ctx,
            last_corrections: corrections,
        })
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            current: &self.ctx.current,
            is_edited: self.ctx.is_edited,
            presets: &self.ctx.presets,
        }
    }

    pub fn context(&self) -> &PresetContext {
        &self.ctx
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// True when `new_preset` or `select` would throw away unsaved edits
    pub fn would_discard_changes(&self) -> bool {
        self.ctx.is_edited
    }

    /// Corrections made by the most recent `mutate` (or by `initialize`)
    pub fn last_corrections(&self) -> &[Correction] {
        &self.last_corrections
    }

    /// Menu rows: every saved preset, marking the one the current preset is named after
    pub fn entries(&self) -> Vec<PresetEntry> {
        self.ctx
            .presets
            .iter()
            .map(|p| PresetEntry {
                name: p.name.clone(),
                selected: p.name == self.ctx.current.name,
            })
            .collect()
    }

    fn check_discard(&self, discard: bool) -> Result<(), SessionError> {
        if self.ctx.is_edited && !discard {
            debug!(current = %self.ctx.current.name, "Refusing to discard unsaved changes");
            return Err(SessionError::UnsavedChanges);
        }
        Ok(())
    }

    /// Replace the current preset with a default one. The result is always
    /// edited, even if a saved entry happens to match.
    pub async fn new_preset(&mut self, discard: bool) -> Result<SessionView<'_>, SessionError> {
        self.check_discard(discard)?;

        self.ctx.current = Preset::default();
        self.ctx.is_edited = true;
        self.last_corrections.clear();
        info!("Started new preset");

        self.store.save_current(&self.ctx.current).await?;
        Ok(self.view())
    }

    /// Make a copy of the saved preset `name` current.
    ///
    /// An unknown name leaves the session untouched.
    pub async fn select(&mut self, name: &str, discard: bool) -> Result<SessionView<'_>, SessionError> {
        self.check_discard(discard)?;

        let Ok(idx) = self.ctx.position(name) else {
            debug!(name, "Select of unknown preset ignored");
            return Ok(self.view());
        };

        self.ctx.current = self.ctx.presets[idx].clone();
        self.ctx.is_edited = false;
        self.last_corrections.clear();
        info!(name, "Selected preset");

        self.store.save_current(&self.ctx.current).await?;
        Ok(self.view())
    }

    /// Apply field changes in order, repair cross-field conflicts, recompute
    /// the edited flag and persist the current preset.
    pub async fn mutate<I>(&mut self, changes: I) -> Result<SessionView<'_>, SessionError>
    where
        I: IntoIterator<Item = FieldChange>,
    {
        for change in changes {
            if change.is_constrained() {
                debug!(field = change.key(), "Constrained field changed");
            }
            self.ctx.current.apply(change);
        }

        self.last_corrections = enforce(&mut self.ctx.current);
        self.ctx.is_edited = differs_from_saved(&self.ctx.current, &self.ctx.presets);

        self.store.save_current(&self.ctx.current).await?;
        Ok(self.view())
    }

    /// Save the current preset under its own name: overwrite the entry with
    /// that name in place, or insert a new one at its sorted position.
    pub async fn save(&mut self) -> Result<SessionView<'_>, SessionError> {
        let snapshot = self.ctx.current.clone();
        match self.ctx.position(&snapshot.name) {
            Ok(idx) => {
                info!(name = %snapshot.name, "Overwriting saved preset");
                self.ctx.presets[idx] = snapshot;
            }
            Err(idx) => {
                info!(name = %snapshot.name, "Adding saved preset");
                self.ctx.presets.insert(idx, snapshot);
            }
        }
        self.ctx.is_edited = false;

        self.store.save_all(&self.ctx.presets).await?;
        self.store.save_current(&self.ctx.current).await?;
        Ok(self.view())
    }

    /// Rename a copy of the current preset to `name`, make it current, and save it.
    pub async fn save_as(&mut self, name: &str) -> Result<SessionView<'_>, SessionError> {
        let mut renamed = self.ctx.current.clone();
        renamed.name = name.to_string();
        self.ctx.current = renamed;

        self.save().await
    }
}

/// Sort by name and keep the first entry for any repeated name
fn dedup_sorted(mut presets: Vec<Preset>) -> Vec<Preset> {
    presets.sort_by(|a, b| a.name.cmp(&b.name));
    let before = presets.len();
    presets.dedup_by(|later, earlier| later.name == earlier.name);
    if presets.len() != before {
        warn!(dropped = before - presets.len(), "Duplicate preset names in saved list");
    }
    presets
}

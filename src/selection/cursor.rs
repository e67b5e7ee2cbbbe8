use serde::{Deserialize, Serialize};

use crate::catalog::{EntryId, PrefabCatalog, PrefabEntry};

/// How the selection changes after each placed object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Keep placing the same prefab
    #[default]
    KeepSelection,
    /// Step to the next prefab in catalog order, wrapping at the end
    GoToNext,
    /// Pick any prefab uniformly, possibly the same one again
    GetRandom,
    /// Pick a different prefab uniformly
    GetRandomNoRepeat,
}

impl SelectionMode {
    pub const ALL: [SelectionMode; 4] = [
        SelectionMode::KeepSelection,
        SelectionMode::GoToNext,
        SelectionMode::GetRandom,
        SelectionMode::GetRandomNoRepeat,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SelectionMode::KeepSelection => "Keep selection",
            SelectionMode::GoToNext => "Go to next",
            SelectionMode::GetRandom => "Random",
            SelectionMode::GetRandomNoRepeat => "Random (no repeat)",
        }
    }
}

/// Tracks the selected catalog entry and applies the advancement policy.
///
/// The cursor only stores an [`EntryId`]; after any catalog mutation the owner must call
/// [`SelectionCursor::revalidate`] so the selection never points at a removed entry.
#[derive(Debug, Clone)]
pub struct SelectionCursor {
    selected: Option<EntryId>,
    mode: SelectionMode,
    rng: fastrand::Rng,
}

impl Default for SelectionCursor {
    fn default() -> Self {
        Self {
            selected: None,
            mode: SelectionMode::default(),
            rng: fastrand::Rng::new(),
        }
    }
}

impl SelectionCursor {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            ..Default::default()
        }
    }

    pub fn selected(&self) -> Option<EntryId> {
        self.selected
    }

    pub fn selected_entry<'a>(&self, catalog: &'a PrefabCatalog) -> Option<&'a PrefabEntry> {
        self.selected.and_then(|id| catalog.entry(id))
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
    }

    /// Flattened index of the selection, `None` when nothing is selected.
    pub fn index_in(&self, catalog: &PrefabCatalog) -> Option<usize> {
        self.selected.and_then(|id| catalog.index_of(id))
    }

    /// Select an entry by id. Ids not present in the catalog clear the selection.
    pub fn select(&mut self, catalog: &PrefabCatalog, id: Option<EntryId>) {
        self.selected = id.filter(|id| catalog.contains(*id));
    }

    /// Select by flattened index, wrapping with floored modulo. An empty catalog
    /// clears the selection.
    pub fn set_index(&mut self, catalog: &PrefabCatalog, index: isize) {
        let count = catalog.flattened_count();
        if count == 0 {
            self.selected = None;
            return;
        }
        let normalized = index.rem_euclid(count as isize) as usize;
        self.selected = catalog.entry_at(normalized).map(PrefabEntry::id);
    }

    /// Manual stepping, independent of the selection mode.
    pub fn step(&mut self, catalog: &PrefabCatalog, delta: isize) {
        let current = self.current_index(catalog);
        self.set_index(catalog, current + delta);
    }

    /// Apply the selection mode after a placement.
    pub fn advance(&mut self, catalog: &PrefabCatalog) {
        let count = catalog.flattened_count();
        if count == 0 {
            return;
        }
        match self.mode {
            SelectionMode::KeepSelection => {}
            SelectionMode::GoToNext => self.step(catalog, 1),
            SelectionMode::GetRandom => {
                let index = self.rng.usize(0..count);
                self.set_index(catalog, index as isize);
            }
            SelectionMode::GetRandomNoRepeat => {
                // A single prefab has no other choice; keep it.
                if count == 1 {
                    return;
                }
                let Some(current) = self.index_in(catalog) else {
                    let index = self.rng.usize(0..count);
                    self.set_index(catalog, index as isize);
                    return;
                };
                let mut index = self.rng.usize(0..count - 1);
                if index >= current {
                    index += 1;
                }
                self.set_index(catalog, index as isize);
            }
        }
    }

    /// Drop the selection if its entry left the catalog. Returns true when it changed.
    pub fn revalidate(&mut self, catalog: &PrefabCatalog) -> bool {
        match self.selected {
            Some(id) if !catalog.contains(id) => {
                self.selected = None;
                true
            }
            _ => false,
        }
    }

    fn current_index(&self, catalog: &PrefabCatalog) -> isize {
        self.index_in(catalog).map(|i| i as isize).unwrap_or(-1)
    }
}

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::PrefabTemplate;

/// Stable identifier of a catalog entry. Unique for the whole process and never reused,
/// so two entries sharing a template are still distinct and ids never alias across catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

static NEXT_ENTRY_ID: AtomicU64 = AtomicU64::new(0);

impl EntryId {
    fn next() -> Self {
        Self(NEXT_ENTRY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A slot in a group. The template may be unset.
#[derive(Debug, Clone)]
pub struct PrefabEntry {
    id: EntryId,
    pub template: Option<Arc<PrefabTemplate>>,
}

impl PrefabEntry {
    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn template(&self) -> Option<&Arc<PrefabTemplate>> {
        self.template.as_ref()
    }

    pub fn display_name(&self) -> &str {
        self.template
            .as_deref()
            .map(|t| t.name.as_str())
            .unwrap_or("<empty>")
    }
}

#[derive(Debug, Clone, Default)]
pub struct PrefabGroup {
    pub name: String,
    entries: Vec<PrefabEntry>,
}

impl PrefabGroup {
    pub fn entries(&self) -> &[PrefabEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered groups of placeable prefabs, addressable by a flattened index.
#[derive(Debug, Clone, Default)]
pub struct PrefabCatalog {
    groups: Vec<PrefabGroup>,
}

impl PrefabCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &[PrefabGroup] {
        &self.groups
    }

    /// Append an empty group and return its index.
    pub fn add_group(&mut self, name: impl Into<String>) -> usize {
        self.groups.push(PrefabGroup {
            name: name.into(),
            entries: Vec::new(),
        });
        self.groups.len() - 1
    }

    pub fn remove_group(&mut self, index: usize) -> Option<PrefabGroup> {
        (index < self.groups.len()).then(|| self.groups.remove(index))
    }

    /// Append an entry to `group`. Returns `None` when the group does not exist.
    pub fn push_entry(
        &mut self,
        group: usize,
        template: Option<Arc<PrefabTemplate>>,
    ) -> Option<EntryId> {
        let group = self.groups.get_mut(group)?;
        let id = EntryId::next();
        group.entries.push(PrefabEntry { id, template });
        Some(id)
    }

    pub fn remove_entry(&mut self, id: EntryId) -> Option<PrefabEntry> {
        self.groups.iter_mut().find_map(|group| {
            let pos = group.entries.iter().position(|e| e.id == id)?;
            Some(group.entries.remove(pos))
        })
    }

    /// Reorder an entry inside its group.
    pub fn move_entry(&mut self, group: usize, from: usize, to: usize) -> bool {
        let Some(group) = self.groups.get_mut(group) else {
            return false;
        };
        if from >= group.entries.len() || to >= group.entries.len() {
            return false;
        }
        let entry = group.entries.remove(from);
        group.entries.insert(to, entry);
        true
    }

    pub fn set_template(&mut self, id: EntryId, template: Option<Arc<PrefabTemplate>>) -> bool {
        match self.entry_mut(id) {
            Some(entry) => {
                entry.template = template;
                true
            }
            None => false,
        }
    }

    /// Total number of entries across all groups.
    pub fn flattened_count(&self) -> usize {
        self.groups.iter().map(PrefabGroup::len).sum()
    }

    pub fn entry_at(&self, index: usize) -> Option<&PrefabEntry> {
        let mut index = index;
        for group in &self.groups {
            if index < group.entries.len() {
                return Some(&group.entries[index]);
            }
            index -= group.entries.len();
        }
        None
    }

    pub fn index_of(&self, id: EntryId) -> Option<usize> {
        self.entries().position(|e| e.id == id)
    }

    pub fn entry(&self, id: EntryId) -> Option<&PrefabEntry> {
        self.entries().find(|e| e.id == id)
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.entry(id).is_some()
    }

    /// All entries in flattened order.
    pub fn entries(&self) -> impl Iterator<Item = &PrefabEntry> {
        self.groups.iter().flat_map(|g| g.entries.iter())
    }

    fn entry_mut(&mut self, id: EntryId) -> Option<&mut PrefabEntry> {
        self.groups
            .iter_mut()
            .flat_map(|g| g.entries.iter_mut())
            .find(|e| e.id == id)
    }
}

//! In-memory change tracker.

use crate::mapping::configuration::EntityConfiguration;
use crate::model::entity::Auditable;
use crate::tracking::entry::{EntryKey, EntryState, TrackedEntry};
use crate::tracking::staged::{EntityIdentity, StagedEntity};

/// Staged entities of one unit of work, in staging order.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    entries: Vec<TrackedEntry>,
    next_key: u64,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a new entity for insertion.
    ///
    /// When the same `(type, id)` is already tracked, the tracked value is
    /// replaced and its entry reused. Only a detached entry becomes `Added`;
    /// any other entry keeps its state.
    pub fn add<E: EntityConfiguration>(&mut self, entity: E) -> EntryKey {
        if let Some(identity) = StagedEntity::identity(&entity) {
            if let Some(entry) = self.entry_by_identity_mut(identity) {
                entry.entity = Box::new(entity);
                if entry.state == EntryState::Detached {
                    entry.state = EntryState::Added;
                }
                return entry.key;
            }
        }
        self.push(Box::new(entity), EntryState::Added)
    }

    /// Starts tracking an existing entity as unchanged.
    ///
    /// When the same `(type, id)` is already tracked, the tracked value is
    /// replaced and its entry reused; a detached entry becomes unchanged again.
    /// Entities without an id always get a new entry.
    pub fn attach<E: EntityConfiguration>(&mut self, entity: E) -> EntryKey {
        if let Some(identity) = StagedEntity::identity(&entity) {
            if let Some(entry) = self.entry_by_identity_mut(identity) {
                entry.entity = Box::new(entity);
                if entry.state == EntryState::Detached {
                    entry.state = EntryState::Unchanged;
                }
                return entry.key;
            }
        }
        self.push(Box::new(entity), EntryState::Unchanged)
    }

    /// Requests physical removal of a tracked entity.
    ///
    /// Entries that were never inserted are dropped; every other entry becomes
    /// `Deleted`. Returns `false` for unknown keys.
    pub fn remove(&mut self, key: EntryKey) -> bool {
        let Some(position) = self.position(key) else {
            return false;
        };
        if self.entries[position].state == EntryState::Added {
            self.entries.remove(position);
        } else {
            self.entries[position].state = EntryState::Deleted;
        }
        true
    }

    /// Marks an entry stale. It stays listed but is skipped on commit.
    pub fn detach(&mut self, key: EntryKey) -> bool {
        self.set_state(key, EntryState::Detached)
    }

    pub fn set_state(&mut self, key: EntryKey, state: EntryState) -> bool {
        match self.entry_mut(key) {
            Some(entry) => {
                entry.state = state;
                true
            }
            None => false,
        }
    }

    pub fn state(&self, key: EntryKey) -> Option<EntryState> {
        self.entry(key).map(TrackedEntry::state)
    }

    pub fn entry(&self, key: EntryKey) -> Option<&TrackedEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn entry_mut(&mut self, key: EntryKey) -> Option<&mut TrackedEntry> {
        self.entries.iter_mut().find(|entry| entry.key == key)
    }

    pub fn entries(&self) -> impl Iterator<Item = &TrackedEntry> {
        self.entries.iter()
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut TrackedEntry> {
        self.entries.iter_mut()
    }

    /// Typed access to a tracked entity. `None` for unknown keys or another type.
    pub fn get<E: 'static>(&self, key: EntryKey) -> Option<&E> {
        self.entry(key)?.downcast_ref::<E>()
    }

    pub fn get_mut<E: 'static>(&mut self, key: EntryKey) -> Option<&mut E> {
        self.entry_mut(key)?.downcast_mut::<E>()
    }

    /// Finds the entry tracking the entity of type `E` with the given id.
    pub fn find_key<E: Auditable>(&self, id: E::Key) -> Option<EntryKey> {
        let identity = EntityIdentity::of::<E>(id);
        self.entries
            .iter()
            .find(|entry| entry.entity.identity() == Some(identity))
            .map(TrackedEntry::key)
    }

    /// Whether commit would write anything.
    pub fn has_changes(&self) -> bool {
        self.entries.iter().any(|entry| entry.state.is_pending())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Settles the tracker after a successful commit.
    ///
    /// Inserted and modified entries become unchanged; deleted and detached
    /// entries stop being tracked.
    pub fn accept_all_changes(&mut self) {
        self.entries.retain(|entry| {
            !matches!(entry.state, EntryState::Deleted | EntryState::Detached)
        });
        for entry in &mut self.entries {
            entry.state = EntryState::Unchanged;
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn push(&mut self, entity: Box<dyn StagedEntity>, state: EntryState) -> EntryKey {
        let key = EntryKey(self.next_key);
        self.next_key += 1;
        self.entries.push(TrackedEntry { key, state, entity });
        key
    }

    fn position(&self, key: EntryKey) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key == key)
    }

    fn entry_by_identity_mut(&mut self, identity: EntityIdentity) -> Option<&mut TrackedEntry> {
        self.entries
            .iter_mut()
            .find(|entry| entry.entity.identity() == Some(identity))
    }
}

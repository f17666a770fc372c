//! Tracked entries and their pending-change states.

use crate::model::audit::AuditInfo;
use crate::tracking::staged::StagedEntity;
use std::fmt::{Debug, Formatter};

/// Pending-change classification of a staged entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryState {
    /// Tracked, nothing to write.
    Unchanged,
    /// Written as an `INSERT` on commit.
    Added,
    /// Written as a full-row `UPDATE` on commit.
    Modified,
    /// Written as a physical `DELETE` on commit.
    Deleted,
    /// Stale entry still listed by the tracker but skipped on commit.
    Detached,
}

impl EntryState {
    /// Whether commit writes anything for this state.
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Added | Self::Modified | Self::Deleted)
    }
}

/// Handle of one tracked entry, stable for the tracker lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey(pub(crate) u64);

/// One staged entity with its pending-change state.
pub struct TrackedEntry {
    pub(crate) key: EntryKey,
    pub(crate) state: EntryState,
    pub(crate) entity: Box<dyn StagedEntity>,
}

impl TrackedEntry {
    pub fn key(&self) -> EntryKey {
        self.key
    }

    pub fn state(&self) -> EntryState {
        self.state
    }

    /// Reclassifies the pending change.
    pub fn set_state(&mut self, state: EntryState) {
        self.state = state;
    }

    pub fn table(&self) -> &'static str {
        self.entity.table()
    }

    pub fn audit(&self) -> &AuditInfo {
        self.entity.audit_info()
    }

    pub fn audit_mut(&mut self) -> &mut AuditInfo {
        self.entity.audit_info_mut()
    }

    pub fn entity(&self) -> &dyn StagedEntity {
        self.entity.as_ref()
    }

    pub fn entity_mut(&mut self) -> &mut dyn StagedEntity {
        self.entity.as_mut()
    }

    pub fn downcast_ref<E: 'static>(&self) -> Option<&E> {
        self.entity.as_any().downcast_ref::<E>()
    }

    pub fn downcast_mut<E: 'static>(&mut self) -> Option<&mut E> {
        self.entity.as_any_mut().downcast_mut::<E>()
    }
}

impl Debug for TrackedEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackedEntry")
            .field("key", &self.key)
            .field("state", &self.state)
            .field("table", &self.entity.table())
            .field("row_id", &self.entity.row_id())
            .field("audit", self.entity.audit_info())
            .finish()
    }
}

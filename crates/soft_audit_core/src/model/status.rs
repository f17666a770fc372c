//! Lifecycle status flag stored on every auditable row.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an auditable entity.
///
/// Stored as lowercase text and indexed, so "all active rows" style filters
/// stay cheap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Visible, live record.
    #[default]
    Active,
    /// Logically disabled by the caller. Never set by the repository.
    Passive,
    /// Soft-deleted tombstone. The row is kept.
    Deleted,
}

impl Status {
    /// Returns the persisted text form.
    pub fn as_db(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Passive => "passive",
            Self::Deleted => "deleted",
        }
    }

    /// Parses the persisted text form. Returns `None` for unknown values.
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "passive" => Some(Self::Passive),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }
}

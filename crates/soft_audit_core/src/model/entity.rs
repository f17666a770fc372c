//! Auditable entity capability.
//!
//! # Responsibility
//! - Describe what any entity must expose to be stamped by the audited
//!   repository: a store-generated identity plus an embedded `AuditInfo`.
//!
//! # Invariants
//! - `id()` is `None` until the store assigns an identity on insert.
//! - Once assigned, an identity is never reused for another entity of the
//!   same type.

use crate::model::audit::AuditInfo;
use crate::model::status::Status;
use std::fmt::Debug;
use std::hash::Hash;

/// Identifier type of an auditable entity.
///
/// Identities are generated by the store, so every key type must round-trip
/// through a SQLite rowid.
pub trait EntityKey: Copy + Eq + Hash + Debug + 'static {
    /// Converts a store-generated rowid. Returns `None` when out of range.
    fn from_row_id(row_id: i64) -> Option<Self>;
    /// Converts back into the rowid used in SQL statements.
    fn to_row_id(self) -> i64;
}

impl EntityKey for i64 {
    fn from_row_id(row_id: i64) -> Option<Self> {
        Some(row_id)
    }

    fn to_row_id(self) -> i64 {
        self
    }
}

impl EntityKey for i32 {
    fn from_row_id(row_id: i64) -> Option<Self> {
        i32::try_from(row_id).ok()
    }

    fn to_row_id(self) -> i64 {
        i64::from(self)
    }
}

impl EntityKey for u32 {
    fn from_row_id(row_id: i64) -> Option<Self> {
        u32::try_from(row_id).ok()
    }

    fn to_row_id(self) -> i64 {
        i64::from(self)
    }
}

/// Capability required by the audited repository.
pub trait Auditable: 'static {
    type Key: EntityKey;

    fn id(&self) -> Option<Self::Key>;
    fn set_id(&mut self, id: Self::Key);
    fn audit(&self) -> &AuditInfo;
    fn audit_mut(&mut self) -> &mut AuditInfo;

    fn status(&self) -> Status {
        self.audit().status
    }
}

/// Implements [`Auditable`] for a struct with `id: Option<Key>` and
/// `audit: AuditInfo` fields.
///
/// ```
/// use soft_audit_core::{impl_auditable, AuditInfo};
///
/// struct Tag {
///     id: Option<i64>,
///     name: String,
///     audit: AuditInfo,
/// }
///
/// impl_auditable!(Tag, i64);
/// ```
#[macro_export]
macro_rules! impl_auditable {
    ($entity:ty, $key:ty) => {
        impl $crate::model::entity::Auditable for $entity {
            type Key = $key;

            fn id(&self) -> Option<$key> {
                self.id
            }

            fn set_id(&mut self, id: $key) {
                self.id = Some(id);
            }

            fn audit(&self) -> &$crate::model::audit::AuditInfo {
                &self.audit
            }

            fn audit_mut(&mut self) -> &mut $crate::model::audit::AuditInfo {
                &mut self.audit
            }
        }
    };
}

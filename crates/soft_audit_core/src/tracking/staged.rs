//! Type-erased view of a staged entity.

use crate::mapping::configuration::{audit_values, EntityConfiguration};
use crate::model::audit::AuditInfo;
use crate::model::entity::{Auditable, EntityKey};
use rusqlite::types::Value;
use std::any::{Any, TypeId};

/// Identity of a persisted entity across all mapped types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityIdentity {
    pub type_id: TypeId,
    pub row_id: i64,
}

impl EntityIdentity {
    pub fn of<E: Auditable>(id: E::Key) -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            row_id: id.to_row_id(),
        }
    }
}

/// Object-safe operations the tracker and session need on any staged entity.
///
/// Implemented for every [`EntityConfiguration`] type.
pub trait StagedEntity: Any {
    fn table(&self) -> &'static str;
    fn identity(&self) -> Option<EntityIdentity>;
    fn row_id(&self) -> Option<i64>;
    /// Stores a store-generated rowid. Returns `false` when it does not fit the
    /// entity key type.
    fn assign_row_id(&mut self, row_id: i64) -> bool;
    fn audit_info(&self) -> &AuditInfo;
    fn audit_info_mut(&mut self) -> &mut AuditInfo;
    /// Audit columns followed by entity columns, identity excluded.
    fn column_values(&self) -> Vec<(&'static str, Value)>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<E: EntityConfiguration> StagedEntity for E {
    fn table(&self) -> &'static str {
        E::TABLE
    }

    fn identity(&self) -> Option<EntityIdentity> {
        Auditable::id(self).map(EntityIdentity::of::<E>)
    }

    fn row_id(&self) -> Option<i64> {
        Auditable::id(self).map(EntityKey::to_row_id)
    }

    fn assign_row_id(&mut self, row_id: i64) -> bool {
        match E::Key::from_row_id(row_id) {
            Some(id) => {
                Auditable::set_id(self, id);
                true
            }
            None => false,
        }
    }

    fn audit_info(&self) -> &AuditInfo {
        Auditable::audit(self)
    }

    fn audit_info_mut(&mut self) -> &mut AuditInfo {
        Auditable::audit_mut(self)
    }

    fn column_values(&self) -> Vec<(&'static str, Value)> {
        let mut values = audit_values(Auditable::audit(self));
        values.extend(self.write_columns());
        values
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//! Embedded audit record.
//!
//! # Responsibility
//! - Hold the create/update/delete stamps and the lifecycle status.
//! - Provide the stamp helpers used by the audited repository.
//!
//! # Invariants
//! - `stamp_created` always leaves `status == Status::Active`.
//! - `stamp_deleted` always leaves `status == Status::Deleted` with both delete
//!   stamps set.

use crate::model::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of the acting user recorded in audit stamps.
pub type UserId = i32;

/// Audit columns shared by every auditable entity.
///
/// `create_date_time` is required by the storage mapping, so it starts at the
/// Unix epoch until the repository stamps it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditInfo {
    pub create_date_time: DateTime<Utc>,
    pub create_user_id: UserId,
    pub update_date_time: Option<DateTime<Utc>>,
    pub update_user_id: Option<UserId>,
    pub delete_date_time: Option<DateTime<Utc>>,
    pub delete_user_id: Option<UserId>,
    pub status: Status,
}

impl AuditInfo {
    /// Writes create stamps and marks the record active.
    pub fn stamp_created(&mut self, user_id: UserId, at: DateTime<Utc>) {
        self.create_date_time = at;
        self.create_user_id = user_id;
        self.status = Status::Active;
    }

    /// Writes update stamps. Status is left untouched.
    pub fn stamp_updated(&mut self, user_id: UserId, at: DateTime<Utc>) {
        self.update_date_time = Some(at);
        self.update_user_id = Some(user_id);
    }

    /// Writes delete stamps and marks the record as a soft-deleted tombstone.
    pub fn stamp_deleted(&mut self, user_id: UserId, at: DateTime<Utc>) {
        self.delete_date_time = Some(at);
        self.delete_user_id = Some(user_id);
        self.status = Status::Deleted;
    }

    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    pub fn is_deleted(&self) -> bool {
        self.status == Status::Deleted
    }
}

#[cfg(test)]
mod tests {
    use super::AuditInfo;
    use crate::model::status::Status;
    use chrono::{TimeZone, Utc};

    #[test]
    fn stamp_created_sets_create_fields_and_activates() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        let mut audit = AuditInfo {
            status: Status::Passive,
            ..AuditInfo::default()
        };

        audit.stamp_created(7, at);

        assert_eq!(audit.create_date_time, at);
        assert_eq!(audit.create_user_id, 7);
        assert!(audit.is_active());
        assert_eq!(audit.update_date_time, None);
        assert_eq!(audit.delete_date_time, None);
    }

    #[test]
    fn stamp_updated_keeps_status() {
        let at = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
        let mut audit = AuditInfo {
            status: Status::Passive,
            ..AuditInfo::default()
        };

        audit.stamp_updated(3, at);

        assert_eq!(audit.update_date_time, Some(at));
        assert_eq!(audit.update_user_id, Some(3));
        assert_eq!(audit.status, Status::Passive);
    }

    #[test]
    fn stamp_deleted_is_last_write_wins() {
        let first = Utc.with_ymd_and_hms(2024, 5, 3, 0, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 5, 4, 0, 0, 0).unwrap();
        let mut audit = AuditInfo::default();

        audit.stamp_deleted(9, first);
        audit.stamp_deleted(11, second);

        assert!(audit.is_deleted());
        assert_eq!(audit.delete_user_id, Some(11));
        assert_eq!(audit.delete_date_time, Some(second));
    }
}

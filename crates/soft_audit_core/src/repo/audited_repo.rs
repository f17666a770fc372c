//! Audited repository over a change tracker.
//!
//! # Responsibility
//! - Stamp create/update/delete audit fields on the entity passed in.
//! - Reconcile every other staged entry so inserts carry create stamps and
//!   removals turn into soft deletes.
//!
//! # Invariants
//! - `add` leaves the entity `Active` and staged as `Added`.
//! - `update` and `delete` leave the entity staged as `Modified`.
//! - `delete` never leaves any entry staged as `Deleted`.
//! - One call samples the clock at most once.

use crate::mapping::configuration::EntityConfiguration;
use crate::model::audit::UserId;
use crate::model::entity::Auditable;
use crate::tracking::{ChangeTracker, EntryKey, EntryState};
use chrono::{DateTime, Utc};
use log::debug;
use std::marker::PhantomData;

/// Audit/soft-delete operations for entities of type `E`.
///
/// None of the operations validate input or fail; constraint violations and
/// missing rows are reported by the store when the unit of work is committed.
pub trait AuditRepository<E: Auditable> {
    /// Stamps create fields, marks the entity active and stages it for insert.
    fn add(&mut self, entity: E, user_id: UserId, log_date_time: Option<DateTime<Utc>>)
        -> EntryKey;

    /// Stamps update fields and stages a full-row update.
    fn update(
        &mut self,
        entity: E,
        user_id: UserId,
        log_date_time: Option<DateTime<Utc>>,
    ) -> EntryKey;

    /// Soft-deletes the entity: delete stamps, `Status::Deleted`, staged as
    /// an update.
    fn delete(
        &mut self,
        entity: E,
        user_id: UserId,
        log_date_time: Option<DateTime<Utc>>,
    ) -> EntryKey;
}

/// [`AuditRepository`] bound to one change tracker.
pub struct AuditedRepository<'t, E> {
    tracker: &'t mut ChangeTracker,
    _entity: PhantomData<fn() -> E>,
}

impl<'t, E: EntityConfiguration> AuditedRepository<'t, E> {
    pub fn new(tracker: &'t mut ChangeTracker) -> Self {
        Self {
            tracker,
            _entity: PhantomData,
        }
    }

    pub fn tracker(&self) -> &ChangeTracker {
        &*self.tracker
    }

    /// Runs `update` on an entity already tracked under `key`.
    ///
    /// Returns `false` when `key` is unknown or tracks another entity type.
    pub fn update_tracked(
        &mut self,
        key: EntryKey,
        user_id: UserId,
        log_date_time: Option<DateTime<Utc>>,
    ) -> bool {
        if self.tracker.get::<E>(key).is_none() {
            return false;
        }
        self.update_entry(key, user_id, stamp_time(log_date_time));
        true
    }

    /// Runs `delete` on an entity already tracked under `key`.
    ///
    /// Returns `false` when `key` is unknown or tracks another entity type.
    pub fn delete_tracked(
        &mut self,
        key: EntryKey,
        user_id: UserId,
        log_date_time: Option<DateTime<Utc>>,
    ) -> bool {
        if self.tracker.get::<E>(key).is_none() {
            return false;
        }
        self.delete_entry(key, user_id, stamp_time(log_date_time));
        true
    }

    fn update_entry(&mut self, key: EntryKey, user_id: UserId, at: DateTime<Utc>) {
        if let Some(entry) = self.tracker.entry_mut(key) {
            entry.audit_mut().stamp_updated(user_id, at);
        }

        // Removals staged anywhere in the unit of work become soft deletes here
        // too, not only in `delete`.
        let restamped = restamp_added(self.tracker, user_id, at);
        let redirected = redirect_removals(self.tracker, user_id, at, true);
        self.mark_modified(key);

        debug!(
            "event=audit_update module=repo status=ok table={} user_id={} restamped={} redirected={}",
            E::TABLE,
            user_id,
            restamped,
            redirected
        );
    }

    fn delete_entry(&mut self, key: EntryKey, user_id: UserId, at: DateTime<Utc>) {
        if let Some(entry) = self.tracker.entry_mut(key) {
            entry.audit_mut().stamp_deleted(user_id, at);
        }

        let redirected = redirect_removals(self.tracker, user_id, at, false);
        self.mark_modified(key);

        debug!(
            "event=audit_delete module=repo status=ok table={} user_id={} redirected={}",
            E::TABLE,
            user_id,
            redirected
        );
    }

    /// A pending insert stays `Added` so the stamped row is still inserted.
    fn mark_modified(&mut self, key: EntryKey) {
        if self.tracker.state(key) != Some(EntryState::Added) {
            self.tracker.set_state(key, EntryState::Modified);
        }
    }
}

impl<E: EntityConfiguration> AuditRepository<E> for AuditedRepository<'_, E> {
    fn add(
        &mut self,
        mut entity: E,
        user_id: UserId,
        log_date_time: Option<DateTime<Utc>>,
    ) -> EntryKey {
        let at = stamp_time(log_date_time);
        entity.audit_mut().stamp_created(user_id, at);

        let key = self.tracker.add(entity);
        let restamped = restamp_added(self.tracker, user_id, at);

        debug!(
            "event=audit_add module=repo status=ok table={} user_id={} restamped={}",
            E::TABLE,
            user_id,
            restamped
        );
        key
    }

    fn update(
        &mut self,
        entity: E,
        user_id: UserId,
        log_date_time: Option<DateTime<Utc>>,
    ) -> EntryKey {
        let at = stamp_time(log_date_time);
        let key = self.tracker.attach(entity);
        self.update_entry(key, user_id, at);
        key
    }

    fn delete(
        &mut self,
        entity: E,
        user_id: UserId,
        log_date_time: Option<DateTime<Utc>>,
    ) -> EntryKey {
        let at = stamp_time(log_date_time);
        let key = self.tracker.attach(entity);
        self.delete_entry(key, user_id, at);
        key
    }
}

fn stamp_time(log_date_time: Option<DateTime<Utc>>) -> DateTime<Utc> {
    log_date_time.unwrap_or_else(Utc::now)
}

/// Re-applies create stamps and `Active` to every entry staged for insert.
fn restamp_added(tracker: &mut ChangeTracker, user_id: UserId, at: DateTime<Utc>) -> usize {
    let mut count = 0;
    for entry in tracker.entries_mut() {
        if entry.state() == EntryState::Added {
            entry.audit_mut().stamp_created(user_id, at);
            count += 1;
        }
    }
    count
}

/// Turns staged removals (and optionally stale entries) into soft deletes.
fn redirect_removals(
    tracker: &mut ChangeTracker,
    user_id: UserId,
    at: DateTime<Utc>,
    include_detached: bool,
) -> usize {
    let mut count = 0;
    for entry in tracker.entries_mut() {
        let redirect = match entry.state() {
            EntryState::Deleted => true,
            EntryState::Detached => include_detached,
            _ => false,
        };
        if redirect {
            entry.audit_mut().stamp_deleted(user_id, at);
            entry.set_state(EntryState::Modified);
            count += 1;
        }
    }
    count
}

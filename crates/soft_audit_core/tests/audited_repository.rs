mod common;

use chrono::{DateTime, TimeZone, Utc};
use common::{Customer, Invoice};
use soft_audit_core::{
    AuditRepository, Auditable, AuditedRepository, ChangeTracker, EntryState, Status,
};

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, hour, 0, 0).unwrap()
}

fn assert_recent(value: DateTime<Utc>) {
    let drift = (Utc::now() - value).num_seconds().abs();
    assert!(drift <= 5, "timestamp {value} is not close to now");
}

#[test]
fn add_stamps_create_fields_with_current_time() {
    let mut tracker = ChangeTracker::new();
    let key = AuditedRepository::<Customer>::new(&mut tracker).add(Customer::new("E1"), 7, None);

    let customer = tracker.get::<Customer>(key).unwrap();
    assert_eq!(customer.audit.status, Status::Active);
    assert_eq!(customer.audit.create_user_id, 7);
    assert_recent(customer.audit.create_date_time);
    assert_eq!(customer.audit.update_date_time, None);
    assert_eq!(customer.audit.delete_date_time, None);
    assert_eq!(tracker.state(key), Some(EntryState::Added));
}

#[test]
fn add_uses_supplied_timestamp_verbatim() {
    let mut tracker = ChangeTracker::new();
    let mut customer = Customer::new("passive first");
    customer.audit.status = Status::Passive;

    let key = AuditedRepository::<Customer>::new(&mut tracker).add(customer, 4, Some(at(9)));

    let stored = tracker.get::<Customer>(key).unwrap();
    assert_eq!(stored.audit.create_date_time, at(9));
    assert_eq!(stored.status(), Status::Active);
}

#[test]
fn add_restamps_every_pending_insert() {
    let mut tracker = ChangeTracker::new();
    let mut orphan = Invoice::new(1, 500);
    orphan.audit.status = Status::Passive;
    let orphan_key = tracker.add(orphan);
    let untouched_key = tracker.attach(Invoice::with_id(5, 1, 100));

    AuditedRepository::<Customer>::new(&mut tracker).add(Customer::new("owner"), 12, Some(at(10)));

    let orphan = tracker.get::<Invoice>(orphan_key).unwrap();
    assert_eq!(orphan.audit.create_user_id, 12);
    assert_eq!(orphan.audit.create_date_time, at(10));
    assert_eq!(orphan.audit.status, Status::Active);

    let untouched = tracker.get::<Invoice>(untouched_key).unwrap();
    assert_eq!(untouched.audit.create_user_id, 0);
    assert_eq!(tracker.state(untouched_key), Some(EntryState::Unchanged));
}

#[test]
fn omitted_timestamp_is_sampled_once_per_call() {
    let mut tracker = ChangeTracker::new();
    let first = tracker.add(Invoice::new(1, 10));
    let second = tracker.add(Invoice::new(1, 20));

    let key = AuditedRepository::<Customer>::new(&mut tracker).add(Customer::new("c"), 1, None);

    let stamp = tracker.get::<Customer>(key).unwrap().audit.create_date_time;
    assert_eq!(tracker.get::<Invoice>(first).unwrap().audit.create_date_time, stamp);
    assert_eq!(tracker.get::<Invoice>(second).unwrap().audit.create_date_time, stamp);
}

#[test]
fn update_stamps_update_fields_and_keeps_status() {
    let mut tracker = ChangeTracker::new();
    let mut customer = Customer::with_id(1, "E1");
    customer.audit.status = Status::Passive;
    customer.audit.create_user_id = 2;
    customer.audit.create_date_time = at(1);

    let key = AuditedRepository::<Customer>::new(&mut tracker).update(customer, 3, Some(at(11)));

    let stored = tracker.get::<Customer>(key).unwrap();
    assert_eq!(stored.audit.update_user_id, Some(3));
    assert_eq!(stored.audit.update_date_time, Some(at(11)));
    assert_eq!(stored.audit.status, Status::Passive);
    assert_eq!(stored.audit.create_user_id, 2);
    assert_eq!(stored.audit.create_date_time, at(1));
    assert_eq!(tracker.state(key), Some(EntryState::Modified));
}

#[test]
fn update_turns_removed_entries_into_soft_deletes() {
    let mut tracker = ChangeTracker::new();
    let e2 = tracker.attach(Invoice::with_id(2, 1, 900));
    assert!(tracker.remove(e2));

    AuditedRepository::<Customer>::new(&mut tracker).update(Customer::with_id(1, "E1"), 3, None);

    let invoice = tracker.get::<Invoice>(e2).unwrap();
    assert_eq!(invoice.audit.status, Status::Deleted);
    assert_eq!(invoice.audit.delete_user_id, Some(3));
    assert_recent(invoice.audit.delete_date_time.unwrap());
    assert_eq!(tracker.state(e2), Some(EntryState::Modified));
}

#[test]
fn update_turns_detached_entries_into_soft_deletes() {
    let mut tracker = ChangeTracker::new();
    let stale = tracker.attach(Invoice::with_id(8, 1, 40));
    tracker.detach(stale);

    AuditedRepository::<Customer>::new(&mut tracker).update(
        Customer::with_id(1, "E1"),
        6,
        Some(at(12)),
    );

    let invoice = tracker.get::<Invoice>(stale).unwrap();
    assert!(invoice.audit.is_deleted());
    assert_eq!(invoice.audit.delete_date_time, Some(at(12)));
    assert_eq!(tracker.state(stale), Some(EntryState::Modified));
}

#[test]
fn update_restamps_pending_inserts_and_ignores_other_modifications() {
    let mut tracker = ChangeTracker::new();
    let pending = tracker.add(Invoice::new(1, 70));
    let modified = tracker.attach(Invoice::with_id(3, 1, 80));
    tracker.set_state(modified, EntryState::Modified);

    AuditedRepository::<Customer>::new(&mut tracker).update(
        Customer::with_id(1, "E1"),
        5,
        Some(at(13)),
    );

    let pending_invoice = tracker.get::<Invoice>(pending).unwrap();
    assert_eq!(pending_invoice.audit.create_user_id, 5);
    assert_eq!(pending_invoice.audit.create_date_time, at(13));
    assert_eq!(tracker.state(pending), Some(EntryState::Added));

    let modified_invoice = tracker.get::<Invoice>(modified).unwrap();
    assert_eq!(modified_invoice.audit.update_user_id, None);
    assert_eq!(modified_invoice.audit.status, Status::Active);
}

#[test]
fn update_reuses_entry_for_already_tracked_identity() {
    let mut tracker = ChangeTracker::new();
    let original = tracker.attach(Customer::with_id(4, "before"));

    let key = AuditedRepository::<Customer>::new(&mut tracker).update(
        Customer::with_id(4, "after"),
        2,
        Some(at(14)),
    );

    assert_eq!(key, original);
    assert_eq!(tracker.len(), 1);
    assert_eq!(tracker.get::<Customer>(key).unwrap().name, "after");
}

#[test]
fn delete_soft_deletes_and_stages_modification() {
    let mut tracker = ChangeTracker::new();
    let key = AuditedRepository::<Customer>::new(&mut tracker).delete(
        Customer::with_id(1, "E1"),
        9,
        Some(at(15)),
    );

    let stored = tracker.get::<Customer>(key).unwrap();
    assert_eq!(stored.audit.status, Status::Deleted);
    assert_eq!(stored.audit.delete_user_id, Some(9));
    assert_eq!(stored.audit.delete_date_time, Some(at(15)));
    assert_eq!(tracker.state(key), Some(EntryState::Modified));
}

#[test]
fn delete_twice_keeps_last_actor() {
    let mut tracker = ChangeTracker::new();
    let mut repo = AuditedRepository::<Customer>::new(&mut tracker);

    let first = repo.delete(Customer::with_id(1, "E1"), 9, Some(at(15)));
    let second = repo.delete(Customer::with_id(1, "E1"), 10, Some(at(16)));

    assert_eq!(first, second);
    let stored = tracker.get::<Customer>(second).unwrap();
    assert_eq!(stored.audit.status, Status::Deleted);
    assert_eq!(stored.audit.delete_user_id, Some(10));
    assert_eq!(stored.audit.delete_date_time, Some(at(16)));
    assert_eq!(tracker.state(second), Some(EntryState::Modified));
}

#[test]
fn delete_redirects_removed_entries_but_leaves_detached_ones() {
    let mut tracker = ChangeTracker::new();
    let removed = tracker.attach(Invoice::with_id(1, 1, 10));
    tracker.remove(removed);
    let stale = tracker.attach(Invoice::with_id(2, 1, 20));
    tracker.detach(stale);

    AuditedRepository::<Customer>::new(&mut tracker).delete(
        Customer::with_id(1, "E1"),
        4,
        Some(at(17)),
    );

    let removed_invoice = tracker.get::<Invoice>(removed).unwrap();
    assert_eq!(removed_invoice.audit.delete_user_id, Some(4));
    assert_eq!(removed_invoice.audit.delete_date_time, Some(at(17)));
    assert_eq!(tracker.state(removed), Some(EntryState::Modified));

    assert_eq!(tracker.state(stale), Some(EntryState::Detached));
    assert!(tracker.get::<Invoice>(stale).unwrap().audit.is_active());
    assert!(tracker
        .entries()
        .all(|entry| entry.state() != EntryState::Deleted));
}

#[test]
fn tracked_operations_reject_foreign_entity_types() {
    let mut tracker = ChangeTracker::new();
    let invoice = tracker.attach(Invoice::with_id(1, 1, 10));

    let mut repo = AuditedRepository::<Customer>::new(&mut tracker);
    assert!(!repo.update_tracked(invoice, 1, None));
    assert!(!repo.delete_tracked(invoice, 1, None));
    assert_eq!(repo.tracker().len(), 1);

    assert_eq!(tracker.state(invoice), Some(EntryState::Unchanged));
}

#[test]
fn delete_tracked_soft_deletes_pending_insert_in_place() {
    let mut tracker = ChangeTracker::new();
    let key = AuditedRepository::<Customer>::new(&mut tracker).add(
        Customer::new("short lived"),
        1,
        Some(at(1)),
    );

    assert!(AuditedRepository::<Customer>::new(&mut tracker).delete_tracked(key, 2, Some(at(2))));

    let stored = tracker.get::<Customer>(key).unwrap();
    assert_eq!(stored.audit.create_user_id, 1);
    assert_eq!(stored.audit.delete_user_id, Some(2));
    assert_eq!(stored.audit.status, Status::Deleted);
    assert_eq!(tracker.state(key), Some(EntryState::Added));
}

#[test]
fn update_tracked_keeps_pending_insert_added() {
    let mut tracker = ChangeTracker::new();
    let key = AuditedRepository::<Customer>::new(&mut tracker).add(
        Customer::new("draft"),
        1,
        Some(at(1)),
    );

    assert!(AuditedRepository::<Customer>::new(&mut tracker).update_tracked(key, 2, Some(at(3))));

    let stored = tracker.get::<Customer>(key).unwrap();
    assert_eq!(stored.audit.create_user_id, 2);
    assert_eq!(stored.audit.create_date_time, at(3));
    assert_eq!(stored.audit.update_user_id, Some(2));
    assert_eq!(stored.audit.update_date_time, Some(at(3)));
    assert_eq!(tracker.state(key), Some(EntryState::Added));
}

#[test]
fn update_tracked_marks_unchanged_entry_modified() {
    let mut tracker = ChangeTracker::new();
    let key = tracker.attach(Customer::with_id(5, "saved"));

    assert!(AuditedRepository::<Customer>::new(&mut tracker).update_tracked(key, 2, Some(at(4))));

    assert_eq!(tracker.get::<Customer>(key).unwrap().audit.update_user_id, Some(2));
    assert_eq!(tracker.state(key), Some(EntryState::Modified));
}

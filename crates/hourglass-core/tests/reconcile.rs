//! Integration tests for the repeat reconciliation flow.
//!
//! These drive the scheduler through the store boundary the way the host
//! does at its trigger points: fetch, advance, persist, act on the result.

use chrono::{DateTime, Duration, TimeZone, Utc};

use hourglass_core::{
    reset_in_place, snapshot_events, Event, EventStore, MemoryStore, RepeatKind, RepeatScheduler,
    StoreError,
};

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

/// Store whose reads always fail, standing in for an undecodable data file.
struct BrokenStore;

impl EventStore for BrokenStore {
    fn fetch_all(&self) -> Result<Vec<Event>, StoreError> {
        Err(StoreError::ReadFailed("corrupt data file".to_string()))
    }

    fn save(&self, _events: &[Event]) -> Result<(), StoreError> {
        Ok(())
    }
}

#[test]
fn run_advances_and_persists_completed_repeats() {
    let anniversary = Event::new(
        "anniversary",
        utc(2024, 11, 2, 0, 0, 0),
        utc(2025, 11, 2, 0, 0, 0),
    )
    .with_repeat(RepeatKind::Yearly, 1);
    let one_off = Event::new("deadline", utc(2025, 10, 1, 0, 0, 0), utc(2025, 11, 2, 0, 0, 0));

    let store = MemoryStore::seeded([anniversary.clone(), one_off.clone()]);
    let mut scheduler = RepeatScheduler::new();
    let now = utc(2025, 11, 2, 0, 2, 0); // grace window just elapsed

    let reset = scheduler.run(&store, now);
    assert_eq!(reset, vec![anniversary.id.clone()]);

    let events = store.fetch_all().unwrap();
    let advanced = events.iter().find(|e| e.id == anniversary.id).unwrap();
    assert_eq!(advanced.target_date, utc(2026, 11, 2, 0, 0, 0));
    assert_eq!(advanced.start_date, now);
    assert!(advanced.is_repeat_occurrence);

    // The non-repeating event is untouched.
    let untouched = events.iter().find(|e| e.id == one_off.id).unwrap();
    assert_eq!(untouched.target_date, one_off.target_date);
    assert!(!untouched.is_repeat_occurrence);
}

#[test]
fn run_twice_in_the_same_instant_resets_once() {
    let daily = Event::new(
        "medication",
        utc(2025, 1, 9, 8, 0, 0),
        utc(2025, 1, 10, 8, 0, 0),
    )
    .with_repeat(RepeatKind::Daily, 1);

    let store = MemoryStore::seeded([daily.clone()]);
    let mut scheduler = RepeatScheduler::new();
    let now = utc(2025, 1, 10, 8, 2, 30);

    assert_eq!(scheduler.run(&store, now).len(), 1);
    // A UI refresh racing the timer tick: same instant, nothing new to do.
    assert!(scheduler.run(&store, now).is_empty());

    let events = store.fetch_all().unwrap();
    assert_eq!(events[0].target_date, utc(2025, 1, 11, 8, 0, 0));
}

#[test]
fn new_cycle_duration_runs_from_reset_instant() {
    let weekly = Event::new(
        "newsletter",
        utc(2025, 1, 1, 12, 0, 0),
        utc(2025, 1, 8, 12, 0, 0),
    )
    .with_repeat(RepeatKind::Weekly, 1);

    let store = MemoryStore::seeded([weekly.clone()]);
    let mut scheduler = RepeatScheduler::new();
    let now = utc(2025, 1, 8, 12, 30, 0);

    scheduler.run(&store, now);

    let events = store.fetch_all().unwrap();
    // Next target derives from the old target, while the clock restarts at
    // the reset instant -- the new cycle is shorter than a full week.
    assert_eq!(events[0].target_date, utc(2025, 1, 15, 12, 0, 0));
    assert_eq!(events[0].start_date, now);
    assert_eq!(
        events[0].target_date - events[0].start_date,
        Duration::days(7) - Duration::minutes(30)
    );
}

#[test]
fn fetch_failure_is_a_quiet_no_op() {
    let mut scheduler = RepeatScheduler::new();
    let reset = scheduler.run(&BrokenStore, utc(2025, 1, 10, 8, 2, 0));
    assert!(reset.is_empty());
}

#[test]
fn reset_feeds_refreshed_snapshots() {
    let monthly = Event::new(
        "rent",
        utc(2025, 1, 1, 9, 0, 0),
        utc(2025, 2, 1, 9, 0, 0),
    )
    .with_repeat(RepeatKind::Monthly, 1);

    let store = MemoryStore::seeded([monthly]);
    let mut scheduler = RepeatScheduler::new();
    let now = utc(2025, 2, 1, 9, 5, 0);

    let reset = scheduler.run(&store, now);
    assert_eq!(reset.len(), 1);

    // The host republishes widget snapshots from the updated set.
    let snapshots = snapshot_events(&store.fetch_all().unwrap());
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].target_date, utc(2025, 3, 1, 9, 0, 0));
    assert_eq!(snapshots[0].start_date, now);
}

#[test]
fn manual_advance_leaves_nothing_for_the_scheduler() {
    // An event reset by hand (the creation-time chain path uses the same
    // date advance) does not confuse a later scheduler pass.
    let mut daily = Event::new(
        "backup",
        utc(2025, 1, 9, 3, 0, 0),
        utc(2025, 1, 10, 3, 0, 0),
    )
    .with_repeat(RepeatKind::Daily, 1);

    let now = utc(2025, 1, 10, 3, 2, 0);
    assert!(reset_in_place(&mut daily, now));

    let store = MemoryStore::seeded([daily]);
    let mut scheduler = RepeatScheduler::new();
    assert!(scheduler.run(&store, now).is_empty());
}

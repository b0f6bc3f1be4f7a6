//! Repeat reconciliation over the stored event set.
//!
//! The scheduler is process-invoked, not continuously running: the host calls
//! [`RepeatScheduler::run`] at its trigger points (app launch, return to
//! foreground, periodic tick) and acts on the returned ids -- re-scheduling
//! notifications, refreshing widget snapshots.
//!
//! Invocations must be serialized by the host; the scheduler holds the one
//! piece of mutable state in the core (the recently-reset id set) and assumes
//! a single owner.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::event::Event;
use crate::store::EventStore;

/// Seconds after a reset batch during which a second pass will not touch the
/// same events again. Guards against back-to-back invocations (a UI refresh
/// and a timer tick in the same second) resetting one completion twice.
pub const RESET_DEBOUNCE_SECS: i64 = 5;

/// Advances completed repeating events to their next cycle, exactly once per
/// completion.
#[derive(Debug, Default)]
pub struct RepeatScheduler {
    recently_reset: HashSet<String>,
    last_reset_at: Option<DateTime<Utc>>,
}

impl RepeatScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch, reconcile, persist. The process-level entry point.
    ///
    /// A fetch failure is logged and the pass becomes a no-op; the next
    /// trigger point retries naturally. Returns the ids of events that were
    /// advanced.
    pub fn run(&mut self, store: &dyn EventStore, now: DateTime<Utc>) -> Vec<String> {
        let mut events = match store.fetch_all() {
            Ok(events) => events,
            Err(err) => {
                tracing::warn!(error = %err, "event fetch failed, skipping repeat pass");
                return Vec::new();
            }
        };

        let reset = self.reconcile(&mut events, now);
        if !reset.is_empty() {
            let changed: Vec<Event> = events
                .iter()
                .filter(|e| reset.contains(&e.id))
                .cloned()
                .collect();
            if let Err(err) = store.save(&changed) {
                tracing::warn!(error = %err, "failed to persist advanced events");
            }
        }
        reset
    }

    /// Reconcile a snapshot of events against `now`, advancing in place every
    /// repeating event whose count-up grace window has elapsed.
    ///
    /// Events advanced within the last [`RESET_DEBOUNCE_SECS`] seconds are
    /// skipped; the suppression set is cleared once that window passes, so a
    /// later completion of the new cycle resets again.
    pub fn reconcile(&mut self, events: &mut [Event], now: DateTime<Utc>) -> Vec<String> {
        if let Some(last) = self.last_reset_at {
            if now - last > Duration::seconds(RESET_DEBOUNCE_SECS) {
                self.recently_reset.clear();
            }
        }

        let mut reset = Vec::new();
        for event in events.iter_mut() {
            if !event.should_reset_repeat(now) || self.recently_reset.contains(&event.id) {
                continue;
            }
            if !reset_in_place(event, now) {
                // Repeat kind lost between the eligibility check and the
                // advance; left unchanged, retried on the next pass.
                tracing::warn!(id = %event.id, "repeating event has no next occurrence");
                continue;
            }
            self.recently_reset.insert(event.id.clone());
            self.last_reset_at = Some(now);
            reset.push(event.id.clone());
        }
        reset
    }
}

/// Advance a completed repeating event to its next cycle, restarting the
/// clock at `now`.
///
/// The new cycle spans `next occurrence - now`, not the previous cycle
/// length: the target moves to the occurrence after the old target while the
/// start becomes the moment of the reset. Returns false (and leaves the
/// event untouched) when no next occurrence exists.
pub fn reset_in_place(event: &mut Event, now: DateTime<Utc>) -> bool {
    let Some(next) = event.next_occurrence(event.target_date) else {
        return false;
    };
    event.start_date = now;
    event.target_date = next;
    event.is_repeat_occurrence = true;
    true
}

/// Advance a repeating event to its next cycle while preserving the previous
/// cycle's duration.
///
/// Used right after manual creation, when the entered target is already in
/// the past: the new start is derived by subtracting the old cycle length
/// from the new target, so the visual span stays what the user entered. Not
/// interchangeable with [`reset_in_place`].
pub fn chain_next_occurrence(event: &mut Event) -> bool {
    let Some(next) = event.next_occurrence(event.target_date) else {
        return false;
    };
    let cycle = event.target_date - event.start_date;
    event.start_date = next - cycle;
    event.target_date = next;
    event.is_repeat_occurrence = true;
    true
}

/// Ids of non-repeating events that completed more than `after_days` days
/// before `now`.
///
/// The optional clean-up-after-completion policy: the host decides whether
/// the policy is on and owns the actual deletion. Repeating events are never
/// swept -- they reset instead.
pub fn sweep_completed(events: &[Event], now: DateTime<Utc>, after_days: u32) -> Vec<String> {
    events
        .iter()
        .filter(|e| !e.repeats())
        .filter(|e| now - e.target_date >= Duration::days(i64::from(after_days)))
        .map(|e| e.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RepeatKind;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn daily_event(name: &str) -> Event {
        Event::new(name, utc(2025, 1, 9, 9, 0, 0), utc(2025, 1, 10, 9, 0, 0))
            .with_repeat(RepeatKind::Daily, 3)
    }

    #[test]
    fn reset_in_place_restarts_clock_at_now() {
        let mut ev = daily_event("standup");
        let now = utc(2025, 1, 10, 9, 5, 0);
        assert!(reset_in_place(&mut ev, now));
        assert_eq!(ev.start_date, now);
        assert_eq!(ev.target_date, utc(2025, 1, 13, 9, 0, 0));
        assert!(ev.is_repeat_occurrence);
    }

    #[test]
    fn chain_preserves_cycle_duration() {
        let mut ev = daily_event("standup");
        let old_span = ev.target_date - ev.start_date;
        assert!(chain_next_occurrence(&mut ev));
        assert_eq!(ev.target_date, utc(2025, 1, 13, 9, 0, 0));
        assert_eq!(ev.target_date - ev.start_date, old_span);
        assert!(ev.is_repeat_occurrence);
    }

    #[test]
    fn reconcile_advances_eligible_events() {
        let mut scheduler = RepeatScheduler::new();
        let mut events = vec![daily_event("a"), daily_event("b")];
        let now = utc(2025, 1, 10, 9, 2, 0); // 120s past target

        let reset = scheduler.reconcile(&mut events, now);
        assert_eq!(reset.len(), 2);
        for ev in &events {
            assert_eq!(ev.target_date, utc(2025, 1, 13, 9, 0, 0));
            assert_eq!(ev.start_date, now);
        }
    }

    #[test]
    fn reconcile_skips_events_still_in_grace() {
        let mut scheduler = RepeatScheduler::new();
        let mut events = vec![daily_event("a")];
        let now = utc(2025, 1, 10, 9, 1, 59); // 119s past target

        assert!(scheduler.reconcile(&mut events, now).is_empty());
        assert_eq!(events[0].target_date, utc(2025, 1, 10, 9, 0, 0));
    }

    #[test]
    fn back_to_back_passes_reset_once() {
        let mut scheduler = RepeatScheduler::new();
        let mut events = vec![daily_event("a")];
        let now = utc(2025, 1, 10, 9, 2, 0);

        let first = scheduler.reconcile(&mut events, now);
        assert_eq!(first.len(), 1);

        // Same completion seen again within the debounce window: even if the
        // record were somehow still eligible, it must not advance twice.
        events[0].target_date = utc(2025, 1, 10, 9, 0, 0);
        let second = scheduler.reconcile(&mut events, now + Duration::seconds(1));
        assert!(second.is_empty());
        assert_eq!(events[0].target_date, utc(2025, 1, 10, 9, 0, 0));
    }

    #[test]
    fn suppression_expires_after_debounce_window() {
        let mut scheduler = RepeatScheduler::new();
        let mut events = vec![daily_event("a")];
        let now = utc(2025, 1, 10, 9, 2, 0);

        assert_eq!(scheduler.reconcile(&mut events, now).len(), 1);

        // Simulate the new cycle having completed as well: once more than
        // five seconds separate the passes, the id may reset again.
        events[0].target_date = utc(2025, 1, 10, 8, 0, 0);
        let later = now + Duration::seconds(6);
        let again = scheduler.reconcile(&mut events, later);
        assert_eq!(again.len(), 1);
        assert_eq!(events[0].start_date, later);
    }

    #[test]
    fn non_repeating_events_left_alone() {
        let mut scheduler = RepeatScheduler::new();
        let mut events = vec![Event::new(
            "once",
            utc(2025, 1, 1, 0, 0, 0),
            utc(2025, 1, 2, 0, 0, 0),
        )];
        let reset = scheduler.reconcile(&mut events, utc(2025, 6, 1, 0, 0, 0));
        assert!(reset.is_empty());
        assert_eq!(events[0].target_date, utc(2025, 1, 2, 0, 0, 0));
        assert!(!events[0].is_repeat_occurrence);
    }

    #[test]
    fn sweep_reports_only_stale_non_repeating() {
        let now = utc(2025, 2, 1, 0, 0, 0);
        let stale = Event::new("old", utc(2025, 1, 1, 0, 0, 0), utc(2025, 1, 5, 0, 0, 0));
        let fresh = Event::new("new", utc(2025, 1, 1, 0, 0, 0), utc(2025, 1, 31, 0, 0, 0));
        let repeating = daily_event("cycle");
        let events = vec![stale.clone(), fresh, repeating];

        let swept = sweep_completed(&events, now, 7);
        assert_eq!(swept, vec![stale.id]);
    }
}

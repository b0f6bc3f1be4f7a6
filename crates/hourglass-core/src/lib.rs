//! # Hourglass Core Library
//!
//! This library provides the core business logic for Hourglass, a
//! single-user, offline-first countdown tracker. The host application
//! (GUI shell, home-screen widgets, platform notifications) is a thin layer
//! over this crate.
//!
//! ## Architecture
//!
//! - **Event model**: every displayed quantity (remaining time, progress,
//!   scheduled/completed state) is a pure function of `(event, now)` -- the
//!   caller always supplies the instant, nothing here reads a clock or
//!   mutates a record
//! - **Repeat scheduler**: a process-invoked reconciliation pass that
//!   advances completed repeating events to their next cycle, with
//!   duplicate-suppression across back-to-back invocations
//! - **Host contracts**: narrow traits for the durable event store, the
//!   platform notification scheduler, and read-only display snapshots
//!
//! ## Key Components
//!
//! - [`Event`]: one countdown record and everything derived from it
//! - [`RepeatScheduler`]: advances repeating events exactly once per completion
//! - [`EventStore`]: the durable record store the host plugs in
//! - [`Config`]: reminder offsets and event defaults, stored as TOML

pub mod calendar;
pub mod error;
pub mod event;
pub mod reminders;
pub mod scheduler;
pub mod snapshot;
pub mod store;

pub use calendar::{import_entries, CalendarEntry};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use event::{CountUp, Event, RepeatKind, TimeLeft, YearlyRepeatStyle};
pub use reminders::{enabled_rules, ReminderOffset, ReminderRule, ReminderScheduler};
pub use scheduler::{chain_next_occurrence, reset_in_place, sweep_completed, RepeatScheduler};
pub use snapshot::{snapshot_events, EventSnapshot, FileSnapshotSink, SnapshotSink};
pub use store::{data_dir, Config, EventStore, MemoryStore};

//! This crate provides a personal task list with alarms.
//!
//! Tasks (see the [`task`] module) carry a date, a time (minute granularity), an optional repeat
//! rule and a chosen ringtone. They live in a [`TaskStore`](store::TaskStore) that persists them
//! to a local JSON file on every mutation.
//!
//! The [`trigger`] module holds the due-task evaluation rule: a pure function comparing a task
//! against the current local wall-clock time, plus the [`NotifiedSet`](trigger::NotifiedSet) that
//! makes firing at-most-once per due minute. \
//! A [`TaskFlow`](app::TaskFlow) controller owns the whole application state and runs the
//! evaluation pass; the [`AlarmPoller`](poller::AlarmPoller) drives it at a one-second cadence. \
//! Audio playback and platform notifications are reached through the
//! [`AlarmDispatcher`](alarm::AlarmDispatcher) and [`Notifier`](notify::Notifier) seams, so any
//! host (GUI, TUI, headless) can plug its own.

pub mod task;
pub use task::{Category, Repeat, Ringtone, Task, TaskId, TaskPatch};
pub mod trigger;
pub use trigger::{should_trigger, NotifiedSet};
pub mod store;
pub use store::TaskStore;
pub mod alarm;
pub mod notify;
pub mod app;
pub use app::TaskFlow;
pub mod poller;
pub use poller::AlarmPoller;

pub mod config;
pub mod utils;

//! Due-task trigger evaluation.
//!
//! This module decides, for a given wall-clock instant, whether a task is due right now.
//! [`should_trigger`] is a pure function over a [`Task`] and a timestamp; the [`NotifiedSet`]
//! keeps the "already fired this minute" markers that make firing at-most-once per due minute.
//!
//! Evaluation happens at a ~1 Hz cadence (see [`crate::poller`]), so the match window of a due
//! task is effectively the whole 60-second span of its minute.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::task::{Repeat, Task, TaskId};

/// Tells whether `task` is due at the instant `now`.
///
/// `now` is a timestamp in the local calendar (e.g. `Local::now().naive_local()`). All
/// comparisons are plain local calendar/clock comparisons, there is no timezone conversion
/// and no other date arithmetic.
///
/// The caller is responsible for the preconditions: this function does not check
/// `task.completed()`, nor whether the task has already been notified (see [`NotifiedSet`]).
pub fn should_trigger(task: &Task, now: NaiveDateTime) -> bool {
    // The match window is the due minute: hour and minute must match, seconds are ignored
    let time_matches = now.hour() == task.time().hour()
        && now.minute() == task.time().minute();
    if !time_matches {
        return false;
    }

    match task.repeat() {
        // One-shot tasks additionally require calendar-date equality
        Repeat::None => now.date() == task.date(),
        Repeat::Daily => true,
        // Weekly tasks fire on the weekday of their original date; the date itself is never advanced
        Repeat::Weekly => task.date().weekday() == now.weekday(),
        Repeat::Custom => task.repeats_on(now.weekday()),
    }
}

/// The set of tasks that have already fired for their current due minute.
///
/// A marker is scoped to the minute it was recorded in: within that minute, repeated polling
/// ticks must not re-fire the task; once the minute has elapsed the marker no longer applies,
/// so `daily`/`weekly`/`custom` tasks genuinely fire again on their next due occurrence.
#[derive(Debug, Default)]
pub struct NotifiedSet {
    fired: HashMap<TaskId, NaiveDateTime>,
}

impl NotifiedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `id` has fired during the minute containing `now`
    pub fn mark(&mut self, id: TaskId, now: NaiveDateTime) {
        self.fired.insert(id, minute_of(now));
    }

    /// Tells whether `id` has already fired during the minute containing `now`
    pub fn contains(&self, id: TaskId, now: NaiveDateTime) -> bool {
        self.fired.get(&id) == Some(&minute_of(now))
    }

    /// Drop every marker whose minute has elapsed, so the set stays bounded by the task count
    pub fn sweep(&mut self, now: NaiveDateTime) {
        let current = minute_of(now);
        self.fired.retain(|_, minute| *minute == current);
    }

    /// Drop the marker for `id` (e.g. because the task has been removed)
    pub fn forget(&mut self, id: TaskId) {
        self.fired.remove(&id);
    }
}

/// Truncate a timestamp to its minute (seconds and below set to zero)
fn minute_of(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

//! The application controller.
//!
//! [`TaskFlow`] is the single owner of the application state (task store, notified set, currently
//! ringing alarm) and of the two external collaborators (audio dispatcher, platform notifier).
//! There are no process-wide singletons: everything rendering or evaluation logic needs is
//! reachable from this one struct.
//!
//! The whole system runs on a single cooperative timeline (see [`crate::poller`]), so no locking
//! happens here: each [`TaskFlow::check_alarms`] pass mutates the state from one context only.

use std::error::Error;

use chrono::NaiveDateTime;

use crate::alarm::AlarmDispatcher;
use crate::config;
use crate::notify::{Notifier, Permission};
use crate::store::TaskStore;
use crate::task::{Task, TaskId, TaskPatch};
use crate::trigger::{should_trigger, NotifiedSet};

/// The task/alarm application state and its per-tick evaluation pass
pub struct TaskFlow<D, N>
where
    D: AlarmDispatcher,
    N: Notifier,
{
    store: TaskStore,
    notified: NotifiedSet,
    dispatcher: D,
    notifier: N,
    /// The task currently presented as a ringing alarm, if any
    active_alarm: Option<TaskId>,
}

impl<D, N> TaskFlow<D, N>
where
    D: AlarmDispatcher,
    N: Notifier,
{
    pub fn new(store: TaskStore, dispatcher: D, notifier: N) -> Self {
        Self {
            store,
            notified: NotifiedSet::new(),
            dispatcher,
            notifier,
            active_alarm: None,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// The task currently presented as a ringing alarm, if any
    pub fn active_alarm(&self) -> Option<&Task> {
        self.active_alarm.and_then(|id| self.store.task(id))
    }

    /// Evaluate every task against `now` and fire the due ones.
    ///
    /// This is the per-tick pass: completed tasks and tasks already notified for this minute are
    /// skipped, the rest go through [`should_trigger`]. A fire decision plays the ringtone,
    /// presents the task visually, posts a best-effort platform notification and marks the task
    /// as notified, so later ticks within the same minute are no-ops for it.
    pub async fn check_alarms(&mut self, now: NaiveDateTime) {
        self.notified.sweep(now);

        let due: Vec<TaskId> = self.store.tasks().iter()
            .filter(|task| !task.completed())
            .filter(|task| !self.notified.contains(task.id(), now))
            .filter(|task| should_trigger(task, now))
            .map(|task| task.id())
            .collect();

        for id in due {
            self.fire(id, now).await;
        }
    }

    async fn fire(&mut self, id: TaskId, now: NaiveDateTime) {
        let (name, description, ringtone, custom_audio) = match self.store.task(id) {
            None => return,
            Some(task) => (
                task.name().to_string(),
                task.description().unwrap_or("No description").to_string(),
                task.ringtone(),
                task.custom_audio().map(|p| p.to_path_buf()),
            ),
        };

        log::debug!("Task {} ({}) is due, firing its alarm", id, name);

        // Audio is fire-and-forget: a playback failure degrades to a visual-only alarm
        if let Err(err) = self.dispatcher.play(ringtone, custom_audio.as_deref()).await {
            log::warn!("Unable to play the alarm sound: {}", err);
        }

        // Visual presentation
        self.active_alarm = Some(id);

        self.send_platform_notification(&name, &description).await;

        self.notified.mark(id, now);
    }

    /// Post a permission-gated, best-effort platform notification.
    ///
    /// When the user has not been asked yet, this opportunistically requests the permission: a
    /// fire that happens before it is granted simply produces no notification for that occurrence
    async fn send_platform_notification(&mut self, name: &str, description: &str) {
        let permission = match self.notifier.permission() {
            Permission::Granted => Permission::Granted,
            Permission::Denied => return,
            Permission::Default => self.notifier.request_permission().await,
        };
        if permission != Permission::Granted {
            return;
        }

        let title = match config::APP_NAME.lock() {
            Ok(app_name) => format!("{}: task due: {}", app_name, name),
            Err(_) => format!("Task due: {}", name),
        };
        if let Err(err) = self.notifier.notify(&title, description).await {
            log::warn!("Unable to post a notification: {}", err);
        }
    }

    /// Dismiss the ringing alarm: stop the audio and clear the visual presentation
    pub async fn dismiss_alarm(&mut self) {
        self.dispatcher.stop().await;
        self.active_alarm = None;
    }

    /// "Mark complete" from the ringing alarm: stop the audio, complete the task,
    /// clear the visual presentation
    pub async fn complete_active_alarm(&mut self) -> Result<(), Box<dyn Error>> {
        self.dispatcher.stop().await;
        let result = match self.active_alarm {
            None => Ok(()),
            Some(id) => self.store.set_completed(id, true),
        };
        self.active_alarm = None;
        result
    }

    // Pass-through task CRUD. Going through the controller keeps the notified set and the
    // ringing alarm consistent with the list.

    pub fn add_task(&mut self, task: Task) {
        self.store.add(task);
    }

    pub fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<(), Box<dyn Error>> {
        self.store.update(id, patch)
    }

    pub fn remove_task(&mut self, id: TaskId) -> Result<(), Box<dyn Error>> {
        self.store.remove(id)?;
        self.notified.forget(id);
        if self.active_alarm == Some(id) {
            self.active_alarm = None;
        }
        Ok(())
    }

    pub fn set_task_completed(&mut self, id: TaskId, completed: bool) -> Result<(), Box<dyn Error>> {
        self.store.set_completed(id, completed)
    }
}

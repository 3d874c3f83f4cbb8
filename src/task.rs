//! Tasks (the items of the to-do/alarm list)

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use uuid::Uuid;

/// An opaque, unique task identifier, assigned at creation and immutable afterwards
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId {
    content: Uuid,
}
impl TaskId {
    /// Generate a random TaskId
    pub fn random() -> Self {
        Self { content: Uuid::new_v4() }
    }
}
impl FromStr for TaskId {
    type Err = uuid::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let u = Uuid::parse_str(s)?;
        Ok(Self { content: u })
    }
}
impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content.to_hyphenated())
    }
}

/// Used to support serde
impl Serialize for TaskId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.content.to_hyphenated().to_string())
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<TaskId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let u = Uuid::parse_str(&s).map_err(serde::de::Error::custom)?;
        Ok(TaskId { content: u })
    }
}

/// How a task repeats after its first occurrence.
///
/// `date`+`time` always denote the first (or, for `None`, the only) occurrence. The date is never
/// advanced: later occurrences are re-derived at evaluation time (see [`crate::trigger`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    /// Fires only once, on its exact date
    None,
    /// Fires every day at the same time
    Daily,
    /// Fires every week, on the weekday of its original date
    Weekly,
    /// Fires on an explicit set of weekdays (see [`Task::repeat_days`])
    Custom,
}

/// The alarm sound a task rings with.
///
/// Built-in sounds are synthesized tones (see [`crate::alarm::TonePattern`]), `Custom` plays an
/// audio file supplied by the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ringtone {
    Default,
    Bell,
    Chime,
    Beep,
    Notification,
    Custom,
}

/// A user-assigned category. It has no effect on triggering, it only drives list filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Personal,
    Work,
}

/// Convert a weekday to its index in the Mon=0..Sun=6 convention used by [`Task::repeat_days`]
pub fn weekday_index(day: Weekday) -> u8 {
    day.num_days_from_monday() as u8
}

/// A to-do task with an alarm time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// The unique task ID
    id: TaskId,

    /// The display name of the task. Guaranteed non-empty
    name: String,
    /// An optional free-text description
    description: Option<String>,

    /// The calendar date of the first (or only) occurrence, local timezone implied
    date: NaiveDate,
    /// The time of day the alarm rings at, minute granularity, local timezone implied
    time: NaiveTime,

    /// The repeat rule
    repeat: Repeat,
    /// Weekday indices (Mon=0..Sun=6) this task fires on. Only meaningful when
    /// `repeat == Repeat::Custom`, kept empty otherwise
    repeat_days: BTreeSet<u8>,

    /// The alarm sound
    ringtone: Ringtone,
    /// Path to a user-supplied audio file. Only present when `ringtone == Ringtone::Custom`
    custom_audio: Option<PathBuf>,

    /// Whether this task has been completed (by user action or from a ringing alarm)
    completed: bool,
    /// The user-assigned category
    category: Category,

    /// The time this task was created
    creation_date: DateTime<Utc>,
    /// The last time this task was modified
    last_modified: DateTime<Utc>,
}

impl Task {
    /// Create a brand new task. This will pick a new (random) task ID.
    ///
    /// Returns an error in case `name` is empty (or blank), as such tasks are rejected at creation.
    pub fn new(name: String, date: NaiveDate, time: NaiveTime, category: Category) -> Result<Self, Box<dyn Error>> {
        if name.trim().is_empty() {
            return Err("a task requires a non-empty name".into());
        }
        let now = Utc::now();
        Ok(Self {
            id: TaskId::random(),
            name,
            description: None,
            date,
            time: truncate_to_minute(time),
            repeat: Repeat::None,
            repeat_days: BTreeSet::new(),
            ringtone: Ringtone::Default,
            custom_audio: None,
            completed: false,
            category,
            creation_date: now,
            last_modified: now,
        })
    }

    pub fn id(&self) -> TaskId                    { self.id }
    pub fn name(&self) -> &str                    { &self.name }
    pub fn description(&self) -> Option<&str>     { self.description.as_deref() }
    pub fn date(&self) -> NaiveDate               { self.date }
    pub fn time(&self) -> NaiveTime               { self.time }
    pub fn repeat(&self) -> Repeat                { self.repeat }
    pub fn repeat_days(&self) -> &BTreeSet<u8>    { &self.repeat_days }
    pub fn ringtone(&self) -> Ringtone            { self.ringtone }
    pub fn custom_audio(&self) -> Option<&std::path::Path> { self.custom_audio.as_deref() }
    pub fn completed(&self) -> bool               { self.completed }
    pub fn category(&self) -> Category            { self.category }
    pub fn creation_date(&self) -> &DateTime<Utc> { &self.creation_date }
    pub fn last_modified(&self) -> &DateTime<Utc> { &self.last_modified }

    /// The first (or only) occurrence, as a timestamp at minute resolution
    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Tells whether this task repeats on the given weekday.
    /// This only considers `repeat_days`, i.e. it only makes sense for `Repeat::Custom` tasks
    pub fn repeats_on(&self, day: Weekday) -> bool {
        self.repeat_days.contains(&weekday_index(day))
    }

    fn update_last_modified(&mut self) {
        self.last_modified = Utc::now();
    }

    /// Rename a task.
    /// This updates its "last modified" field.
    /// Returns an error in case the new name is empty (or blank), leaving the task unchanged
    pub fn set_name(&mut self, new_name: String) -> Result<(), Box<dyn Error>> {
        if new_name.trim().is_empty() {
            return Err("a task requires a non-empty name".into());
        }
        self.update_last_modified();
        self.name = new_name;
        Ok(())
    }

    pub fn set_description(&mut self, new_description: Option<String>) {
        self.update_last_modified();
        self.description = new_description;
    }

    pub fn set_date(&mut self, new_date: NaiveDate) {
        self.update_last_modified();
        self.date = new_date;
    }

    /// Set the alarm time. Seconds (and below) are truncated to zero
    pub fn set_time(&mut self, new_time: NaiveTime) {
        self.update_last_modified();
        self.time = truncate_to_minute(new_time);
    }

    /// Set the repeat rule.
    /// Choosing anything but `Repeat::Custom` clears the custom weekday set
    pub fn set_repeat(&mut self, new_repeat: Repeat) {
        self.update_last_modified();
        self.repeat = new_repeat;
        if new_repeat != Repeat::Custom {
            self.repeat_days.clear();
        }
    }

    /// Set the weekday set for `Repeat::Custom` tasks.
    /// Indices outside Mon=0..Sun=6 are discarded
    pub fn set_repeat_days(&mut self, days: BTreeSet<u8>) {
        self.update_last_modified();
        self.repeat_days = days.into_iter().filter(|d| *d <= 6).collect();
    }

    /// Set the alarm sound.
    /// Choosing anything but `Ringtone::Custom` clears the custom audio reference
    pub fn set_ringtone(&mut self, new_ringtone: Ringtone) {
        self.update_last_modified();
        self.ringtone = new_ringtone;
        if new_ringtone != Ringtone::Custom {
            self.custom_audio = None;
        }
    }

    pub fn set_custom_audio(&mut self, audio: Option<PathBuf>) {
        self.update_last_modified();
        self.custom_audio = audio;
    }

    /// Set the completion status
    pub fn set_completed(&mut self, completed: bool) {
        self.update_last_modified();
        self.completed = completed;
    }

    pub fn set_category(&mut self, new_category: Category) {
        self.update_last_modified();
        self.category = new_category;
    }
}

/// A partial set of task fields, to be applied at once by [`crate::store::TaskStore::update`].
///
/// Every `None` field is left untouched. `description` and `custom_audio` are doubly-optional so
/// that a patch can also clear them.
#[derive(Clone, Debug, Default)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub repeat: Option<Repeat>,
    pub repeat_days: Option<BTreeSet<u8>>,
    pub ringtone: Option<Ringtone>,
    pub custom_audio: Option<Option<PathBuf>>,
    pub completed: Option<bool>,
    pub category: Option<Category>,
}

impl TaskPatch {
    /// Apply this patch to a task.
    ///
    /// The repeat rule (if any) is applied before the weekday set, so a patch that sets both
    /// `repeat: Custom` and `repeat_days` behaves as expected. Same for `ringtone`/`custom_audio`
    pub fn apply_to(&self, task: &mut Task) -> Result<(), Box<dyn Error>> {
        if let Some(name) = &self.name {
            task.set_name(name.clone())?;
        }
        if let Some(description) = &self.description {
            task.set_description(description.clone());
        }
        if let Some(date) = self.date {
            task.set_date(date);
        }
        if let Some(time) = self.time {
            task.set_time(time);
        }
        if let Some(repeat) = self.repeat {
            task.set_repeat(repeat);
        }
        if let Some(days) = &self.repeat_days {
            task.set_repeat_days(days.clone());
        }
        if let Some(ringtone) = self.ringtone {
            task.set_ringtone(ringtone);
        }
        if let Some(audio) = &self.custom_audio {
            task.set_custom_audio(audio.clone());
        }
        if let Some(completed) = self.completed {
            task.set_completed(completed);
        }
        if let Some(category) = self.category {
            task.set_category(category);
        }
        Ok(())
    }
}

/// Tasks have minute granularity, seconds and below are always stored as zero
fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    use chrono::Timelike;
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

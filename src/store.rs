//! This module provides the task list and its local persistence.
//!
//! Tasks live in an ordered in-memory list backed by a single JSON file: the file is read once at
//! startup ([`TaskStore::from_file`]) and rewritten in full on every mutation. There is no
//! versioning or migration logic.

use std::error::Error;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config;
use crate::task::{Category, Task, TaskId, TaskPatch};

/// A task list that stores its items in a local file
#[derive(Debug, PartialEq)]
pub struct TaskStore {
    backing_file: PathBuf,
    data: StoredData,
}

#[derive(Default, Debug, PartialEq, Serialize, Deserialize)]
struct StoredData {
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Get the default path to the storage file (see [`crate::config::STORAGE_FILE`])
    pub fn storage_file() -> PathBuf {
        match config::STORAGE_FILE.lock() {
            Ok(path) => PathBuf::from(path.as_str()),
            Err(_) => PathBuf::from("~/.config/taskflow/tasks.json"),
        }
    }

    /// Initialize a store from the content of a valid backing file if it exists.
    /// Returns an error otherwise
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let data = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(file) => serde_json::from_reader(file)?,
        };

        Ok(Self {
            backing_file: PathBuf::from(path),
            data,
        })
    }

    /// Initialize an empty store
    pub fn new(path: &Path) -> Self {
        Self {
            backing_file: PathBuf::from(path),
            data: StoredData::default(),
        }
    }

    /// Store the current task list to its backing file.
    ///
    /// This is called on every mutation. Failures are logged and swallowed: persistence is
    /// best-effort and must never make the app hard-fail
    pub fn save(&self) {
        let path = &self.backing_file;
        let file = match std::fs::File::create(path) {
            Err(err) => {
                log::warn!("Unable to save file {:?}: {}", path, err);
                return;
            },
            Ok(f) => f,
        };

        if let Err(err) = serde_json::to_writer(file, &self.data) {
            log::warn!("Unable to serialize: {}", err);
        }
    }

    /// The current tasks, in insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.data.tasks
    }

    /// Returns the task matching this ID
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.data.tasks.iter().find(|t| t.id() == id)
    }

    fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.data.tasks.iter_mut().find(|t| t.id() == id)
    }

    /// Append a task to the list
    pub fn add(&mut self, task: Task) {
        self.data.tasks.push(task);
        self.save();
    }

    /// Apply a partial update to the task matching this ID
    pub fn update(&mut self, id: TaskId, patch: &TaskPatch) -> Result<(), Box<dyn Error>> {
        match self.task_mut(id) {
            None => Err("no task for this ID".into()),
            Some(task) => {
                patch.apply_to(task)?;
                self.save();
                Ok(())
            },
        }
    }

    /// Remove the task matching this ID
    pub fn remove(&mut self, id: TaskId) -> Result<(), Box<dyn Error>> {
        let len_before = self.data.tasks.len();
        self.data.tasks.retain(|t| t.id() != id);
        if self.data.tasks.len() == len_before {
            return Err("no task for this ID".into());
        }
        self.save();
        Ok(())
    }

    /// Set the completion status of the task matching this ID
    pub fn set_completed(&mut self, id: TaskId, completed: bool) -> Result<(), Box<dyn Error>> {
        match self.task_mut(id) {
            None => Err("no task for this ID".into()),
            Some(task) => {
                task.set_completed(completed);
                self.save();
                Ok(())
            },
        }
    }
}

/// Which tasks to keep, completion-wise
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionFilter {
    All,
    Pending,
    Completed,
}

/// How to order the displayed list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    /// By scheduled date+time, ascending
    Time,
    /// By name, lexicographically
    Name,
}

/// The pure, stateless view transform over the task list.
///
/// Filters by category tab, completion state and a case-insensitive free-text search over name
/// and description, then sorts. This carries no invariant beyond determinism
pub fn filter_and_sort<'t>(
    tasks: &'t [Task],
    category: Option<Category>,
    completion: CompletionFilter,
    search: &str,
    order: SortOrder,
) -> Vec<&'t Task> {
    let search = search.to_lowercase();
    let mut kept: Vec<&Task> = tasks.iter()
        .filter(|task| match category {
            Some(cat) => task.category() == cat,
            None => true,
        })
        .filter(|task| match completion {
            CompletionFilter::All => true,
            CompletionFilter::Pending => !task.completed(),
            CompletionFilter::Completed => task.completed(),
        })
        .filter(|task| {
            if search.is_empty() {
                return true;
            }
            task.name().to_lowercase().contains(&search)
                || task.description().map_or(false, |d| d.to_lowercase().contains(&search))
        })
        .collect();

    match order {
        SortOrder::Time => kept.sort_by_key(|task| task.scheduled_at()),
        SortOrder::Name => kept.sort_by(|a, b| a.name().cmp(b.name())),
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, NaiveTime};

    fn temp_store_path() -> PathBuf {
        let name = format!("taskflow-test-{}.json", uuid::Uuid::new_v4().to_hyphenated());
        std::env::temp_dir().join(name)
    }

    fn task(name: &str, hour: u32, min: u32, completed: bool) -> Task {
        let mut task = Task::new(
            name.to_string(),
            NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
            NaiveTime::from_hms_opt(hour, min, 0).unwrap(),
            Category::Personal,
        ).unwrap();
        task.set_completed(completed);
        task
    }

    #[test]
    fn serde_store() {
        let path = temp_store_path();

        let mut store = TaskStore::new(&path);
        store.add(task("Buy milk", 9, 0, false));
        store.add(task("Call Bob", 8, 0, true));
        store.save();

        let retrieved = TaskStore::from_file(&path).unwrap();
        assert_eq!(store, retrieved);
        // The ordered sequence is reproduced field-for-field
        assert_eq!(store.tasks(), retrieved.tasks());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn loading_a_missing_file_is_an_error() {
        let path = temp_store_path();
        assert!(TaskStore::from_file(&path).is_err());
    }

    #[test]
    fn crud_round_trip() {
        let path = temp_store_path();
        let mut store = TaskStore::new(&path);

        let t = task("Buy milk", 9, 0, false);
        let id = t.id();
        store.add(t);
        assert_eq!(store.tasks().len(), 1);

        let patch = TaskPatch {
            name: Some("Buy oat milk".to_string()),
            ..TaskPatch::default()
        };
        store.update(id, &patch).unwrap();
        assert_eq!(store.task(id).unwrap().name(), "Buy oat milk");

        store.set_completed(id, true).unwrap();
        assert!(store.task(id).unwrap().completed());

        store.remove(id).unwrap();
        assert!(store.tasks().is_empty());
        assert!(store.remove(id).is_err());
        assert!(store.set_completed(id, true).is_err());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn sorting_and_filtering_the_list() {
        let a = task("Buy milk", 9, 0, false);
        let b = task("Call Bob", 8, 0, true);
        let tasks = vec![a, b];

        let by_time = filter_and_sort(&tasks, None, CompletionFilter::All, "", SortOrder::Time);
        let names: Vec<&str> = by_time.iter().map(|t| t.name()).collect();
        assert_eq!(names, ["Call Bob", "Buy milk"]);

        let by_name = filter_and_sort(&tasks, None, CompletionFilter::All, "", SortOrder::Name);
        let names: Vec<&str> = by_name.iter().map(|t| t.name()).collect();
        assert_eq!(names, ["Buy milk", "Call Bob"]);

        let pending = filter_and_sort(&tasks, None, CompletionFilter::Pending, "", SortOrder::Time);
        let names: Vec<&str> = pending.iter().map(|t| t.name()).collect();
        assert_eq!(names, ["Buy milk"]);

        let completed = filter_and_sort(&tasks, None, CompletionFilter::Completed, "", SortOrder::Time);
        let names: Vec<&str> = completed.iter().map(|t| t.name()).collect();
        assert_eq!(names, ["Call Bob"]);
    }

    #[test]
    fn searching_matches_names_and_descriptions_case_insensitively() {
        let mut a = task("Buy milk", 9, 0, false);
        a.set_description(Some("from the corner shop".to_string()));
        let b = task("Call Bob", 8, 0, false);
        let tasks = vec![a, b];

        let hits = filter_and_sort(&tasks, None, CompletionFilter::All, "MILK", SortOrder::Time);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name(), "Buy milk");

        let hits = filter_and_sort(&tasks, None, CompletionFilter::All, "corner", SortOrder::Time);
        assert_eq!(hits.len(), 1);

        let hits = filter_and_sort(&tasks, None, CompletionFilter::All, "nothing", SortOrder::Time);
        assert!(hits.is_empty());
    }

    #[test]
    fn filtering_by_category() {
        let personal = task("Buy milk", 9, 0, false);
        let mut work = task("Send report", 10, 0, false);
        work.set_category(Category::Work);
        let tasks = vec![personal, work];

        let work_tab = filter_and_sort(&tasks, Some(Category::Work), CompletionFilter::All, "", SortOrder::Time);
        assert_eq!(work_tab.len(), 1);
        assert_eq!(work_tab[0].name(), "Send report");
    }
}

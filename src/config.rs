//! Support for library configuration options

use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;

/// The path tasks are persisted to (a single JSON file, rewritten in full on every mutation).
/// Feel free to override it when initing this library.
pub static STORAGE_FILE: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("~/.config/taskflow/tasks.json".to_string())));

/// The display name used in notification titles.
/// Feel free to override it when initing this library.
pub static APP_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("TaskFlow".to_string())));

//! Mocked collaborators (audio dispatcher, platform notifier) that record every call,
//! so that integration tests can assert on the side effects of a firing alarm

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use taskflow::alarm::AlarmDispatcher;
use taskflow::notify::{Notifier, Permission};
use taskflow::task::Ringtone;

/// What a [`RecordingDispatcher`] has been asked to play
#[derive(Clone, Debug, PartialEq)]
pub struct PlayedAlarm {
    pub ringtone: Ringtone,
    pub custom_audio: Option<PathBuf>,
}

/// An [`AlarmDispatcher`] that records every `play`/`stop` call.
///
/// The log is behind an `Arc`, so tests can keep a handle to it after moving the
/// dispatcher into the controller
#[derive(Clone, Default)]
pub struct RecordingDispatcher {
    pub played: Arc<Mutex<Vec<PlayedAlarm>>>,
    pub stops: Arc<Mutex<u32>>,
    /// When true, every `play` fails, to simulate a broken audio stack
    pub fail_playback: bool,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play_count(&self) -> usize {
        self.played.lock().unwrap().len()
    }

    pub fn stop_count(&self) -> u32 {
        *self.stops.lock().unwrap()
    }
}

#[async_trait]
impl AlarmDispatcher for RecordingDispatcher {
    async fn play(&mut self, ringtone: Ringtone, custom_audio: Option<&Path>) -> Result<(), Box<dyn Error>> {
        self.played.lock().unwrap().push(PlayedAlarm {
            ringtone,
            custom_audio: custom_audio.map(|p| p.to_path_buf()),
        });
        if self.fail_playback {
            return Err("mocked playback failure".into());
        }
        Ok(())
    }

    async fn stop(&mut self) {
        *self.stops.lock().unwrap() += 1;
    }
}

/// A [`Notifier`] that records every posted notification and permission request
#[derive(Clone)]
pub struct RecordingNotifier {
    pub permission: Arc<Mutex<Permission>>,
    /// The permission the user will answer with when asked
    pub answer: Permission,
    pub requests: Arc<Mutex<u32>>,
    pub notifications: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    /// A notifier starting in the given state, answering `answer` when prompted
    pub fn new(permission: Permission, answer: Permission) -> Self {
        Self {
            permission: Arc::new(Mutex::new(permission)),
            answer,
            requests: Arc::new(Mutex::new(0)),
            notifications: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn notification_count(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }

    pub fn request_count(&self) -> u32 {
        *self.requests.lock().unwrap()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn permission(&self) -> Permission {
        *self.permission.lock().unwrap()
    }

    async fn request_permission(&mut self) -> Permission {
        *self.requests.lock().unwrap() += 1;
        let mut permission = self.permission.lock().unwrap();
        if *permission == Permission::Default {
            *permission = self.answer;
        }
        *permission
    }

    async fn notify(&mut self, title: &str, body: &str) -> Result<(), Box<dyn Error>> {
        self.notifications.lock().unwrap().push((title.to_string(), body.to_string()));
        Ok(())
    }
}

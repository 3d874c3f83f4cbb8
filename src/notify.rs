//! Best-effort platform notifications.
//!
//! Notifications are permission-gated and fire-and-forget: their failure is never surfaced to the
//! user, a missing permission silently degrades the alarm to visual-only.

use std::error::Error;

use async_trait::async_trait;

/// The platform notification permission, mirroring the three browser states
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
    /// The user has not been asked yet
    Default,
    Granted,
    Denied,
}

/// The platform notification side of a ringing alarm
#[async_trait]
pub trait Notifier {
    /// The current permission, without prompting the user
    fn permission(&self) -> Permission;

    /// Prompt the user for permission, returning the (possibly unchanged) outcome.
    /// Implementations should not prompt again once the permission is `Denied`
    async fn request_permission(&mut self) -> Permission;

    /// Post a notification. Callers are expected to have checked `permission()` first
    async fn notify(&mut self, title: &str, body: &str) -> Result<(), Box<dyn Error>>;
}

/// A [`Notifier`] that only logs, with a fixed permission. Useful for headless apps and tests
#[derive(Debug)]
pub struct LogNotifier {
    permission: Permission,
}

impl LogNotifier {
    pub fn new(permission: Permission) -> Self {
        Self { permission }
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new(Permission::Granted)
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    fn permission(&self) -> Permission {
        self.permission
    }

    async fn request_permission(&mut self) -> Permission {
        // A fixed-permission notifier has nothing to ask, except upgrading "not asked yet"
        if self.permission == Permission::Default {
            self.permission = Permission::Granted;
        }
        self.permission
    }

    async fn notify(&mut self, title: &str, body: &str) -> Result<(), Box<dyn Error>> {
        log::info!("NOTIFICATION: {}: {}", title, body);
        Ok(())
    }
}

//! Alarm audio dispatching.
//!
//! The actual audio backend is host-provided: this module only defines the [`AlarmDispatcher`]
//! seam, the tone parameters of the built-in ringtones, and a headless [`LogDispatcher`] that
//! apps without an audio stack (and tests) can plug in.

use std::error::Error;
use std::path::Path;

use async_trait::async_trait;

use crate::task::Ringtone;

/// Playback (built-in tones and custom files alike) auto-stops after this many seconds,
/// unless stopped earlier by user action
pub const AUTO_STOP_SECS: u64 = 30;

/// The synthesis parameters of a built-in ringtone.
///
/// A built-in alarm is a short sine tone with a linear attack/decay envelope, repeated once per
/// second until stopped
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TonePattern {
    /// Sine pitch, in Hz
    pub frequency_hz: u32,
    /// Peak gain the attack ramps up to
    pub gain_peak: f32,
    /// Seconds from silence to peak gain
    pub attack_secs: f32,
    /// Seconds from tone start to silence again
    pub decay_secs: f32,
    /// Seconds between two tone starts
    pub period_secs: f32,
}

impl TonePattern {
    /// The tone for a built-in ringtone, or `None` for [`Ringtone::Custom`]
    /// (which plays an audio file instead of a synthesized tone)
    pub fn for_ringtone(ringtone: Ringtone) -> Option<Self> {
        let frequency_hz = match ringtone {
            Ringtone::Default => 800,
            Ringtone::Bell => 1000,
            Ringtone::Chime => 600,
            Ringtone::Beep => 1200,
            Ringtone::Notification => 900,
            Ringtone::Custom => return None,
        };
        Some(Self {
            frequency_hz,
            gain_peak: 0.3,
            attack_secs: 0.1,
            decay_secs: 0.5,
            period_secs: 1.0,
        })
    }
}

/// The audio side of a ringing alarm.
///
/// `play` is fire-and-forget from the caller's point of view: the controller logs and discards
/// its errors, so the alarm degrades to visual-only when audio is unavailable.
#[async_trait]
pub trait AlarmDispatcher {
    /// Begin playback for this ringtone.
    ///
    /// Built-in kinds play their [`TonePattern`] repeatedly; `Ringtone::Custom` plays the
    /// referenced file once through. Implementations must honor the [`AUTO_STOP_SECS`] ceiling
    async fn play(&mut self, ringtone: Ringtone, custom_audio: Option<&Path>) -> Result<(), Box<dyn Error>>;

    /// Halt whatever is currently playing. Halting an idle dispatcher is a no-op
    async fn stop(&mut self);
}

/// An [`AlarmDispatcher`] that only logs. Useful for headless apps and as a default collaborator
#[derive(Debug, Default)]
pub struct LogDispatcher {
    playing: bool,
}

impl LogDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tells whether `play` has been called without a matching `stop` yet
    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

#[async_trait]
impl AlarmDispatcher for LogDispatcher {
    async fn play(&mut self, ringtone: Ringtone, custom_audio: Option<&Path>) -> Result<(), Box<dyn Error>> {
        match TonePattern::for_ringtone(ringtone) {
            Some(tone) => log::info!("ALARM: ringing at {} Hz", tone.frequency_hz),
            None => match custom_audio {
                Some(path) => log::info!("ALARM: playing {:?}", path),
                None => log::info!("ALARM: ringing (no custom audio supplied)"),
            },
        }
        self.playing = true;
        Ok(())
    }

    async fn stop(&mut self) {
        if self.playing {
            log::info!("ALARM: stopped");
        }
        self.playing = false;
    }
}

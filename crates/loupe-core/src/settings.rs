//! Collaborator traits: accessibility announcements, persisted settings and
//! the magnification display mode.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Accessibility announcement requests emitted by the magnification engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Announcement {
    /// The magnification scale changed (also announced on enable)
    ScaleChanged,
    /// Magnification was switched off
    MagnificationDisabled,
}

/// Receiver of announcement requests.
pub trait Announcer: Send + Sync {
    /// Deliver one announcement to assistive output.
    fn announce(&self, announcement: Announcement);
}

/// An announcer that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAnnouncer;

impl Announcer for NullAnnouncer {
    fn announce(&self, _announcement: Announcement) {}
}

/// The process-wide settings store the engine persists its scale to.
///
/// Writes happen only on an explicit `persist_scale` call, never on every
/// interactive pinch sample.
pub trait SettingsStore: Send + Sync {
    /// The persisted magnification scale.
    fn magnification_scale(&self) -> f32;
    /// Persist a new magnification scale.
    fn set_magnification_scale(&self, scale: f32);
}

/// In-memory settings store.
#[derive(Debug)]
pub struct MemorySettings {
    scale: Mutex<f32>,
}

impl MemorySettings {
    /// Create a store holding the given scale.
    #[must_use]
    pub const fn new(scale: f32) -> Self {
        Self {
            scale: Mutex::new(scale),
        }
    }
}

impl SettingsStore for MemorySettings {
    fn magnification_scale(&self) -> f32 {
        *self.scale.lock().expect("settings lock poisoned")
    }

    fn set_magnification_scale(&self, scale: f32) {
        *self.scale.lock().expect("settings lock poisoned") = scale;
    }
}

/// The magnification display mode selected in accessibility settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MagnificationMode {
    /// Magnify the whole screen
    FullScreen,
    /// Magnify inside a movable window
    Window,
    /// User-switchable; shows the on-screen mode menu
    Switch,
}

impl MagnificationMode {
    /// Parse the raw settings value (1 = full-screen, 2 = window, 3 = switch).
    #[must_use]
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            1 => Some(Self::FullScreen),
            2 => Some(Self::Window),
            3 => Some(Self::Switch),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_settings_roundtrip() {
        let settings = MemorySettings::new(2.0);
        assert!((settings.magnification_scale() - 2.0).abs() < f32::EPSILON);
        settings.set_magnification_scale(4.5);
        assert!((settings.magnification_scale() - 4.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_mode_from_raw() {
        assert_eq!(
            MagnificationMode::from_raw(1),
            Some(MagnificationMode::FullScreen)
        );
        assert_eq!(
            MagnificationMode::from_raw(2),
            Some(MagnificationMode::Window)
        );
        assert_eq!(
            MagnificationMode::from_raw(3),
            Some(MagnificationMode::Switch)
        );
        assert_eq!(MagnificationMode::from_raw(0), None);
        assert_eq!(MagnificationMode::from_raw(9), None);
    }

    #[test]
    fn test_null_announcer_is_silent() {
        NullAnnouncer.announce(Announcement::ScaleChanged);
        NullAnnouncer.announce(Announcement::MagnificationDisabled);
    }
}

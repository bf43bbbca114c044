//! Reconciled device state

use serde::{Deserialize, Serialize};

/// Program-name label shown while a freshly powered-on device boots
pub const WAITING_LABEL: &str = "TV started, waiting for program info";

/// Series-title label when live TV runs without EPG data
pub const NO_INFO_LABEL: &str = "No info";

/// Series-title label when an application is in the foreground
pub const APP_OPENED_LABEL: &str = "App opened";

/// Where the reconciler believes the device is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlayerState {
    /// Device is off or could not be reached
    #[default]
    Standby,
    /// Power-on was requested and the device has not answered yet
    TransitionToActive,
    /// Live TV with a known program
    TvPlaying,
    /// Live TV, but no channel or EPG data
    TvNoInfo,
    /// An application is in the foreground
    AppOpened,
}

/// Coarse power state exposed to media-player consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerState {
    Off,
    On,
    Playing,
    AppOpened,
}

impl PlayerState {
    /// Collapse to the media-player power state
    pub fn power_state(&self) -> PowerState {
        match self {
            PlayerState::Standby => PowerState::Off,
            PlayerState::TransitionToActive | PlayerState::TvNoInfo => PowerState::On,
            PlayerState::TvPlaying => PowerState::Playing,
            PlayerState::AppOpened => PowerState::AppOpened,
        }
    }
}

impl PowerState {
    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            PowerState::Off => "off",
            PowerState::On => "on",
            PowerState::Playing => "playing",
            PowerState::AppOpened => APP_OPENED_LABEL,
        }
    }
}

/// State of the device as of the last poll
///
/// Program fields (name, category, episode, sound mode, timing) and app fields
/// (`app_id`, `app_name`) are never populated together. A snapshot is
/// rebuilt from scratch on every poll, so nothing from one mode survives into
/// the next.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub state: PlayerState,

    // Channel identity, or the application's display name in app mode
    pub channel_name: Option<String>,
    pub channel_number: Option<u32>,

    // Program
    pub program_name: Option<String>,
    pub program_category: Option<String>,
    pub episode_info: Option<String>,
    pub sound_mode: Option<String>,
    pub duration_seconds: Option<i64>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,

    /// Program image, channel logo or application logo
    pub image_url: Option<String>,

    // Audio
    /// Volume level 0-100, `None` when unknown
    pub volume_percent: Option<u8>,
    pub muted: Option<bool>,

    // Sources
    pub current_source: Option<String>,
    pub source_list: Vec<String>,

    // Application
    pub app_id: Option<String>,
    pub app_name: Option<String>,
}

impl DeviceSnapshot {
    /// Snapshot of a device that is off
    pub fn standby() -> Self {
        Self::default()
    }

    /// Snapshot right after a power-on request
    pub fn transition_to_active() -> Self {
        Self {
            state: PlayerState::TransitionToActive,
            program_name: Some(WAITING_LABEL.to_string()),
            ..Self::default()
        }
    }

    /// Media-player power state
    pub fn power_state(&self) -> PowerState {
        self.state.power_state()
    }

    /// Whether any program field is set
    pub fn has_program_fields(&self) -> bool {
        self.program_category.is_some()
            || self.episode_info.is_some()
            || self.sound_mode.is_some()
            || self.duration_seconds.is_some()
            || self.start_time.is_some()
            || self.end_time.is_some()
            || (self.program_name.is_some() && self.state != PlayerState::TransitionToActive)
    }

    /// Whether any app field is set
    pub fn has_app_fields(&self) -> bool {
        self.app_id.is_some() || self.app_name.is_some()
    }

    /// Drop everything describing what is on screen
    pub fn clear_program(&mut self) {
        self.program_name = None;
        self.program_category = None;
        self.episode_info = None;
        self.sound_mode = None;
        self.duration_seconds = None;
        self.start_time = None;
        self.end_time = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_state_mapping() {
        assert_eq!(PlayerState::Standby.power_state(), PowerState::Off);
        assert_eq!(PlayerState::TransitionToActive.power_state(), PowerState::On);
        assert_eq!(PlayerState::TvNoInfo.power_state(), PowerState::On);
        assert_eq!(PlayerState::TvPlaying.power_state(), PowerState::Playing);
        assert_eq!(PlayerState::AppOpened.power_state(), PowerState::AppOpened);
    }

    #[test]
    fn test_standby_snapshot_is_empty() {
        let snapshot = DeviceSnapshot::standby();
        assert_eq!(snapshot.state, PlayerState::Standby);
        assert!(!snapshot.has_program_fields());
        assert!(!snapshot.has_app_fields());
        assert!(snapshot.source_list.is_empty());
    }

    #[test]
    fn test_transition_snapshot_has_waiting_label() {
        let snapshot = DeviceSnapshot::transition_to_active();
        assert_eq!(snapshot.program_name.as_deref(), Some(WAITING_LABEL));
        assert!(!snapshot.has_program_fields());
    }

    #[test]
    fn test_clear_program() {
        let mut snapshot = DeviceSnapshot {
            state: PlayerState::TvPlaying,
            channel_name: Some("Channel5".to_string()),
            program_name: Some("News".to_string()),
            duration_seconds: Some(1800),
            ..DeviceSnapshot::default()
        };
        snapshot.clear_program();
        assert!(!snapshot.has_program_fields());
        assert_eq!(snapshot.channel_name.as_deref(), Some("Channel5"));
    }

    #[test]
    fn test_power_state_labels() {
        assert_eq!(PowerState::Off.label(), "off");
        assert_eq!(PowerState::AppOpened.label(), "App opened");
    }
}

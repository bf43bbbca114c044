//! Polling state machine for a single Netia Player
//!
//! [`NetiaPlayer::refresh`] asks the device a fixed sequence of questions
//! (standby, volume, application, channel, EPG) and folds the answers into a
//! fresh [`DeviceSnapshot`]. Command methods forward to the device client and
//! only touch local state for power changes, where the device is known to
//! answer late.

use std::time::Instant;

use chrono::{DateTime, Utc};
use netia_api::{
    unix_now, AppDescriptor, AppState, ChannelInfo, NetiaClient, StandbyStatus, TV_APP_ID,
    TV_APP_NAME,
};
use tracing::{debug, info, warn};

use crate::config::PlayerConfig;
use crate::features::SupportedFeatures;
use crate::snapshot::{
    DeviceSnapshot, PlayerState, PowerState, APP_OPENED_LABEL, NO_INFO_LABEL,
};
use crate::PlayerError;

/// Device class reported to media-player consumers
pub const DEVICE_CLASS_TV: &str = "tv";

/// Content type of everything the player shows
pub const MEDIA_TYPE_TVSHOW: &str = "tvshow";

/// A Netia Player seen as a generic media player
///
/// The player is synchronous and not reentrant: the embedder schedules
/// [`refresh`](Self::refresh) and must not run two at once.
///
/// # Example
///
/// ```rust,no_run
/// use netia_player::{NetiaPlayer, PlayerConfig};
///
/// let mut player = NetiaPlayer::new(PlayerConfig::new("192.168.1.50"))?;
/// let snapshot = player.refresh();
/// println!("{:?} {:?}", snapshot.state, snapshot.program_name);
///
/// player.media_next_track();
/// # Ok::<(), netia_player::PlayerError>(())
/// ```
#[derive(Debug)]
pub struct NetiaPlayer {
    client: NetiaClient,
    config: PlayerConfig,
    snapshot: DeviceSnapshot,
    /// Applications seen on the last successful poll
    apps: Vec<AppDescriptor>,
    /// When the last power-on request was sent
    powering_on_since: Option<Instant>,
}

impl NetiaPlayer {
    /// Create a player for the configured device
    pub fn new(config: PlayerConfig) -> Result<Self, PlayerError> {
        config.validate()?;
        let client = NetiaClient::new(config.client_config());
        Ok(Self::with_client(config, client))
    }

    /// Create a player around an existing client
    pub fn with_client(config: PlayerConfig, client: NetiaClient) -> Self {
        debug!(
            "Setting up Netia Player {} at {}:{} (app support: {})",
            config.name, config.host, config.port, config.app_support
        );
        Self {
            client,
            config,
            snapshot: DeviceSnapshot::standby(),
            apps: Vec::new(),
            powering_on_since: None,
        }
    }

    /// Poll the device and replace the snapshot
    pub fn refresh(&mut self) -> &DeviceSnapshot {
        if self.client.standby_status() == StandbyStatus::Standby {
            if self.is_powering_on() {
                info!("{} is starting, no info available yet", self.config.name);
            } else {
                self.commit(DeviceSnapshot::standby());
            }
            return &self.snapshot;
        }

        match self.poll_active() {
            Some(snapshot) => self.commit(snapshot),
            None => {
                debug!("{} stopped answering mid-poll, reporting standby", self.config.name);
                self.commit(DeviceSnapshot::standby());
            }
        }
        &self.snapshot
    }

    fn is_powering_on(&self) -> bool {
        self.snapshot.state == PlayerState::TransitionToActive
            && self
                .powering_on_since
                .map(|since| since.elapsed() < self.config.startup_grace())
                .unwrap_or(false)
    }

    fn commit(&mut self, snapshot: DeviceSnapshot) {
        if snapshot.state != PlayerState::TransitionToActive {
            self.powering_on_since = None;
        }
        if snapshot.state != self.snapshot.state {
            debug!("{}: {:?} -> {:?}", self.config.name, self.snapshot.state, snapshot.state);
        }
        self.snapshot = snapshot;
    }

    /// Build the snapshot of an awake device, or `None` if it could not be
    /// asked which surface is showing
    fn poll_active(&mut self) -> Option<DeviceSnapshot> {
        let mut snapshot = DeviceSnapshot {
            state: PlayerState::TvNoInfo,
            ..DeviceSnapshot::default()
        };

        if let Some(volume) = self.client.volume_info() {
            snapshot.volume_percent = Some(volume.level);
            snapshot.muted = Some(volume.muted);
        }

        let apps = self.client.app_state()?;
        self.apply_sources(&mut snapshot, &apps);

        if apps.current.is_tv() {
            self.apply_tv(&mut snapshot);
        } else {
            snapshot.state = PlayerState::AppOpened;
            snapshot.channel_name = Some(apps.current.name.clone());
            snapshot.image_url = apps.current.logo_url.clone();
            snapshot.app_id = Some(apps.current.id.clone());
            snapshot.app_name = Some(apps.current.name.clone());
        }

        self.apps = apps.apps;
        Some(snapshot)
    }

    fn apply_tv(&self, snapshot: &mut DeviceSnapshot) {
        let Some(channel) = self.client.channel_info() else {
            snapshot.state = PlayerState::TvNoInfo;
            return;
        };

        apply_channel(snapshot, &channel);

        match self.client.channel_details(&channel.id) {
            Some(details) => {
                snapshot.program_name = details.program_name;
                snapshot.program_category = details.category;
                snapshot.episode_info = details.episode;
                snapshot.sound_mode = details.sound_mode;
                snapshot.duration_seconds = details.duration_seconds;
                snapshot.start_time = details.start_time;
                snapshot.end_time = details.end_time;
                if details.image_url.is_some() {
                    snapshot.image_url = details.image_url;
                }
            }
            None => {
                snapshot.state = PlayerState::TvNoInfo;
                snapshot.clear_program();
            }
        }
    }

    fn apply_sources(&self, snapshot: &mut DeviceSnapshot, apps: &AppState) {
        if !self.config.app_support {
            return;
        }
        match compute_sources(&self.config.app_list, apps) {
            Some((source, list)) => {
                snapshot.current_source = Some(source);
                snapshot.source_list = list;
            }
            None => {
                // App list and current app disagree; keep what we had
                snapshot.current_source = self.snapshot.current_source.clone();
                snapshot.source_list = self.snapshot.source_list.clone();
            }
        }
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Power on; the player reports "waiting for program info" until the
    /// device answers
    ///
    /// Channel and program fields are dropped. Volume, mute and sources are
    /// kept until the next poll replaces them.
    pub fn turn_on(&mut self) {
        self.client.turn_on();
        let previous = std::mem::take(&mut self.snapshot);
        self.snapshot = DeviceSnapshot {
            volume_percent: previous.volume_percent,
            muted: previous.muted,
            current_source: previous.current_source,
            source_list: previous.source_list,
            ..DeviceSnapshot::transition_to_active()
        };
        self.powering_on_since = Some(Instant::now());
    }

    /// Power off; reported as off immediately
    pub fn turn_off(&mut self) {
        self.client.turn_off();
        self.commit(DeviceSnapshot::standby());
    }

    /// The device has no pause; pausing powers it off
    pub fn media_pause(&mut self) {
        self.turn_off();
    }

    /// Press play
    pub fn media_play(&self) {
        self.client.media_play();
    }

    /// Press stop
    pub fn media_stop(&self) {
        self.client.media_stop();
    }

    /// Raise the volume one step
    pub fn volume_up(&self) {
        self.client.volume_up();
    }

    /// Lower the volume one step
    pub fn volume_down(&self) {
        self.client.volume_down();
    }

    /// Toggle mute; the device has no absolute mute command
    pub fn mute_volume(&self) {
        self.client.mute_volume();
    }

    /// Next channel
    pub fn media_next_track(&self) {
        self.client.media_next_track();
    }

    /// Previous channel
    pub fn media_previous_track(&self) {
        self.client.media_previous_track();
    }

    /// Open the application whose display name is `source`
    ///
    /// Returns whether a matching application was found.
    pub fn select_source(&self, source: &str) -> bool {
        let app_id = if source == TV_APP_NAME {
            Some(TV_APP_ID)
        } else {
            self.apps
                .iter()
                .find(|app| app.name == source)
                .map(|app| app.id.as_str())
        };

        match app_id {
            Some(id) => {
                self.client.open_app(id);
                true
            }
            None => {
                warn!("Unknown source: {}", source);
                false
            }
        }
    }

    /// Press an arbitrary remote key by its wire code
    ///
    /// Returns whether the key is supported; unsupported keys are not sent.
    pub fn send_command(&self, key: &str) -> bool {
        self.client.send_command(key)
    }

    /// Media-player `play_media`: the media id is a remote key
    pub fn play_media(&self, media_id: &str) -> bool {
        debug!("Play media: {}", media_id);
        self.send_command(media_id)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Snapshot from the last refresh or command
    pub fn snapshot(&self) -> &DeviceSnapshot {
        &self.snapshot
    }

    /// Configuration the player was built with
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Underlying device client
    pub fn client(&self) -> &NetiaClient {
        &self.client
    }

    /// Configured display name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Stable id built from host and name
    pub fn unique_id(&self) -> String {
        format!("{}-{}", self.config.host, self.config.name)
    }

    /// Always `tv`
    pub fn device_class(&self) -> &'static str {
        DEVICE_CLASS_TV
    }

    /// Current state machine state
    pub fn state(&self) -> PlayerState {
        self.snapshot.state
    }

    /// Media-player power state derived from [`state`](Self::state)
    pub fn power_state(&self) -> PowerState {
        self.snapshot.power_state()
    }

    /// Applications seen on the last poll
    pub fn application_list(&self) -> &[AppDescriptor] {
        &self.apps
    }

    /// Features offered to the media-player layer
    pub fn supported_features(&self) -> SupportedFeatures {
        let mut features = SupportedFeatures::NETIA;
        if self.config.app_support {
            features |= SupportedFeatures::SELECT_SOURCE;
        }
        features
    }

    /// Volume as a fraction, 0.0-1.0
    pub fn volume_level(&self) -> Option<f32> {
        self.snapshot.volume_percent.map(|v| f32::from(v) / 100.0)
    }

    /// Mute state, `None` when unknown
    pub fn is_volume_muted(&self) -> Option<bool> {
        self.snapshot.muted
    }

    /// Display name of the current source
    pub fn source(&self) -> Option<&str> {
        self.snapshot.current_source.as_deref()
    }

    /// Selectable sources, empty without app support
    pub fn source_list(&self) -> &[String] {
        &self.snapshot.source_list
    }

    /// Channel name, or the application name in app mode
    pub fn media_title(&self) -> Option<&str> {
        self.snapshot.channel_name.as_deref()
    }

    /// Program name, with a label when there is none
    pub fn media_series_title(&self) -> Option<&str> {
        if let Some(program) = self.snapshot.program_name.as_deref() {
            return Some(program);
        }
        match self.snapshot.state {
            PlayerState::AppOpened => Some(APP_OPENED_LABEL),
            PlayerState::TvNoInfo => Some(NO_INFO_LABEL),
            _ => None,
        }
    }

    /// Content id; the channel name
    pub fn media_content_id(&self) -> Option<&str> {
        self.snapshot.channel_name.as_deref()
    }

    /// Always `tvshow`
    pub fn media_content_type(&self) -> &'static str {
        MEDIA_TYPE_TVSHOW
    }

    /// Channel number
    pub fn media_channel(&self) -> Option<u32> {
        self.snapshot.channel_number
    }

    /// Episode info from the EPG
    pub fn media_episode(&self) -> Option<&str> {
        self.snapshot.episode_info.as_deref()
    }

    /// Program image, channel image or app logo
    pub fn media_image_url(&self) -> Option<&str> {
        self.snapshot.image_url.as_deref()
    }

    /// Audio mode reported by the EPG
    pub fn sound_mode(&self) -> Option<&str> {
        self.snapshot.sound_mode.as_deref()
    }

    /// Program length in seconds
    pub fn media_duration(&self) -> Option<i64> {
        self.snapshot.duration_seconds
    }

    /// Seconds since the program started, when its duration is known
    pub fn media_position(&self) -> Option<i64> {
        self.media_position_at(unix_now())
    }

    /// [`media_position`](Self::media_position) relative to `now` (Unix seconds)
    pub fn media_position_at(&self, now: i64) -> Option<i64> {
        self.snapshot.duration_seconds?;
        self.snapshot.start_time.map(|start| now - start)
    }

    /// When the reported position was valid
    pub fn media_position_updated_at(&self) -> Option<DateTime<Utc>> {
        self.media_position().map(|_| Utc::now())
    }
}

fn apply_channel(snapshot: &mut DeviceSnapshot, channel: &ChannelInfo) {
    snapshot.state = PlayerState::TvPlaying;
    snapshot.channel_number = channel.channel_number;
    snapshot.channel_name = channel.channel_name.clone();
    snapshot.image_url = Some(channel.image_url.clone());
    snapshot.program_name = Some(crate::snapshot::WAITING_LABEL.to_string());
}

/// Work out the source list for this poll
///
/// Starts from the configured allow-list, offers "TV" even when `tv` is not
/// listed, and always includes the current application. Returns `None` when
/// the current application's name is not in the resulting list.
pub fn compute_sources(allow_list: &[String], apps: &AppState) -> Option<(String, Vec<String>)> {
    let mut ids: Vec<&str> = allow_list.iter().map(String::as_str).collect();
    let mut sources: Vec<String> = Vec::new();

    if !ids.contains(&TV_APP_ID) {
        sources.push(TV_APP_NAME.to_string());
    }
    if !ids.contains(&apps.current.id.as_str()) {
        ids.push(&apps.current.id);
    }

    for id in ids {
        let name = if id == TV_APP_ID {
            Some(TV_APP_NAME)
        } else {
            apps.name_of(id)
        };
        if let Some(name) = name {
            if !sources.iter().any(|s| s == name) {
                sources.push(name.to_string());
            }
        }
    }

    let current = apps.current.name.clone();
    if sources.contains(&current) {
        Some((current, sources))
    } else {
        None
    }
}

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use http_client::HttpClient;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::{debug, error, warn};

use crate::endpoint::{Endpoint, Method};
use crate::key::CommandKey;
use crate::models::{
    channel_number, AppDescriptor, AppState, ChannelInfo, ChannelPayload, ProgramDetails,
    ProgramPayload, RawApp, StandbyStatus, StatePayload, VolumeInfo, VolumePayload,
};
use crate::{ApiError, Result};

/// Default control API port of the Netia Player
pub const DEFAULT_PORT: u16 = 8080;

/// Timeout for requests to the device on the local network
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for requests to the external Netia EPG server
pub const DEFAULT_LOGO_TIMEOUT: Duration = Duration::from_secs(60);

/// Where application logos are published
pub const DEFAULT_LOGO_BASE_URL: &str = "http://epg.dms.netia.pl/xmltv/logo/black/";

const LOGO_SUFFIX: &str = "_290x172px.png";

/// Characters left as-is in query values (same set as a plain URL quote)
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Connection settings for a single device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Device host name or IP address
    pub host: String,
    /// Control API port
    pub port: u16,
    /// Timeout for every call to the device
    pub request_timeout: Duration,
    /// Timeout for the logo existence probe on the external server
    pub logo_timeout: Duration,
    /// Base URL application logos are resolved against
    pub logo_base_url: String,
}

impl ClientConfig {
    /// Settings for `host:port` with the default timeouts
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            logo_timeout: DEFAULT_LOGO_TIMEOUT,
            logo_base_url: DEFAULT_LOGO_BASE_URL.to_string(),
        }
    }

    /// `http://host:port`, without a trailing slash
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// How a failed call is reported before it is swallowed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reporting {
    Error,
    Quiet,
}

/// A client for a single Netia Player
///
/// The client is the only place that talks to the network. It offers two
/// layers:
///
/// - `fetch_*` methods return `Result<T, ApiError>` so callers can see
///   exactly what went wrong.
/// - The plain query and command methods (`standby_status`, `volume_info`,
///   `send_key`, ...) never fail: errors are logged and turned into the
///   method's absent or fail-safe value.
///
/// The client holds no device state; every call hits the network.
#[derive(Debug, Clone)]
pub struct NetiaClient {
    http: HttpClient,
    config: ClientConfig,
}

impl NetiaClient {
    /// Create a client for the given device
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http_client(config, HttpClient::new())
    }

    /// Create a client with a custom HTTP client
    pub fn with_http_client(config: ClientConfig, http: HttpClient) -> Self {
        Self { http, config }
    }

    /// Connection settings this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Every key the device accepts
    pub fn available_keys(&self) -> &'static [CommandKey] {
        CommandKey::ALL
    }

    // ------------------------------------------------------------------
    // Typed fetches
    // ------------------------------------------------------------------

    /// Ask the device whether it is in standby
    pub fn fetch_standby_status(&self) -> Result<StandbyStatus> {
        let payload: StatePayload = self.get_json(&self.url(Endpoint::State, &[]))?;
        Ok(payload.status())
    }

    /// Read the volume level and mute flag
    pub fn fetch_volume_info(&self) -> Result<VolumeInfo> {
        let payload: VolumePayload = self.get_json(&self.url(Endpoint::Volume, &[]))?;
        if payload.has_error() {
            return Err(ApiError::DataAbsent(format!(
                "volume payload carries an error flag: {}",
                payload.error.unwrap_or_default()
            )));
        }
        let level = payload
            .volume
            .ok_or_else(|| ApiError::DataAbsent("volume payload has no level".to_string()))?;

        Ok(VolumeInfo {
            level: level.clamp(0, 100) as u8,
            muted: payload.muted.unwrap_or(false),
        })
    }

    /// Read the application list and resolve the current application
    ///
    /// When the current application is not part of the TV surface its logo is
    /// probed on the Netia EPG server and attached if it exists.
    pub fn fetch_app_state(&self) -> Result<AppState> {
        let raw: Vec<RawApp> = self.get_json(&self.url(Endpoint::ApplicationList, &[]))?;
        let mut state = AppState::from_raw(raw);
        if !state.current.is_tv() {
            state.current.logo_url = self.app_logo(&state.current.id);
        }
        Ok(state)
    }

    /// Read the currently tuned channel
    pub fn fetch_channel_info(&self) -> Result<ChannelInfo> {
        let payload: ChannelPayload = self.get_json(&self.url(Endpoint::ChannelCurrent, &[]))?;
        self.channel_from_payload(payload)
            .ok_or_else(|| ApiError::DataAbsent("current channel has no id".to_string()))
    }

    /// Read all live channels
    pub fn fetch_channel_list(&self) -> Result<Vec<ChannelInfo>> {
        let payload: Vec<ChannelPayload> = self.get_json(&self.url(Endpoint::ChannelList, &[]))?;
        Ok(payload
            .into_iter()
            .filter_map(|channel| self.channel_from_payload(channel))
            .collect())
    }

    /// Read the EPG entry airing on `channel_id` at `timestamp` (Unix seconds)
    ///
    /// The device is asked for the range `[timestamp, timestamp]`. If it
    /// answers with several overlapping entries the first one wins; the API
    /// does not document any ordering.
    pub fn fetch_channel_details(&self, channel_id: &str, timestamp: i64) -> Result<ProgramDetails> {
        let timestamp = timestamp.to_string();
        let url = self.url(
            Endpoint::ChannelEpgRange,
            &[
                ("channelId", channel_id),
                ("startTime", timestamp.as_str()),
                ("endTime", timestamp.as_str()),
            ],
        );
        let programs: Vec<ProgramPayload> = self.get_json(&url)?;
        let program = programs.into_iter().next().ok_or_else(|| {
            ApiError::DataAbsent(format!("no EPG entry for channel {}", channel_id))
        })?;

        Ok(ProgramDetails {
            channel_number: channel_number(program.channel_zap),
            channel_name: program.channel_name,
            image_url: program.image.map(|path| self.resolve_device_path(&path)),
            program_name: program.name,
            category: program.subcategory,
            episode: program.episode_info,
            sound_mode: program.audio,
            duration_seconds: program.duration,
            start_time: program.start_time,
            end_time: program.end_time,
        })
    }

    /// Confirm that the logo for `app_id` exists and return its URL
    pub fn fetch_app_logo(&self, app_id: &str) -> Result<String> {
        let url = format!("{}{}{}", self.config.logo_base_url, app_id, LOGO_SUFFIX);
        let status = self.http.post_status(&url, self.config.logo_timeout)?;
        if status == 200 {
            Ok(url)
        } else {
            Err(ApiError::DataAbsent(format!(
                "no logo for {} (HTTP {})",
                app_id, status
            )))
        }
    }

    // ------------------------------------------------------------------
    // Queries that never fail
    // ------------------------------------------------------------------

    /// Standby status, defaulting to `Standby` when the device cannot be asked
    pub fn standby_status(&self) -> StandbyStatus {
        // Devices in deep standby routinely refuse connections, so keep quiet
        self.absent("standby status", self.fetch_standby_status(), Reporting::Quiet)
            .unwrap_or(StandbyStatus::Standby)
    }

    /// Volume reading, or `None`
    pub fn volume_info(&self) -> Option<VolumeInfo> {
        self.absent("volume", self.fetch_volume_info(), Reporting::Error)
    }

    /// Current application plus the application list, or `None`
    pub fn app_state(&self) -> Option<AppState> {
        self.absent("application list", self.fetch_app_state(), Reporting::Error)
    }

    /// Current application, or `None` if the list could not be read
    pub fn app_info(&self) -> Option<AppDescriptor> {
        self.app_state().map(|state| state.current)
    }

    /// Filtered application list, empty on failure
    pub fn app_list(&self) -> Vec<AppDescriptor> {
        self.app_state().map(|state| state.apps).unwrap_or_default()
    }

    /// Currently tuned channel, or `None`
    pub fn channel_info(&self) -> Option<ChannelInfo> {
        self.absent("current channel", self.fetch_channel_info(), Reporting::Error)
    }

    /// All live channels, empty on failure
    pub fn channel_list(&self) -> Vec<ChannelInfo> {
        self.absent("channel list", self.fetch_channel_list(), Reporting::Error)
            .unwrap_or_default()
    }

    /// Program airing right now on `channel_id`, or `None`
    pub fn channel_details(&self, channel_id: &str) -> Option<ProgramDetails> {
        self.absent(
            "channel details",
            self.fetch_channel_details(channel_id, unix_now()),
            Reporting::Error,
        )
    }

    /// Logo URL for `app_id` if the EPG server has one
    pub fn app_logo(&self, app_id: &str) -> Option<String> {
        self.absent("application logo", self.fetch_app_logo(app_id), Reporting::Error)
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Press a remote-control key
    pub fn send_key(&self, key: CommandKey) {
        let result = self.command(Endpoint::SendKey, &[("key", key.as_str())]);
        self.absent("send key", result, Reporting::Error);
    }

    /// Press a key given by its wire code
    ///
    /// Unknown keys are dropped without touching the network. Returns whether
    /// the key was recognised.
    pub fn send_command(&self, name: &str) -> bool {
        match CommandKey::parse(name) {
            Some(key) => {
                self.send_key(key);
                true
            }
            None => {
                warn!("Unsupported key: {}", name);
                false
            }
        }
    }

    /// Launch an application by id
    pub fn open_app(&self, app_id: &str) {
        let result = self.command(Endpoint::ApplicationOpen, &[("appId", app_id)]);
        self.absent("open application", result, Reporting::Quiet);
    }

    /// Toggle power on
    pub fn turn_on(&self) {
        self.send_key(CommandKey::OnOff);
    }

    /// Toggle power off
    pub fn turn_off(&self) {
        self.send_key(CommandKey::OnOff);
    }

    pub fn volume_up(&self) {
        self.send_key(CommandKey::VolumeUp);
    }

    pub fn volume_down(&self) {
        self.send_key(CommandKey::VolumeDown);
    }

    pub fn mute_volume(&self) {
        self.send_key(CommandKey::Mute);
    }

    pub fn media_play(&self) {
        self.send_key(CommandKey::Play);
    }

    pub fn media_stop(&self) {
        self.send_key(CommandKey::Stop);
    }

    /// Next channel
    pub fn media_next_track(&self) {
        self.send_key(CommandKey::ChannelUp);
    }

    /// Previous channel
    pub fn media_previous_track(&self) {
        self.send_key(CommandKey::ChannelDown);
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    fn url(&self, endpoint: Endpoint, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}/{}", self.config.base_url(), endpoint.path());
        for (i, (name, value)) in params.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(name);
            url.push('=');
            url.extend(utf8_percent_encode(value, QUERY_VALUE));
        }
        url
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        Ok(self.http.get_json(url, self.config.request_timeout)?)
    }

    fn command(&self, endpoint: Endpoint, params: &[(&str, &str)]) -> Result<()> {
        let url = self.url(endpoint, params);
        match endpoint.method() {
            Method::Post => self.http.post(&url, self.config.request_timeout)?,
            Method::Get => {
                return Err(ApiError::InvalidParameter(format!(
                    "{:?} is not a command endpoint",
                    endpoint
                )))
            }
        };
        Ok(())
    }

    fn channel_from_payload(&self, payload: ChannelPayload) -> Option<ChannelInfo> {
        let id = payload.id?;
        let image_url = self.url(Endpoint::ChannelImage, &[("channelId", id.as_str())]);
        Some(ChannelInfo {
            channel_number: channel_number(payload.zap),
            channel_name: payload.name,
            image_url,
            id,
        })
    }

    fn resolve_device_path(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.config.base_url(), path)
        } else {
            format!("{}/{}", self.config.base_url(), path)
        }
    }

    fn absent<T>(&self, what: &str, result: Result<T>, reporting: Reporting) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                match reporting {
                    Reporting::Error if e.is_unreachable() => {
                        warn!("{} request to {} failed: {}", what, self.config.host, e)
                    }
                    Reporting::Error => error!("{} request to {} failed: {}", what, self.config.host, e),
                    Reporting::Quiet => debug!("{} request to {} failed: {}", what, self.config.host, e),
                }
                None
            }
        }
    }
}

/// Current time as Unix seconds
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

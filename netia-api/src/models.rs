//! Typed views of Netia Player responses
//!
//! The device API is only loosely typed: ids arrive as strings or numbers,
//! optional fields are missing rather than null, and the same flag may be a
//! bool or an integer depending on firmware. The raw payload structs below
//! accept all of that; the public types are what the rest of the SDK sees.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Application ids that are part of the built-in TV user interface
pub const TV_SURFACES: [&str; 3] = ["tv", "settings", "epg"];

/// Id of the synthetic TV application
pub const TV_APP_ID: &str = "tv";

/// Display name of the synthetic TV application
pub const TV_APP_NAME: &str = "TV";

/// Display name used when the device does not report one
pub const UNKNOWN_APP_NAME: &str = "Unknown app";

const PROMO_CHANNEL_MARKER: &str = "promo_channel";

/// Power state as reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StandbyStatus {
    /// Device is in power-saving mode (or could not be asked)
    Standby,
    /// Device is running its UI
    Active,
}

/// Volume reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeInfo {
    /// Volume level, 0-100
    pub level: u8,
    /// Whether audio is muted
    pub muted: bool,
}

/// An application known to the device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDescriptor {
    pub id: String,
    pub name: String,
    pub is_current: bool,
    /// Logo URL, only set for the current non-TV application once its
    /// existence has been confirmed on the Netia EPG server
    pub logo_url: Option<String>,
}

impl AppDescriptor {
    /// The synthetic descriptor all built-in TV surfaces collapse to
    pub fn tv() -> Self {
        Self {
            id: TV_APP_ID.to_string(),
            name: TV_APP_NAME.to_string(),
            is_current: true,
            logo_url: None,
        }
    }

    /// Whether this descriptor stands for the TV surface
    pub fn is_tv(&self) -> bool {
        self.id == TV_APP_ID
    }
}

/// Current application together with the filtered application list it was
/// picked from, as produced by a single application-list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub current: AppDescriptor,
    pub apps: Vec<AppDescriptor>,
}

impl AppState {
    /// Build from raw entries: filter the list and resolve the current app
    ///
    /// The logo is not probed here; see [`crate::NetiaClient::app_logo`].
    pub fn from_raw(raw: Vec<RawApp>) -> Self {
        let apps = filter_apps(raw);
        let current = match apps.iter().find(|app| app.is_current) {
            Some(app) if TV_SURFACES.contains(&app.id.as_str()) => AppDescriptor::tv(),
            Some(app) => app.clone(),
            None => AppDescriptor::tv(),
        };
        Self { current, apps }
    }

    /// Display name for an application id, if the device listed it
    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.apps.iter().find(|app| app.id == id).map(|app| app.name.as_str())
    }
}

/// Apply the device list filtering rules
///
/// Promotional channel entries are dropped, YouTube gets its proper display
/// name and nameless entries get a placeholder.
pub fn filter_apps(raw: Vec<RawApp>) -> Vec<AppDescriptor> {
    raw.into_iter()
        .filter_map(|app| {
            let id = app.id?;
            if id.contains(PROMO_CHANNEL_MARKER) {
                return None;
            }
            let name = if id == "youtube" {
                "YouTube".to_string()
            } else {
                app.name.unwrap_or_else(|| UNKNOWN_APP_NAME.to_string())
            };
            Some(AppDescriptor {
                id,
                name,
                is_current: app.current.as_ref().map(is_truthy).unwrap_or(false),
                logo_url: None,
            })
        })
        .collect()
}

/// Currently tuned live channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: String,
    pub channel_number: Option<u32>,
    pub channel_name: Option<String>,
    /// Channel logo served by the device
    pub image_url: String,
}

/// EPG entry for the program airing now
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramDetails {
    pub channel_number: Option<u32>,
    pub channel_name: Option<String>,
    /// Absolute image URL (device-relative paths are resolved by the client)
    pub image_url: Option<String>,
    pub program_name: Option<String>,
    pub category: Option<String>,
    pub episode: Option<String>,
    pub sound_mode: Option<String>,
    pub duration_seconds: Option<i64>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

// ---------------------------------------------------------------------------
// Raw payloads
// ---------------------------------------------------------------------------

/// `Main/State/get`
#[derive(Debug, Deserialize)]
pub struct StatePayload {
    pub standby: Option<bool>,
}

impl StatePayload {
    /// Only an explicit `standby: false` counts as awake
    pub fn status(&self) -> StandbyStatus {
        match self.standby {
            Some(false) => StandbyStatus::Active,
            _ => StandbyStatus::Standby,
        }
    }
}

/// `RemoteControl/Volume/get`
#[derive(Debug, Deserialize)]
pub struct VolumePayload {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub volume: Option<i64>,
    pub muted: Option<bool>,
    pub error: Option<Value>,
}

impl VolumePayload {
    /// Whether the payload carries the device's error flag
    pub fn has_error(&self) -> bool {
        self.error.as_ref().map(is_truthy).unwrap_or(false)
    }
}

/// Entry of `Applications/State/get`
#[derive(Debug, Deserialize)]
pub struct RawApp {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    pub current: Option<Value>,
}

/// `Live/Channels/getCurrent` and entries of `Live/Channels/getList`
#[derive(Debug, Deserialize)]
pub struct ChannelPayload {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub zap: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

/// Entry of `EPG/Programs/getRange`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramPayload {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub channel_zap: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub channel_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subcategory: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub episode_info: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub audio: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub duration: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub start_time: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub end_time: Option<i64>,
}

/// Convert a zap number to a channel number, discarding nonsense values
pub fn channel_number(zap: Option<i64>) -> Option<u32> {
    zap.and_then(|z| u32::try_from(z).ok())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

//! Configuration for a Netia Player integration
//!
//! The configuration is owned by whoever embeds the player and is fixed for
//! the player's lifetime.

use std::path::Path;
use std::time::Duration;

use netia_api::{ClientConfig, DEFAULT_LOGO_BASE_URL, DEFAULT_PORT, TV_APP_ID};
use serde::{Deserialize, Deserializer, Serialize};

use crate::PlayerError;

/// Display name used when none is configured
pub const DEFAULT_NAME: &str = "Netia Player";

/// Configuration for a [`crate::NetiaPlayer`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Device host name or IP address (required)
    pub host: String,

    /// Control API port
    /// Default: 8080
    #[serde(deserialize_with = "port_from_number_or_string")]
    pub port: u16,

    /// Display name
    /// Default: "Netia Player"
    pub name: String,

    /// Expose applications as selectable sources
    /// Default: false
    pub app_support: bool,

    /// Application ids offered as sources when app support is on
    /// Default: ["tv"]
    pub app_list: Vec<String>,

    /// Timeout for requests to the device, in seconds
    /// Default: 10
    pub request_timeout_secs: u64,

    /// Timeout for the application-logo probe, in seconds
    /// Default: 60
    pub logo_timeout_secs: u64,

    /// Where application logos are looked up
    pub logo_base_url: String,

    /// How long a powered-on device may keep reporting standby before the
    /// player gives up waiting for it, in seconds
    /// Default: 60
    pub startup_grace_secs: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            name: DEFAULT_NAME.to_string(),
            app_support: false,
            app_list: vec![TV_APP_ID.to_string()],
            request_timeout_secs: 10,
            logo_timeout_secs: 60,
            logo_base_url: DEFAULT_LOGO_BASE_URL.to_string(),
            startup_grace_secs: 60,
        }
    }
}

impl PlayerConfig {
    /// Configuration for `host` with every other setting at its default
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Turn on application support with the given allow-list
    pub fn with_apps<I, S>(mut self, app_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.app_support = true;
        self.app_list = app_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs();
        self
    }

    pub fn with_logo_base_url(mut self, url: impl Into<String>) -> Self {
        self.logo_base_url = url.into();
        self
    }

    pub fn with_startup_grace(mut self, grace: Duration) -> Self {
        self.startup_grace_secs = grace.as_secs();
        self
    }

    /// Parse a JSON document; missing keys take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, PlayerError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PlayerError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject configurations the player cannot work with
    pub fn validate(&self) -> Result<(), PlayerError> {
        if self.host.trim().is_empty() {
            return Err(PlayerError::InvalidConfig(
                "no Netia Player host configured".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(PlayerError::InvalidConfig("port must not be 0".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(PlayerError::InvalidConfig(
                "request timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn logo_timeout(&self) -> Duration {
        Duration::from_secs(self.logo_timeout_secs)
    }

    pub fn startup_grace(&self) -> Duration {
        Duration::from_secs(self.startup_grace_secs)
    }

    /// Connection settings for the device client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            host: self.host.clone(),
            port: self.port,
            request_timeout: self.request_timeout(),
            logo_timeout: self.logo_timeout(),
            logo_base_url: self.logo_base_url.clone(),
        }
    }
}

fn port_from_number_or_string<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Port::deserialize(deserializer)? {
        Port::Number(port) => Ok(port),
        Port::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

//! # Netia Player - media-player model for Netia set-top boxes
//!
//! Wraps the device's polling API in a state machine that looks like any
//! other media player:
//!
//! ```rust,no_run
//! use netia_player::{NetiaPlayer, PlayerConfig, PlayerState};
//!
//! fn main() -> Result<(), netia_player::PlayerError> {
//!     netia_player::init_logging_from_env()?;
//!
//!     let config = PlayerConfig::new("192.168.1.50").with_apps(["tv", "netflix"]);
//!     let mut player = NetiaPlayer::new(config)?;
//!
//!     // One poll of the device
//!     let snapshot = player.refresh();
//!     if snapshot.state == PlayerState::TvPlaying {
//!         println!("{:?}: {:?}", snapshot.channel_name, snapshot.program_name);
//!     }
//!
//!     player.select_source("Netflix");
//!     Ok(())
//! }
//! ```
//!
//! ## States
//!
//! | State                | Power      | Meaning                                   |
//! |----------------------|------------|-------------------------------------------|
//! | `Standby`            | off        | standby, unreachable or failed poll       |
//! | `TransitionToActive` | on         | power-on requested, waiting for the box   |
//! | `TvPlaying`          | playing    | live TV with channel info                 |
//! | `TvNoInfo`           | on         | live TV, channel or EPG unavailable       |
//! | `AppOpened`          | app opened | a non-TV application is in the foreground |
//!
//! The player never reports an error from [`NetiaPlayer::refresh`]: anything
//! that goes wrong on the wire degrades the snapshot instead.
//!
//! ## Architecture
//!
//! ```text
//! netia-player (state machine, config, logging)
//!     ↓
//! netia-api (typed endpoints, keys, payloads)
//!     ↓
//! http-client (blocking HTTP+JSON transport)
//! ```

pub mod config;
pub mod features;
pub mod logging;
pub mod player;
pub mod snapshot;

mod error;

pub use config::{PlayerConfig, DEFAULT_NAME};
pub use error::PlayerError;
pub use features::SupportedFeatures;
pub use logging::{init_logging, init_logging_from_env, LoggingError, LoggingMode};
pub use player::{compute_sources, NetiaPlayer, DEVICE_CLASS_TV, MEDIA_TYPE_TVSHOW};
pub use snapshot::{
    DeviceSnapshot, PlayerState, PowerState, APP_OPENED_LABEL, NO_INFO_LABEL, WAITING_LABEL,
};

// Re-export the device-level types embedders need
pub use netia_api::{AppDescriptor, ClientConfig, CommandKey, NetiaClient};

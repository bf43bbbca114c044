//! Client for the Netia Player control API
//!
//! Netia set-top boxes expose a small HTTP+JSON API on the local network
//! (port 8080 by default). This crate wraps it in a typed client and uses the
//! private `http-client` crate for the transport.
//!
//! ```rust,no_run
//! use netia_api::{ClientConfig, CommandKey, NetiaClient, StandbyStatus};
//!
//! let client = NetiaClient::new(ClientConfig::new("192.168.1.50", 8080));
//!
//! if client.standby_status() == StandbyStatus::Active {
//!     if let Some(channel) = client.channel_info() {
//!         println!("Watching {:?}", channel.channel_name);
//!     }
//!     client.send_key(CommandKey::VolumeUp);
//! }
//! ```
//!
//! The plain query methods never return errors: a device that cannot be
//! reached looks like a device in standby, and missing data comes back as
//! `None`. Use the `fetch_*` variants to see the underlying [`ApiError`].

pub mod client;
pub mod endpoint;
pub mod error;
pub mod key;
pub mod models;

pub use client::{
    unix_now, ClientConfig, NetiaClient, DEFAULT_LOGO_BASE_URL, DEFAULT_LOGO_TIMEOUT, DEFAULT_PORT,
    DEFAULT_REQUEST_TIMEOUT,
};
pub use endpoint::{Endpoint, Method};
pub use error::{ApiError, Result};
pub use key::CommandKey;
pub use models::{
    AppDescriptor, AppState, ChannelInfo, ProgramDetails, StandbyStatus, VolumeInfo, TV_APP_ID,
    TV_APP_NAME,
};

//! Control API endpoints of the Netia Player
//!
//! Every request the client makes goes to one of these paths, relative to
//! `http://{host}:{port}/`.

/// HTTP method used by an endpoint
///
/// The Netia API is not consistent here: reads are GETs, while commands are
/// POSTs that carry their argument in the query string rather than the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// Represents the endpoints exposed by the Netia Player control API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Power/standby state
    State,

    /// Volume level and mute flag
    Volume,

    /// Remote-control key press (`?key=`)
    SendKey,

    /// All live channels
    ChannelList,

    /// Channel currently tuned
    ChannelCurrent,

    /// EPG programs for a channel within a time range
    /// (`?channelId=&startTime=&endTime=`)
    ChannelEpgRange,

    /// Channel logo (`?channelId=`), only ever exposed as a URL
    ChannelImage,

    /// Running and installed applications
    ApplicationList,

    /// Launch an application (`?appId=`)
    ApplicationOpen,
}

impl Endpoint {
    /// Every endpoint, in declaration order
    pub const ALL: [Endpoint; 9] = [
        Endpoint::State,
        Endpoint::Volume,
        Endpoint::SendKey,
        Endpoint::ChannelList,
        Endpoint::ChannelCurrent,
        Endpoint::ChannelEpgRange,
        Endpoint::ChannelImage,
        Endpoint::ApplicationList,
        Endpoint::ApplicationOpen,
    ];

    /// Path of this endpoint relative to the device base URL
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::State => "Main/State/get",
            Endpoint::Volume => "RemoteControl/Volume/get",
            Endpoint::SendKey => "RemoteControl/KeyHandling/sendKey",
            Endpoint::ChannelList => "Live/Channels/getList",
            Endpoint::ChannelCurrent => "Live/Channels/getCurrent",
            Endpoint::ChannelEpgRange => "EPG/Programs/getRange",
            Endpoint::ChannelImage => "EPG/Programs/getImage",
            Endpoint::ApplicationList => "Applications/State/get",
            Endpoint::ApplicationOpen => "Applications/Lifecycle/open",
        }
    }

    /// HTTP method this endpoint expects
    pub fn method(&self) -> Method {
        match self {
            Endpoint::SendKey | Endpoint::ApplicationOpen => Method::Post,
            _ => Method::Get,
        }
    }
}

//! Remote-control keys accepted by the Netia Player

use std::fmt;
use std::str::FromStr;

use crate::ApiError;

macro_rules! command_keys {
    ($($variant:ident => $code:literal),+ $(,)?) => {
        /// A remote-control key the device understands
        ///
        /// Only keys in this fixed set are ever sent to the device. Anything
        /// else fails to parse and is dropped before reaching the network.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum CommandKey {
            $($variant),+
        }

        impl CommandKey {
            /// Every supported key, in the order the device documents them
            pub const ALL: &'static [CommandKey] = &[$(CommandKey::$variant),+];

            /// The wire code sent as the `key` query parameter
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(CommandKey::$variant => $code),+
                }
            }
        }

        impl FromStr for CommandKey {
            type Err = ApiError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok(CommandKey::$variant),)+
                    other => Err(ApiError::InvalidParameter(format!("unknown key '{}'", other))),
                }
            }
        }
    };
}

command_keys! {
    Digit1 => "1",
    Digit2 => "2",
    Digit3 => "3",
    Digit4 => "4",
    Digit5 => "5",
    Digit6 => "6",
    Digit7 => "7",
    Digit8 => "8",
    Digit9 => "9",
    Digit0 => "0",
    OnOff => "on_off",
    Mute => "mute",
    VolumeUp => "volume_up",
    VolumeDown => "volume_down",
    ChannelUp => "channel_up",
    ChannelDown => "channel_down",
    Back => "back",
    Fullscreen => "fullscreen",
    Menu => "menu",
    Up => "up",
    Down => "down",
    Left => "left",
    Right => "right",
    Ok => "ok",
    Play => "play",
    Stop => "stop",
    Prev => "prev",
    Next => "next",
    Rec => "rec",
    Guide => "guide",
    Delete => "delete",
    Red => "red",
    Green => "green",
    Yellow => "yellow",
    Blue => "blue",
}

impl CommandKey {
    /// Parse a key, returning `None` for anything outside the supported set
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

impl fmt::Display for CommandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

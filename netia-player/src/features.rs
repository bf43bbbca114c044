//! Media-player capability flags

use std::ops::{BitOr, BitOrAssign};

/// Set of commands a player supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SupportedFeatures(u32);

impl SupportedFeatures {
    pub const PAUSE: Self = Self(1);
    pub const VOLUME_MUTE: Self = Self(1 << 3);
    pub const PREVIOUS_TRACK: Self = Self(1 << 4);
    pub const NEXT_TRACK: Self = Self(1 << 5);
    pub const TURN_ON: Self = Self(1 << 7);
    pub const TURN_OFF: Self = Self(1 << 8);
    pub const PLAY_MEDIA: Self = Self(1 << 9);
    pub const VOLUME_STEP: Self = Self(1 << 10);
    pub const SELECT_SOURCE: Self = Self(1 << 11);

    /// What every Netia Player can do
    pub const NETIA: Self = Self(
        Self::TURN_ON.0
            | Self::TURN_OFF.0
            | Self::VOLUME_MUTE.0
            | Self::VOLUME_STEP.0
            | Self::PREVIOUS_TRACK.0
            | Self::NEXT_TRACK.0
            | Self::PLAY_MEDIA.0
            | Self::PAUSE.0,
    );

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SupportedFeatures {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for SupportedFeatures {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_netia_features() {
        let features = SupportedFeatures::NETIA;
        assert!(features.contains(SupportedFeatures::TURN_ON));
        assert!(features.contains(SupportedFeatures::NEXT_TRACK | SupportedFeatures::PREVIOUS_TRACK));
        assert!(!features.contains(SupportedFeatures::SELECT_SOURCE));
    }

    #[test]
    fn test_bitor_assign() {
        let mut features = SupportedFeatures::empty();
        features |= SupportedFeatures::SELECT_SOURCE;
        assert_eq!(features, SupportedFeatures::SELECT_SOURCE);
        assert_eq!(features.bits(), 1 << 11);
    }
}

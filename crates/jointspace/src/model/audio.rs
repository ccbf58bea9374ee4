//! Audio volume.

use serde::{Deserialize, Serialize};

/// Body of `POST audio/volume`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    pub current: i64,
    #[serde(default)]
    pub muted: bool,
}

impl Volume {
    /// Unmuted volume at the given level.
    pub fn new(current: i64) -> Self {
        Self {
            current,
            muted: false,
        }
    }
}

/// Response to `GET audio/volume`, including the TV's volume limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentVolume {
    pub muted: bool,
    pub current: i64,
    pub min: i64,
    pub max: i64,
}

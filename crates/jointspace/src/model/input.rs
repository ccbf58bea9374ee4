//! Remote control key presses.

use serde::{Deserialize, Serialize};

/// A key of the physical remote, named as the TV expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputKeyValue {
    Standby,
    Back,
    Find,
    #[serde(rename = "RedColour")]
    Red,
    #[serde(rename = "GreenColour")]
    Green,
    #[serde(rename = "YellowColour")]
    Yellow,
    #[serde(rename = "BlueColour")]
    Blue,
    Home,
    VolumeUp,
    VolumeDown,
    Mute,
    Options,
    Dot,
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
    Info,
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    Confirm,
    Next,
    Previous,
    Adjust,
    #[serde(rename = "WatchTV")]
    WatchTv,
    Viewmode,
    Teletext,
    Subtitle,
    ChannelStepUp,
    ChannelStepDown,
    Source,
    AmbilightOnOff,
    PlayPause,
    Pause,
    FastForward,
    Stop,
    Rewind,
    Record,
    Online,
}

/// Body of `POST input/key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputKey {
    pub key: InputKeyValue,
}

//! Short key names accepted by `tvremote key`.

use jointspace::model::InputKeyValue;

/// CLI key name to remote key, in help order.
pub const KEY_MAP: &[(&str, InputKeyValue)] = &[
    ("standby", InputKeyValue::Standby),
    ("back", InputKeyValue::Back),
    ("find", InputKeyValue::Find),
    ("red", InputKeyValue::Red),
    ("green", InputKeyValue::Green),
    ("yellow", InputKeyValue::Yellow),
    ("blue", InputKeyValue::Blue),
    ("home", InputKeyValue::Home),
    ("volup", InputKeyValue::VolumeUp),
    ("voldown", InputKeyValue::VolumeDown),
    ("mute", InputKeyValue::Mute),
    ("options", InputKeyValue::Options),
    ("dot", InputKeyValue::Dot),
    ("0", InputKeyValue::Digit0),
    ("1", InputKeyValue::Digit1),
    ("2", InputKeyValue::Digit2),
    ("3", InputKeyValue::Digit3),
    ("4", InputKeyValue::Digit4),
    ("5", InputKeyValue::Digit5),
    ("6", InputKeyValue::Digit6),
    ("7", InputKeyValue::Digit7),
    ("8", InputKeyValue::Digit8),
    ("9", InputKeyValue::Digit9),
    ("info", InputKeyValue::Info),
    ("up", InputKeyValue::CursorUp),
    ("down", InputKeyValue::CursorDown),
    ("left", InputKeyValue::CursorLeft),
    ("right", InputKeyValue::CursorRight),
    ("ok", InputKeyValue::Confirm),
    ("next", InputKeyValue::Next),
    ("prev", InputKeyValue::Previous),
    ("adjust", InputKeyValue::Adjust),
    ("tv", InputKeyValue::WatchTv),
    ("view", InputKeyValue::Viewmode),
    ("teletext", InputKeyValue::Teletext),
    ("subtitle", InputKeyValue::Subtitle),
    ("chanup", InputKeyValue::ChannelStepUp),
    ("chandown", InputKeyValue::ChannelStepDown),
    ("source", InputKeyValue::Source),
    ("ambilight", InputKeyValue::AmbilightOnOff),
    ("play", InputKeyValue::PlayPause),
    ("pause", InputKeyValue::Pause),
    ("forward", InputKeyValue::FastForward),
    ("stop", InputKeyValue::Stop),
    ("rewind", InputKeyValue::Rewind),
    ("rec", InputKeyValue::Record),
    ("online", InputKeyValue::Online),
];

/// Looks up a key by its CLI name, ignoring case.
pub fn lookup(name: &str) -> Option<InputKeyValue> {
    KEY_MAP
        .iter()
        .find(|(key_name, _)| key_name.eq_ignore_ascii_case(name))
        .map(|(_, key)| *key)
}

/// Clap value parser for key names.
pub fn parse_key(name: &str) -> Result<InputKeyValue, String> {
    lookup(name).ok_or_else(|| {
        let names: Vec<&str> = KEY_MAP.iter().map(|(key_name, _)| *key_name).collect();
        format!("unknown key '{}' (possible values: {})", name, names.join(", "))
    })
}

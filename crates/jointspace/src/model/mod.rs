//! Typed request and response payloads for the JointSpace API.
//!
//! Every model converts to and from the wire JSON through [`ApiModel`].
//! Decoding never fills in missing required fields: a payload that does not
//! match the expected shape yields a [`ValidationError`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub mod ambilight;
pub mod applications;
pub mod audio;
pub mod channels;
pub mod general;
pub mod input;
pub mod pairing;

pub use ambilight::{
    AmbilightColor, AmbilightColorSettings, AmbilightColors, AmbilightLayer, AmbilightMode,
    AmbilightModeValue, AmbilightPower, AmbilightPowerValue, AmbilightTopology,
};
pub use applications::{
    Application, ApplicationComponent, ApplicationIntent, ApplicationShort, Applications,
};
pub use audio::{CurrentVolume, Volume};
pub use channels::{
    AllChannels, Channel, ChannelId, ChannelList, ChannelListId, ChannelShort, CurrentChannel,
    SetChannel,
};
pub use general::{PowerState, PowerStateValue};
pub use input::{InputKey, InputKeyValue};
pub use pairing::{
    DeviceInfo, PairingAuthInfo, PairingGrantPayload, PairingRequestPayload,
    PairingRequestResponse, PairingResponse, PairingScope,
};

/// A wire payload did not match the expected model shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Conversion between a model and its JSON wire form.
pub trait ApiModel: Sized {
    /// Encodes the model as the JSON value sent to the TV.
    fn to_wire(&self) -> Result<Value, ValidationError>;

    /// Decodes and validates a JSON value received from the TV.
    fn from_wire(raw: &Value) -> Result<Self, ValidationError>;
}

impl<T> ApiModel for T
where
    T: Serialize + DeserializeOwned,
{
    fn to_wire(&self) -> Result<Value, ValidationError> {
        Ok(serde_json::to_value(self)?)
    }

    fn from_wire(raw: &Value) -> Result<Self, ValidationError> {
        Ok(serde_json::from_value(raw.clone())?)
    }
}

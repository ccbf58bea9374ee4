//! High level remote control.
//!
//! [`Remote`] wraps [`TvApi`] into the operations of a physical remote:
//! power, volume, channels by number or name, keys, Ambilight and apps.
//! Channel, application and Ambilight topology lookups are cached after
//! the first fetch.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use jointspace::model::{
    AmbilightColor, AmbilightColorSettings, AmbilightColors, AmbilightLayer, AmbilightPower,
    AmbilightPowerValue, AmbilightTopology, Application, Channel, DeviceInfo, InputKey,
    InputKeyValue, PowerState, PowerStateValue, SetChannel, Volume,
};
use jointspace::{
    generate_device_id, Credentials, Pairer, Transport, TransportConfig, TvApi, TvError,
    TvTransport,
};
use thiserror::Error;
use tokio::sync::RwLock;

/// Application name announced to the TV when pairing.
pub const APP_NAME: &str = "tvremote";

/// Application ID announced to the TV when pairing.
pub const APP_ID: &str = "69";

/// Errors raised by [`Remote`].
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Channel '{0}' not available")]
    ChannelNotFound(String),

    #[error("Application '{0}' not available")]
    ApplicationNotFound(String),

    #[error(transparent)]
    Tv(#[from] TvError),
}

pub type Result<T> = std::result::Result<T, RemoteError>;

/// Channel to switch to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelSelector {
    /// Preset number as shown in the channel list.
    Number(u32),
    /// Exact channel name.
    Name(String),
}

impl ChannelSelector {
    /// Digits select a preset number, anything else a name.
    pub fn parse(value: &str) -> Self {
        if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(number) = value.parse() {
                return ChannelSelector::Number(number);
            }
        }
        ChannelSelector::Name(value.to_string())
    }

    fn matches(&self, channel: &Channel) -> bool {
        match self {
            ChannelSelector::Number(number) => channel.preset == number.to_string(),
            ChannelSelector::Name(name) => channel.name == *name,
        }
    }
}

impl fmt::Display for ChannelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelSelector::Number(number) => write!(f, "{}", number),
            ChannelSelector::Name(name) => f.write_str(name),
        }
    }
}

/// Per-side Ambilight colors. A side left `None` is not changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmbilightSides {
    pub left: Option<AmbilightColor>,
    pub top: Option<AmbilightColor>,
    pub right: Option<AmbilightColor>,
    pub bottom: Option<AmbilightColor>,
}

impl AmbilightSides {
    fn is_empty(&self) -> bool {
        self.left.is_none() && self.top.is_none() && self.right.is_none() && self.bottom.is_none()
    }
}

/// Builds the pairing identity of this machine.
pub fn device_info(id: Option<&str>) -> DeviceInfo {
    DeviceInfo {
        id: id.map_or_else(generate_device_id, str::to_string),
        device_name: gethostname::gethostname().to_string_lossy().into_owned(),
        device_os: std::env::consts::OS.to_string(),
        app_id: APP_ID.to_string(),
        app_name: APP_NAME.to_string(),
        device_type: "native".to_string(),
    }
}

/// Remote control for one TV.
#[derive(Debug)]
pub struct Remote<T> {
    api: TvApi<T>,
    channels: RwLock<Vec<Channel>>,
    applications: RwLock<Vec<Application>>,
    topology: RwLock<Option<AmbilightTopology>>,
}

impl Remote<TvTransport> {
    /// Creates a remote for `host` on the default port.
    ///
    /// Without credentials only [`Remote::pair`] will succeed.
    pub fn new(host: &str, auth: Option<Credentials>) -> Result<Self> {
        Self::connect(TransportConfig::new(host), auth)
    }

    /// Creates a remote with explicit transport settings.
    pub fn connect(config: TransportConfig, auth: Option<Credentials>) -> Result<Self> {
        let transport = TvTransport::new(config)?;
        transport.set_auth(auth);
        Ok(Self::from_api(TvApi::new(transport)))
    }
}

impl<T: Transport> Remote<T> {
    pub fn from_api(api: TvApi<T>) -> Self {
        Self {
            api,
            channels: RwLock::new(Vec::new()),
            applications: RwLock::new(Vec::new()),
            topology: RwLock::new(None),
        }
    }

    pub fn api(&self) -> &TvApi<T> {
        &self.api
    }

    pub fn host(&self) -> &str {
        self.api.host()
    }

    pub fn auth(&self) -> Option<Credentials> {
        self.api.auth()
    }

    /// Switches credentials; may be called at any time.
    pub fn set_auth(&self, auth: Option<Credentials>) {
        self.api.set_auth(auth);
    }

    /// Pairs with the TV. On success this remote is authenticated.
    ///
    /// `id` becomes the device ID; a random 16 character one is generated
    /// when absent.
    pub async fn pair<F, Fut, E>(&self, pin_provider: F, id: Option<&str>) -> Result<Credentials>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<String, E>>,
        E: fmt::Display,
    {
        let mut pairer = Pairer::new(&self.api, device_info(id));
        Ok(pairer.pair(pin_provider).await?)
    }

    /// Returns `true` when the TV is on, `false` in standby.
    pub async fn get_power(&self) -> Result<bool> {
        let state = self.api.get_powerstate().await?;
        Ok(state.powerstate == PowerStateValue::On)
    }

    pub async fn set_power(&self, on: bool) -> Result<()> {
        let powerstate = if on {
            PowerStateValue::On
        } else {
            PowerStateValue::Standby
        };
        self.api.set_powerstate(&PowerState { powerstate }).await?;
        Ok(())
    }

    pub async fn get_volume(&self) -> Result<i64> {
        Ok(self.api.get_volume().await?.current)
    }

    pub async fn set_volume(&self, volume: i64) -> Result<()> {
        self.api.set_volume(&Volume::new(volume)).await?;
        Ok(())
    }

    /// Name of the current channel, or of the last one while an app is shown.
    pub async fn get_current_channel(&self) -> Result<String> {
        Ok(self.api.get_current_channel().await?.channel.name)
    }

    /// Returns preset number to channel name, refreshing the channel cache.
    pub async fn get_all_channels(&self) -> Result<BTreeMap<u32, String>> {
        let channels = self.api.get_all_channels().await?.channel;

        let mut presets = BTreeMap::new();
        for channel in &channels {
            match channel.preset.parse() {
                Ok(number) => {
                    presets.insert(number, channel.name.clone());
                }
                Err(_) => {
                    tracing::debug!("Skipping channel {} with preset {:?}", channel.name, channel.preset);
                }
            }
        }

        *self.channels.write().await = channels;
        Ok(presets)
    }

    /// Switches to a channel, leaving any app in front.
    pub async fn set_channel(&self, selector: &ChannelSelector) -> Result<()> {
        let mut channels = self.channels.write().await;
        if channels.is_empty() {
            *channels = self.api.get_all_channels().await?.channel;
        }
        let ccid = channels
            .iter()
            .find(|channel| selector.matches(channel))
            .map(|channel| channel.ccid)
            .ok_or_else(|| RemoteError::ChannelNotFound(selector.to_string()))?;
        drop(channels);

        self.api.set_channel(&SetChannel::new(ccid)).await?;
        Ok(())
    }

    pub async fn input_key(&self, key: InputKeyValue) -> Result<()> {
        self.api.input_key(&InputKey { key }).await?;
        Ok(())
    }

    pub async fn get_ambilight_power(&self) -> Result<bool> {
        let power = self.api.get_ambilight_power().await?;
        Ok(power.power == AmbilightPowerValue::On)
    }

    pub async fn set_ambilight_power(&self, on: bool) -> Result<()> {
        let power = if on {
            AmbilightPowerValue::On
        } else {
            AmbilightPowerValue::Off
        };
        self.api.set_ambilight_power(&AmbilightPower { power }).await?;
        Ok(())
    }

    /// Sets Ambilight colors.
    ///
    /// `color` applies to every side; a color in `sides` overrides it on that
    /// side. Sides with neither keep their current colors. A lone `color`
    /// is sent as a single value; otherwise every pixel of the selected sides
    /// is set on `layer1`, using the cached topology.
    pub async fn set_ambilight_color(
        &self,
        color: Option<AmbilightColor>,
        sides: AmbilightSides,
    ) -> Result<()> {
        if let (Some(color), true) = (color, sides.is_empty()) {
            self.api
                .set_ambilight_cached(&AmbilightColorSettings::Single(color))
                .await?;
            return Ok(());
        }

        let topology = self.ambilight_topology().await?;
        let layer = AmbilightLayer {
            left: side_pixels(sides.left.or(color), topology.left),
            top: side_pixels(sides.top.or(color), topology.top),
            right: side_pixels(sides.right.or(color), topology.right),
            bottom: side_pixels(sides.bottom.or(color), topology.bottom),
        };
        let colors = AmbilightColors(BTreeMap::from([("layer1".to_string(), layer)]));

        self.api
            .set_ambilight_cached(&AmbilightColorSettings::Pixels(colors))
            .await?;
        Ok(())
    }

    /// Returns application labels, refreshing the application cache.
    pub async fn get_applications(&self) -> Result<Vec<String>> {
        let applications = self.api.get_applications().await?.applications;
        let labels = applications.iter().map(|app| app.label.clone()).collect();
        *self.applications.write().await = applications;
        Ok(labels)
    }

    /// Launches the application with the given label.
    pub async fn launch_application(&self, label: &str) -> Result<()> {
        let mut applications = self.applications.write().await;
        if applications.is_empty() {
            *applications = self.api.get_applications().await?.applications;
        }
        let launch = applications
            .iter()
            .find(|app| app.label == label)
            .map(Application::to_launch)
            .ok_or_else(|| RemoteError::ApplicationNotFound(label.to_string()))?;
        drop(applications);

        self.api.launch_application(&launch).await?;
        Ok(())
    }

    async fn ambilight_topology(&self) -> Result<AmbilightTopology> {
        let mut cached = self.topology.write().await;
        if let Some(topology) = *cached {
            return Ok(topology);
        }
        let topology = self.api.get_ambilight_topology().await?;
        *cached = Some(topology);
        Ok(topology)
    }
}

/// Maps pixel indices `0..count` of one side to `color`.
fn side_pixels(color: Option<AmbilightColor>, count: u32) -> BTreeMap<String, AmbilightColor> {
    match color {
        Some(color) => (0..count).map(|pixel| (pixel.to_string(), color)).collect(),
        None => BTreeMap::new(),
    }
}

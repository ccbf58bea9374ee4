//! Typed JointSpace API client.
//!
//! Each method mirrors one `GET` or `POST` endpoint. On top of the transport
//! errors it translates HTTP 401 into [`TvError::Unauthorized`] and
//! responses that fail validation into [`TvError::MalformedResponse`].

use serde_json::Value;

use crate::error::{HttpMethod, Result, TvError};
use crate::model::{
    AllChannels, AmbilightColorSettings, AmbilightColors, AmbilightMode, AmbilightPower,
    AmbilightTopology, ApiModel, ApplicationShort, Applications, CurrentChannel, CurrentVolume,
    InputKey, PairingGrantPayload, PairingRequestPayload, PairingRequestResponse,
    PairingResponse, PowerState, SetChannel, Volume,
};
use crate::transport::{Credentials, Transport};

/// JointSpace API version used as the path prefix.
pub const API_VERSION: u32 = 6;

/// Client bound to one TV through a [`Transport`].
#[derive(Debug)]
pub struct TvApi<T> {
    transport: T,
    api_version: u32,
}

impl<T: Transport> TvApi<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            api_version: API_VERSION,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn host(&self) -> &str {
        self.transport.host()
    }

    pub fn auth(&self) -> Option<Credentials> {
        self.transport.auth()
    }

    /// Switches credentials; takes effect on the next request.
    pub fn set_auth(&self, auth: Option<Credentials>) {
        self.transport.set_auth(auth);
    }

    /// Starts pairing. The TV shows a PIN if the request is accepted.
    pub async fn pair_request(
        &self,
        payload: &PairingRequestPayload,
    ) -> Result<PairingRequestResponse> {
        self.post_model("pair/request", payload).await
    }

    /// Completes pairing with the signed PIN.
    pub async fn pair_grant(&self, payload: &PairingGrantPayload) -> Result<PairingResponse> {
        self.post_model("pair/grant", payload).await
    }

    pub async fn get_powerstate(&self) -> Result<PowerState> {
        self.get_model("powerstate").await
    }

    pub async fn set_powerstate(&self, powerstate: &PowerState) -> Result<()> {
        self.post("powerstate", powerstate).await
    }

    pub async fn get_volume(&self) -> Result<CurrentVolume> {
        self.get_model("audio/volume").await
    }

    pub async fn set_volume(&self, volume: &Volume) -> Result<()> {
        self.post("audio/volume", volume).await
    }

    /// Current TV activity; reports the last channel when an app is in front.
    pub async fn get_current_channel(&self) -> Result<CurrentChannel> {
        self.get_model("activities/tv").await
    }

    pub async fn get_all_channels(&self) -> Result<AllChannels> {
        self.get_model("channeldb/tv/channelLists/all").await
    }

    pub async fn set_channel(&self, channel: &SetChannel) -> Result<()> {
        self.post("activities/tv", channel).await
    }

    pub async fn input_key(&self, key: &InputKey) -> Result<()> {
        self.post("input/key", key).await
    }

    pub async fn get_ambilight_power(&self) -> Result<AmbilightPower> {
        self.get_model("ambilight/power").await
    }

    pub async fn set_ambilight_power(&self, power: &AmbilightPower) -> Result<()> {
        self.post("ambilight/power", power).await
    }

    pub async fn get_ambilight_topology(&self) -> Result<AmbilightTopology> {
        self.get_model("ambilight/topology").await
    }

    pub async fn get_ambilight_mode(&self) -> Result<AmbilightMode> {
        self.get_model("ambilight/mode").await
    }

    pub async fn set_ambilight_mode(&self, mode: &AmbilightMode) -> Result<()> {
        self.post("ambilight/mode", mode).await
    }

    /// Colors sampled from the picture, before Ambilight processing.
    pub async fn get_ambilight_measured(&self) -> Result<AmbilightColors> {
        self.get_model("ambilight/measured").await
    }

    /// Colors after processing by the active Ambilight style.
    pub async fn get_ambilight_processed(&self) -> Result<AmbilightColors> {
        self.get_model("ambilight/processed").await
    }

    /// Colors previously set through the API.
    pub async fn get_ambilight_cached(&self) -> Result<AmbilightColors> {
        self.get_model("ambilight/cached").await
    }

    /// Overrides Ambilight colors. Pixels not mentioned keep their color.
    pub async fn set_ambilight_cached(&self, colors: &AmbilightColorSettings) -> Result<()> {
        self.post("ambilight/cached", colors).await
    }

    pub async fn get_applications(&self) -> Result<Applications> {
        self.get_model("applications").await
    }

    pub async fn launch_application(&self, application: &ApplicationShort) -> Result<()> {
        self.post("activities/launch", application).await
    }

    async fn post_model<P, R>(&self, path: &str, payload: &P) -> Result<R>
    where
        P: ApiModel,
        R: ApiModel,
    {
        let raw = self.post_raw(path, payload).await?;
        parse_response(HttpMethod::Post, path, raw)
    }

    async fn get_model<R: ApiModel>(&self, path: &str) -> Result<R> {
        let raw = self.get_raw(path).await?;
        parse_response(HttpMethod::Get, path, raw)
    }

    async fn post<P: ApiModel>(&self, path: &str, payload: &P) -> Result<()> {
        self.post_raw(path, payload).await.map(|_| ())
    }

    async fn post_raw<P: ApiModel>(&self, path: &str, payload: &P) -> Result<Option<Value>> {
        let body = payload
            .to_wire()
            .map_err(|e| TvError::Serialization(e.to_string()))?;
        self.transport
            .post(&self.api_path(path), Some(&body))
            .await
            .map_err(|e| wrap_unauthorized(HttpMethod::Post, path, e))
    }

    async fn get_raw(&self, path: &str) -> Result<Option<Value>> {
        self.transport
            .get(&self.api_path(path))
            .await
            .map_err(|e| wrap_unauthorized(HttpMethod::Get, path, e))
    }

    fn api_path(&self, path: &str) -> String {
        format!("{}/{}", self.api_version, path)
    }
}

fn wrap_unauthorized(method: HttpMethod, path: &str, err: TvError) -> TvError {
    match err {
        TvError::Transport {
            status: Some(401), ..
        } => TvError::Unauthorized {
            method,
            path: path.to_string(),
        },
        other => other,
    }
}

fn parse_response<R: ApiModel>(method: HttpMethod, path: &str, raw: Option<Value>) -> Result<R> {
    let raw = raw.unwrap_or(Value::Null);
    R::from_wire(&raw).map_err(|e| TvError::MalformedResponse {
        method,
        path: path.to_string(),
        reason: e.to_string(),
        payload: raw,
    })
}

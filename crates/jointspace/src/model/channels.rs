//! TV channels and channel lists.

use serde::{Deserialize, Serialize};

/// Identifies a channel by its channel-database id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelId {
    pub ccid: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelShort {
    pub ccid: i64,
    /// Channel number as shown by the TV.
    pub preset: String,
    pub name: String,
}

/// Full channel entry from the channel database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub ccid: i64,
    pub preset: String,
    pub name: String,
    pub onid: i64,
    pub tsid: i64,
    pub sid: i64,
    #[serde(rename = "serviceType")]
    pub service_type: String,
    #[serde(rename = "type")]
    pub channel_type: String,
    #[serde(rename = "logoVersion")]
    pub logo_version: i64,
}

/// Name of the list to select a channel from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelListId {
    pub id: String,
}

impl Default for ChannelListId {
    fn default() -> Self {
        Self {
            id: "allcab".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelList {
    pub id: String,
    pub version: String,
}

/// Response to `GET activities/tv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentChannel {
    pub channel: ChannelShort,
    #[serde(rename = "channelList")]
    pub channel_list: ChannelList,
}

/// Body of `POST activities/tv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetChannel {
    pub channel: ChannelId,
    #[serde(rename = "channelList", default)]
    pub channel_list: ChannelListId,
}

impl SetChannel {
    /// Selects `ccid` from the default channel list.
    pub fn new(ccid: i64) -> Self {
        Self {
            channel: ChannelId { ccid },
            channel_list: ChannelListId::default(),
        }
    }
}

/// Response to `GET channeldb/tv/channelLists/all`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllChannels {
    pub version: i64,
    pub id: String,
    #[serde(rename = "listType")]
    pub list_type: String,
    pub medium: String,
    pub operator: String,
    #[serde(rename = "installCountry")]
    pub install_country: String,
    #[serde(rename = "Channel")]
    pub channel: Vec<Channel>,
}

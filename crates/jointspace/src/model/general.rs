//! Power state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerStateValue {
    On,
    Standby,
}

/// Body of `GET`/`POST powerstate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerState {
    pub powerstate: PowerStateValue,
}

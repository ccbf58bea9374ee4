//! Installed applications and launch intents.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationComponent {
    #[serde(rename = "packageName")]
    pub package_name: String,
    #[serde(rename = "className")]
    pub class_name: String,
}

/// Android intent used to start an application activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationIntent {
    pub component: ApplicationComponent,
    pub action: String,
}

/// Body of `POST activities/launch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationShort {
    pub intent: ApplicationIntent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub intent: ApplicationIntent,
    pub label: String,
    pub order: i64,
    pub id: String,
    #[serde(rename = "type")]
    pub app_type: String,
}

impl Application {
    /// Returns the launch payload for this application.
    pub fn to_launch(&self) -> ApplicationShort {
        ApplicationShort {
            intent: self.intent.clone(),
        }
    }
}

/// Response to `GET applications`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applications {
    pub version: i64,
    pub applications: Vec<Application>,
}

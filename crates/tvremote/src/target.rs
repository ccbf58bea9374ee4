//! Resolution of the TV to talk to from command-line options and saved data.

use anyhow::Result;
use thiserror::Error;

use crate::store::{CredentialStore, HostData};

/// Invalid combination of connection options.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("Options --host, --id and --key have to be used together.")]
    IncompleteCredentials,

    #[error("--save requires giving --host, --id and --key.")]
    NothingToSave,

    #[error("No TV data (--host, --id, --key) given or saved.")]
    NoTarget,

    #[error("No host given (--host).")]
    MissingHost,

    #[error("Option --key is invalid in pairing context.")]
    KeyWhilePairing,
}

/// Connection options as given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetOptions {
    pub host: Option<String>,
    pub id: Option<String>,
    pub key: Option<String>,
    pub save: bool,
}

impl TargetOptions {
    /// Picks the TV for any command other than `pair`.
    ///
    /// Either all of host, ID and key are given (and saved with `--save`), or
    /// none is and the saved host is used.
    pub fn resolve(&self, store: &CredentialStore) -> Result<HostData> {
        match (&self.host, &self.id, &self.key) {
            (Some(host), Some(id), Some(key)) => {
                let target = HostData {
                    host: host.clone(),
                    id: id.clone(),
                    key: key.clone(),
                };
                if self.save {
                    store.save(&target)?;
                }
                Ok(target)
            }
            (None, None, None) => {
                if self.save {
                    return Err(UsageError::NothingToSave.into());
                }
                let saved = store.load()?.ok_or(UsageError::NoTarget)?;
                tracing::debug!("Using saved data: host={}, id={}", saved.host, saved.id);
                Ok(saved)
            }
            _ => Err(UsageError::IncompleteCredentials.into()),
        }
    }

    /// Checks the options for `pair` and returns the host and optional device ID.
    pub fn for_pairing(&self) -> Result<(&str, Option<&str>), UsageError> {
        let host = self.host.as_deref().ok_or(UsageError::MissingHost)?;
        if self.key.is_some() {
            return Err(UsageError::KeyWhilePairing);
        }
        Ok((host, self.id.as_deref()))
    }
}

//! Persistent storage of the last used TV and its credentials.
//!
//! The store persists to JSON at `~/.local/share/tvremote/data.json`
//! (platform data directory) in the form
//! `{"last_host": {"host": ..., "id": ..., "key": ...}}`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jointspace::Credentials;
use serde::{Deserialize, Serialize};

/// A TV address together with the credentials paired for it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostData {
    pub host: String,
    pub id: String,
    pub key: String,
}

impl HostData {
    pub fn new(host: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            host: host.into(),
            id: credentials.id,
            key: credentials.key,
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.id.clone(), self.key.clone())
    }
}

impl fmt::Debug for HostData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostData")
            .field("host", &self.host)
            .field("id", &self.id)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Layout of the data file.
#[derive(Debug, Serialize, Deserialize)]
struct StoreData {
    last_host: HostData,
}

/// JSON file holding the last used host.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Creates a store backed by `path`. Nothing is read until `load()`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Creates a store using the default path.
    pub fn with_default_path() -> Self {
        Self::new(default_store_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the saved host.
    ///
    /// Returns `Ok(None)` when the file is missing or holds no complete
    /// `last_host` entry; only I/O failures are errors.
    pub fn load(&self) -> Result<Option<HostData>> {
        if !self.path.exists() {
            tracing::debug!("Data file not found at {:?}", self.path);
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read data file: {}", self.path.display()))?;

        match serde_json::from_str::<StoreData>(&contents) {
            Ok(data) => {
                tracing::debug!("Loaded saved host {} from {:?}", data.last_host.host, self.path);
                Ok(Some(data.last_host))
            }
            Err(e) => {
                tracing::debug!("Ignoring invalid data file {:?}: {}", self.path, e);
                Ok(None)
            }
        }
    }

    /// Saves `host` as the last used host.
    ///
    /// Uses atomic write (write to temp file, then rename) to prevent corruption.
    /// Creates parent directories if they don't exist.
    pub fn save(&self, host: &HostData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        let data = StoreData {
            last_host: host.clone(),
        };
        let contents =
            serde_json::to_string_pretty(&data).context("Failed to serialize saved host")?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &contents).with_context(|| {
            format!("Failed to write temp data file: {}", temp_path.display())
        })?;

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename temp data file {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        tracing::debug!("Saved host {} to {:?}", host.host, self.path);
        Ok(())
    }
}

/// Returns the default data file path.
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tvremote")
        .join("data.json")
}

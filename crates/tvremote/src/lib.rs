//! # tvremote Library
//!
//! Remote control for Philips Android TVs, built on the [`jointspace`]
//! client.
//!
//! ## Overview
//!
//! - **Remote**: power, volume, channels, keys, Ambilight and apps in the
//!   terms of a physical remote
//! - **Credential Store**: the last paired TV, saved between runs
//! - **Configuration**: port, timeout and log level from a TOML file
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jointspace::Credentials;
//! use tvremote::{ChannelSelector, Remote};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let remote = Remote::new("192.168.0.66", Some(Credentials::new("id", "key")))?;
//!
//!     remote.set_power(true).await?;
//!     remote.set_channel(&ChannelSelector::parse("1")).await?;
//!     println!("Watching {}", remote.get_current_channel().await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`remote`]: High level remote control
//! - [`store`]: Saved host and credentials
//! - [`config`]: Configuration loading and defaults
//! - [`target`]: Connection option rules of the CLI
//! - [`keys`]: Key names accepted by the CLI

pub mod config;
pub mod keys;
pub mod remote;
pub mod store;
pub mod target;

// Re-export jointspace for convenience
pub use jointspace;

pub use config::{Config, ConfigError};
pub use remote::{AmbilightSides, ChannelSelector, Remote, RemoteError};
pub use store::{CredentialStore, HostData};
pub use target::{TargetOptions, UsageError};

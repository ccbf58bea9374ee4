//! tvremote
//!
//! Command-line remote control for Philips Android TVs.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use jointspace::model::{AmbilightColor, InputKeyValue};
use tvremote::config::Config;
use tvremote::keys;
use tvremote::remote::{AmbilightSides, ChannelSelector, Remote};
use tvremote::store::{CredentialStore, HostData};
use tvremote::target::TargetOptions;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

/// tvremote - a CLI remote control for Philips Android-powered TVs.
///
/// Before using it, pair with your TV while it is powered on:
///
///     tvremote --host IP --save pair
#[derive(Parser, Debug)]
#[command(name = "tvremote")]
#[command(version, about, long_about)]
pub struct Cli {
    /// TV IP address
    #[arg(short = 'a', long, global = true)]
    pub host: Option<String>,

    /// Connecting device ID
    #[arg(short, long, global = true)]
    pub id: Option<String>,

    /// Connecting device secret key
    #[arg(short, long, global = true)]
    pub key: Option<String>,

    /// Save host, ID and key for future use
    #[arg(short, long, global = true)]
    pub save: bool,

    /// Enable debug log
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Pair with the TV to obtain authentication credentials
    ///
    /// Requires --host. A random device ID is generated unless --id is given.
    /// You will be prompted for the PIN displayed on the TV screen. With
    /// --save the credentials are used automatically from then on.
    Pair,

    /// Manage power state
    #[command(subcommand)]
    Power(PowerCommands),

    /// Manage audio volume
    #[command(subcommand)]
    Volume(VolumeCommands),

    /// Manage TV channels
    #[command(subcommand)]
    Channel(ChannelCommands),

    /// Emulate pressing keys on the TV remote
    ///
    /// Keys are sent in the given order.
    Key {
        /// Key names, e.g. volup, ok, chanup
        #[arg(value_parser = keys::parse_key)]
        keys: Vec<InputKeyValue>,
    },

    /// Manage ambilight
    #[command(subcommand)]
    Ambilight(AmbilightCommands),

    /// Manage applications
    #[command(subcommand)]
    App(AppCommands),
}

/// On/off switch argument.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    fn is_on(self) -> bool {
        self == Switch::On
    }

    fn label(on: bool) -> &'static str {
        if on {
            "on"
        } else {
            "off"
        }
    }
}

/// Subcommands for power state, shared by the TV and Ambilight.
#[derive(Subcommand, Debug, Clone)]
pub enum PowerCommands {
    /// Get current power state
    Get,
    /// Set power state
    Set {
        #[arg(value_enum)]
        power: Switch,
    },
}

/// Subcommands for volume.
#[derive(Subcommand, Debug, Clone)]
pub enum VolumeCommands {
    /// Get current audio volume
    Get,
    /// Set audio volume
    Set { volume: i64 },
}

/// Subcommands for channels.
#[derive(Subcommand, Debug, Clone)]
pub enum ChannelCommands {
    /// Get current TV channel
    Get,
    /// List all available TV channels
    List,
    /// Set TV channel by number or name
    Set { channel: String },
}

/// Subcommands for ambilight.
#[derive(Subcommand, Debug, Clone)]
pub enum AmbilightCommands {
    /// Manage ambilight power
    #[command(subcommand)]
    Power(PowerCommands),
    /// Manage ambilight color
    #[command(subcommand)]
    Color(ColorCommands),
}

/// Subcommands for ambilight color.
#[derive(Subcommand, Debug, Clone)]
pub enum ColorCommands {
    /// Set ambilight color on all sides
    Set { r: u8, g: u8, b: u8 },
}

/// Subcommands for applications.
#[derive(Subcommand, Debug, Clone)]
pub enum AppCommands {
    /// List all available applications
    List,
    /// Launch an application
    Launch { application: String },
}

impl Cli {
    fn target_options(&self) -> TargetOptions {
        TargetOptions {
            host: self.host.clone(),
            id: self.id.clone(),
            key: self.key.clone(),
            save: self.save,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_filter = init_logging(cli.debug);
    let config = load_config(cli.config.as_deref())?;
    let rust_log_set = std::env::var_os("RUST_LOG").is_some();
    if let Some(level) = configured_level(cli.debug, rust_log_set, &config) {
        log_filter.reload(EnvFilter::new(level))?;
    }

    if let Err(e) = run(&cli, &config).await {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

/// Installs stderr logging. The filter starts at `--debug`, `RUST_LOG` or
/// `info` and can be switched once the configuration is known.
fn init_logging(debug: bool) -> reload::Handle<EnvFilter, Registry> {
    let (filter, handle) = reload::Layer::new(startup_filter(debug));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
    handle
}

fn startup_filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Level from the config file, unless `--debug` or `RUST_LOG` already chose one.
fn configured_level(debug: bool, rust_log_set: bool, config: &Config) -> Option<&str> {
    (!debug && !rust_log_set).then_some(config.logging.level.as_str())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => {
            tracing::debug!("Using config file: {:?}", path);
            Config::load(path)?
        }
        None => Config::load_default()?,
    };
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

async fn run(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let store = CredentialStore::with_default_path();
    let options = cli.target_options();

    if let Commands::Pair = cli.command {
        let (host, id) = options.for_pairing()?;
        let remote = Remote::connect(config.tv.transport_config(host), None)?;

        let credentials = remote.pair(prompt_pin, id).await?;
        println!("Pairing successful!");
        println!("ID:\t{}", credentials.id);
        println!("Key:\t{}", credentials.key);

        if cli.save {
            store.save(&HostData::new(host, credentials))?;
            println!("Credentials saved.");
        }
        return Ok(());
    }

    let target = options.resolve(&store)?;
    let remote = Remote::connect(
        config.tv.transport_config(&target.host),
        Some(target.credentials()),
    )?;

    match &cli.command {
        Commands::Pair => {}
        Commands::Power(PowerCommands::Get) => {
            println!("{}", Switch::label(remote.get_power().await?));
        }
        Commands::Power(PowerCommands::Set { power }) => {
            remote.set_power(power.is_on()).await?;
        }
        Commands::Volume(VolumeCommands::Get) => {
            println!("{}", remote.get_volume().await?);
        }
        Commands::Volume(VolumeCommands::Set { volume }) => {
            remote.set_volume(*volume).await?;
        }
        Commands::Channel(ChannelCommands::Get) => {
            println!("{}", remote.get_current_channel().await?);
        }
        Commands::Channel(ChannelCommands::List) => {
            for (number, name) in remote.get_all_channels().await? {
                println!("{}\t{}", number, name);
            }
        }
        Commands::Channel(ChannelCommands::Set { channel }) => {
            remote.set_channel(&ChannelSelector::parse(channel)).await?;
        }
        Commands::Key { keys } => {
            for key in keys {
                remote.input_key(*key).await?;
            }
        }
        Commands::Ambilight(AmbilightCommands::Power(PowerCommands::Get)) => {
            println!("{}", Switch::label(remote.get_ambilight_power().await?));
        }
        Commands::Ambilight(AmbilightCommands::Power(PowerCommands::Set { power })) => {
            remote.set_ambilight_power(power.is_on()).await?;
        }
        Commands::Ambilight(AmbilightCommands::Color(ColorCommands::Set { r, g, b })) => {
            let color = AmbilightColor::new(*r, *g, *b);
            remote
                .set_ambilight_color(Some(color), AmbilightSides::default())
                .await?;
        }
        Commands::App(AppCommands::List) => {
            for label in remote.get_applications().await? {
                println!("{}", label);
            }
        }
        Commands::App(AppCommands::Launch { application }) => {
            remote.launch_application(application).await?;
        }
    }

    Ok(())
}

/// Reads the PIN from stdin without blocking the runtime.
async fn prompt_pin() -> io::Result<String> {
    tokio::task::spawn_blocking(|| {
        print!("Enter PIN displayed on the TV: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no PIN entered"));
        }
        Ok(line.trim().to_string())
    })
    .await
    .map_err(io::Error::other)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serial_test::serial;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    #[serial]
    fn test_config_warnings_are_logged_at_startup() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::registry().with(startup_filter(true)).with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(move || writer.clone()),
        );
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        std::env::set_var("TVREMOTE_PORT", "notaport");
        let config =
            tracing::subscriber::with_default(subscriber, || load_config(Some(&config_path)));
        std::env::remove_var("TVREMOTE_PORT");

        assert_eq!(config.unwrap().tv.port, 1926);
        let logs = logs.contents();
        assert!(logs.contains("Ignoring invalid TVREMOTE_PORT value: notaport"));
        assert!(logs.contains("Config file not found"));
    }

    #[test]
    fn test_configured_level_applies_without_overrides() {
        let mut config = Config::default();
        config.logging.level = "warn".to_string();

        assert_eq!(configured_level(false, false, &config), Some("warn"));
        assert_eq!(configured_level(true, false, &config), None);
        assert_eq!(configured_level(false, true, &config), None);
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_pair_command_with_global_options() {
        let cli = Cli::try_parse_from(["tvremote", "--host", "192.168.0.66", "--save", "pair"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Pair));
        assert_eq!(cli.host.as_deref(), Some("192.168.0.66"));
        assert!(cli.save);
        assert!(cli.key.is_none());
    }

    #[test]
    fn test_short_options() {
        let cli = Cli::try_parse_from([
            "tvremote", "-a", "h", "-i", "id", "-k", "key", "-d", "power", "get",
        ])
        .unwrap();
        let options = cli.target_options();
        assert_eq!(options.host.as_deref(), Some("h"));
        assert_eq!(options.id.as_deref(), Some("id"));
        assert_eq!(options.key.as_deref(), Some("key"));
        assert!(cli.debug);
        assert!(matches!(cli.command, Commands::Power(PowerCommands::Get)));
    }

    #[test]
    fn test_power_set() {
        let cli = Cli::try_parse_from(["tvremote", "power", "set", "off"]).unwrap();
        match cli.command {
            Commands::Power(PowerCommands::Set { power }) => assert_eq!(power, Switch::Off),
            _ => panic!("Expected Power Set command"),
        }
    }

    #[test]
    fn test_power_set_rejects_other_values() {
        assert!(Cli::try_parse_from(["tvremote", "power", "set", "maybe"]).is_err());
    }

    #[test]
    fn test_volume_set() {
        let cli = Cli::try_parse_from(["tvremote", "volume", "set", "15"]).unwrap();
        match cli.command {
            Commands::Volume(VolumeCommands::Set { volume }) => assert_eq!(volume, 15),
            _ => panic!("Expected Volume Set command"),
        }
    }

    #[test]
    fn test_channel_set_keeps_raw_value() {
        let cli = Cli::try_parse_from(["tvremote", "channel", "set", "TVN HD"]).unwrap();
        match cli.command {
            Commands::Channel(ChannelCommands::Set { channel }) => assert_eq!(channel, "TVN HD"),
            _ => panic!("Expected Channel Set command"),
        }
    }

    #[test]
    fn test_key_names_are_parsed_in_order() {
        let cli = Cli::try_parse_from(["tvremote", "key", "volup", "OK", "chanup"]).unwrap();
        match cli.command {
            Commands::Key { keys } => assert_eq!(
                keys,
                vec![
                    InputKeyValue::VolumeUp,
                    InputKeyValue::Confirm,
                    InputKeyValue::ChannelStepUp
                ]
            ),
            _ => panic!("Expected Key command"),
        }
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(Cli::try_parse_from(["tvremote", "key", "eject"]).is_err());
    }

    #[test]
    fn test_ambilight_color_set_range() {
        let cli = Cli::try_parse_from(["tvremote", "ambilight", "color", "set", "0", "69", "255"])
            .unwrap();
        match cli.command {
            Commands::Ambilight(AmbilightCommands::Color(ColorCommands::Set { r, g, b })) => {
                assert_eq!((r, g, b), (0, 69, 255));
            }
            _ => panic!("Expected Ambilight Color Set command"),
        }

        assert!(
            Cli::try_parse_from(["tvremote", "ambilight", "color", "set", "0", "0", "256"])
                .is_err()
        );
    }

    #[test]
    fn test_ambilight_power_get() {
        let cli = Cli::try_parse_from(["tvremote", "ambilight", "power", "get"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Ambilight(AmbilightCommands::Power(PowerCommands::Get))
        ));
    }

    #[test]
    fn test_app_launch() {
        let cli = Cli::try_parse_from(["tvremote", "app", "launch", "Netflix"]).unwrap();
        match cli.command {
            Commands::App(AppCommands::Launch { application }) => {
                assert_eq!(application, "Netflix")
            }
            _ => panic!("Expected App Launch command"),
        }
    }

    #[test]
    fn test_config_option() {
        let cli = Cli::try_parse_from(["tvremote", "-c", "/tmp/tv.toml", "app", "list"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/tv.toml")));
    }

    #[test]
    fn test_switch_label() {
        assert_eq!(Switch::label(true), "on");
        assert_eq!(Switch::label(false), "off");
    }
}

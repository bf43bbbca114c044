use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use tracing::{debug, info, warn};

use netia_player::{DeviceSnapshot, NetiaPlayer, PlayerConfig};

pub mod display;

/// Netia Player monitor
///
/// Polls a Netia set-top box, prints every state change, and can press
/// remote keys or switch applications on the way.
#[derive(Parser, Debug)]
#[command(name = "netia-monitor")]
#[command(about = "Netia Player monitor - poll a set-top box and print state changes")]
#[command(version)]
pub struct Args {
    /// Device host name or IP address
    #[arg(long)]
    pub host: Option<String>,

    /// Control API port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Display name
    #[arg(short, long)]
    pub name: Option<String>,

    /// JSON configuration file; command-line flags override its values
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,

    /// Expose applications as sources
    #[arg(long)]
    pub app_support: bool,

    /// Application id to offer as a source (repeatable, implies --app-support)
    #[arg(long = "app")]
    pub apps: Vec<String>,

    /// Seconds between polls
    #[arg(short, long, default_value = "10")]
    pub interval: u64,

    /// Poll once, print the full snapshot and exit
    #[arg(long)]
    pub once: bool,

    /// Print snapshots as JSON
    #[arg(long)]
    pub json: bool,

    /// Remote key to press before polling (repeatable)
    #[arg(short, long = "key")]
    pub keys: Vec<String>,

    /// Source to select before polling
    #[arg(short, long)]
    pub source: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Validate command line arguments
    pub fn validate(&self) -> Result<()> {
        if self.interval == 0 {
            return Err(anyhow::anyhow!("Poll interval must be positive"));
        }

        match self.log_level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            _ => {
                return Err(anyhow::anyhow!(
                    "Invalid log level '{}'. Valid levels: error, warn, info, debug, trace",
                    self.log_level
                ));
            }
        }

        Ok(())
    }

    /// Build the player configuration from the optional file, the
    /// environment and the flags, in that order of precedence (lowest first)
    pub fn player_config(&self) -> Result<PlayerConfig> {
        let mut config = match &self.config {
            Some(path) => PlayerConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => PlayerConfig::default(),
        };

        if let Ok(host) = std::env::var("NETIA_HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("NETIA_PORT") {
            config.port = port.parse().context("Invalid NETIA_PORT environment variable")?;
        }

        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        if self.app_support {
            config.app_support = true;
        }
        if !self.apps.is_empty() {
            config = config.with_apps(self.apps.iter().cloned());
        }

        config.validate()?;
        Ok(config)
    }

    pub fn interval_duration(&self) -> Duration {
        Duration::from_secs(self.interval)
    }
}

/// Initialize tracing/logging with the specified log level
fn init_tracing(log_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("NETIA_LOG_LEVEL")
                .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level.to_lowercase())),
        )
        .init();
}

fn print_snapshot(snapshot: &DeviceSnapshot, json: bool, full: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(snapshot).context("Failed to encode snapshot")?);
    } else if full {
        println!("{}", display::details(snapshot));
    } else {
        println!("{}", display::summarize(snapshot));
    }
    Ok(())
}

/// Send the one-off commands requested on the command line
fn send_commands(player: &mut NetiaPlayer, args: &Args) {
    for key in &args.keys {
        if !player.send_command(key) {
            warn!("Skipping unsupported key '{}'", key);
        }
    }

    if let Some(source) = &args.source {
        // Sources are named after the application list, which needs a poll
        player.refresh();
        if !player.select_source(source) {
            warn!("Source '{}' not found; known sources: {:?}", source, player.source_list());
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = args.player_config()?;
    info!("Monitoring {} at {}:{}", config.name, config.host, config.port);

    let mut player = NetiaPlayer::new(config).context("Failed to set up player")?;
    send_commands(&mut player, &args);

    if args.once {
        let snapshot = player.refresh().clone();
        return print_snapshot(&snapshot, args.json, true);
    }

    let mut last: Option<DeviceSnapshot> = None;
    loop {
        let snapshot = player.refresh().clone();
        if last.as_ref() != Some(&snapshot) {
            print_snapshot(&snapshot, args.json, false)?;
            last = Some(snapshot);
        } else {
            debug!("No change");
        }
        std::thread::sleep(args.interval_duration());
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    args.validate()?;
    init_tracing(&args.log_level);

    run(args)
}

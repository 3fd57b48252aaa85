//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// extip: External IP Info Service
///
/// Keeps the host's external IP address and its network metadata fresh
/// and serves them to local clients.
#[derive(Debug, Parser)]
#[command(name = "extip")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Rendezvous path of the Unix socket
    #[arg(long = "socket-path", short, global = true, env = "EXTIP_SOCKET_PATH")]
    pub socket_path: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for extip
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the service
    Service(ServiceArgs),

    /// Print the service's current state
    Client(ClientArgs),

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "extip.toml")]
        output: PathBuf,
    },
}

/// Options of the `service` subcommand.
#[derive(Debug, Default, Args)]
pub struct ServiceArgs {
    /// ipinfo.io access token
    #[arg(long, short, env = "EXTIP_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Lookup endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Lookup timeout in seconds
    #[arg(long = "lookup-timeout", value_name = "SECS")]
    pub lookup_timeout: Option<u64>,

    /// Seconds between scheduled refreshes
    #[arg(long = "refresh-interval", value_name = "SECS")]
    pub refresh_interval: Option<u64>,

    /// Seconds between route table probes
    #[arg(long = "watch-interval", value_name = "SECS")]
    pub watch_interval: Option<u64>,

    /// Where to publish the state
    #[arg(long, value_enum)]
    pub publish: Option<TargetArg>,

    #[command(flatten)]
    pub kv: KvArgs,
}

/// Options of the `client` subcommand.
#[derive(Debug, Default, Args)]
pub struct ClientArgs {
    /// Handlebars output template, e.g. '{{status}} {{info.ip}}'
    #[arg(long = "info-format", short)]
    pub info_format: Option<String>,

    /// Where to read the state from
    #[arg(long, value_enum)]
    pub from: Option<TargetArg>,

    #[command(flatten)]
    pub kv: KvArgs,
}

/// Key/value store options shared by `service` and `client`.
#[derive(Debug, Default, Args)]
pub struct KvArgs {
    /// Key/value store URL, e.g. redis://127.0.0.1/
    #[arg(long = "kv-url", value_name = "URL")]
    pub kv_url: Option<String>,

    /// Key the state is stored under
    #[arg(long = "kv-key", value_name = "KEY")]
    pub kv_key: Option<String>,
}

/// Transport selection for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetArg {
    /// Unix socket at the rendezvous path
    #[value(name = "socket")]
    Socket,
    /// Key/value store
    #[value(name = "kv")]
    Kv,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns the `service` options, if that is the subcommand.
    #[must_use]
    pub const fn service_args(&self) -> Option<&ServiceArgs> {
        match &self.command {
            Command::Service(args) => Some(args),
            _ => None,
        }
    }

    /// Returns the `client` options, if that is the subcommand.
    #[must_use]
    pub const fn client_args(&self) -> Option<&ClientArgs> {
        match &self.command {
            Command::Client(args) => Some(args),
            _ => None,
        }
    }
}

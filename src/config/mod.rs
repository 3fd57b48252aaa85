//! Configuration layer for extip.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ServiceConfig`], [`ClientConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values passed on the command line, or
//!    through `EXTIP_SOCKET_PATH` / `EXTIP_TOKEN`
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! The token has no default and must come from one of the first two.
//!
//! # TOML-Only Options
//!
//! `service.route_command` is not available via CLI.
//!
//! The `service` and `client` commands read the same file: the client
//! follows `publish.target`, `server.socket_path` and `[kv]` unless
//! overridden on its own command line.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, ClientArgs, Command, KvArgs, ServiceArgs, TargetArg};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{
    ClientConfig, PublishTarget, ServiceConfig, expand_tilde, write_default_config,
};

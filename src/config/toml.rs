//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// IP lookup configuration section
    #[serde(default)]
    pub lookup: LookupSection,

    /// Refresh and route watch configuration
    #[serde(default)]
    pub service: ServiceSection,

    /// Unix socket configuration
    #[serde(default)]
    pub server: ServerSection,

    /// Key/value store configuration
    #[serde(default)]
    pub kv: KvSection,

    /// Publish target selection
    #[serde(default)]
    pub publish: PublishSection,

    /// Client output configuration
    #[serde(default)]
    pub client: ClientSection,
}

/// IP lookup configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LookupSection {
    /// ipinfo.io access token
    pub token: Option<String>,

    /// Lookup endpoint URL
    pub endpoint: Option<String>,

    /// Lookup timeout in seconds
    pub timeout: Option<u64>,
}

/// Refresh and route watch configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceSection {
    /// Seconds between scheduled refreshes
    pub refresh_interval: Option<u64>,

    /// Seconds between route table probes
    pub watch_interval: Option<u64>,

    /// Command printing the route table, split on whitespace
    pub route_command: Option<String>,
}

/// Unix socket configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Rendezvous path
    pub socket_path: Option<String>,
}

/// Key/value store configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KvSection {
    /// Store URL
    pub url: Option<String>,

    /// Key the state is stored under
    pub key: Option<String>,
}

/// Publish target configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublishSection {
    /// "socket" or "kv"
    pub target: Option<String>,
}

/// Client output configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// Handlebars output template
    pub info_format: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# extip Configuration File

[lookup]
# ipinfo.io access token (required, can also be set via EXTIP_TOKEN)
# token = "your-token-here"

# Lookup endpoint (default: https://api.ipinfo.io/lite/me)
# endpoint = "https://api.ipinfo.io/lite/me"

# Lookup timeout in seconds (default: 5)
# timeout = 5

[service]
# Seconds between scheduled refreshes (default: 60)
refresh_interval = 60

# Seconds between route table probes, must be shorter than refresh_interval (default: 3)
watch_interval = 3

# Command printing the route table (default: "ip route show")
# route_command = "ip route show"

[server]
# Rendezvous path of the Unix socket (default: /tmp/extip.sock)
# socket_path = "/tmp/extip.sock"

[publish]
# Where the service publishes its state: "socket" or "kv" (default: socket)
# target = "socket"

[kv]
# Key/value store URL (default: redis://127.0.0.1/)
# url = "redis://127.0.0.1/"

# Key the state is stored under (default: external_ip_info)
# key = "external_ip_info"

[client]
# Handlebars output template
# Available variables: {{status}}, {{info.ip}}, {{info.asn}}, {{info.as_name}},
# {{info.as_domain}}, {{info.country_code}}, {{info.country}},
# {{info.continent_code}}, {{info.continent}}
# info_format = "{{status}} {{info.ip}}"
"#
    .to_string()
}

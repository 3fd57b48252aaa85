//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configurations used by the
//! `service` and `client` commands. All validation is performed during
//! construction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use super::cli::{Cli, ClientArgs, KvArgs, ServiceArgs, TargetArg};
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;
use crate::render::validate_template;

/// URL schemes accepted for the key/value store.
const KV_SCHEMES: &[&str] = &["redis", "rediss", "redis+unix", "unix"];

/// Where the service publishes, or the client reads, the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishTarget {
    /// Unix socket at a rendezvous path.
    Socket {
        /// Rendezvous path
        path: PathBuf,
    },
    /// Key/value store.
    Kv {
        /// Store URL
        url: String,
        /// Key the state is stored under
        key: String,
    },
}

impl fmt::Display for PublishTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Socket { path } => write!(f, "socket {}", path.display()),
            Self::Kv { url, key } => write!(f, "kv {url} key={key}"),
        }
    }
}

/// Fully validated configuration for the `service` command.
///
/// # Construction
///
/// Use [`ServiceConfig::from_raw`] to create from CLI args and optional TOML config.
#[derive(Debug)]
pub struct ServiceConfig {
    /// ipinfo.io access token (never blank)
    pub token: String,

    /// Lookup endpoint
    pub endpoint: Url,

    /// Bound on a single lookup
    pub lookup_timeout: Duration,

    /// Cadence of scheduled refreshes
    pub refresh_interval: Duration,

    /// Cadence of route table probes (strictly shorter than `refresh_interval`)
    pub watch_interval: Duration,

    /// Route table dump program
    pub route_program: String,

    /// Arguments passed to `route_program`
    pub route_args: Vec<String>,

    /// Where the state is published
    pub target: PublishTarget,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ endpoint: {}, lookup_timeout: {}s, refresh_interval: {}s, \
             watch_interval: {}s, route_command: '{}{}', publish: {} }}",
            self.endpoint,
            self.lookup_timeout.as_secs(),
            self.refresh_interval.as_secs(),
            self.watch_interval.as_secs(),
            self.route_program,
            self.route_args.iter().map(|a| format!(" {a}")).collect::<String>(),
            self.target,
        )
    }
}

impl ServiceConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments (and their environment variables) take precedence over
    /// TOML config values, which take precedence over defaults. If the CLI
    /// command is not `service`, only TOML values and defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The token is missing or blank
    /// - The endpoint or store URL is invalid
    /// - A duration is zero, or the watch interval is not shorter than the
    ///   refresh interval
    /// - The route command or store key is empty
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let fallback = ServiceArgs::default();
        let args = cli.service_args().unwrap_or(&fallback);

        let token = Self::resolve_token(args, toml)?;
        let endpoint = Self::resolve_endpoint(args, toml)?;

        let lookup_timeout = positive_secs(
            "lookup_timeout",
            args.lookup_timeout
                .or_else(|| toml.and_then(|t| t.lookup.timeout)),
            defaults::LOOKUP_TIMEOUT_SECS,
        )?;
        let refresh_interval = positive_secs(
            "refresh_interval",
            args.refresh_interval
                .or_else(|| toml.and_then(|t| t.service.refresh_interval)),
            defaults::REFRESH_INTERVAL_SECS,
        )?;
        let watch_interval = positive_secs(
            "watch_interval",
            args.watch_interval
                .or_else(|| toml.and_then(|t| t.service.watch_interval)),
            defaults::WATCH_INTERVAL_SECS,
        )?;

        if watch_interval >= refresh_interval {
            return Err(ConfigError::InvalidDuration {
                field: "watch_interval",
                reason: format!(
                    "must be shorter than refresh_interval ({}s)",
                    refresh_interval.as_secs()
                ),
            });
        }

        let (route_program, route_args) = Self::resolve_route_command(toml)?;
        let target = resolve_target(cli, args.publish, &args.kv, toml)?;

        Ok(Self {
            token,
            endpoint,
            lookup_timeout,
            refresh_interval,
            watch_interval,
            route_program,
            route_args,
            target,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = load_toml(cli)?;
        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_token(args: &ServiceArgs, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        args.token
            .as_deref()
            .or_else(|| toml.and_then(|t| t.lookup.token.as_deref()))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                ConfigError::missing(
                    field::TOKEN,
                    "Use --token, set EXTIP_TOKEN, or set lookup.token in config file",
                )
            })
    }

    fn resolve_endpoint(args: &ServiceArgs, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        let url_str = args
            .endpoint
            .as_deref()
            .or_else(|| toml.and_then(|t| t.lookup.endpoint.as_deref()))
            .unwrap_or(defaults::ENDPOINT);

        let url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: url_str.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        Ok(url)
    }

    fn resolve_route_command(
        toml: Option<&TomlConfig>,
    ) -> Result<(String, Vec<String>), ConfigError> {
        let command = toml
            .and_then(|t| t.service.route_command.as_deref())
            .unwrap_or(defaults::ROUTE_COMMAND);

        let mut argv = command.split_whitespace().map(str::to_string);
        let program = argv.next().ok_or(ConfigError::EmptyValue {
            field: field::ROUTE_COMMAND,
        })?;

        Ok((program, argv.collect()))
    }
}

/// Fully validated configuration for the `client` command.
#[derive(Debug)]
pub struct ClientConfig {
    /// Where the state is read from
    pub source: PublishTarget,

    /// Handlebars output template (syntax already checked)
    pub info_format: String,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl ClientConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// The source defaults to the TOML `publish.target`, so a client shares
    /// the service's config file unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the template does not compile or the source is
    /// invalid.
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let fallback = ClientArgs::default();
        let args = cli.client_args().unwrap_or(&fallback);

        let info_format = args
            .info_format
            .clone()
            .or_else(|| toml.and_then(|t| t.client.info_format.clone()))
            .unwrap_or_else(|| defaults::INFO_FORMAT.to_string());

        validate_template(&info_format).map_err(|e| ConfigError::InvalidTemplate {
            reason: e.to_string(),
        })?;

        let source = resolve_target(cli, args.from, &args.kv, toml)?;

        Ok(Self {
            source,
            info_format,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or the
    /// merged configuration is invalid.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = load_toml(cli)?;
        Self::from_raw(cli, toml.as_ref())
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Expands a leading `~` to the home directory.
///
/// Paths without a leading `~`, or when no home directory is known, are
/// returned unchanged.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    dirs::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(rest))
}

// Helper functions

fn load_toml(cli: &Cli) -> Result<Option<TomlConfig>, ConfigError> {
    cli.config
        .as_deref()
        .map(|path| TomlConfig::load(&expand_tilde(path)))
        .transpose()
}

fn positive_secs(
    field: &'static str,
    explicit: Option<u64>,
    default: u64,
) -> Result<Duration, ConfigError> {
    let seconds = explicit.unwrap_or(default);

    if seconds == 0 {
        return Err(ConfigError::InvalidDuration {
            field,
            reason: "must be greater than 0".to_string(),
        });
    }

    Ok(Duration::from_secs(seconds))
}

fn resolve_target(
    cli: &Cli,
    explicit: Option<TargetArg>,
    kv: &KvArgs,
    toml: Option<&TomlConfig>,
) -> Result<PublishTarget, ConfigError> {
    let kind = match explicit {
        Some(kind) => kind,
        None => match toml.and_then(|t| t.publish.target.as_deref()) {
            Some(value) => parse_target(value)?,
            None => TargetArg::Socket,
        },
    };

    match kind {
        TargetArg::Socket => Ok(PublishTarget::Socket {
            path: resolve_socket_path(cli, toml)?,
        }),
        TargetArg::Kv => Ok(PublishTarget::Kv {
            url: resolve_kv_url(kv, toml)?,
            key: resolve_kv_key(kv, toml)?,
        }),
    }
}

fn parse_target(value: &str) -> Result<TargetArg, ConfigError> {
    match value.to_lowercase().as_str() {
        "socket" | "unix" => Ok(TargetArg::Socket),
        "kv" | "redis" => Ok(TargetArg::Kv),
        _ => Err(ConfigError::InvalidTarget {
            value: value.to_string(),
        }),
    }
}

fn resolve_socket_path(cli: &Cli, toml: Option<&TomlConfig>) -> Result<PathBuf, ConfigError> {
    let path = cli.socket_path.clone().unwrap_or_else(|| {
        PathBuf::from(
            toml.and_then(|t| t.server.socket_path.as_deref())
                .unwrap_or(defaults::SOCKET_PATH),
        )
    });

    if path.as_os_str().is_empty() {
        return Err(ConfigError::EmptyValue {
            field: field::SOCKET_PATH,
        });
    }

    Ok(expand_tilde(&path))
}

fn resolve_kv_url(kv: &KvArgs, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
    let url_str = kv
        .kv_url
        .as_deref()
        .or_else(|| toml.and_then(|t| t.kv.url.as_deref()))
        .unwrap_or(defaults::KV_URL);

    let url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
        url: url_str.to_string(),
        reason: e.to_string(),
    })?;

    if !KV_SCHEMES.contains(&url.scheme()) {
        return Err(ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(url_str.to_string())
}

fn resolve_kv_key(kv: &KvArgs, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
    let key = kv
        .kv_key
        .as_deref()
        .or_else(|| toml.and_then(|t| t.kv.key.as_deref()))
        .unwrap_or(defaults::KV_KEY)
        .trim();

    if key.is_empty() {
        return Err(ConfigError::EmptyValue {
            field: field::KV_KEY,
        });
    }

    Ok(key.to_string())
}

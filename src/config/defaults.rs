//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default rendezvous path of the Unix socket.
pub const SOCKET_PATH: &str = "/tmp/extip.sock";

/// Default lookup endpoint (ipinfo.io lite API).
pub const ENDPOINT: &str = "https://api.ipinfo.io/lite/me";

/// Default lookup timeout in seconds.
pub const LOOKUP_TIMEOUT_SECS: u64 = 5;

/// Default refresh interval in seconds.
pub const REFRESH_INTERVAL_SECS: u64 = 60;

/// Default route watch interval in seconds.
pub const WATCH_INTERVAL_SECS: u64 = 3;

/// Default route table dump command.
pub const ROUTE_COMMAND: &str = "ip route show";

/// Default key/value store URL.
pub const KV_URL: &str = "redis://127.0.0.1/";

/// Default key the state is stored under.
pub const KV_KEY: &str = "external_ip_info";

/// Default client output template.
pub const INFO_FORMAT: &str = "{{status}} {{info.ip}}";

/// Default lookup timeout as Duration.
#[must_use]
pub const fn lookup_timeout() -> Duration {
    Duration::from_secs(LOOKUP_TIMEOUT_SECS)
}

/// Default refresh interval as Duration.
#[must_use]
pub const fn refresh_interval() -> Duration {
    Duration::from_secs(REFRESH_INTERVAL_SECS)
}

/// Default route watch interval as Duration.
#[must_use]
pub const fn watch_interval() -> Duration {
    Duration::from_secs(WATCH_INTERVAL_SECS)
}

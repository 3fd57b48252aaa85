//! The external network identity record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// External IP address and its network metadata.
///
/// Produced only by a successful lookup. Every field is required when
/// decoding: a response missing any of them is a malformed response, not a
/// partial record. Extra fields sent by the endpoint are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpInfo {
    /// Textual IPv4/IPv6 address
    pub ip: String,
    /// Autonomous system number, e.g. `AS12345`
    pub asn: String,
    /// Autonomous system name
    pub as_name: String,
    /// Autonomous system domain
    pub as_domain: String,
    /// ISO country code
    pub country_code: String,
    /// Country name
    pub country: String,
    /// Continent code
    pub continent_code: String,
    /// Continent name
    pub continent: String,
}

impl fmt::Display for IpInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {}, {})", self.ip, self.asn, self.as_domain, self.country_code)
    }
}

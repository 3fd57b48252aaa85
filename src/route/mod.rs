//! Route table fingerprinting and change detection.
//!
//! This module provides:
//! - A digest of the host's route table ([`RouteFingerprint`])
//! - The probe abstraction that reads the table ([`RouteProbe`])
//! - A command-backed probe (`ip route show`, [`CommandProbe`])
//! - A stream yielding each newly observed fingerprint ([`RouteWatcher`], [`RouteChangeStream`])

mod probe;
mod watcher;


use std::fmt;
use std::future::Future;

use sha2::{Digest, Sha256};
use thiserror::Error;

pub use probe::CommandProbe;
pub use watcher::{RouteChangeStream, RouteWatcher};

/// SHA-256 digest of a textual route table dump.
///
/// Only equality is meaningful: two fingerprints are equal exactly when
/// the dumps they were computed from are (barring hash collisions).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteFingerprint([u8; 32]);

impl RouteFingerprint {
    /// Computes the fingerprint of a route table dump.
    #[must_use]
    pub fn of(dump: &[u8]) -> Self {
        Self(Sha256::digest(dump).into())
    }

    /// Returns the raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the first 12 hex digits, for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..6])
    }
}

impl fmt::Display for RouteFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for RouteFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteFingerprint({})", self.short())
    }
}

/// Error type for route table probes.
///
/// A failed probe never counts as a route change; the watcher skips the
/// cycle.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The probe command could not be started.
    #[error("Failed to run '{command}': {source}")]
    Spawn {
        /// Command line that was attempted
        command: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The probe command ran but reported failure.
    #[error("'{command}' exited with {status}: {stderr}")]
    CommandFailed {
        /// Command line that was run
        command: String,
        /// Exit status description
        status: String,
        /// Captured standard error (trimmed)
        stderr: String,
    },
}

/// Reads the host's current route table.
///
/// Probes are asynchronous: a slow route command suspends the watcher
/// instead of occupying a runtime worker, and dropping the probe future
/// abandons the call.
///
/// # Example
///
/// ```
/// use extip::route::{ProbeError, RouteFingerprint, RouteProbe};
///
/// struct Fixed(&'static str);
///
/// impl RouteProbe for Fixed {
///     async fn dump(&self) -> Result<Vec<u8>, ProbeError> {
///         Ok(self.0.as_bytes().to_vec())
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let fp = Fixed("default via 192.0.2.1 dev eth0").compute().await.unwrap();
/// assert_eq!(fp, RouteFingerprint::of(b"default via 192.0.2.1 dev eth0"));
/// # }
/// ```
pub trait RouteProbe: Send + Sync {
    /// Returns the raw textual dump of the route table.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] if the table cannot be read.
    fn dump(&self) -> impl Future<Output = Result<Vec<u8>, ProbeError>> + Send;

    /// Reads the route table and fingerprints it.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] if the table cannot be read.
    fn compute(&self) -> impl Future<Output = Result<RouteFingerprint, ProbeError>> + Send {
        async { self.dump().await.map(|dump| RouteFingerprint::of(&dump)) }
    }
}

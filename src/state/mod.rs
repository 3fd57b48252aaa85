//! The service's single source of truth.
//!
//! [`ServiceState`] pairs the current [`Status`] with the last known
//! [`IpInfo`]. One [`StateHandle`] exists per running service; writers go
//! through its transition methods and readers take whole snapshots, so a
//! reader never observes a status from one update next to info from another.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::lookup::IpInfo;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

/// Freshness of the cached [`IpInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// A refresh is in flight, or none has ever completed.
    Updating,
    /// The last refresh succeeded; `info` is authoritative.
    Ready,
    /// The last refresh failed; `info`, if any, is stale.
    Error,
}

impl Status {
    /// Returns the wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Updating => "updating",
            Self::Ready => "ready",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status plus last known info.
///
/// `info` is `None` only until the first successful refresh; afterwards it
/// is kept through later failures (stale-but-present).
///
/// Encodes as `{"status": "ready", "info": {...}}`, with `"info": null`
/// while nothing has ever been fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceState {
    /// Current status
    pub status: Status,
    /// Last known info
    pub info: Option<IpInfo>,
}

impl Default for ServiceState {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceState {
    /// Creates the startup state: updating, no info.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: Status::Updating,
            info: None,
        }
    }

    /// Marks the start of a refresh. Info is retained.
    pub const fn begin_update(&mut self) {
        self.status = Status::Updating;
    }

    /// Records a successful refresh.
    pub fn complete(&mut self, info: IpInfo) {
        self.info = Some(info);
        self.status = Status::Ready;
    }

    /// Records a failed refresh. Info is retained.
    pub const fn fail(&mut self) {
        self.status = Status::Error;
    }

    /// Encodes the state as its JSON wire message.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (not expected for this type).
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decodes a JSON wire message.
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` is not a valid state message.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Shared holder for the service's [`ServiceState`].
///
/// Backed by a [`watch`] channel: each transition replaces the whole value
/// under the channel's lock, readers clone a complete snapshot, and
/// publishers can await changes. No lock is ever held across an `.await`.
///
/// Cloning the handle shares the same state.
#[derive(Debug, Clone)]
pub struct StateHandle {
    tx: Arc<watch::Sender<ServiceState>>,
}

impl Default for StateHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl StateHandle {
    /// Creates a handle holding the startup state.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ServiceState::new());
        Self { tx: Arc::new(tx) }
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> ServiceState {
        self.tx.borrow().clone()
    }

    /// Returns a receiver notified on every transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ServiceState> {
        self.tx.subscribe()
    }

    /// Applies [`ServiceState::begin_update`].
    pub fn begin_update(&self) {
        self.tx.send_modify(ServiceState::begin_update);
    }

    /// Applies [`ServiceState::complete`].
    pub fn complete(&self, info: IpInfo) {
        self.tx.send_modify(|state| state.complete(info));
    }

    /// Applies [`ServiceState::fail`].
    pub fn fail(&self) {
        self.tx.send_modify(ServiceState::fail);
    }
}

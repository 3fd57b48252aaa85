//! Shared fakes for service tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::lookup::{IpInfo, IpLookup, LookupError};
use crate::route::{ProbeError, RouteProbe};
use crate::state::StateHandle;
use crate::transport::{StatePublisher, TransportError};

/// Builds a complete record for `ip`.
pub fn info(ip: &str) -> IpInfo {
    IpInfo {
        ip: ip.to_string(),
        asn: "AS64500".to_string(),
        as_name: "Example Transit".to_string(),
        as_domain: "example.net".to_string(),
        country_code: "NL".to_string(),
        country: "Netherlands".to_string(),
        continent_code: "EU".to_string(),
        continent: "Europe".to_string(),
    }
}

/// Lookup answering from a script, then from a fallback.
///
/// The fallback is a success with `fallback` as address, or a timeout when
/// no fallback is set.
#[derive(Debug)]
pub struct ScriptedLookup {
    results: Mutex<VecDeque<Result<IpInfo, LookupError>>>,
    fallback: Option<String>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedLookup {
    pub fn new(results: Vec<Result<IpInfo, LookupError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            fallback: None,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Always succeeds with `ip`.
    pub fn always(ip: &str) -> Self {
        Self::new(Vec::new()).with_fallback(ip)
    }

    /// Always times out.
    pub fn failing() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_fallback(mut self, ip: &str) -> Self {
        self.fallback = Some(ip.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Counter shared with the lookup, readable after it is moved.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl IpLookup for ScriptedLookup {
    async fn fetch(&self) -> Result<IpInfo, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.results.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.as_deref().map(info).ok_or(LookupError::Timeout))
    }
}

/// Probe returning scripted route tables, then repeating the last one.
#[derive(Debug)]
pub struct ScriptedProbe {
    tables: Mutex<VecDeque<&'static str>>,
    last: Mutex<&'static str>,
}

impl ScriptedProbe {
    pub fn new(tables: &[&'static str]) -> Self {
        Self {
            tables: Mutex::new(tables.iter().copied().collect()),
            last: Mutex::new(""),
        }
    }

    /// A route table that never changes.
    pub fn fixed() -> Self {
        Self::new(&["default via 192.0.2.1 dev eth0\n"])
    }
}

impl RouteProbe for ScriptedProbe {
    async fn dump(&self) -> Result<Vec<u8>, ProbeError> {
        let mut last = self.last.lock().unwrap();
        if let Some(table) = self.tables.lock().unwrap().pop_front() {
            *last = table;
        }
        Ok(last.as_bytes().to_vec())
    }
}

/// Publisher behaviour for orchestrator tests.
#[derive(Debug, Clone, Copy)]
pub enum FakePublisher {
    /// Serves until cancelled.
    Idle,
    /// Fails as soon as it starts.
    Failing,
    /// Returns `Ok` as soon as it starts.
    Returning,
}

impl StatePublisher for FakePublisher {
    async fn serve(self, _state: StateHandle) -> Result<(), TransportError> {
        match self {
            Self::Idle => std::future::pending().await,
            Self::Failing => Err(TransportError::Io(std::io::Error::other("listener closed"))),
            Self::Returning => Ok(()),
        }
    }
}

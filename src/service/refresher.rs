//! The single-flight `update` operation.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::lookup::{IpLookup, LookupError};
use crate::state::StateHandle;

/// What a call to [`Refresher::update`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The lookup succeeded and the state is now ready.
    Refreshed,
    /// The lookup failed and the state is now in error.
    Failed,
    /// Another update was already in flight; nothing was done.
    Coalesced,
}

/// Runs lookups and writes their outcome into the shared state.
///
/// At most one update runs at a time. A call made while another is in
/// flight returns [`UpdateOutcome::Coalesced`] immediately without touching
/// the state, so a slow lookup can never be overwritten by, or overwrite,
/// a concurrent one.
#[derive(Debug)]
pub struct Refresher<L> {
    lookup: L,
    state: StateHandle,
    in_flight: AtomicBool,
}

impl<L> Refresher<L> {
    /// Creates a refresher writing into `state`.
    #[must_use]
    pub const fn new(lookup: L, state: StateHandle) -> Self {
        Self {
            lookup,
            state,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Returns the state this refresher writes to.
    #[must_use]
    pub const fn state(&self) -> &StateHandle {
        &self.state
    }

    /// Returns `true` while an update is running.
    #[must_use]
    pub fn is_updating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl<L: IpLookup> Refresher<L> {
    /// Performs one refresh: marks the state updating, runs the lookup,
    /// then records ready (with the new info) or error (keeping the old).
    pub async fn update(&self) -> UpdateOutcome {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            tracing::debug!("Update already in flight, skipping");
            return UpdateOutcome::Coalesced;
        };

        tracing::debug!("Updating ip...");
        self.state.begin_update();

        match self.lookup.fetch().await {
            Ok(info) => {
                tracing::info!("IP fetched: {} {}", info.ip, info.as_domain);
                self.state.complete(info);
                UpdateOutcome::Refreshed
            }
            Err(e) => {
                log_failure(&e);
                self.state.fail();
                UpdateOutcome::Failed
            }
        }
    }
}

fn log_failure(error: &LookupError) {
    match error {
        LookupError::Timeout => tracing::warn!("IP lookup timed out"),
        LookupError::Status { .. } | LookupError::Malformed { .. } => {
            tracing::error!("IP lookup protocol error: {error}");
        }
        LookupError::Connection(_) => tracing::error!("IP lookup failed: {error}"),
    }
}

/// Holds the in-flight flag; clears it on drop, including cancellation.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

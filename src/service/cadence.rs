//! The two activities that trigger updates.

use std::time::Duration;

use tokio_stream::{Stream, StreamExt};

use super::Refresher;
use crate::lookup::IpLookup;
use crate::route::RouteFingerprint;
use crate::time::Sleeper;

/// Refreshes immediately, then once per `interval`, forever.
///
/// The interval is measured from the end of one update to the start of the
/// next, whatever the outcome. Failures only show up in the state's status.
pub async fn run_refresh_loop<L, S>(refresher: &Refresher<L>, interval: Duration, sleeper: &S)
where
    L: IpLookup,
    S: Sleeper,
{
    loop {
        refresher.update().await;
        sleeper.sleep(interval).await;
    }
}

/// Triggers one out-of-cadence update per route change.
///
/// Returns only if `changes` ends, which a
/// [`RouteChangeStream`](crate::route::RouteChangeStream) never does.
pub async fn run_route_watch<St, L>(mut changes: St, refresher: &Refresher<L>)
where
    St: Stream<Item = RouteFingerprint> + Unpin,
    L: IpLookup,
{
    while let Some(fingerprint) = changes.next().await {
        tracing::info!(
            "Route table changed ({}), updating IP info",
            fingerprint.short()
        );
        refresher.update().await;
    }
}

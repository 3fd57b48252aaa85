//! Runs the refresh loop, the route watcher and the publisher as one unit.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use super::{Refresher, ServiceError, run_refresh_loop, run_route_watch};
use crate::lookup::IpLookup;
use crate::route::{RouteProbe, RouteWatcher};
use crate::state::StateHandle;
use crate::time::{Sleeper, TokioSleeper};
use crate::transport::StatePublisher;

/// The running service.
///
/// Owns the three long-running activities:
/// 1. the refresh loop (fixed cadence updates),
/// 2. the route watcher (updates on route changes),
/// 3. the publisher (socket server or key/value writer).
///
/// Each runs in its own task. The service is all-or-nothing: when the
/// shutdown future completes, or any activity ends, the others are aborted
/// and awaited before [`Service::run`] returns. Aborting the publisher drops
/// its resources, which for the socket server unlinks the rendezvous path.
///
/// # Type Parameters
///
/// * `L` - The [`IpLookup`] used for updates
/// * `P` - The [`RouteProbe`] used by the watcher
/// * `T` - The [`StatePublisher`] exposing the state
/// * `S` - The [`Sleeper`] for the refresh cadence (defaults to [`TokioSleeper`])
pub struct Service<L, P, T, S = TokioSleeper> {
    refresher: Arc<Refresher<L>>,
    watcher: RouteWatcher<P>,
    publisher: T,
    refresh_interval: Duration,
    sleeper: S,
}

impl<L, P, T> Service<L, P, T, TokioSleeper> {
    /// Creates a service refreshing every `refresh_interval`.
    #[must_use]
    pub fn new(
        refresher: Refresher<L>,
        watcher: RouteWatcher<P>,
        publisher: T,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            refresher: Arc::new(refresher),
            watcher,
            publisher,
            refresh_interval,
            sleeper: TokioSleeper,
        }
    }
}

impl<L, P, T, S> Service<L, P, T, S> {
    /// Sets a custom sleeper for the refresh cadence.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> Service<L, P, T, S2> {
        Service {
            refresher: self.refresher,
            watcher: self.watcher,
            publisher: self.publisher,
            refresh_interval: self.refresh_interval,
            sleeper,
        }
    }

    /// Returns the shared state the service maintains.
    #[must_use]
    pub fn state(&self) -> &StateHandle {
        self.refresher.state()
    }

    /// Returns the configured refresh interval.
    #[must_use]
    pub const fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }
}

impl<L, P, T, S> Service<L, P, T, S>
where
    L: IpLookup + 'static,
    P: RouteProbe + 'static,
    T: StatePublisher,
    S: Sleeper + 'static,
{
    /// Runs until `shutdown` completes or an activity stops.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the publisher fails or any activity
    /// returns or panics. A completed `shutdown` future yields `Ok(())`.
    pub async fn run<F>(self, shutdown: F) -> Result<(), ServiceError>
    where
        F: Future<Output = ()>,
    {
        let Self {
            refresher,
            watcher,
            publisher,
            refresh_interval,
            sleeper,
        } = self;

        let state = refresher.state().clone();
        let mut tasks = JoinSet::new();

        let cadence = Arc::clone(&refresher);
        tasks.spawn(async move {
            run_refresh_loop(&cadence, refresh_interval, &sleeper).await;
            ServiceError::ActivityStopped("refresh loop")
        });

        let changes = watcher.into_stream();
        tasks.spawn(async move {
            run_route_watch(changes, &refresher).await;
            ServiceError::ActivityStopped("route watcher")
        });

        tasks.spawn(async move {
            match publisher.serve(state).await {
                Ok(()) => ServiceError::ActivityStopped("publisher"),
                Err(e) => ServiceError::Transport(e),
            }
        });

        tokio::pin!(shutdown);

        let result = tokio::select! {
            biased;

            () = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping...");
                Ok(())
            }

            joined = tasks.join_next() => {
                let error = match joined {
                    Some(Ok(error)) => error,
                    Some(Err(e)) => ServiceError::TaskFailed(e.to_string()),
                    None => ServiceError::ActivityStopped("service"),
                };
                tracing::error!("{error}, stopping remaining activities");
                Err(error)
            }
        };

        tasks.shutdown().await;
        result
    }
}

//! Periodic route table watcher.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};
use std::time::Duration;

use tokio::time::{Interval, MissedTickBehavior, interval};
use tokio_stream::Stream;

use super::{ProbeError, RouteFingerprint, RouteProbe};

type ProbeFuture = Pin<Box<dyn Future<Output = Result<RouteFingerprint, ProbeError>> + Send>>;

/// Polls a [`RouteProbe`] on a fixed interval.
///
/// # Example
///
/// ```ignore
/// use extip::route::{CommandProbe, RouteWatcher};
/// use std::time::Duration;
/// use tokio_stream::StreamExt;
///
/// let mut changes = RouteWatcher::new(CommandProbe::default(), Duration::from_secs(3)).into_stream();
/// while let Some(fingerprint) = changes.next().await {
///     println!("routes changed: {fingerprint}");
/// }
/// ```
#[derive(Debug)]
pub struct RouteWatcher<P> {
    probe: P,
    interval: Duration,
}

impl<P: RouteProbe> RouteWatcher<P> {
    /// Creates a watcher probing every `interval`.
    #[must_use]
    pub const fn new(probe: P, interval: Duration) -> Self {
        Self { probe, interval }
    }

    /// Returns the configured probe interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Converts this watcher into a stream of route changes.
    ///
    /// The first successful probe only records the baseline. After that,
    /// the stream yields each fingerprint that differs from the previously
    /// recorded one, exactly once. Probe failures are logged and skipped.
    /// The stream never terminates on its own.
    #[must_use]
    pub fn into_stream(self) -> RouteChangeStream<P> {
        RouteChangeStream::new(self.probe, self.interval)
    }
}

/// Stream of route table changes produced by [`RouteWatcher`].
///
/// At most one probe is in flight. Ticks missed while a slow probe runs
/// are delayed, not bunched up.
pub struct RouteChangeStream<P> {
    probe: Arc<P>,
    interval: Interval,
    /// Probe started on the last tick and not yet finished
    pending: Option<ProbeFuture>,
    /// Last seen fingerprint; `None` until the first successful probe
    last: Option<RouteFingerprint>,
}

impl<P: RouteProbe> RouteChangeStream<P> {
    fn new(probe: P, period: Duration) -> Self {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            probe: Arc::new(probe),
            interval,
            pending: None,
            last: None,
        }
    }

    /// Returns the last recorded fingerprint, if any.
    #[must_use]
    pub const fn last(&self) -> Option<&RouteFingerprint> {
        self.last.as_ref()
    }

    /// Records a probe result, returning the fingerprint if it is a change.
    fn observe(&mut self, result: Result<RouteFingerprint, ProbeError>) -> Option<RouteFingerprint> {
        let current = match result {
            Ok(fingerprint) => fingerprint,
            Err(e) => {
                tracing::warn!("Route probe failed, skipping cycle: {e}");
                return None;
            }
        };

        match self.last.replace(current) {
            None => {
                tracing::debug!("Route baseline recorded: {}", current.short());
                None
            }
            Some(previous) if previous == current => None,
            Some(_) => Some(current),
        }
    }
}

impl<P> Stream for RouteChangeStream<P>
where
    P: RouteProbe + 'static,
{
    type Item = RouteFingerprint;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        loop {
            if this.pending.is_none() {
                // Registers the waker for the next tick when pending
                if this.interval.poll_tick(cx).is_pending() {
                    return Poll::Pending;
                }
                let probe = Arc::clone(&this.probe);
                this.pending = Some(Box::pin(async move { probe.compute().await }));
            }

            let Some(probe) = this.pending.as_mut() else {
                continue;
            };
            let result = ready!(probe.as_mut().poll(cx));
            this.pending = None;

            if let Some(changed) = this.observe(result) {
                return Poll::Ready(Some(changed));
            }
        }
    }
}

//! Delay abstraction for testability.
//!
//! This module provides a [`Sleeper`] trait so cadence loops can be driven
//! by the real tokio timer in production and by instant or counting
//! sleepers in tests.

use std::future::Future;
use std::time::Duration;

/// Abstraction over "wait for this long".
///
/// # Example
///
/// ```
/// use extip::time::{Sleeper, TokioSleeper};
/// use std::time::Duration;
///
/// # async fn example() {
/// TokioSleeper.sleep(Duration::from_millis(1)).await;
/// # }
/// ```
pub trait Sleeper: Send + Sync {
    /// Suspends the caller for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Production sleeper backed by [`tokio::time::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that only yields to the scheduler.
///
/// Lets tests run many loop iterations without waiting.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {
        tokio::task::yield_now().await;
    }
}

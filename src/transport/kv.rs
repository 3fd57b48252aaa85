//! Key/value store transport.
//!
//! The publisher writes the JSON state under a fixed key after every
//! change; readers fetch the latest value with a plain `GET`. Store calls
//! are blocking and run on tokio's blocking pool.

use std::sync::Arc;
use std::time::Duration;

use super::{KvError, StatePublisher, StateReader, TransportError};
use crate::state::{ServiceState, StateHandle};

/// Minimal synchronous key/value interface.
pub trait KvStore: Send + Sync + 'static {
    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`KvError`] if the store rejects the write or is unreachable.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KvError>;

    /// Returns the value under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`KvError`] if the store is unreachable.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError>;
}

/// Redis-backed [`KvStore`].
///
/// Opens a fresh connection per call, bounded by the configured timeout
/// for connect, read and write.
#[derive(Debug, Clone)]
pub struct RedisStore {
    client: redis::Client,
    timeout: Duration,
}

impl RedisStore {
    /// Default connect/read/write timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

    /// Creates a store for a `redis://` URL. Does not connect yet.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Redis`] if the URL is not a valid Redis URL.
    pub fn open(url: &str) -> Result<Self, KvError> {
        Ok(Self {
            client: redis::Client::open(url)?,
            timeout: Self::DEFAULT_TIMEOUT,
        })
    }

    /// Sets the per-call timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn connection(&self) -> Result<redis::Connection, KvError> {
        let con = self.client.get_connection_with_timeout(self.timeout)?;
        con.set_read_timeout(Some(self.timeout))?;
        con.set_write_timeout(Some(self.timeout))?;
        Ok(con)
    }
}

impl KvStore for RedisStore {
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KvError> {
        let mut con = self.connection()?;
        redis::cmd("SET").arg(key).arg(value).query::<()>(&mut con)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        let mut con = self.connection()?;
        Ok(redis::cmd("GET").arg(key).query(&mut con)?)
    }
}

/// Publishes the state into a [`KvStore`] on every change.
///
/// Store failures are logged and retried on the next change; they never
/// stop the service.
#[derive(Debug)]
pub struct KvPublisher<S> {
    store: Arc<S>,
    key: String,
}

impl<S: KvStore> KvPublisher<S> {
    /// Creates a publisher writing under `key`.
    #[must_use]
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self::shared(Arc::new(store), key)
    }

    /// Creates a publisher over a store shared with other users.
    #[must_use]
    pub fn shared(store: Arc<S>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Returns the key the state is written under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Writes one state message.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if encoding or the store write fails.
    pub async fn publish(&self, state: &ServiceState) -> Result<(), TransportError> {
        let message = state.to_json()?;
        let store = Arc::clone(&self.store);
        let key = self.key.clone();

        tokio::task::spawn_blocking(move || store.set(&key, &message))
            .await
            .map_err(|e| TransportError::Join(e.to_string()))??;
        Ok(())
    }
}

impl<S: KvStore> StatePublisher for KvPublisher<S> {
    async fn serve(self, state: StateHandle) -> Result<(), TransportError> {
        tracing::info!("Publishing state under key '{}'", self.key);
        let mut updates = state.subscribe();

        loop {
            let snapshot = updates.borrow_and_update().clone();
            match self.publish(&snapshot).await {
                Ok(()) => tracing::debug!("Published state: {}", snapshot.status),
                Err(e) => tracing::warn!("Failed to publish state: {e}"),
            }

            if updates.changed().await.is_err() {
                return Ok(());
            }
        }
    }
}

/// Reads the state from a [`KvStore`].
#[derive(Debug)]
pub struct KvReader<S> {
    store: Arc<S>,
    key: String,
}

impl<S: KvStore> KvReader<S> {
    /// Creates a reader for `key`.
    #[must_use]
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self::shared(Arc::new(store), key)
    }

    /// Creates a reader over a store shared with other users.
    #[must_use]
    pub fn shared(store: Arc<S>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

impl<S: KvStore> StateReader for KvReader<S> {
    async fn read(&self) -> Result<ServiceState, TransportError> {
        let store = Arc::clone(&self.store);
        let key = self.key.clone();

        let value = tokio::task::spawn_blocking(move || store.get(&key))
            .await
            .map_err(|e| TransportError::Join(e.to_string()))??;

        let Some(message) = value else {
            return Err(TransportError::NotPublished {
                key: self.key.clone(),
            });
        };

        Ok(ServiceState::from_json(&message)?)
    }
}

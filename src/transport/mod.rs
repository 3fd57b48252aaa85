//! Transports that expose the service state to local clients.
//!
//! Two interchangeable implementations, selected at startup:
//! - Unix socket: [`SocketServer`] answers each connection with the current
//!   state, [`SocketReader`] is the client side.
//! - Key/value store: [`KvPublisher`] writes the state under a key after
//!   every change, [`KvReader`] reads it back. [`RedisStore`] is the
//!   production [`KvStore`].
//!
//! Both encode the state as the same JSON message
//! (see [`ServiceState::to_json`]).

mod error;
mod kv;
mod socket;

#[cfg(test)]
mod kv_tests;

use std::future::Future;

pub use error::{KvError, TransportError};
pub use kv::{KvPublisher, KvReader, KvStore, RedisStore};
pub use socket::{SocketReader, SocketServer};

use crate::state::{ServiceState, StateHandle};

/// Publishing side of a transport.
///
/// [`serve`](Self::serve) runs for the lifetime of the service; returning
/// at all (even `Ok`) stops the service.
pub trait StatePublisher: Send + 'static {
    /// Exposes `state` until cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on an unrecoverable transport failure.
    fn serve(self, state: StateHandle)
    -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Reading side of a transport, used by clients.
pub trait StateReader: Send + Sync {
    /// Reads the most recently published state.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the service cannot be reached or the
    /// message cannot be decoded.
    fn read(&self) -> impl Future<Output = Result<ServiceState, TransportError>> + Send;
}

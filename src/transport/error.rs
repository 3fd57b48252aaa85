//! Error types for state transports.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for key/value store operations.
#[derive(Debug, Error)]
pub enum KvError {
    /// The Redis client reported an error.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Any other backend failure.
    #[error("Store error: {0}")]
    Backend(String),
}

/// Error type for transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The rendezvous path could not be bound.
    #[error("Failed to bind socket '{}': {source}", path.display())]
    Bind {
        /// Rendezvous path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The rendezvous path is taken by something that is not a stale socket.
    #[error("Socket path '{}' is in use: {reason}", path.display())]
    PathInUse {
        /// Rendezvous path
        path: PathBuf,
        /// What occupies it
        reason: &'static str,
    },

    /// The client could not connect to the rendezvous path.
    #[error("Failed to connect to '{}': {source}", path.display())]
    Connect {
        /// Rendezvous path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Reading or writing a message failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A state message could not be encoded or decoded.
    #[error("Invalid state message: {0}")]
    Codec(#[from] serde_json::Error),

    /// The key/value store failed.
    #[error("Key/value store error: {0}")]
    Kv(#[from] KvError),

    /// Nothing has been published under the key yet.
    #[error("No state published under key '{key}'")]
    NotPublished {
        /// The key that was read
        key: String,
    },

    /// A blocking store call could not be joined.
    #[error("Blocking task failed: {0}")]
    Join(String),
}

//! Unix socket transport.
//!
//! Protocol: the client connects, the server writes one JSON state message
//! and closes the connection. There is no request body.

use std::io::ErrorKind;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};

use super::{StatePublisher, StateReader, TransportError};
use crate::state::{ServiceState, StateHandle};

/// Pause after a failed accept (e.g. descriptor exhaustion).
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Listening side of the socket transport.
///
/// Owns the rendezvous path: the socket file is removed when the server
/// is dropped.
#[derive(Debug)]
pub struct SocketServer {
    path: PathBuf,
    listener: UnixListener,
}

impl SocketServer {
    /// Binds the rendezvous path.
    ///
    /// A leftover socket file with nobody listening on it is removed first.
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::PathInUse`] if the path holds a live socket
    /// or a non-socket file, and [`TransportError::Bind`] if binding fails.
    pub fn bind(path: impl Into<PathBuf>) -> Result<Self, TransportError> {
        let path = path.into();
        clear_stale_socket(&path)?;

        let listener = UnixListener::bind(&path).map_err(|source| TransportError::Bind {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("Socket bound at {}", path.display());
        Ok(Self { path, listener })
    }

    /// Returns the rendezvous path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatePublisher for SocketServer {
    async fn serve(self, state: StateHandle) -> Result<(), TransportError> {
        tracing::info!("Server started on {}", self.path.display());

        loop {
            match self.listener.accept().await {
                Ok((stream, _addr)) => {
                    tracing::debug!("Client connected");
                    let snapshot = state.snapshot();
                    tokio::spawn(async move {
                        if let Err(e) = respond(stream, &snapshot).await {
                            tracing::warn!("Failed to answer client: {e}");
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!("Accept on {} failed: {e}", self.path.display());
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            }
        }
    }
}

impl Drop for SocketServer {
    fn drop(&mut self) {
        if self.path.exists() {
            tracing::debug!("Removing socket file {}", self.path.display());
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

async fn respond(mut stream: UnixStream, state: &ServiceState) -> Result<(), TransportError> {
    let message = state.to_json()?;
    stream.write_all(&message).await?;
    stream.shutdown().await?;
    Ok(())
}

fn clear_stale_socket(path: &Path) -> Result<(), TransportError> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(TransportError::Bind {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if !metadata.file_type().is_socket() {
        return Err(TransportError::PathInUse {
            path: path.to_path_buf(),
            reason: "not a socket",
        });
    }

    if std::os::unix::net::UnixStream::connect(path).is_ok() {
        return Err(TransportError::PathInUse {
            path: path.to_path_buf(),
            reason: "another server is listening",
        });
    }

    tracing::info!("Removing stale socket {}", path.display());
    std::fs::remove_file(path).map_err(|source| TransportError::Bind {
        path: path.to_path_buf(),
        source,
    })
}

/// Client side of the socket transport.
#[derive(Debug, Clone)]
pub struct SocketReader {
    path: PathBuf,
}

impl SocketReader {
    /// Creates a reader for the given rendezvous path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the rendezvous path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateReader for SocketReader {
    async fn read(&self) -> Result<ServiceState, TransportError> {
        let mut stream =
            UnixStream::connect(&self.path)
                .await
                .map_err(|source| TransportError::Connect {
                    path: self.path.clone(),
                    source,
                })?;

        let mut message = Vec::new();
        stream.read_to_end(&mut message).await?;

        Ok(ServiceState::from_json(&message)?)
    }
}

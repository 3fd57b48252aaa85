//! Application execution logic.
//!
//! This module wires the validated configuration into the service (lookup,
//! refresher, route watcher, publisher) and the one-shot client read.

use std::time::Duration;

use thiserror::Error;
use tokio::signal;

use extip::config::{ClientConfig, PublishTarget, ServiceConfig};
use extip::lookup::{IpInfoClient, ReqwestClient};
use extip::render::{RenderError, Renderer};
use extip::route::{CommandProbe, RouteWatcher};
use extip::service::{Refresher, Service, ServiceError};
use extip::state::{ServiceState, StateHandle};
use extip::transport::{
    KvError, KvPublisher, KvReader, RedisStore, SocketReader, SocketServer, StatePublisher,
    StateReader, TransportError,
};

/// Production lookup type.
type AppLookup = IpInfoClient<ReqwestClient>;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The key/value store could not be set up.
    #[error("Failed to open key/value store: {0}")]
    KvOpen(#[source] KvError),

    /// Binding the socket or reading the state failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service stopped without a shutdown signal.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The client template failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Executes the service until shutdown.
///
/// This function:
/// 1. Creates the ipinfo lookup and the refresher over a fresh state
/// 2. Creates the route watcher from the configured command
/// 3. Binds the configured publisher (socket or key/value store)
/// 4. Runs everything until shutdown signal (Ctrl+C / SIGTERM)
///
/// # Errors
///
/// Returns an error if:
/// - The socket path cannot be bound or the store URL is unusable
/// - Any activity stops before the shutdown signal
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires a real
/// async runtime with signal handling.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ServiceConfig) -> Result<(), RunError> {
    let lookup = IpInfoClient::new(
        ReqwestClient::new(),
        config.endpoint.clone(),
        config.token.clone(),
        config.lookup_timeout,
    );
    let refresher = Refresher::new(lookup, StateHandle::new());
    let watcher = RouteWatcher::new(build_probe(&config), config.watch_interval);

    match &config.target {
        PublishTarget::Socket { path } => {
            let server = SocketServer::bind(path)?;
            serve(refresher, watcher, server, config.refresh_interval).await
        }
        PublishTarget::Kv { url, key } => {
            let store = RedisStore::open(url).map_err(RunError::KvOpen)?;
            let publisher = KvPublisher::new(store, key.clone());
            serve(refresher, watcher, publisher, config.refresh_interval).await
        }
    }
}

#[cfg(not(tarpaulin_include))]
async fn serve<T: StatePublisher>(
    refresher: Refresher<AppLookup>,
    watcher: RouteWatcher<CommandProbe>,
    publisher: T,
    refresh_interval: Duration,
) -> Result<(), RunError> {
    tracing::info!(
        "Service started (refresh every {}s, route probe every {}s)",
        refresh_interval.as_secs(),
        watcher.interval().as_secs()
    );

    Service::new(refresher, watcher, publisher, refresh_interval)
        .run(shutdown_signal())
        .await?;

    tracing::info!("Service stopped");
    Ok(())
}

/// Builds the route probe from the configured command line.
fn build_probe(config: &ServiceConfig) -> CommandProbe {
    let probe = CommandProbe::new(&config.route_program, &config.route_args);
    tracing::debug!("Route probe: {}", probe.command_line());
    probe
}

/// Reads the current state from the configured source and renders it.
///
/// # Errors
///
/// Returns an error if the source cannot be reached, nothing was published
/// yet, or the template fails.
pub async fn fetch_rendered(config: &ClientConfig) -> Result<String, RunError> {
    let renderer = Renderer::new(&config.info_format)?;
    let state = read_state(&config.source).await?;
    Ok(renderer.render(&state)?)
}

async fn read_state(source: &PublishTarget) -> Result<ServiceState, RunError> {
    match source {
        PublishTarget::Socket { path } => Ok(SocketReader::new(path).read().await?),
        PublishTarget::Kv { url, key } => {
            let store = RedisStore::open(url).map_err(RunError::KvOpen)?;
            Ok(KvReader::new(store, key.clone()).read().await?)
        }
    }
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

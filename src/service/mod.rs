//! Service core: the shared `update` operation and the activities that
//! drive it.
//!
//! This module provides:
//! - The single-flight refresh operation ([`Refresher`], [`UpdateOutcome`])
//! - The fixed-cadence refresh loop ([`run_refresh_loop`])
//! - The route-change trigger loop ([`run_route_watch`])
//! - The orchestrator running everything under one lifetime ([`Service`])
//! - Error handling ([`ServiceError`])

mod cadence;
mod error;
mod orchestrator;
mod refresher;

#[cfg(test)]
mod test_fixtures;

pub use cadence::{run_refresh_loop, run_route_watch};
pub use error::ServiceError;
pub use orchestrator::Service;
pub use refresher::{Refresher, UpdateOutcome};

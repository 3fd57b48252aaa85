//! extip: External IP Info Service
//!
//! A library for keeping the host's external IP address and its network
//! metadata fresh, refreshing on a fixed cadence and whenever the route
//! table changes, and serving the result to local clients over a Unix
//! socket or a key/value store.

pub mod config;
pub mod lookup;
pub mod render;
pub mod route;
pub mod service;
pub mod state;
pub mod time;
pub mod transport;

//! Remote lookup layer for the host's external network identity.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - The lookup contract ([`IpLookup`]) and its ipinfo implementation ([`IpInfoClient`])
//! - The lookup result ([`IpInfo`]) and failure taxonomy ([`LookupError`])
//!
//! A lookup is a single request: no retries happen here. Retry cadence
//! belongs to the caller (see [`crate::service`]).

mod client;
mod error;
mod http;
mod info;
mod ipinfo;


pub use client::ReqwestClient;
pub use error::{HttpError, LookupError};
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use info::IpInfo;
pub use ipinfo::{IpInfoClient, IpLookup};

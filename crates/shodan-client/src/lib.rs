//! HTTP and streaming client for the Shodan API.
//!
//! [`ShodanClient`] is the entry point. Request-style endpoints return typed
//! values (or copy raw bodies into a writer); streaming endpoints return a
//! [`Subscription`] whose channel closes when the feed ends.

#![doc(html_root_url = "https://docs.rs/shodan-client/2.0.0")]

pub mod api;
mod client;
mod config;
mod decode;
mod query;
mod stream;

pub use client::{ShodanClient, ShodanClientBuilder};
pub use config::*;
pub use decode::{Json, Raw, ResponseDestination};
pub use query::{build_url, encode_query, KEY_PARAM};
pub use shodan_core::{Result, ShodanError};
pub use stream::Subscription;

//! Dispatching client built on queue lanes.
//!
//! This module holds the outward face of the crate: a [`Client`] that takes
//! endpoint descriptions and runs fetches on one of two background lanes,
//! delivering classified outcomes to completion callbacks.
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── fetch  - Client, dispatch variants, outcome classification
//! └── lanes  - the serial/parallel execution lanes
//! ```
//!
//! # Examples
//!
//! ```ignore
//! use lane_http::{Client, Lane, Router, StaticEndpoint};
//!
//! let client = Client::new("api", Router::default());
//! let endpoint = StaticEndpoint::new("https://api.example.com", "/health");
//!
//! // Fire and forget; the callback sees the outcome.
//! client.spawn_fetch(endpoint, Lane::Parallel, |outcome| {
//!     match outcome {
//!         Ok(body) => println!("{} bytes", body.len()),
//!         Err(error) => eprintln!("fetch failed: {error}"),
//!     }
//! });
//! ```

mod fetch;
mod lanes;

pub use fetch::Client;
pub use lanes::Lane;

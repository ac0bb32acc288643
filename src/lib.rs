#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # lane_http: queue-lane HTTP dispatch
//!
//! A convenience layer between "I know which API call I want" and an HTTP
//! transport. Callers describe a call target as an [`Endpoint`]; the crate
//! encodes its parameters, dispatches the request on a background lane, and
//! maps the raw outcome onto a small error taxonomy.
//!
//! The pipeline, leaf to root:
//!
//! 1. **Parameter encoders** ([`encoding`]) - attach a JSON body and/or a
//!    URL query string to a request draft.
//! 2. **[`ParameterEncoding`]** - selects which encoder(s) run and applies
//!    `Content-Type` defaults.
//! 3. **[`Endpoint`]** - a passive description of one call target; the
//!    caller-facing extension point.
//! 4. **[`Router`]** - builds the concrete [`RequestDraft`] and hands it to
//!    the [`Transport`]; tracks one cancellable in-flight exchange.
//! 5. **[`Client`]** - dispatches fetches on a serial or parallel [`Lane`]
//!    and classifies the raw reply into `Ok(bytes)` or one [`Error`] kind.
//!
//! A fetch flows `Client` → `Router` → encoding → transport → router
//! completion → status classification → caller completion.
//!
//! ## Module Structure
//!
//! - **[`types`]** - methods, parameter/header maps, tasks, request drafts
//! - **[`error`]** - the error taxonomy and result alias
//! - **[`encoding`]** - JSON body and URL query encoders plus the selector
//! - **[`endpoint`]** - the `Endpoint` trait and `StaticEndpoint`
//! - **[`router`]** - request construction and transport hand-off
//! - **[`transport`]** - the transport seam and the `reqwest` default
//! - **[`client`]** - queue lanes and the dispatching client

pub mod client;
pub mod encoding;
pub mod endpoint;
pub mod error;
pub mod router;
pub mod transport;
pub mod types;

pub use client::{Client, Lane};
pub use encoding::ParameterEncoding;
pub use endpoint::{Endpoint, StaticEndpoint};
pub use error::{Error, Result};
pub use router::Router;
pub use transport::{
    FlightHandle, ReplyCallback, ReqwestTransport, ResponseMeta, Transport, TransportConfig,
    TransportReply,
};
pub use types::{Headers, Method, Parameters, RequestDraft, Task};

#[cfg(test)]
mod tests;

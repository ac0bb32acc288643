//! The transport seam.
//!
//! The router hands a finished [`RequestDraft`](crate::types::RequestDraft)
//! to a [`Transport`] and gets back a cancellable flight. The transport owns
//! all actual networking (connections, TLS, timeouts), and this crate only
//! ever sees the reply it delivers to the completion callback.
//!
//! [`ReqwestTransport`] is the implementation that ships with the crate;
//! tests swap in stubs that answer inline, which keeps the whole pipeline
//! exercisable without a network.

mod reqwest;

pub use self::reqwest::{ReqwestTransport, TransportConfig};

use std::fmt;

use bytes::Bytes;

use crate::error::Result;
use crate::types::{Headers, RequestDraft};

/// Completion callback handed to a transport along with the draft.
pub type ReplyCallback = Box<dyn FnOnce(Result<TransportReply>) + Send + 'static>;

/// Status line and headers of a received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMeta {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, as delivered by the transport.
    pub headers: Headers,
}

/// What a transport delivers to its completion callback.
///
/// `response` may be absent when the exchange produced something that was
/// not an HTTP response; classification treats that separately from a
/// connection failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportReply {
    /// Parsed response metadata, when the reply was HTTP-shaped.
    pub response: Option<ResponseMeta>,
    /// Raw body bytes. Absent when the response carried no payload.
    pub body: Option<Bytes>,
}

impl TransportReply {
    /// A reply with the given status and body, no headers. Handy for stubs.
    pub fn with_status(status: u16, body: impl Into<Bytes>) -> Self {
        let body: Bytes = body.into();
        TransportReply {
            response: Some(ResponseMeta {
                status,
                headers: Headers::new(),
            }),
            body: (!body.is_empty()).then_some(body),
        }
    }
}

/// Handle to one in-flight exchange.
///
/// Dropping the handle does not cancel the flight; only
/// [`FlightHandle::cancel`] does. A cancelled flight may never invoke its
/// completion callback.
pub struct FlightHandle {
    canceller: Option<Box<dyn FnOnce() + Send>>,
}

impl FlightHandle {
    /// A handle that cancels its flight by running the given closure.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        FlightHandle {
            canceller: Some(Box::new(cancel)),
        }
    }

    /// A handle over a flight that cannot be cancelled: one that already
    /// settled, or one whose completion ran inline during `send`.
    pub fn settled() -> Self {
        FlightHandle { canceller: None }
    }

    /// Abort the exchange, if it can still be aborted.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.canceller.take() {
            cancel();
        }
    }
}

impl fmt::Debug for FlightHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlightHandle")
            .field("cancellable", &self.canceller.is_some())
            .finish()
    }
}

/// A component that carries a request draft to the network.
///
/// `send` starts the exchange immediately and must invoke `completion` at
/// most once: exactly once for flights that run to an outcome, possibly
/// never for flights cancelled through the returned handle. Transport-level
/// failures are reported as [`Connection`](crate::Error::Connection) errors.
///
/// Implementations are shared across concurrent flights and must be safe to
/// call from any task.
pub trait Transport: Send + Sync + 'static {
    /// Start carrying `draft`; report the outcome through `completion`.
    fn send(&self, draft: RequestDraft, completion: ReplyCallback) -> FlightHandle;
}

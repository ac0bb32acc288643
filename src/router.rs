//! Request construction and hand-off to the transport.

use std::sync::Arc;

use parking_lot::Mutex;
use url::Url;

use crate::endpoint::Endpoint;
use crate::error::{Error, Result};
use crate::transport::{FlightHandle, ReqwestTransport, Transport, TransportReply};
use crate::types::{RequestDraft, Task};

/// Builds concrete requests from endpoint descriptions and hands them to the
/// transport.
///
/// A router tracks at most one in-flight exchange: a single slot, not a
/// queue. Starting a second exchange before the first settles replaces the
/// stored handle, leaving only the newest flight cancellable; cancelling the
/// older one beforehand is the caller's job. Callers that need overlapping
/// cancellable requests serialize their calls or use one router per request.
pub struct Router {
    transport: Arc<dyn Transport>,
    in_flight: Mutex<Option<FlightHandle>>,
}

impl Router {
    /// A router dispatching through `transport`. The transport may be shared
    /// with other routers.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Router {
            transport,
            in_flight: Mutex::new(None),
        }
    }

    /// Build the request described by `endpoint` and start it.
    ///
    /// When construction fails, `completion` is invoked immediately with the
    /// error and nothing reaches the transport. Otherwise the transport's
    /// outcome is forwarded to `completion` verbatim, and `resume` itself
    /// returns as soon as the flight has started, usually well before the
    /// outcome arrives.
    pub fn resume<F>(&self, endpoint: &dyn Endpoint, completion: F)
    where
        F: FnOnce(Result<TransportReply>) + Send + 'static,
    {
        let draft = match build_draft(endpoint) {
            Ok(draft) => draft,
            Err(error) => {
                tracing::warn!(%error, "request construction failed");
                completion(Err(error));
                return;
            }
        };

        let handle = self.transport.send(draft, Box::new(completion));
        *self.in_flight.lock() = Some(handle);
    }

    /// Cancel the most recently started exchange, if one is still tracked.
    ///
    /// With nothing in flight this does nothing and reports nothing.
    pub fn cancel(&self) {
        if let Some(handle) = self.in_flight.lock().take() {
            handle.cancel();
        }
    }
}

impl Default for Router {
    /// A router over a fresh [`ReqwestTransport`] with default configuration.
    fn default() -> Self {
        Router::new(Arc::new(ReqwestTransport::new()))
    }
}

/// Assemble the draft for `endpoint`: join the URL, apply endpoint-level
/// headers, then the task's headers and parameter encoding.
///
/// The two task shapes that carry parameters share one encoding path; the
/// headered shape merely sets its headers first and falls through.
pub(crate) fn build_draft(endpoint: &dyn Endpoint) -> Result<RequestDraft> {
    let url = Url::parse(endpoint.base_url())
        .and_then(|base| base.join(endpoint.path()))
        .map_err(|_| Error::MissingUrl)?;

    let mut draft = RequestDraft::with_url(endpoint.method(), url);

    if let Some(headers) = endpoint.headers() {
        for (name, value) in headers {
            draft.insert_header(name, value);
        }
    }

    let (body, query, encoding) = match endpoint.task() {
        Task::Plain => (None, None, None),
        Task::WithParameters {
            body,
            query,
            encoding,
        } => (body.as_ref(), query.as_ref(), Some(*encoding)),
        Task::WithParametersAndHeaders {
            body,
            query,
            encoding,
            headers,
        } => {
            for (name, value) in headers {
                draft.insert_header(name, value);
            }
            (body.as_ref(), query.as_ref(), Some(*encoding))
        }
    };

    if let Some(encoding) = encoding {
        encoding.encode(&mut draft, body, query)?;
    }

    tracing::debug!(method = %draft.method, url = ?draft.url, "request draft built");
    Ok(draft)
}

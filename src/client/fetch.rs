//! The dispatching client and outcome classification.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::oneshot;
use tokio::time::sleep;

use crate::client::lanes::{Job, Lane, Lanes};
use crate::endpoint::Endpoint;
use crate::error::{Error, Result};
use crate::router::Router;
use crate::transport::TransportReply;

/// Dispatching HTTP client.
///
/// Wraps one [`Router`] and a pair of background lanes. Every fetch
/// operation takes the lane to run on and a completion callback; the
/// callback receives the classified outcome: raw body bytes on success, one
/// [`Error`] kind otherwise.
///
/// Two families of operations cover the four dispatch variants:
///
/// - [`fetch`](Client::fetch) / [`fetch_after`](Client::fetch_after) resolve
///   once the lane has *executed* the submitted work, i.e. once the request
///   has been built and handed to the transport. The network outcome usually
///   arrives later, through the callback.
/// - [`spawn_fetch`](Client::spawn_fetch) /
///   [`spawn_fetch_after`](Client::spawn_fetch_after) return as soon as the
///   work is queued.
///
/// Cloning is cheap; clones share the router and both lanes. The client
/// must be created within a Tokio runtime.
#[derive(Clone)]
pub struct Client {
    label: String,
    router: Arc<Router>,
    lanes: Lanes,
}

impl Client {
    /// A client named `label`, dispatching through `router`.
    ///
    /// The label tags the client's lanes in log output. The serial lane
    /// worker is spawned here, so this must run within a Tokio runtime.
    pub fn new(label: impl Into<String>, router: Router) -> Self {
        let label = label.into();
        let lanes = Lanes::new(&label);
        Client {
            lanes,
            router: Arc::new(router),
            label,
        }
    }

    /// The queue-name label this client was created with.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The router behind this client, the place to go for cancelling the
    /// in-flight exchange.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Dispatch a fetch and wait for the lane to run it.
    ///
    /// Resolves once the submitted unit of work has executed. That is *not*
    /// the same moment the exchange settles: the transport completes in the
    /// background, and `completion` may well fire after this returns.
    pub async fn fetch<E, F>(&self, endpoint: E, lane: Lane, completion: F)
    where
        E: Endpoint + 'static,
        F: FnOnce(Result<Bytes>) + Send + 'static,
    {
        let (done, waited) = oneshot::channel();
        self.lanes
            .submit(lane, self.job(endpoint, None, completion, Some(done)));
        let _ = waited.await;
    }

    /// As [`Client::fetch`], with the lane sleeping for `delay` before the
    /// dispatch runs. The caller waits through the delay as well; the sleep
    /// itself happens on the lane.
    pub async fn fetch_after<E, F>(&self, endpoint: E, lane: Lane, delay: Duration, completion: F)
    where
        E: Endpoint + 'static,
        F: FnOnce(Result<Bytes>) + Send + 'static,
    {
        let (done, waited) = oneshot::channel();
        self.lanes
            .submit(lane, self.job(endpoint, Some(delay), completion, Some(done)));
        let _ = waited.await;
    }

    /// Dispatch a fetch and return as soon as it is queued.
    pub fn spawn_fetch<E, F>(&self, endpoint: E, lane: Lane, completion: F)
    where
        E: Endpoint + 'static,
        F: FnOnce(Result<Bytes>) + Send + 'static,
    {
        self.lanes.submit(lane, self.job(endpoint, None, completion, None));
    }

    /// As [`Client::spawn_fetch`], with the dispatch running no earlier than
    /// `delay` from now.
    pub fn spawn_fetch_after<E, F>(&self, endpoint: E, lane: Lane, delay: Duration, completion: F)
    where
        E: Endpoint + 'static,
        F: FnOnce(Result<Bytes>) + Send + 'static,
    {
        self.lanes
            .submit(lane, self.job(endpoint, Some(delay), completion, None));
    }

    /// Package one dispatch as a lane job: optional sleep, resume through the
    /// router, classify, then signal the waiter if there is one.
    fn job<E, F>(
        &self,
        endpoint: E,
        delay: Option<Duration>,
        completion: F,
        done: Option<oneshot::Sender<()>>,
    ) -> Job
    where
        E: Endpoint + 'static,
        F: FnOnce(Result<Bytes>) + Send + 'static,
    {
        let router = Arc::clone(&self.router);
        let client = self.label.clone();
        Box::pin(async move {
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            tracing::debug!(%client, "dispatching fetch");
            router.resume(&endpoint, move |outcome| completion(classify(outcome)));
            if let Some(done) = done {
                let _ = done.send(());
            }
        })
    }
}

/// Collapse a raw transport outcome into the caller-facing result.
///
/// Construction and connection failures pass through unchanged. A reply
/// without HTTP metadata is not interpretable. By status: `200..=299`
/// succeeds when a body is present and downgrades to [`Error::EmptyData`]
/// without one, `401..=500` is refused, `501..=599` failed upstream, and
/// every other code is unknown.
pub(crate) fn classify(outcome: Result<TransportReply>) -> Result<Bytes> {
    let reply = outcome?;
    let Some(meta) = reply.response else {
        return Err(Error::Unknown);
    };
    match meta.status {
        200..=299 => reply.body.ok_or(Error::EmptyData),
        401..=500 => Err(Error::Auth(meta.status)),
        501..=599 => Err(Error::Upstream(meta.status)),
        _ => Err(Error::Unknown),
    }
}

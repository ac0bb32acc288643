//! End-to-end scenarios across router, client, lanes, and transports.
//!
//! Stub transports answer inline, which pins down dispatch ordering; the
//! `mockito`-backed tests run the shipped `reqwest` transport against a real
//! local HTTP server.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::{mpsc, oneshot};

use crate::endpoint::StaticEndpoint;
use crate::error::Error;
use crate::router::Router;
use crate::transport::Transport;
use crate::types::{Method, Parameters, Task};
use crate::{Client, Lane, ParameterEncoding};

pub(crate) mod support {
    use std::collections::VecDeque;
    use std::time::Duration;

    use parking_lot::Mutex;

    use crate::error::Result;
    use crate::transport::{FlightHandle, ReplyCallback, Transport, TransportReply};
    use crate::types::RequestDraft;

    /// Transport that records every draft and answers inline from a queue of
    /// canned replies, falling back to `200 "ok"` when the queue runs dry.
    ///
    /// Inline completion means callbacks fire during dispatch, so on the
    /// serial lane they fire in submission order.
    pub(crate) struct StubTransport {
        drafts: Mutex<Vec<RequestDraft>>,
        replies: Mutex<VecDeque<Result<TransportReply>>>,
    }

    impl StubTransport {
        pub(crate) fn new() -> Self {
            StubTransport {
                drafts: Mutex::new(Vec::new()),
                replies: Mutex::new(VecDeque::new()),
            }
        }

        pub(crate) fn push_reply(&self, reply: Result<TransportReply>) {
            self.replies.lock().push_back(reply);
        }

        pub(crate) fn drafts(&self) -> Vec<RequestDraft> {
            self.drafts.lock().clone()
        }
    }

    impl Transport for StubTransport {
        fn send(&self, draft: RequestDraft, completion: ReplyCallback) -> FlightHandle {
            self.drafts.lock().push(draft);
            let reply = self
                .replies
                .lock()
                .pop_front()
                .unwrap_or_else(|| Ok(TransportReply::with_status(200, &b"ok"[..])));
            completion(reply);
            FlightHandle::settled()
        }
    }

    /// Transport whose flights settle only after `delay`. Cancelling aborts
    /// the pending task, so the completion never runs.
    pub(crate) struct SlowTransport {
        pub(crate) delay: Duration,
    }

    impl Transport for SlowTransport {
        fn send(&self, _draft: RequestDraft, completion: ReplyCallback) -> FlightHandle {
            let delay = self.delay;
            let flight = tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                completion(Ok(TransportReply::with_status(200, &b"late"[..])));
            });
            let abort = flight.abort_handle();
            FlightHandle::new(move || abort.abort())
        }
    }
}

use support::{SlowTransport, StubTransport};

fn stub_client(label: &str) -> (Client, Arc<StubTransport>) {
    let stub = Arc::new(StubTransport::new());
    let client = Client::new(label, Router::new(stub.clone() as Arc<dyn Transport>));
    (client, stub)
}

fn query(entries: &[(&str, serde_json::Value)]) -> Parameters {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

#[tokio::test]
async fn test_plain_fetch_delivers_body() {
    let (client, stub) = stub_client("plain");
    let endpoint = StaticEndpoint::new("https://example.com", "/");

    let (sent, outcome) = oneshot::channel();
    client
        .fetch(endpoint, Lane::Serial, move |outcome| {
            let _ = sent.send(outcome);
        })
        .await;

    assert_eq!(outcome.await.unwrap().unwrap(), Bytes::from_static(b"ok"));

    let drafts = stub.drafts();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].method, Method::Get);
    assert_eq!(drafts[0].url.as_ref().unwrap().as_str(), "https://example.com/");
    assert!(drafts[0].body.is_none());
}

#[tokio::test]
async fn test_construction_failure_skips_transport() {
    let (client, stub) = stub_client("broken");
    let endpoint = StaticEndpoint::new("not a base url", "/");

    let (sent, outcome) = oneshot::channel();
    client
        .fetch(endpoint, Lane::Serial, move |outcome| {
            let _ = sent.send(outcome);
        })
        .await;

    assert_eq!(outcome.await.unwrap().unwrap_err(), Error::MissingUrl);
    assert!(stub.drafts().is_empty());
}

#[tokio::test]
async fn test_both_mode_draft_carries_body_query_and_headers() {
    let (client, stub) = stub_client("both");
    let body = query(&[("data", json!(2))]);
    let endpoint = StaticEndpoint::new("https://example.com", "/items")
        .with_method(Method::Post)
        .with_headers([("X-Request-Source".to_string(), "lane".to_string())].into())
        .with_task(Task::WithParametersAndHeaders {
            body: Some(body.clone()),
            query: Some(query(&[("query", json!(1))])),
            encoding: ParameterEncoding::Both,
            headers: [("X-Trace".to_string(), "1".to_string())].into(),
        });

    let (sent, outcome) = oneshot::channel();
    client
        .fetch(endpoint, Lane::Parallel, move |outcome| {
            let _ = sent.send(outcome);
        })
        .await;
    outcome.await.unwrap().unwrap();

    let draft = stub.drafts().remove(0);
    assert_eq!(draft.method, Method::Post);
    assert_eq!(draft.url.as_ref().unwrap().query(), Some("query=1"));
    assert_eq!(
        draft.body.as_deref(),
        Some(serde_json::to_vec(&body).unwrap().as_slice())
    );
    assert_eq!(draft.headers.get("X-Request-Source").map(String::as_str), Some("lane"));
    assert_eq!(draft.headers.get("X-Trace").map(String::as_str), Some("1"));
    // Both mode applies no Content-Type default.
    assert!(!draft.headers.keys().any(|k| k.eq_ignore_ascii_case("content-type")));
}

#[tokio::test]
async fn test_canned_replies_flow_through_classification() {
    let (client, stub) = stub_client("canned");
    stub.push_reply(Ok(crate::TransportReply {
        response: None,
        body: None,
    }));
    stub.push_reply(Err(Error::Connection("reset by peer".to_string())));

    let endpoint = StaticEndpoint::new("https://example.com", "/");
    let outcome = fetch_outcome(&client, endpoint.clone()).await;
    assert_eq!(outcome.unwrap_err(), Error::Unknown);

    let outcome = fetch_outcome(&client, endpoint).await;
    assert_eq!(
        outcome.unwrap_err(),
        Error::Connection("reset by peer".to_string())
    );
}

#[tokio::test]
async fn test_serial_dispatch_completes_in_submission_order() {
    let (client, _stub) = stub_client("ordered");
    let order = Arc::new(Mutex::new(Vec::new()));

    for index in 0..8usize {
        let order = Arc::clone(&order);
        let endpoint = StaticEndpoint::new("https://example.com", format!("/{index}"));
        client.spawn_fetch(endpoint, Lane::Serial, move |_outcome| {
            order.lock().push(index);
        });
    }

    // The waiting variant queues behind everything above on the same lane.
    let endpoint = StaticEndpoint::new("https://example.com", "/last");
    client.fetch(endpoint, Lane::Serial, |_outcome| {}).await;

    assert_eq!(*order.lock(), (0..8).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_parallel_dispatch_completes_without_deadlock() {
    let (client, _stub) = stub_client("parallel");
    let (done, mut finished) = mpsc::unbounded_channel();

    for index in 0..8usize {
        let done = done.clone();
        let endpoint = StaticEndpoint::new("https://example.com", format!("/{index}"));
        client.spawn_fetch(endpoint, Lane::Parallel, move |outcome| {
            let _ = done.send(outcome.is_ok());
        });
    }
    drop(done);

    let collected = tokio::time::timeout(Duration::from_secs(5), async {
        let mut collected = Vec::new();
        while let Some(ok) = finished.recv().await {
            collected.push(ok);
        }
        collected
    })
    .await
    .expect("parallel dispatch stalled");

    assert_eq!(collected.len(), 8);
    assert!(collected.into_iter().all(|ok| ok));
}

#[tokio::test(start_paused = true)]
async fn test_fetch_returns_before_flight_settles() {
    let transport = Arc::new(SlowTransport {
        delay: Duration::from_secs(5),
    });
    let client = Client::new("slow", Router::new(transport as Arc<dyn Transport>));
    let settled = Arc::new(Mutex::new(None));

    let seen = Arc::clone(&settled);
    let endpoint = StaticEndpoint::new("https://example.com", "/");
    client
        .fetch(endpoint, Lane::Serial, move |outcome| {
            *seen.lock() = Some(outcome);
        })
        .await;

    // The waiting variant resolves on dispatch, not on the network outcome.
    assert!(settled.lock().is_none());

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert!(matches!(*settled.lock(), Some(Ok(_))));
}

#[tokio::test(start_paused = true)]
async fn test_fetch_after_waits_through_delay() {
    let (client, _stub) = stub_client("delayed");
    let start = tokio::time::Instant::now();

    let endpoint = StaticEndpoint::new("https://example.com", "/");
    client
        .fetch_after(endpoint, Lane::Serial, Duration::from_secs(3), |_outcome| {})
        .await;

    assert!(start.elapsed() >= Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_spawn_fetch_after_defers_dispatch() {
    let (client, stub) = stub_client("deferred");
    let fired = Arc::new(Mutex::new(false));

    let seen = Arc::clone(&fired);
    let endpoint = StaticEndpoint::new("https://example.com", "/");
    client.spawn_fetch_after(endpoint, Lane::Serial, Duration::from_secs(2), move |_outcome| {
        *seen.lock() = true;
    });

    // Returned immediately; the lane is still sleeping.
    tokio::task::yield_now().await;
    assert!(!*fired.lock());
    assert!(stub.drafts().is_empty());

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(*fired.lock());
    assert_eq!(stub.drafts().len(), 1);
}

#[tokio::test]
async fn test_cancel_without_flight_is_a_noop() {
    let stub = Arc::new(StubTransport::new());
    let router = Router::new(stub as Arc<dyn Transport>);
    router.cancel();
    router.cancel();
}

#[tokio::test(start_paused = true)]
async fn test_cancel_aborts_pending_flight() {
    let transport = Arc::new(SlowTransport {
        delay: Duration::from_secs(10),
    });
    let router = Router::new(transport as Arc<dyn Transport>);
    let settled = Arc::new(Mutex::new(false));

    let seen = Arc::clone(&settled);
    let endpoint = StaticEndpoint::new("https://example.com", "/");
    router.resume(&endpoint, move |_outcome| {
        *seen.lock() = true;
    });
    router.cancel();

    tokio::time::sleep(Duration::from_secs(20)).await;
    assert!(!*settled.lock());
}

// --- reqwest transport against a local mockito server ---

async fn fetch_outcome(client: &Client, endpoint: StaticEndpoint) -> crate::Result<Bytes> {
    let (sent, outcome) = oneshot::channel();
    client
        .fetch(endpoint, Lane::Serial, move |outcome| {
            let _ = sent.send(outcome);
        })
        .await;
    outcome.await.unwrap()
}

#[tokio::test]
async fn test_reqwest_get_with_query_parameters() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/hello")
        .match_query(mockito::Matcher::UrlEncoded("query".into(), "1".into()))
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;

    let client = Client::new("mockito", Router::default());
    let endpoint = StaticEndpoint::new(server.url(), "/hello").with_task(Task::WithParameters {
        body: None,
        query: Some(query(&[("query", json!(1))])),
        encoding: ParameterEncoding::Url,
    });

    let outcome = fetch_outcome(&client, endpoint).await;
    assert_eq!(outcome.unwrap(), Bytes::from_static(b"ok"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_reqwest_post_with_json_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/items")
        .match_header("content-type", "application/json")
        .match_body(mockito::Matcher::Json(json!({"data": 2})))
        .with_status(201)
        .with_body("created")
        .create_async()
        .await;

    let client = Client::new("mockito", Router::default());
    let endpoint = StaticEndpoint::new(server.url(), "/items")
        .with_method(Method::Post)
        .with_task(Task::WithParameters {
            body: Some(query(&[("data", json!(2))])),
            query: None,
            encoding: ParameterEncoding::Json,
        });

    let outcome = fetch_outcome(&client, endpoint).await;
    assert_eq!(outcome.unwrap(), Bytes::from_static(b"created"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_reqwest_status_buckets() {
    let mut server = mockito::Server::new_async().await;
    let refused = server
        .mock("GET", "/code/404")
        .with_status(404)
        .with_body("missing")
        .create_async()
        .await;
    let upstream = server
        .mock("GET", "/code/503")
        .with_status(503)
        .with_body("flat")
        .create_async()
        .await;
    let empty = server.mock("GET", "/code/204").with_status(204).create_async().await;

    let client = Client::new("mockito", Router::default());

    let outcome = fetch_outcome(&client, StaticEndpoint::new(server.url(), "/code/404")).await;
    assert_eq!(outcome.unwrap_err(), Error::Auth(404));

    let outcome = fetch_outcome(&client, StaticEndpoint::new(server.url(), "/code/503")).await;
    assert_eq!(outcome.unwrap_err(), Error::Upstream(503));

    let outcome = fetch_outcome(&client, StaticEndpoint::new(server.url(), "/code/204")).await;
    assert_eq!(outcome.unwrap_err(), Error::EmptyData);

    refused.assert_async().await;
    upstream.assert_async().await;
    empty.assert_async().await;
}

#[tokio::test]
async fn test_reqwest_connection_failure() {
    // Nothing listens on the discard port.
    let client = Client::new("mockito", Router::default());
    let outcome = fetch_outcome(&client, StaticEndpoint::new("http://127.0.0.1:9", "/")).await;
    assert!(matches!(outcome.unwrap_err(), Error::Connection(_)));
}

#[tokio::test]
async fn test_reqwest_both_mode_sends_body_and_query_without_content_type() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/submit")
        .match_query(mockito::Matcher::UrlEncoded("query".into(), "1".into()))
        .match_body(mockito::Matcher::Json(json!({"data": 2})))
        .match_header("content-type", mockito::Matcher::Missing)
        .with_status(200)
        .with_body("merged")
        .create_async()
        .await;

    let client = Client::new("mockito", Router::default());
    let endpoint = StaticEndpoint::new(server.url(), "/submit")
        .with_method(Method::Post)
        .with_task(Task::WithParameters {
            body: Some(query(&[("data", json!(2))])),
            query: Some(query(&[("query", json!(1))])),
            encoding: ParameterEncoding::Both,
        });

    let outcome = fetch_outcome(&client, endpoint).await;
    assert_eq!(outcome.unwrap(), Bytes::from_static(b"merged"));
    mock.assert_async().await;
}

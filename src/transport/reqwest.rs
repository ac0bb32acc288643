//! Default transport backed by `reqwest`.

use serde::{Deserialize, Serialize};

use super::{FlightHandle, ReplyCallback, ResponseMeta, Transport, TransportReply};
use crate::error::{Error, Result};
use crate::types::{Headers, Method, RequestDraft};

/// Knobs for the default transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Upper bound on idle pooled connections per host.
    pub max_idle_per_host: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            request_timeout_ms: 30_000,
            max_idle_per_host: 8,
        }
    }
}

/// [`Transport`] that performs real HTTP exchanges through a shared
/// `reqwest::Client`.
///
/// The inner client is cheap to clone and safe to share across concurrent
/// flights; one transport instance can back any number of routers. Each
/// `send` spawns the exchange as its own task, so `send` returns as soon as
/// the flight is airborne.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// A transport with default configuration.
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    /// A transport with explicit timeout and pool sizing.
    pub fn with_config(config: TransportConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .pool_max_idle_per_host(config.max_idle_per_host as usize)
            .build()
            .unwrap_or_default();

        ReqwestTransport { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, draft: RequestDraft, completion: ReplyCallback) -> FlightHandle {
        let client = self.client.clone();
        let flight = tokio::spawn(async move {
            completion(perform(client, draft).await);
        });

        let abort = flight.abort_handle();
        FlightHandle::new(move || abort.abort())
    }
}

/// One full exchange: build the `reqwest` request from the draft, await the
/// response, flatten it into a [`TransportReply`].
async fn perform(client: reqwest::Client, draft: RequestDraft) -> Result<TransportReply> {
    let url = draft.url.ok_or(Error::MissingUrl)?;
    tracing::debug!(method = %draft.method, url = %url, "sending request");

    let mut request = client.request(wire_method(draft.method), url);
    for (name, value) in &draft.headers {
        request = request.header(name, value);
    }
    if let Some(body) = draft.body {
        request = request.body(body);
    }

    let response = request.send().await.map_err(|e| {
        tracing::warn!(error = %e, "exchange failed");
        Error::Connection(e.to_string())
    })?;

    let status = response.status().as_u16();
    let mut headers = Headers::new();
    for (name, value) in response.headers() {
        if let Ok(value) = value.to_str() {
            headers.insert(name.as_str().to_string(), value.to_string());
        }
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| Error::Connection(e.to_string()))?;
    let body = (!body.is_empty()).then_some(body);

    Ok(TransportReply {
        response: Some(ResponseMeta { status, headers }),
        body,
    })
}

fn wire_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

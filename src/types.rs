//! Core request-description types.
//!
//! Everything a fetch needs before it touches the network lives here: the
//! verb, the parameter and header maps, the [`Task`] shape describing what a
//! request carries, and the [`RequestDraft`] being assembled on its way to
//! the transport.

use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::encoding::ParameterEncoding;

/// Parameters attached to a request, keyed by field name.
///
/// Values are arbitrary JSON values. The JSON encoder serializes the whole
/// map as an object; the URL encoder flattens each value to its plain string
/// form.
pub type Parameters = BTreeMap<String, serde_json::Value>;

/// Header name/value pairs merged into a request's header set.
pub type Headers = BTreeMap<String, String>;

/// The HTTP verbs this crate speaks. A fixed set; no custom verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// HTTP GET.
    Get,
    /// HTTP POST.
    Post,
    /// HTTP PUT.
    Put,
    /// HTTP DELETE.
    Delete,
}

impl Method {
    /// The verb as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a request carries beyond its method and URL.
///
/// The three shapes share one encoding path: a task with headers applies
/// them first and then falls through to the same parameter handling as
/// [`Task::WithParameters`].
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// A bare request. No parameters, no extra headers.
    Plain,

    /// A request with parameters, attached per `encoding`.
    WithParameters {
        /// Parameters destined for the request body.
        body: Option<Parameters>,
        /// Parameters destined for the URL query string.
        query: Option<Parameters>,
        /// Which encoder(s) run.
        encoding: ParameterEncoding,
    },

    /// As [`Task::WithParameters`], with additional headers applied to the
    /// draft before the parameters are encoded.
    WithParametersAndHeaders {
        /// Parameters destined for the request body.
        body: Option<Parameters>,
        /// Parameters destined for the URL query string.
        query: Option<Parameters>,
        /// Which encoder(s) run.
        encoding: ParameterEncoding,
        /// Headers set on the draft, overwriting same-named entries.
        headers: Headers,
    },
}

/// A request while it is being assembled.
///
/// Owned by the router during construction and handed to the transport for
/// dispatch; nothing holds onto a draft afterwards. The body and the URL
/// query string are disjoint targets: the JSON encoder writes only `body`,
/// the URL encoder only the query part of `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDraft {
    /// The verb to send with.
    pub method: Method,
    /// Target URL. Absent until one is assigned; query encoding requires it.
    pub url: Option<Url>,
    /// Header set accumulated so far.
    pub headers: Headers,
    /// Raw body payload, if any.
    pub body: Option<Bytes>,
}

impl RequestDraft {
    /// An empty draft with no URL yet.
    pub fn new(method: Method) -> Self {
        RequestDraft {
            method,
            url: None,
            headers: Headers::new(),
            body: None,
        }
    }

    /// A draft targeting `url`.
    pub fn with_url(method: Method, url: Url) -> Self {
        RequestDraft {
            method,
            url: Some(url),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Set a header, overwriting any same-named entry.
    pub fn insert_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    /// Set a header only when no entry with the same name exists yet.
    ///
    /// Name comparison is ASCII case-insensitive, so a caller-supplied
    /// `content-type` blocks the encoder's `Content-Type` default.
    pub fn set_header_if_absent(&mut self, name: &str, value: &str) {
        if !self.has_header(name) {
            self.headers.insert(name.to_string(), value.to_string());
        }
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers.keys().any(|key| key.eq_ignore_ascii_case(name))
    }
}

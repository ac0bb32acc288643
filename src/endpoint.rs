//! Endpoint descriptions.
//!
//! An endpoint is a passive, read-only description of one HTTP call target.
//! The router consumes endpoints; it never mutates them. Any type exposing
//! the five attributes of [`Endpoint`] works; this trait is the crate's one
//! extension point for callers, typically implemented on an enum with one
//! variant per API operation:
//!
//! ```
//! use lane_http::{Endpoint, Method, Task};
//!
//! enum UserApi {
//!     Profile,
//!     Delete,
//! }
//!
//! impl Endpoint for UserApi {
//!     fn base_url(&self) -> &str {
//!         "https://api.example.com"
//!     }
//!
//!     fn path(&self) -> &str {
//!         "/user"
//!     }
//!
//!     fn method(&self) -> Method {
//!         match self {
//!             UserApi::Profile => Method::Get,
//!             UserApi::Delete => Method::Delete,
//!         }
//!     }
//!
//!     fn task(&self) -> &Task {
//!         &Task::Plain
//!     }
//! }
//! ```

use crate::types::{Headers, Method, Task};

/// A description of one HTTP call target.
///
/// The `path` is joined onto `base_url` following RFC 3986 relative-reference
/// rules; an absolute path (leading `/`) always lands under the base's
/// authority, which is what most APIs want.
pub trait Endpoint: Send + Sync {
    /// Scheme and authority, e.g. `https://api.example.com`.
    fn base_url(&self) -> &str;

    /// Path joined onto the base URL.
    fn path(&self) -> &str;

    /// The verb to send with.
    fn method(&self) -> Method;

    /// What the request carries: parameters, their encoding, extra headers.
    fn task(&self) -> &Task;

    /// Headers applied to every request built from this endpoint, before any
    /// task-level headers. Defaults to none.
    fn headers(&self) -> Option<&Headers> {
        None
    }
}

/// A ready-made [`Endpoint`] for when declaring a type is overkill: one-off
/// calls, demos, tests.
///
/// Starts as a plain GET; builder methods adjust the rest.
///
/// ```
/// use lane_http::{Endpoint, Method, StaticEndpoint};
///
/// let endpoint = StaticEndpoint::new("https://api.example.com", "/health")
///     .with_method(Method::Get);
/// assert_eq!(endpoint.path(), "/health");
/// ```
#[derive(Debug, Clone)]
pub struct StaticEndpoint {
    base_url: String,
    path: String,
    method: Method,
    task: Task,
    headers: Option<Headers>,
}

impl StaticEndpoint {
    /// A plain GET endpoint for `path` under `base_url`.
    pub fn new(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        StaticEndpoint {
            base_url: base_url.into(),
            path: path.into(),
            method: Method::Get,
            task: Task::Plain,
            headers: None,
        }
    }

    /// Replace the verb.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Replace the task.
    pub fn with_task(mut self, task: Task) -> Self {
        self.task = task;
        self
    }

    /// Attach endpoint-level headers.
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = Some(headers);
        self
    }
}

impl Endpoint for StaticEndpoint {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn method(&self) -> Method {
        self.method
    }

    fn task(&self) -> &Task {
        &self.task
    }

    fn headers(&self) -> Option<&Headers> {
        self.headers.as_ref()
    }
}

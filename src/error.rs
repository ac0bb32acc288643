//! Error types and result handling.
//!
//! One enum covers both phases of a fetch: request construction (parameter
//! encoding) and outcome classification. Construction failures surface before
//! any network traffic happens; every other failure arrives through the
//! completion callback of the dispatch call. Nothing in this crate retries;
//! a caller that wants another attempt issues another fetch.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while building, sending, or classifying a
/// request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The request draft has no usable URL to encode query parameters into.
    #[error("request has no valid url")]
    MissingUrl,

    /// Parameters could not be represented in the selected encoding.
    #[error("failed to encode parameters: {0}")]
    Encoding(String),

    /// The transport could not complete the exchange; no response arrived.
    #[error("connection failed: {0}")]
    Connection(String),

    /// A response arrived but was not interpretable as HTTP, or its status
    /// code falls outside every known bucket.
    #[error("response could not be interpreted")]
    Unknown,

    /// The server refused the request with a status in `401..=500`.
    ///
    /// The bucket is deliberately wide: alongside authentication failures it
    /// also catches general client errors such as 403 and 404. Note that 400
    /// is *not* part of it and classifies as [`Error::Unknown`].
    #[error("request refused with status {0}")]
    Auth(u16),

    /// The server failed to carry out the request with a status in
    /// `501..=599`.
    #[error("request failed upstream with status {0}")]
    Upstream(u16),

    /// The response carried a success status but no body bytes.
    #[error("response carried no data")]
    EmptyData,
}

impl Error {
    /// True when the failure happened while building the request, before any
    /// network traffic.
    pub fn is_encoding(&self) -> bool {
        matches!(self, Error::MissingUrl | Error::Encoding(_))
    }

    /// The HTTP status behind a status-classified failure, if there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Auth(status) | Error::Upstream(status) => Some(*status),
            _ => None,
        }
    }
}

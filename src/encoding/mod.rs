//! Parameter encoding.
//!
//! Two small encoders mutate a [`RequestDraft`]: [`json`] serializes body
//! parameters into a JSON payload, [`query`] rewrites the URL query string.
//! [`ParameterEncoding`] selects which of them run for a given task and
//! applies the matching `Content-Type` default afterwards.
//!
//! The two encoders write to disjoint parts of the draft (body vs. query
//! string), so combining them in [`ParameterEncoding::Both`] never has one
//! overwrite the other's work.
//!
//! # Examples
//!
//! ```
//! use lane_http::{Method, ParameterEncoding, Parameters, RequestDraft};
//! use url::Url;
//!
//! let mut draft = RequestDraft::with_url(
//!     Method::Get,
//!     Url::parse("https://example.com/search").unwrap(),
//! );
//! let mut query = Parameters::new();
//! query.insert("q".to_string(), "rust".into());
//!
//! ParameterEncoding::Url.encode(&mut draft, None, Some(&query)).unwrap();
//!
//! assert_eq!(draft.url.unwrap().query(), Some("q=rust"));
//! assert_eq!(
//!     draft.headers.get("Content-Type").map(String::as_str),
//!     Some("application/x-www-form-urlencoded; charset=utf-8"),
//! );
//! ```

pub mod json;
pub mod query;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Parameters, RequestDraft};

/// `Content-Type` default applied after URL encoding.
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// `Content-Type` default applied after JSON encoding.
const JSON_CONTENT_TYPE: &str = "application/json";

/// Which parameter-attachment strategy applies to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterEncoding {
    /// Rewrite the URL query string from the query parameters.
    Url,
    /// Serialize the body parameters as a JSON body.
    Json,
    /// JSON body first, then URL query. This mode applies no `Content-Type`
    /// default; callers that need one set it through headers.
    Both,
}

impl ParameterEncoding {
    /// Run the selected encoder(s) against `draft`.
    ///
    /// An absent parameter set skips its encoder entirely, including the
    /// `Content-Type` default. The first encoder failure aborts any
    /// remaining steps and leaves the draft as far as it got.
    pub fn encode(
        &self,
        draft: &mut RequestDraft,
        body: Option<&Parameters>,
        query: Option<&Parameters>,
    ) -> Result<()> {
        match self {
            ParameterEncoding::Url => {
                if let Some(params) = query {
                    query::encode(draft, params)?;
                    draft.set_header_if_absent("Content-Type", FORM_CONTENT_TYPE);
                }
            }
            ParameterEncoding::Json => {
                if let Some(params) = body {
                    json::encode(draft, params)?;
                    draft.set_header_if_absent("Content-Type", JSON_CONTENT_TYPE);
                }
            }
            ParameterEncoding::Both => {
                if let Some(params) = body {
                    json::encode(draft, params)?;
                }
                if let Some(params) = query {
                    query::encode(draft, params)?;
                }
            }
        }
        Ok(())
    }
}

//! URL query encoder.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::{Parameters, RequestDraft};

/// Rewrite the query string of the draft URL with one pair per parameter.
///
/// Existing query items are dropped, not merged. An empty parameter map
/// leaves the URL untouched. Values are flattened to their plain string form
/// and percent-encoded as query components; arrays and objects are carried
/// as their JSON text rather than expanded into multiple pairs.
///
/// Fails with [`Error::MissingUrl`] when the draft has no URL yet.
pub fn encode(draft: &mut RequestDraft, params: &Parameters) -> Result<()> {
    let url = draft.url.as_mut().ok_or(Error::MissingUrl)?;
    if params.is_empty() {
        return Ok(());
    }

    let mut pairs = url.query_pairs_mut();
    pairs.clear();
    for (key, value) in params {
        pairs.append_pair(key, &plain_text(value));
    }
    drop(pairs);

    Ok(())
}

/// Plain-text form of a parameter value: strings lose their JSON quotes,
/// everything else keeps its JSON rendering.
fn plain_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

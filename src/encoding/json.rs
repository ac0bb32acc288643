//! JSON body encoder.

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::types::{Parameters, RequestDraft};

/// Serialize `params` as a JSON object and install it as the draft body,
/// replacing any previous body.
///
/// The installed bytes are exactly what `serde_json` produces for the same
/// map; nothing is reformatted on the way in. Failures from the serializer
/// surface as [`Error::Encoding`] and leave the body as it was.
pub fn encode(draft: &mut RequestDraft, params: &Parameters) -> Result<()> {
    let body = serde_json::to_vec(params).map_err(|e| Error::Encoding(e.to_string()))?;
    draft.body = Some(Bytes::from(body));
    Ok(())
}

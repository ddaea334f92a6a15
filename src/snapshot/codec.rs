//! Snapshot codec
//!
//! Encoding and decoding between the in-memory mapping and JSON bytes.
//! Stateless: the codec only transforms data handed to it.
//!
//! Key order in the encoded document is not semantically meaningful.

use crate::error::{Result, SnapError};
use super::Mapping;

/// Encode the mapping as a JSON object
///
/// Succeeds for any mapping of JSON-representable values, which is the
/// only kind the store accepts.
pub fn encode(mapping: &Mapping) -> Result<Vec<u8>> {
    serde_json::to_vec(mapping).map_err(SnapError::Encode)
}

/// Decode JSON bytes into a mapping
///
/// `{}` decodes to an empty mapping. An entirely empty input is treated
/// the same way, so a freshly-created or truncated snapshot file loads
/// as an empty store. Malformed JSON is a `Decode` error.
pub fn decode(bytes: &[u8]) -> Result<Mapping> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Mapping::new());
    }
    serde_json::from_slice(bytes).map_err(SnapError::Decode)
}

//! Canonical segment codec
//!
//! Structured values are serialized to compact JSON and wrapped in unpadded
//! base64url. Decoding restores the stripped padding before the base64 step.
//! Struct field order and serde_json's sorted object maps make the output
//! deterministic, which matters because the encoded segments are what gets
//! signed.

use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Segment encoding/decoding failures
#[derive(Debug, Error)]
pub enum CodecError {
    /// Segment text is not valid base64url
    #[error("segment is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    /// Decoded bytes are not a valid serialized value of the expected shape
    #[error("segment is not a valid JSON value: {0}")]
    Json(#[source] serde_json::Error),
    /// Value could not be serialized
    #[error("value cannot be serialized: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Encode a value as an unpadded base64url JSON segment
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, CodecError> {
    let json = serde_json::to_vec(value).map_err(CodecError::Serialize)?;
    let mut text = URL_SAFE.encode(json);
    let unpadded = text.trim_end_matches('=').len();
    text.truncate(unpadded);
    tracing::trace!(len = text.len(), "encoded segment");
    Ok(text)
}

/// Decode a segment produced by [`encode`]
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, CodecError> {
    let padded = restore_padding(text);
    let bytes = URL_SAFE.decode(padded.as_bytes())?;
    serde_json::from_slice(&bytes).map_err(CodecError::Json)
}

/// Wrap hex signature text as a JSON string segment
pub fn encode_signature(signature_hex: &str) -> Result<String, CodecError> {
    encode(signature_hex)
}

/// Decode a signature segment back to its hex text
pub fn decode_signature(text: &str) -> Result<String, CodecError> {
    decode::<String>(text)
}

/// Pad to a multiple of four characters with `=`
fn restore_padding(text: &str) -> String {
    let missing = (4 - text.len() % 4) % 4;
    let mut padded = String::with_capacity(text.len() + missing);
    padded.push_str(text);
    padded.extend(std::iter::repeat('=').take(missing));
    padded
}

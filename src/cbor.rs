//! CBOR encoding and decoding of IAM payloads

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Encode a value as a CBOR request payload
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut cbor_bytes = Vec::new();
    ciborium::into_writer(value, &mut cbor_bytes).map_err(|e| Error::CborEncode(e.to_string()))?;
    Ok(cbor_bytes)
}

/// Decode a CBOR response payload
///
/// An empty payload is reported as a decode error rather than a default value.
pub fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T> {
    if payload.is_empty() {
        return Err(Error::CborDecode("empty payload".to_string()));
    }
    ciborium::from_reader(payload).map_err(|e| Error::CborDecode(e.to_string()))
}

/// Map with a single `Username` entry, the body of user creation and open pairing
#[derive(Debug, Serialize)]
pub(crate) struct UsernameBody<'a> {
    #[serde(rename = "Username")]
    pub username: &'a str,
}

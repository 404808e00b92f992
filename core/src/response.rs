//! Normalized result of every API operation.
//!
//! Every operation returns the HTTP status unconditionally together with the
//! body, decoded as JSON when it parses and kept as the original text when
//! it does not. A body that is neither JSON nor UTF-8 is kept as bytes.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::types::AuthKey;

/// Response payload: JSON when the body parses, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    /// Not JSON and not valid UTF-8; the bytes exactly as received.
    Bytes(Vec<u8>),
}

impl ResponseBody {
    /// Decode `raw` as JSON, falling back to the unchanged text or bytes.
    pub fn decode(raw: impl Into<Vec<u8>>) -> Self {
        let raw = raw.into();
        if let Ok(value) = serde_json::from_slice(&raw) {
            return ResponseBody::Json(value);
        }
        match String::from_utf8(raw) {
            Ok(text) => ResponseBody::Text(text),
            Err(err) => ResponseBody::Bytes(err.into_bytes()),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The raw body for the non-JSON cases.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ResponseBody::Json(_) => None,
            ResponseBody::Text(text) => Some(text.as_bytes()),
            ResponseBody::Bytes(bytes) => Some(bytes),
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, ResponseBody::Json(_))
    }
}

/// `(status, body)` pair returned by every `ApiClient` operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    /// Deserialize a JSON body into `T`.
    ///
    /// Fails with `ApiError::Deserialization` when the body is text or does
    /// not have the shape of `T`. The status code is not consulted.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        match &self.body {
            ResponseBody::Json(value) => T::deserialize(value)
                .map_err(|e| ApiError::Deserialization(e.to_string())),
            ResponseBody::Text(text) => Err(ApiError::Deserialization(format!(
                "expected a JSON body, got text: {text:?}"
            ))),
            ResponseBody::Bytes(bytes) => Err(ApiError::Deserialization(format!(
                "expected a JSON body, got {} non-UTF-8 bytes",
                bytes.len()
            ))),
        }
    }

    /// The credential carried by a `get_api_key` response, if any.
    pub fn auth_key(&self) -> Option<AuthKey> {
        self.deserialize().ok()
    }
}

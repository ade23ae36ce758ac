//! JSON-RPC request and response envelopes exchanged with MI.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const JSONRPC_VERSION: &str = "2.0";

/// MI requests are never pipelined, so a constant id is sufficient.
pub const REQUEST_ID: &str = "1";

/// The request never produced an HTTP response (refused, timed out, DNS).
pub const NETWORK_ERROR: i64 = -32000;

/// MI answered with a non-2xx status.
pub const HTTP_ERROR: i64 = -32001;

/// MI answered 2xx but the body is not a JSON-RPC envelope.
pub const PARSE_ERROR: i64 = -32700;

/// Outgoing MI command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MiRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: &'static str,
    pub method: &'a str,
}

impl<'a> MiRequest<'a> {
    pub fn new(method: &'a str) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: REQUEST_ID,
            method,
        }
    }
}

/// JSON-RPC response envelope, either parsed from MI or synthesized from a
/// local failure.
///
/// A parsed envelope serializes back to the same JSON object: an explicit
/// `null` stays `null`, an absent member stays absent, and members not
/// modelled here are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiResponse {
    pub jsonrpc: String,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<MiError>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MiResponse {
    /// Envelope carrying a locally classified failure.
    pub fn failure(error: MiError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id: Some(Value::from(REQUEST_ID)),
            extra: Map::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// JSON-RPC error object.
///
/// `status` and `raw` are only set for failures classified on this side.
/// Anything else the switch sends (e.g. `data`) is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Map a member that is present (even as `null`) to `Some`; `default`
/// covers the absent case.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl MiError {
    pub fn network(cause: impl fmt::Display) -> Self {
        Self {
            code: NETWORK_ERROR,
            message: format!("Network error calling MI: {cause}"),
            status: None,
            raw: None,
            extra: Map::new(),
        }
    }

    pub fn http(status: u16, raw: String) -> Self {
        Self {
            code: HTTP_ERROR,
            message: format!("HTTP {status} from MI"),
            status: Some(status),
            raw: Some(raw),
            extra: Map::new(),
        }
    }

    pub fn parse(raw: String) -> Self {
        Self {
            code: PARSE_ERROR,
            message: "Parse error: non-JSON response from MI".to_string(),
            status: None,
            raw: Some(raw),
            extra: Map::new(),
        }
    }
}

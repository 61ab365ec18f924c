//! API Gateway Adapter.
//!
//! Every outbound call goes through [`Gateway::call`], which never fails:
//! transport errors, non-success statuses and unparseable bodies are all
//! encoded in the returned [`ApiResponse`]. Callers decide purely on
//! `response.success`.

pub mod endpoints;
pub mod http;
pub mod types;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use self::http::HttpGateway;
pub use reqwest::Method;

pub const CONNECTION_ERROR_MESSAGE: &str = "Erro ao conectar com o servidor.";

/// Normalized `{success, message, ...payload}` result of an API call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl ApiResponse {
    pub fn http_error(status: u16) -> Self {
        Self {
            success: false,
            message: Some(format!("Erro HTTP {}", status)),
            payload: Map::new(),
        }
    }

    pub fn connection_error() -> Self {
        Self {
            success: false,
            message: Some(CONNECTION_ERROR_MESSAGE.to_string()),
            payload: Map::new(),
        }
    }

    /// Parse a response body. Anything that is not a JSON object with a
    /// well-formed `success`/`message` is treated as an empty object.
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// Deserialize one payload field; `None` if absent, null or malformed.
    pub fn field<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.payload.get(key) {
            None | Some(Value::Null) => None,
            Some(v) => serde_json::from_value(v.clone()).ok(),
        }
    }

    pub fn has_field(&self, key: &str) -> bool {
        !matches!(self.payload.get(key), None | Some(Value::Null))
    }

    /// The server message when present and non-blank, else `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

/// Strip leading slashes so `"x"` and `"/x"` address the same resource.
pub fn normalize_path(path: &str) -> &str {
    path.trim_start_matches('/')
}

/// Outbound RPC boundary. Implementations must never panic or return early
/// with an error; every failure mode is an `ApiResponse` with `success: false`.
#[allow(async_fn_in_trait)]
pub trait Gateway {
    async fn call(&self, path: &str, method: Method, body: Option<Value>) -> ApiResponse;
}

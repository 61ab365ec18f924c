use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, warn};

use super::{normalize_path, ApiResponse, Gateway, Method};
use crate::config::ClientConfig;
use crate::session::Session;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const USER_ROLE_HEADER: &str = "X-User-Role";

/// reqwest-backed gateway. Attaches the acting user's identity headers when
/// the session has them and omits them otherwise, letting the server decide.
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    session: Session,
}

impl HttpGateway {
    /// `base_url` must be absolute, e.g. `http://localhost:5000/api`.
    pub fn new(base_url: &str, session: Session, config: &ClientConfig) -> Self {
        Self {
            client: build_client(config),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, normalize_path(path))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_client(config: &ClientConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()
        .unwrap_or_else(|e| {
            warn!("Failed to build HTTP client with timeout: {}, using defaults", e);
            reqwest::Client::new()
        })
}

#[cfg(target_arch = "wasm32")]
fn build_client(_config: &ClientConfig) -> reqwest::Client {
    reqwest::Client::new()
}

impl Gateway for HttpGateway {
    async fn call(&self, path: &str, method: Method, body: Option<Value>) -> ApiResponse {
        let url = self.url_for(path);
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(user_id) = &self.session.user_id {
            request = request.header(USER_ID_HEADER, user_id.as_str());
        }
        if let Some(role) = self.session.role.as_str() {
            request = request.header(USER_ROLE_HEADER, role);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("API request {} {} failed: {}", method, url, e);
                return ApiResponse::connection_error();
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("API request {} {} returned HTTP {}", method, url, status.as_u16());
            return ApiResponse::http_error(status.as_u16());
        }

        let text = match response.text().await {
            Ok(t) => t,
            Err(e) => {
                warn!("Failed to read response body from {}: {}", url, e);
                String::new()
            }
        };
        ApiResponse::from_body(&text)
    }
}

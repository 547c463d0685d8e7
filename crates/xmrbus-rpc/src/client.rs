//! HTTP JSON-RPC client backed by `reqwest`.
//!
//! One client per RPC endpoint, posting every request to `<host>/json_rpc`.
//! A single call either returns the typed result or fails; the pipeline's
//! contract is one attempt per invocation, so there is no retry policy here.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::RpcError;
use crate::request::{JsonRpcRequest, JsonRpcResponse};

/// Configuration for [`HttpRpcClient`].
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub request_timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            // The Monero RPC servers answer well within this under normal load.
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP JSON-RPC client for a single endpoint.
pub struct HttpRpcClient {
    url: String,
    http: reqwest::Client,
    request_timeout: Duration,
}

impl HttpRpcClient {
    /// Create a new client for the given RPC host URL.
    ///
    /// The `json_rpc` base path is appended here, so callers pass the plain
    /// host URL (e.g. `http://localhost:38081`).
    pub fn new(host: impl Into<String>, config: HttpClientConfig) -> Self {
        let host = host.into();
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("failed to build reqwest client");

        Self {
            url: format!("{}/json_rpc", host.trim_end_matches('/')),
            http,
            request_timeout: config.request_timeout,
        }
    }

    /// Create with default configuration.
    pub fn default_for(host: impl Into<String>) -> Self {
        Self::new(host, HttpClientConfig::default())
    }

    /// The full endpoint URL requests are posted to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Call `method` with typed `params` and deserialize the typed result.
    pub async fn call<P, T>(&self, method: &str, params: P) -> Result<T, RpcError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let req = JsonRpcRequest::new(method, params);

        let resp = self
            .http
            .post(&self.url)
            .json(&req)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(RpcError::Http(format!("HTTP {status}: {body}")));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let resp: JsonRpcResponse<T> = serde_json::from_slice(&body)?;
        resp.into_result()
    }

    fn map_send_error(&self, e: reqwest::Error) -> RpcError {
        if e.is_timeout() {
            RpcError::Timeout {
                ms: self.request_timeout.as_millis() as u64,
            }
        } else {
            RpcError::Http(e.to_string())
        }
    }
}

/*
[INPUT]:  HTTP configuration (RPC URL, timeouts)
[OUTPUT]: Configured reqwest client issuing JSON-RPC 2.0 requests
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::http::{LedgerError, Result};

/// Public RPC endpoint of Arc Testnet
pub const DEFAULT_RPC_URL: &str = "https://rpc.testnet.arc.network";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<R> {
    #[allow(dead_code)]
    id: Option<serde_json::Value>,
    result: Option<R>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC client for an EVM node or wallet-backed endpoint
#[derive(Debug)]
pub struct RpcClient {
    http_client: Client,
    rpc_url: Url,
    timeout: Duration,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Create a new client with default configuration
    pub fn new(rpc_url: &str) -> Result<Self> {
        Self::with_config(ClientConfig::default(), rpc_url)
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig, rpc_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            rpc_url: Url::parse(rpc_url)?,
            timeout: config.timeout,
            next_id: AtomicU64::new(1),
        })
    }

    /// Issue a JSON-RPC call; `Ok(None)` when the node returns `null`
    pub async fn request_optional<P, R>(&self, method: &str, params: P) -> Result<Option<R>>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        debug!(id, method, "rpc request");

        let response = self
            .http_client
            .post(self.rpc_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    LedgerError::Timeout {
                        duration: self.timeout.as_secs(),
                    }
                } else {
                    LedgerError::Http(err)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(method, %status, "rpc http error");
            return Err(LedgerError::InvalidResponse(format!(
                "HTTP {status} from {method}: {text}"
            )));
        }

        let payload: RpcResponse<R> = response.json().await?;
        if let Some(error) = payload.error {
            debug!(method, code = error.code, message = %error.message, "rpc error");
            return Err(LedgerError::from_rpc(error.code, error.message));
        }
        Ok(payload.result)
    }

    /// Issue a JSON-RPC call whose result must be present
    pub async fn request<P, R>(&self, method: &str, params: P) -> Result<R>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        self.request_optional(method, params)
            .await?
            .ok_or_else(|| LedgerError::InvalidResponse(format!("{method} returned null")))
    }
}

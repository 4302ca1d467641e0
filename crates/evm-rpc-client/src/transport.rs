//! JSON-RPC transport abstraction
//!
//! The client talks to the chain through this seam so protocol code can be
//! exercised against an in-memory transport in tests.

use async_trait::async_trait;
use lockboard_core::GatewayError;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// Default timeout for RPC calls (30 seconds).
/// Long enough for slow endpoints, short enough to avoid perpetual spinners.
const RPC_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Raw JSON-RPC 2.0 request issuer
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one JSON-RPC request and return the `result` value.
    async fn request(&self, method: &str, params: Value) -> Result<Value, GatewayError>;
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// HTTP JSON-RPC transport backed by reqwest
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>) -> Result<Self, GatewayError> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .user_agent("lockboard")
            .timeout(RPC_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Unreachable {
                url: format!("{}: {}", url, e),
            })?;

        Ok(Self {
            client,
            url,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, GatewayError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable {
                url: format!("{}: {}", self.url, e),
            })?;

        let parsed: RpcResponse =
            response
                .json()
                .await
                .map_err(|e| GatewayError::MalformedResponse {
                    message: format!("invalid JSON-RPC envelope: {}", e),
                })?;

        if let Some(err) = parsed.error {
            return Err(GatewayError::RpcError {
                code: err.code,
                message: err.message,
            });
        }

        parsed.result.ok_or_else(|| GatewayError::MalformedResponse {
            message: "JSON-RPC response carried neither result nor error".to_string(),
        })
    }
}

#[cfg(any(test, feature = "test-util"))]
pub mod mock {
    //! In-memory transport for tests: canned responses keyed by method,
    //! with call recording for assertions.

    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockTransport {
        responses: Mutex<HashMap<String, Vec<Result<Value, GatewayError>>>>,
        pub calls: Mutex<Vec<(String, Value)>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a response for a method. Responses are consumed in FIFO
        /// order; the last one sticks for any further calls.
        pub fn expect(&self, method: &str, response: Result<Value, GatewayError>) {
            self.responses
                .lock()
                .unwrap()
                .entry(method.to_string())
                .or_default()
                .push(response);
        }

        pub fn call_count(&self, method: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|(m, _)| m == method)
                .count()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn request(&self, method: &str, params: Value) -> Result<Value, GatewayError> {
            self.calls
                .lock()
                .unwrap()
                .push((method.to_string(), params));

            let mut responses = self.responses.lock().unwrap();
            let queue = responses
                .get_mut(method)
                .ok_or_else(|| GatewayError::RpcError {
                    code: -32601,
                    message: format!("no canned response for {}", method),
                })?;

            let response = if queue.len() > 1 {
                queue.remove(0)
            } else {
                clone_result(queue.first().ok_or_else(|| GatewayError::RpcError {
                    code: -32601,
                    message: format!("canned responses for {} exhausted", method),
                })?)
            };
            response
        }
    }

    fn clone_result(r: &Result<Value, GatewayError>) -> Result<Value, GatewayError> {
        match r {
            Ok(v) => Ok(v.clone()),
            Err(GatewayError::Unreachable { url }) => {
                Err(GatewayError::Unreachable { url: url.clone() })
            }
            Err(GatewayError::RpcError { code, message }) => Err(GatewayError::RpcError {
                code: *code,
                message: message.clone(),
            }),
            Err(GatewayError::MalformedResponse { message }) => {
                Err(GatewayError::MalformedResponse {
                    message: message.clone(),
                })
            }
            Err(GatewayError::TxNotFound { tx_hash }) => Err(GatewayError::TxNotFound {
                tx_hash: tx_hash.clone(),
            }),
        }
    }
}

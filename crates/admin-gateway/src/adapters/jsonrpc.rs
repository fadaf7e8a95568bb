//! JSON-RPC 2.0 over HTTP client for the backend administrative service.
//!
//! One pooled `reqwest::Client` is shared by every in-flight request.

use crate::dispatch::deadline::DeadlineScope;
use crate::domain::config::BackendConfig;
use crate::domain::correlation::CorrelationId;
use crate::domain::error::{codes, GatewayError, TransportError};
use crate::ports::outbound::{AdminBackend, RpcFailure};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

/// JSON-RPC request structure.
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: CorrelationId,
}

/// JSON-RPC response structure.
#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    #[serde(default)]
    id: Option<Value>,
    /// `Some(Value::Null)` for an explicit `"result": null`, `None` when absent
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

fn present<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// JSON-RPC error structure.
#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl JsonRpcError {
    /// Domain code carried in `data.status`, else a name for the standard
    /// JSON-RPC code, else the numeric code itself.
    fn domain_code(&self) -> String {
        if let Some(status) = self
            .data
            .as_ref()
            .and_then(|d| d.get("status"))
            .and_then(Value::as_str)
        {
            return status.to_string();
        }
        match self.code {
            -32700 | -32600 | -32602 => codes::INVALID_ARGUMENT.to_string(),
            -32601 => codes::UNIMPLEMENTED.to_string(),
            -32603 => codes::INTERNAL.to_string(),
            other => other.to_string(),
        }
    }
}

/// Backend client speaking JSON-RPC 2.0 over HTTP POST.
pub struct JsonRpcBackend {
    http_client: reqwest::Client,
    endpoint: String,
}

impl JsonRpcBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(concat!("admin-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Backend(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Deadline
    } else if e.is_connect() || e.is_request() {
        TransportError::Unreachable(e.to_string())
    } else {
        TransportError::Protocol(e.to_string())
    }
}

#[async_trait]
impl AdminBackend for JsonRpcBackend {
    async fn call(
        &self,
        id: CorrelationId,
        method: &'static str,
        params: Value,
        scope: &DeadlineScope,
    ) -> Result<Value, RpcFailure> {
        let remaining = scope.remaining();
        if remaining.is_zero() {
            return Err(TransportError::Deadline.into());
        }

        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };

        trace!(method, %id, "sending backend request");
        let response = self
            .http_client
            .post(&self.endpoint)
            .timeout(remaining)
            .json(&request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let body = response.bytes().await.map_err(classify)?;

        let reply: JsonRpcResponse = match serde_json::from_slice(&body) {
            Ok(reply) => reply,
            Err(e) if status.is_server_error() => {
                debug!(method, %status, error = %e, "backend returned non JSON-RPC error");
                return Err(TransportError::Protocol(format!("backend returned {status}")).into());
            }
            Err(e) => return Err(TransportError::Protocol(e.to_string()).into()),
        };

        if reply.jsonrpc != "2.0" {
            return Err(TransportError::Protocol(format!(
                "unsupported jsonrpc version '{}'",
                reply.jsonrpc
            ))
            .into());
        }
        if let Some(reply_id) = reply.id.as_ref().and_then(Value::as_str) {
            if !id.matches_reply(reply_id) {
                return Err(TransportError::Protocol(format!(
                    "reply id {reply_id} does not match request {id}"
                ))
                .into());
            }
        }

        match (reply.error, reply.result) {
            (Some(error), _) => Err(RpcFailure::Domain {
                code: error.domain_code(),
                message: error.message,
            }),
            (None, Some(result)) => Ok(result),
            (None, None) => Err(TransportError::Protocol(
                "reply carries neither result nor error".to_string(),
            )
            .into()),
        }
    }
}

use ledger_api::LedgerError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: String,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    data: Option<Value>,
}

impl From<RpcErrorObject> for LedgerError {
    fn from(err: RpcErrorObject) -> Self {
        // Nodes put the revert reason or nested provider error in `data`.
        let message = match err.data {
            Some(Value::String(data)) => format!("{} ({})", err.message, data),
            Some(Value::Object(obj)) => match obj.get("message").and_then(Value::as_str) {
                Some(inner) => format!("{} ({})", err.message, inner),
                None => err.message,
            },
            _ => err.message,
        };
        LedgerError::Rpc {
            code: err.code,
            message,
        }
    }
}

/// JSON-RPC 2.0 over HTTP POST.
#[derive(Debug, Clone)]
pub struct JsonRpcClient {
    http: Client,
    url: String,
    access_token: Option<String>,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>, access_token: Option<String>) -> Self {
        JsonRpcClient {
            http: Client::new(),
            url: url.into(),
            access_token,
        }
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, LedgerError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: format!("request-{}", uuid::Uuid::new_v4()),
            method,
            params,
        };
        debug!("JSON-RPC request to {}: {:?}", self.url, request);

        let mut builder = self.http.post(&self.url).json(&request);
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send().await.map_err(|e| {
            error!("Error at {}:{} - {:?}", file!(), line!(), e);
            LedgerError::Transport(format!("{} failed: {}", method, e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            return Err(LedgerError::Transport(format!(
                "{} returned HTTP {}: {}",
                method, status, body
            )));
        }

        let envelope: RpcResponse = response
            .json()
            .await
            .map_err(|e| LedgerError::Decode(format!("{} response: {}", method, e)))?;
        debug!("JSON-RPC response for {}: {:?}", method, envelope);

        if let Some(err) = envelope.error {
            return Err(err.into());
        }
        serde_json::from_value(envelope.result)
            .map_err(|e| LedgerError::Decode(format!("{} result: {}", method, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_request_returns_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"jsonrpc": "2.0", "method": "eth_chainId"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"jsonrpc": "2.0", "id": "x", "result": "0x539"})),
            )
            .mount(&server)
            .await;

        let client = JsonRpcClient::new(server.uri(), None);
        let chain_id: String = client.request("eth_chainId", json!([])).await.unwrap();
        assert_eq!(chain_id, "0x539");
    }

    #[tokio::test]
    async fn test_request_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"jsonrpc": "2.0", "id": "x", "result": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = JsonRpcClient::new(server.uri(), Some("secret".to_string()));
        let accounts: Vec<String> = client.request("eth_accounts", json!([])).await.unwrap();
        assert!(accounts.is_empty());
    }

    #[tokio::test]
    async fn test_error_object_keeps_code_and_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": "x",
                "error": {"code": -32000, "message": "execution reverted", "data": "Not enough tickets"}
            })))
            .mount(&server)
            .await;

        let client = JsonRpcClient::new(server.uri(), None);
        let err = client
            .request::<String>("eth_estimateGas", json!([]))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::Rpc {
                code: -32000,
                message: "execution reverted (Not enough tickets)".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_http_failure_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let client = JsonRpcClient::new(server.uri(), None);
        let err = client
            .request::<String>("eth_blockNumber", json!([]))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Transport(msg) if msg.contains("503")));
    }
}

//! Node API adapter for read-only contract calls.
//!
//! `POST {base}/v2/contracts/call-read/{address}/{name}/{function}` with the
//! arguments wire-encoded as `0x` hex. Failures are reported with the node's
//! own wording so the gateway can classify them.

use std::time::Duration;

use async_trait::async_trait;
use insc_core::config::HttpConfig;
use insc_core::ports::{ReadOnlyCall, ReadOnlyCallPort};
use insc_core::value::wire;
use insc_core::{CallError, Network, StructuredValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const MAINNET_API_URL: &str = "https://api.hiro.so";
pub const TESTNET_API_URL: &str = "https://api.testnet.hiro.so";
pub const DEVNET_API_URL: &str = "http://localhost:3999";

pub fn default_api_url(network: Network) -> &'static str {
    match network {
        Network::Mainnet => MAINNET_API_URL,
        Network::Testnet => TESTNET_API_URL,
        Network::Devnet => DEVNET_API_URL,
    }
}

#[derive(Debug, Serialize)]
struct CallReadRequest<'a> {
    sender: &'a str,
    arguments: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CallReadResponse {
    okay: bool,
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    cause: Option<String>,
}

pub struct StacksApiClient {
    http: reqwest::Client,
    /// Replaces the per-network default when set.
    api_url: Option<String>,
}

impl StacksApiClient {
    pub fn new(config: &HttpConfig, api_url: Option<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self::with_client(http, api_url))
    }

    pub fn with_client(http: reqwest::Client, api_url: Option<String>) -> Self {
        Self {
            http,
            api_url: api_url.map(|url| url.trim_end_matches('/').to_string()),
        }
    }

    fn endpoint(&self, call: &ReadOnlyCall) -> String {
        let base = self
            .api_url
            .as_deref()
            .unwrap_or_else(|| default_api_url(call.network));
        format!(
            "{base}/v2/contracts/call-read/{}/{}/{}",
            call.contract_address, call.contract_name, call.function_name
        )
    }
}

#[async_trait]
impl ReadOnlyCallPort for StacksApiClient {
    async fn call_read_only(&self, call: &ReadOnlyCall) -> Result<StructuredValue, CallError> {
        let arguments = call
            .args
            .iter()
            .map(wire::to_hex)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| CallError::new(format!("failed to encode arguments: {err}")))?;
        let url = self.endpoint(call);
        debug!(url = %url, args = arguments.len(), "POST call-read");

        let response = self
            .http
            .post(&url)
            .json(&CallReadRequest {
                sender: &call.sender,
                arguments,
            })
            .send()
            .await
            .map_err(|err| CallError::new(format!("request to {url} failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // StatusCode renders with its reason, e.g. "429 Too Many Requests".
            return Err(CallError::new(format!("HTTP {status}: {}", body.trim())));
        }

        let body: CallReadResponse = response
            .json()
            .await
            .map_err(|err| CallError::new(format!("invalid call-read response: {err}")))?;

        if !body.okay {
            return Err(CallError::new(
                body.cause
                    .unwrap_or_else(|| "read-only call was rejected".to_string()),
            ));
        }
        let result = body
            .result
            .ok_or_else(|| CallError::new("call-read response has no result"))?;
        wire::from_hex(&result)
            .map_err(|err| CallError::new(format!("invalid result payload: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insc_core::ErrorClass;
    use mockito::{Matcher, Server};

    const ADDRESS: &str = "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7";
    const SENDER: &str = "SP000000000000000000002Q6VF78";

    fn call(function_name: &str, args: Vec<StructuredValue>) -> ReadOnlyCall {
        ReadOnlyCall {
            contract_address: ADDRESS.to_string(),
            contract_name: "inscriptions".to_string(),
            function_name: function_name.to_string(),
            args,
            sender: SENDER.to_string(),
            network: Network::Mainnet,
        }
    }

    fn client(url: String) -> StacksApiClient {
        StacksApiClient::new(&HttpConfig::default(), Some(url)).unwrap()
    }

    fn path(function_name: &str) -> String {
        format!("/v2/contracts/call-read/{ADDRESS}/inscriptions/{function_name}")
    }

    #[tokio::test]
    async fn posts_encoded_arguments_and_decodes_result() {
        let mut server = Server::new_async().await;
        let uint_7 = format!("0x01{}07", "00".repeat(15));
        let ok_uint_5 = format!("0x0701{}05", "00".repeat(15));
        let mock = server
            .mock("POST", path("get-owner").as_str())
            .match_body(Matcher::Json(serde_json::json!({
                "sender": SENDER,
                "arguments": [uint_7],
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::json!({ "okay": true, "result": ok_uint_5 }).to_string())
            .create_async()
            .await;

        let value = client(server.url())
            .call_read_only(&call("get-owner", vec![StructuredValue::uint(7u8)]))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(value, StructuredValue::ok(StructuredValue::uint(5u8)));
    }

    #[tokio::test]
    async fn rate_limit_status_is_classified() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", path("get-chunk").as_str())
            .with_status(429)
            .with_body("slow down")
            .create_async()
            .await;

        let err = client(server.url())
            .call_read_only(&call("get-chunk", vec![]))
            .await
            .unwrap_err();

        assert!(err.message().contains("429 Too Many Requests"));
        assert_eq!(err.classify(), ErrorClass::RateLimited);
    }

    #[tokio::test]
    async fn rejected_call_carries_cause_verbatim() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", path("get-chunk").as_str())
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "okay": false,
                    "cause": "Unchecked(NoSuchContract(\"SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7.inscriptions\"))"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let err = client(server.url())
            .call_read_only(&call("get-chunk", vec![]))
            .await
            .unwrap_err();

        assert!(err.message().starts_with("Unchecked(NoSuchContract"));
        assert_eq!(err.classify(), ErrorClass::Permanent);
    }

    #[tokio::test]
    async fn server_errors_are_transient() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", path("get-chunk").as_str())
            .with_status(502)
            .create_async()
            .await;

        let err = client(server.url())
            .call_read_only(&call("get-chunk", vec![]))
            .await
            .unwrap_err();
        assert!(err.message().starts_with("HTTP 502"));
        assert_eq!(err.classify(), ErrorClass::Transient);
    }

    #[tokio::test]
    async fn malformed_result_is_an_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", path("get-chunk").as_str())
            .with_status(200)
            .with_body(r#"{"okay":true,"result":"0xff"}"#)
            .create_async()
            .await;

        let err = client(server.url())
            .call_read_only(&call("get-chunk", vec![]))
            .await
            .unwrap_err();
        assert!(err.message().contains("invalid result payload"));
    }

    #[test]
    fn default_urls_follow_network() {
        let client = StacksApiClient::with_client(reqwest::Client::new(), None);
        let mut testnet = call("get-admin", vec![]);
        testnet.network = Network::Testnet;
        assert_eq!(
            client.endpoint(&testnet),
            format!("{TESTNET_API_URL}{}", path("get-admin"))
        );

        let overridden =
            StacksApiClient::with_client(reqwest::Client::new(), Some("http://node:20443/".into()));
        assert_eq!(
            overridden.endpoint(&testnet),
            format!("http://node:20443{}", path("get-admin"))
        );
    }
}

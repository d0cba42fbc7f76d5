//! Blockchair API client
//!
//! One authenticated GET per operation against a fixed base host. Responses
//! are classified into the three [`ErrorKind`](crate::ErrorKind)s:
//!
//! - missing credential: `Config`, raised before any request is built
//! - HTTP 402: `Authorization`
//! - anything else going wrong: `Transient`
//!
//! # Security
//!
//! The credential travels in the `key` query parameter. It is never logged
//! and never included in error messages.

use async_trait::async_trait;
use blockchair_core::{ChainStats, StatsSnapshot, TransactionSummary};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;
use crate::{Error, Result};

/// Operations the dashboard needs from the upstream service
#[async_trait]
pub trait BlockchainApi: Send + Sync {
    /// Aggregated statistics for every chain (`/stats`)
    async fn general_stats(&self) -> Result<StatsSnapshot>;

    /// Statistics for one chain (`/{chain}/stats`)
    async fn chain_stats(&self, chain: &str) -> Result<ChainStats>;

    /// Latest transactions of one chain (`/{chain}/transactions`)
    async fn recent_transactions(&self, chain: &str, limit: u32)
    -> Result<Vec<TransactionSummary>>;

    /// Address dashboard, returned as found under `data`
    async fn address(&self, chain: &str, address: &str) -> Result<Value>;

    /// Transaction dashboard, returned as found under `data`
    async fn transaction(&self, chain: &str, txid: &str) -> Result<Value>;
}

/// HTTP client for the Blockchair REST API
pub struct BlockchairClient {
    client: Client,
    base_url: Url,
    credential: Option<String>,
}

impl BlockchairClient {
    /// Create a client from configuration.
    ///
    /// A missing credential does not fail construction; every operation
    /// fails with a configuration error instead.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the base URL is invalid.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| Error::Config(format!("Invalid base URL '{}': {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "Invalid base URL '{}': cannot be a base",
                config.base_url
            )));
        }

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            credential: config.credential.clone().filter(|c| !c.is_empty()),
        })
    }

    /// Whether a credential is configured
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Build the authenticated URL for `segments` below the base URL.
    ///
    /// Segments are percent-encoded individually, so user input cannot
    /// escape its path position.
    pub fn build_url(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url> {
        let credential = self
            .credential
            .as_deref()
            .ok_or_else(Error::credential_missing)?;

        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| Error::Config("base URL cannot be a base".to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
            pairs.append_pair("key", credential);
        }
        Ok(url)
    }

    /// Issue the GET and decode the whole JSON body
    async fn get_json(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Value> {
        let url = self.build_url(segments, query)?;
        debug!(path = %url.path(), "Requesting Blockchair endpoint");

        let response = self.client.get(url).send().await?;
        handle_response(response).await
    }

    /// Issue the GET and return the body's `data` member
    async fn get_data(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Value> {
        let body = self.get_json(segments, query).await?;
        extract_data(body)
    }

    /// Issue the GET and decode the body's `data` member into `T`
    async fn get_typed<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T> {
        let data = self.get_data(segments, query).await?;
        Ok(serde_json::from_value(data)?)
    }
}

#[async_trait]
impl BlockchainApi for BlockchairClient {
    async fn general_stats(&self) -> Result<StatsSnapshot> {
        match self.get_data(&["stats"], &[]).await? {
            Value::Object(entries) => Ok(StatsSnapshot::from_entries(entries)),
            other => Err(Error::Transient(format!(
                "stats payload is not an object: {}",
                json_type(&other)
            ))),
        }
    }

    async fn chain_stats(&self, chain: &str) -> Result<ChainStats> {
        self.get_typed(&[chain, "stats"], &[]).await
    }

    async fn recent_transactions(
        &self,
        chain: &str,
        limit: u32,
    ) -> Result<Vec<TransactionSummary>> {
        self.get_typed(&[chain, "transactions"], &[("limit", limit.to_string())])
            .await
    }

    async fn address(&self, chain: &str, address: &str) -> Result<Value> {
        self.get_data(&[chain, "dashboards", "address", address], &[])
            .await
    }

    async fn transaction(&self, chain: &str, txid: &str) -> Result<Value> {
        self.get_data(&[chain, "dashboards", "transaction", txid], &[])
            .await
    }
}

/// Classify the status and decode the body
async fn handle_response(response: Response) -> Result<Value> {
    let status = response.status();

    if status == StatusCode::PAYMENT_REQUIRED {
        debug!(status = status.as_u16(), "Blockchair rejected the credential");
        return Err(Error::Authorization {
            status: status.as_u16(),
        });
    }

    if !status.is_success() {
        return Err(Error::Transient(format!("upstream returned {status}")));
    }

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Take the `data` member out of a response body
fn extract_data(body: Value) -> Result<Value> {
    match body {
        Value::Object(mut map) => map
            .remove("data")
            .ok_or_else(|| Error::Transient("response has no data member".to_string())),
        other => Err(Error::Transient(format!(
            "response body is not an object: {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde_json::json;

    fn client_with(base_url: &str, credential: Option<&str>) -> BlockchairClient {
        BlockchairClient::new(&ApiConfig {
            base_url: base_url.to_string(),
            credential: credential.map(String::from),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_build_url_appends_key() {
        let client = client_with("https://api.example.com", Some("secret"));
        let url = client.build_url(&["bitcoin", "stats"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/bitcoin/stats?key=secret");
    }

    #[test]
    fn test_build_url_keeps_base_path_and_query_order() {
        let client = client_with("http://proxy.local/blockchair/", Some("k"));
        let url = client
            .build_url(&["bitcoin", "transactions"], &[("limit", "5".to_string())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://proxy.local/blockchair/bitcoin/transactions?limit=5&key=k"
        );
    }

    #[test]
    fn test_build_url_encodes_segments() {
        let client = client_with("https://api.example.com", Some("k"));
        let url = client
            .build_url(&["bitcoin", "dashboards", "address", "a/b?c"], &[])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/bitcoin/dashboards/address/a%2Fb%3Fc?key=k"
        );
    }

    #[test]
    fn test_build_url_without_credential_is_config_error() {
        let client = client_with("https://api.example.com", None);
        assert!(!client.has_credential());
        let err = client.build_url(&["stats"], &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "Configuration error: credential missing");
    }

    #[test]
    fn test_empty_credential_counts_as_missing() {
        let client = client_with("https://api.example.com", Some(""));
        assert!(!client.has_credential());
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = BlockchairClient::new(&ApiConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::Config(_))));

        let result = BlockchairClient::new(&ApiConfig {
            base_url: "mailto:someone@example.com".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_extract_data() {
        let data = extract_data(json!({"data": {"x": 1}, "context": {}})).unwrap();
        assert_eq!(data, json!({"x": 1}));

        let err = extract_data(json!({"context": {}})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transient);

        let err = extract_data(json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("array"));
    }
}

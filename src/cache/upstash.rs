use super::KeyValueCache;
use crate::error::CacheError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use url::Url;

/// Response of the Upstash REST API.
#[derive(Debug, Deserialize)]
struct UpstashResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// [`KeyValueCache`] backed by Upstash Redis over its REST API.
#[derive(Debug, Clone)]
pub struct UpstashCache {
    client: reqwest::Client,
    url: Url,
    token: String,
}

impl UpstashCache {
    /// Creates a new [`UpstashCache`].
    pub fn new(client: reqwest::Client, url: Url, token: String) -> Self {
        Self { client, url, token }
    }

    /// Sends a single Redis command.
    async fn command(&self, command: Value) -> Result<Option<Value>, CacheError> {
        let response: UpstashResponse = self
            .client
            .post(self.url.clone())
            .bearer_auth(&self.token)
            .json(&command)
            .send()
            .await?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(CacheError::Backend(error));
        }
        Ok(response.result.filter(|result| !result.is_null()))
    }
}

#[async_trait]
impl KeyValueCache for UpstashCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.command(json!(["GET", key])).await?.map(|value| match value {
            Value::String(value) => value,
            other => other.to_string(),
        }))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        self.command(json!(["SETEX", key, ttl.as_secs().max(1), value])).await?;
        Ok(())
    }
}

//! Evaluation backends: the in-process model or a running planner server

use anyhow::{Context, Result};
use planner_lib::{CapacityModel, CapacitySnapshot, Configuration, LoadReport};
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use url::Url;

/// API client for the planner server
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;
        debug!(url = %url, "POST");

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }
}

/// Where snapshots are computed
pub enum Backend {
    Local(CapacityModel),
    Remote(ApiClient),
}

impl Backend {
    /// Remote when an API URL is given, local otherwise
    pub fn from_api_url(api_url: Option<&str>) -> Result<Self> {
        match api_url {
            Some(url) => Ok(Backend::Remote(ApiClient::new(url)?)),
            None => Ok(Backend::Local(CapacityModel::new())),
        }
    }

    pub async fn evaluate(&self, config: &Configuration) -> Result<CapacitySnapshot> {
        match self {
            Backend::Local(model) => Ok(model.evaluate(config)?),
            Backend::Remote(client) => client.post("api/v1/analysis", config).await,
        }
    }

    pub async fn load_report(&self, max_sessions: u64) -> Result<LoadReport> {
        match self {
            Backend::Local(model) => Ok(model.load_report(max_sessions)),
            Backend::Remote(client) => {
                client
                    .get(&format!("api/v1/load-curve?max_sessions={}", max_sessions))
                    .await
            }
        }
    }
}

//! Apify adapter. Implements BioFetcherPort by running a profile-scraper actor.
//!
//! Flow: start run (server-side wait) -> poll run until terminal or the wait window closes
//! -> read the run's default dataset -> first item's `biography`.

use crate::domain::DomainError;
use crate::ports::BioFetcherPort;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const DEFAULT_APIFY_API_URL: &str = "https://api.apify.com";
pub const DEFAULT_APIFY_ACTOR_ID: &str = "dSCLg0C3YEZ83HzYX";

/// Apify caps `waitForFinish` per request at 60 seconds.
const MAX_WAIT_PER_REQUEST_SECS: u64 = 60;

#[derive(Debug, Deserialize)]
struct RunEnvelope {
    data: RunInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunInfo {
    id: String,
    status: String,
    default_dataset_id: String,
}

impl RunInfo {
    fn is_terminal(&self) -> bool {
        matches!(
            self.status.as_str(),
            "SUCCEEDED" | "FAILED" | "ABORTED" | "TIMED-OUT"
        )
    }
}

/// Apify profile-scraper adapter.
pub struct ApifyBioFetcher {
    client: Client,
    api_url: String,
    token: String,
    actor_id: String,
    wait: Duration,
}

impl ApifyBioFetcher {
    /// Create a new Apify adapter.
    ///
    /// # Arguments
    /// * `api_url` - API base (normally `DEFAULT_APIFY_API_URL`)
    /// * `token` - Apify API token (sent as a bearer header)
    /// * `actor_id` - Scraper actor to run
    /// * `wait` - Total time to wait for the run to finish
    pub fn new(api_url: String, token: String, actor_id: String, wait: Duration) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            actor_id,
            wait,
        }
    }

    fn wait_secs(remaining: Duration) -> u64 {
        remaining.as_secs().clamp(1, MAX_WAIT_PER_REQUEST_SECS)
    }

    async fn read_run(&self, res: reqwest::Response) -> Result<RunInfo, DomainError> {
        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(DomainError::BioFetch(format!(
                "Apify API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }
        let envelope: RunEnvelope = res
            .json()
            .await
            .map_err(|e| DomainError::BioFetch(format!("Failed to parse run: {}", e)))?;
        Ok(envelope.data)
    }

    async fn start_run(&self, handle: &str) -> Result<RunInfo, DomainError> {
        let url = format!("{}/v2/acts/{}/runs", self.api_url, self.actor_id);
        let input = serde_json::json!({
            "usernames": [handle],
            "includeAboutSection": false,
        });
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .query(&[("waitForFinish", Self::wait_secs(self.wait))])
            .json(&input)
            .send()
            .await
            .map_err(|e| DomainError::BioFetch(format!("Request failed: {}", e)))?;
        self.read_run(res).await
    }

    async fn poll_run(&self, run_id: &str, remaining: Duration) -> Result<RunInfo, DomainError> {
        let url = format!("{}/v2/actor-runs/{}", self.api_url, run_id);
        let res = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("waitForFinish", Self::wait_secs(remaining))])
            .send()
            .await
            .map_err(|e| DomainError::BioFetch(format!("Request failed: {}", e)))?;
        self.read_run(res).await
    }

    async fn first_item(&self, dataset_id: &str) -> Result<Option<Value>, DomainError> {
        let url = format!("{}/v2/datasets/{}/items", self.api_url, dataset_id);
        let res = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("limit", "1")])
            .send()
            .await
            .map_err(|e| DomainError::BioFetch(format!("Request failed: {}", e)))?;
        if !res.status().is_success() {
            return Err(DomainError::BioFetch(format!(
                "Dataset fetch failed: {}",
                res.status()
            )));
        }
        let items: Vec<Value> = res
            .json()
            .await
            .map_err(|e| DomainError::BioFetch(format!("Failed to parse dataset: {}", e)))?;
        Ok(items.into_iter().next())
    }
}

#[async_trait::async_trait]
impl BioFetcherPort for ApifyBioFetcher {
    async fn fetch_bio(&self, handle: &str) -> Result<String, DomainError> {
        let deadline = Instant::now() + self.wait;
        info!(handle, actor = %self.actor_id, "starting profile scrape");

        let mut run = self.start_run(handle).await?;
        while !run.is_terminal() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(DomainError::BioFetch(format!(
                    "run {} still {} after {}s",
                    run.id,
                    run.status,
                    self.wait.as_secs()
                )));
            }
            debug!(run_id = %run.id, status = %run.status, "waiting for run");
            run = self.poll_run(&run.id, remaining).await?;
        }
        if run.status != "SUCCEEDED" {
            return Err(DomainError::BioFetch(format!(
                "run {} ended with status {}",
                run.id, run.status
            )));
        }

        let bio = self
            .first_item(&run.default_dataset_id)
            .await?
            .and_then(|item| {
                item.get("biography")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_default();
        if bio.is_empty() {
            warn!(handle, "no biography found");
        } else {
            info!(handle, bio_len = bio.len(), "biography found");
        }
        Ok(bio)
    }
}

//! HTTP client for the Sejm parliamentary API.

use sejmoskop_core::StageNode;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Default public base URL of the Sejm API.
pub const DEFAULT_BASE_URL: &str = "https://api.sejm.gov.pl";

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One entry of a term's process listing.
///
/// `number` is optional for the same reason the stage fields are: one
/// malformed record in the listing must not fail deserialization of the
/// whole term. Callers skip headers without a number.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessHeader {
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// A single legislative process with its nested stage tree.
///
/// Only the fields the pipeline consumes are modelled; the API attaches
/// plenty more (document type, EU flag, committee lists) which serde drops.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessDetail {
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub stages: Vec<StageNode>,
}

/// Client for the Sejm API's legislative-process endpoints.
pub struct SejmClient {
    client: reqwest::Client,
    base_url: String,
}

impl SejmClient {
    /// Create a client for the given base URL (no trailing slash needed).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// List all legislative processes of a parliamentary term.
    pub async fn list_processes(&self, term: i64) -> Result<Vec<ProcessHeader>, SyncError> {
        let url = format!("{}/sejm/term{}/processes", self.base_url, term);

        info!(url = %url, "listing processes");
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let headers: Vec<ProcessHeader> = resp.json().await?;
        info!(count = headers.len(), "listed processes");
        Ok(headers)
    }

    /// Fetch one process with its full stage tree.
    pub async fn get_process(&self, term: i64, number: &str) -> Result<ProcessDetail, SyncError> {
        let url = format!("{}/sejm/term{}/processes/{}", self.base_url, term, number);

        info!(url = %url, "fetching process");
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.json().await?)
    }
}

//! HTTP client for the dataset collection API.
//!
//! Wraps the three calls a collection run needs: trigger a dataset job,
//! read its progress, and download the finished snapshot.

use crate::dataset::poller::StatusProbe;
use crate::models::JobStatus;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.brightdata.com";

const TRIGGER_TIMEOUT_SECS: u64 = 120;
const PROGRESS_TIMEOUT_SECS: u64 = 60;
const DOWNLOAD_TIMEOUT_SECS: u64 = 120;

/// Dataset API errors
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Cannot connect to dataset API at {0}")]
    Connect(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Failed to send request: {0}")]
    Transport(String),

    #[error("Dataset API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid JSON in response: {0}")]
    InvalidBody(String),

    #[error("Trigger returned no snapshot_id: {0}")]
    MissingSnapshotId(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Client for the dataset API, authenticated with a bearer token.
pub struct DatasetClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DatasetClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, DatasetError> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| DatasetError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Build an endpoint URL; query parameters with empty values are left out.
    pub fn build_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, DatasetError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))?;

        let params: Vec<_> = query.iter().filter(|(_, v)| !v.is_empty()).collect();
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, *v)));
        }

        Ok(url)
    }

    /// Start a dataset job and return its snapshot id.
    pub async fn trigger(
        &self,
        dataset_id: &str,
        input_rows: &[Value],
        output_fields: &str,
    ) -> Result<String, DatasetError> {
        let url = self.build_url(
            "/datasets/v3/trigger",
            &[
                ("dataset_id", dataset_id),
                ("custom_output_fields", output_fields),
                ("include_errors", "true"),
            ],
        )?;

        let body = Value::Array(input_rows.to_vec());
        let response = self
            .request_json(Method::POST, url, Some(&body), TRIGGER_TIMEOUT_SECS)
            .await?;

        let snapshot_id = snapshot_id_from(&response)
            .ok_or_else(|| DatasetError::MissingSnapshotId(response.to_string()))?;

        info!("Triggered dataset {} as snapshot {}", dataset_id, snapshot_id);
        Ok(snapshot_id)
    }

    /// Current status string of a snapshot (empty if the API sent none).
    pub async fn progress(&self, snapshot_id: &str) -> Result<String, DatasetError> {
        let url = self.build_url(&format!("/datasets/v3/progress/{}", snapshot_id), &[])?;
        let response = self
            .request_json(Method::GET, url, None, PROGRESS_TIMEOUT_SECS)
            .await?;

        Ok(response
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string())
    }

    /// Download a finished snapshot. An empty body reads as `null`.
    pub async fn download(&self, snapshot_id: &str, format: &str) -> Result<Value, DatasetError> {
        let url = self.build_url(
            &format!("/datasets/v3/snapshot/{}", snapshot_id),
            &[("format", format)],
        )?;

        self.request_json(Method::GET, url, None, DOWNLOAD_TIMEOUT_SECS)
            .await
    }

    async fn request_json(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
        timeout_secs: u64,
    ) -> Result<Value, DatasetError> {
        debug!("{} {}", method, url);

        let mut request = self
            .http_client
            .request(method, url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .timeout(Duration::from_secs(timeout_secs));

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                DatasetError::Timeout(timeout_secs)
            } else if e.is_connect() {
                DatasetError::Connect(self.base_url.clone())
            } else {
                DatasetError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DatasetError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(DatasetError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_body(&text)
    }
}

/// The dataset calls a collection run makes.
///
/// Status checks come from [`StatusProbe`]; this adds starting a job and
/// fetching its finished snapshot.
#[async_trait]
pub trait DatasetApi: StatusProbe {
    async fn trigger(
        &self,
        dataset_id: &str,
        input_rows: &[Value],
        output_fields: &str,
    ) -> Result<String, DatasetError>;

    async fn download(&self, snapshot_id: &str, format: &str) -> Result<Value, DatasetError>;
}

#[async_trait]
impl DatasetApi for DatasetClient {
    async fn trigger(
        &self,
        dataset_id: &str,
        input_rows: &[Value],
        output_fields: &str,
    ) -> Result<String, DatasetError> {
        DatasetClient::trigger(self, dataset_id, input_rows, output_fields).await
    }

    async fn download(&self, snapshot_id: &str, format: &str) -> Result<Value, DatasetError> {
        DatasetClient::download(self, snapshot_id, format).await
    }
}

#[async_trait]
impl StatusProbe for DatasetClient {
    async fn status(&self, snapshot_id: &str) -> Result<JobStatus, DatasetError> {
        let status = self.progress(snapshot_id).await?;
        debug!("Snapshot {} status: {:?}", snapshot_id, status);
        Ok(JobStatus::from_remote(&status))
    }
}

fn parse_body(text: &str) -> Result<Value, DatasetError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(text).map_err(|e| DatasetError::InvalidBody(e.to_string()))
}

/// The snapshot id from a trigger response, if it carries a usable one.
fn snapshot_id_from(response: &Value) -> Option<String> {
    match response.get("snapshot_id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
